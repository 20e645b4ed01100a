//! Error types for the item service client and its transports.
//!
//! # Design
//! `NotFound` gets a dedicated variant because a delete against an id the
//! service no longer knows is the common failure. Every other non-2xx
//! response lands in `HttpError` with the raw status and body.
//! `TransportError` is what a host reports when the round-trip itself never
//! produced a response.

use thiserror::Error;

/// Errors returned by `ItemClient` build/parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// The request was rejected or never completed (DNS, connect, timeout...).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Why a request issued by the session did not succeed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
