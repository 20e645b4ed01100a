//! State and request core for a paginated item list screen.
//!
//! # Overview
//! `ListSession` holds the state of one list screen (loaded items, page
//! cursor, loading/refreshing flags, add-item form, delete confirmation) and
//! turns gestures into `HttpRequest` effects. The host executes those
//! requests and feeds the responses back (host-does-IO pattern), so the core
//! stays deterministic and testable.
//!
//! # Design
//! - `ItemClient` is stateless and split into `build_*` / `parse_*` per
//!   operation, so the IO boundary is explicit.
//! - `ListSession` is single-threaded; completions are matched to requests
//!   by `TicketId`, and a refresh invalidates older page requests.
//! - `driver::Driver` pairs a session with a `Transport` for callers that
//!   want the round-trip done for them. `UreqTransport` is behind the
//!   default `http` feature.
//! - Types use owned `String` / `Vec` fields to keep the FFI mapping simple.

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

pub use client::ItemClient;
pub use config::SessionConfig;
pub use driver::{Driver, Transport};
pub use error::{ApiError, RequestError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{
    Effect, ListSession, Notice, NoticeKind, Outcome, ScrollTarget, SessionEvent, TicketId,
};
pub use types::{Item, NewItem, PAGE_SIZE};

#[cfg(feature = "http")]
pub use driver::UreqTransport;
