//! Domain DTOs for the item service.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently, so
//! the FFI surface never couples to axum types. Real services (the public
//! jsonplaceholder API included) send extra fields such as `userId` and
//! `body`; serde ignores them on decode.

use serde::{Deserialize, Serialize};

/// Number of items requested per page.
pub const PAGE_SIZE: u32 = 10;

/// A single item returned by the service. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub title: String,
}

impl Item {
    /// Stable row key for list views. Always the service-assigned id.
    pub fn key(&self) -> u64 {
        self.id
    }
}

/// Request payload for creating a new item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
}
