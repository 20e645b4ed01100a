//! Session configuration.
//!
//! The defaults point at the public jsonplaceholder service, which speaks
//! the `_page`/`_limit` contract the session relies on.

use std::time::Duration;

use crate::types::PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_RESOURCE: &str = "posts";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub base_url: String,
    /// Collection path segment, without slashes.
    pub resource: String,
    pub page_size: u32,
    /// Upper bound for one round-trip. Only transports honour it; the
    /// session itself never times out.
    pub request_timeout: Duration,
}

impl SessionConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = resource.trim_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            resource: DEFAULT_RESOURCE.to_string(),
            page_size: PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
