//! Stateless HTTP request builder and response parser for the item service.
//!
//! # Design
//! `ItemClient` holds only the collection URL and the page size. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`. The service
//! contract is the jsonplaceholder one: `_page`/`_limit` query parameters on
//! the list endpoint, any 2xx status counts as success.

use serde::de::DeserializeOwned;

use crate::config::SessionConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Item, NewItem, PAGE_SIZE};

/// Synchronous, stateless client for the item service.
#[derive(Debug, Clone)]
pub struct ItemClient {
    collection_url: String,
    page_size: u32,
}

impl ItemClient {
    /// Client for `{base_url}/posts` with ten-item pages.
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&SessionConfig::new(base_url))
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        let page_size = if config.page_size == 0 {
            PAGE_SIZE
        } else {
            config.page_size
        };
        Self {
            collection_url: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                config.resource
            ),
            page_size,
        }
    }

    pub fn build_list_page(&self, page: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}?_page={page}&_limit={}",
                self.collection_url, self.page_size
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_item(&self, input: &NewItem) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete_item(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{id}", self.collection_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// An empty array is a valid page and marks the end of the data.
    pub fn parse_list_page(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// The body is ignored; only the status matters.
    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
