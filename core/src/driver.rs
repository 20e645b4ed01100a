//! Runs a `ListSession` against a real transport on the calling thread.
//!
//! # Design
//! Hosts that own their own event loop (the FFI consumers) execute effects
//! themselves. Everything else, the integration tests and Rust callers
//! included, can hand a `Transport` to a `Driver` and call the same
//! operations; each effect is executed and completed before the method
//! returns, so completions never interleave.

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::{Effect, ListSession};

/// Executes one HTTP round-trip.
///
/// Any status code is a successful round-trip; only failures to obtain a
/// response at all are `TransportError`s.
pub trait Transport {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: FnMut(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// A session bundled with the transport that serves its effects.
///
/// Dereferences to the session for read-only state and the gestures that
/// never produce an effect (`open_form`, `scroll_to_top`, ...).
pub struct Driver<T> {
    session: ListSession,
    transport: T,
}

impl<T: Transport> Driver<T> {
    pub fn new(session: ListSession, transport: T) -> Self {
        Self { session, transport }
    }

    pub fn into_parts(self) -> (ListSession, T) {
        (self.session, self.transport)
    }

    pub fn start(&mut self) {
        let effect = self.session.start();
        self.run(effect);
    }

    pub fn load_next_page(&mut self) {
        let effect = self.session.load_next_page();
        self.run(effect);
    }

    pub fn advance_page_trigger(&mut self) {
        let effect = self.session.advance_page_trigger();
        self.run(effect);
    }

    pub fn refresh(&mut self) {
        let effect = self.session.refresh();
        self.run(effect);
    }

    pub fn submit_form(&mut self) {
        let effect = self.session.submit_form();
        self.run(effect);
    }

    pub fn create_item(&mut self, title: &str) {
        let effect = self.session.create_item(title);
        self.run(effect);
    }

    pub fn confirm_delete(&mut self) {
        let effect = self.session.confirm_delete();
        self.run(effect);
    }

    fn run(&mut self, effect: Option<Effect>) {
        let Some(Effect { ticket, request }) = effect else {
            return;
        };
        debug!(
            ticket = ticket.0,
            method = request.method.as_str(),
            path = %request.path,
            "executing request"
        );
        let outcome = self.transport.execute(&request);
        self.session.complete(ticket, outcome);
    }
}

impl<T> Deref for Driver<T> {
    type Target = ListSession;

    fn deref(&self) -> &ListSession {
        &self.session
    }
}

impl<T> DerefMut for Driver<T> {
    fn deref_mut(&mut self) -> &mut ListSession {
        &mut self.session
    }
}

#[cfg(feature = "http")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "http")]
mod ureq_transport {
    use std::time::Duration;

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a ureq agent.
    ///
    /// Status codes are returned as data, never as errors, so the client's
    /// parse methods decide what counts as success. The global timeout
    /// bounds every request, so a hung call ends as a `TransportError` and
    /// the session's flags are always released.
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(timeout: Duration) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(Some(timeout))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Transport for UreqTransport {
        fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let result = match (request.method, request.body.as_deref()) {
                (HttpMethod::Get, _) => self.agent.get(&request.path).call(),
                (HttpMethod::Delete, _) => self.agent.delete(&request.path).call(),
                (HttpMethod::Post, Some(body)) => self
                    .agent
                    .post(&request.path)
                    .content_type("application/json")
                    .send(body.as_bytes()),
                (HttpMethod::Post, None) => self.agent.post(&request.path).send_empty(),
            };
            let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| TransportError::new(e.to_string()))?;
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ItemClient;
    use crate::http::HttpMethod;
    use crate::session::{Notice, SessionEvent};
    use crate::types::Item;

    /// Serves pages of `page_sizes` in order and records every request.
    struct FakeService {
        page_sizes: Vec<u64>,
        requests: Vec<HttpRequest>,
        fail_next: bool,
    }

    impl FakeService {
        fn new(page_sizes: &[u64]) -> Self {
            Self {
                page_sizes: page_sizes.to_vec(),
                requests: Vec::new(),
                fail_next: false,
            }
        }
    }

    impl Transport for FakeService {
        fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.push(request.clone());
            if std::mem::take(&mut self.fail_next) {
                return Err(TransportError::new("unreachable"));
            }
            match request.method {
                HttpMethod::Get => {
                    let page: usize = request
                        .path
                        .split("_page=")
                        .nth(1)
                        .and_then(|rest| rest.split('&').next())
                        .and_then(|n| n.parse().ok())
                        .unwrap();
                    let first: u64 = self.page_sizes.iter().take(page - 1).sum::<u64>() + 1;
                    let size = self.page_sizes.get(page - 1).copied().unwrap_or(0);
                    let items: Vec<Item> = (first..first + size)
                        .map(|id| Item {
                            id,
                            title: format!("item {id}"),
                        })
                        .collect();
                    Ok(HttpResponse::new(200, serde_json::to_string(&items).unwrap()))
                }
                HttpMethod::Post => Ok(HttpResponse::new(201, r#"{"id":500,"title":"made"}"#)),
                HttpMethod::Delete => Ok(HttpResponse::new(200, "{}")),
            }
        }
    }

    fn driver(page_sizes: &[u64]) -> Driver<FakeService> {
        let session = ListSession::new(ItemClient::new("http://svc"));
        Driver::new(session, FakeService::new(page_sizes))
    }

    #[test]
    fn scrolling_to_the_end_drains_every_page() {
        let mut d = driver(&[10, 10]);
        d.start();
        while d.has_more() {
            d.advance_page_trigger();
        }
        assert_eq!(d.items().len(), 20);
        assert_eq!(d.page(), 3);
        let (_, service) = d.into_parts();
        assert_eq!(service.requests.len(), 3);
    }

    #[test]
    fn transport_failure_becomes_notice() {
        let mut d = driver(&[10]);
        d.transport.fail_next = true;
        d.start();
        assert!(!d.is_loading());
        assert_eq!(
            d.drain_events(),
            vec![SessionEvent::Notice(Notice::FETCH_FAILED)]
        );
    }

    #[test]
    fn create_and_delete_round_trip() {
        let mut d = driver(&[3]);
        d.start();
        d.open_form();
        d.set_input("made");
        d.submit_form();
        assert_eq!(d.items()[0].id, 500);

        d.delete_item(2);
        d.confirm_delete();
        let ids: Vec<u64> = d.items().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![500, 1, 3]);
    }

    #[test]
    fn closures_are_transports() {
        let transport = |_: &HttpRequest| Ok::<_, TransportError>(HttpResponse::new(200, "[]"));
        let mut d = Driver::new(ListSession::new(ItemClient::new("http://svc")), transport);
        d.start();
        assert!(!d.has_more());
    }
}
