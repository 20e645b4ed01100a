//! The list session controller.
//!
//! # Design
//! `ListSession` owns everything the list screen shows: the loaded items,
//! the page cursor, the loading/refreshing flags, the add-item form and the
//! delete confirmation. Every user gesture is a method that mutates the
//! state and may return an `Effect`, an `HttpRequest` tagged with a
//! `TicketId`. The host executes the request and hands the result back
//! through `complete`. Nothing in here performs IO or blocks.
//!
//! Overlapping requests are resolved with two mechanisms:
//! - `loading` / `refreshing` keep at most one page fetch in flight.
//! - Every refresh bumps `generation`. Page and refresh tickets remember the
//!   generation they were issued under, and completions from an older
//!   generation are dropped, so a slow page response can never be appended
//!   to a list that has since been refreshed.
//!
//! User-visible feedback (alerts, scroll requests) is queued as
//! `SessionEvent`s and pulled by the view with `drain_events`.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::client::ItemClient;
use crate::config::SessionConfig;
use crate::error::{ApiError, RequestError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Item, NewItem};

/// Identifies one in-flight request. Handed back to `ListSession::complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketId(pub u64);

/// A request the host must execute on the session's behalf.
#[derive(Debug, Clone)]
pub struct Effect {
    pub ticket: TicketId,
    pub request: HttpRequest,
}

/// Result of executing an `Effect`: a response of any status, or a
/// transport failure.
pub type Outcome = Result<HttpResponse, TransportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Validation,
}

/// A modal notification with a static title and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub message: &'static str,
}

impl Notice {
    pub const FETCH_FAILED: Notice = Notice::error("Failed to fetch data.");
    pub const REFRESH_FAILED: Notice = Notice::error("Failed to refresh data.");
    pub const ADD_FAILED: Notice = Notice::error("Failed to add new item.");
    pub const DELETE_FAILED: Notice = Notice::error("Failed to delete item.");
    pub const ITEM_ADDED: Notice = Notice::success("Item added successfully.");
    pub const ITEM_DELETED: Notice = Notice::success("Item deleted successfully.");
    pub const EMPTY_TITLE: Notice = Notice {
        kind: NoticeKind::Validation,
        title: "Validation Error",
        message: "Item name cannot be empty.",
    };

    const fn error(message: &'static str) -> Notice {
        Notice {
            kind: NoticeKind::Error,
            title: "Error",
            message,
        }
    }

    const fn success(message: &'static str) -> Notice {
        Notice {
            kind: NoticeKind::Success,
            title: "Success",
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    Bottom,
}

/// Something the view should react to once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Notice(Notice),
    Scroll(ScrollTarget),
}

/// What an in-flight ticket was issued for.
#[derive(Debug, Clone, Copy)]
enum Pending {
    LoadPage { page: u32, generation: u64 },
    Refresh { generation: u64 },
    Create,
    Delete { id: u64 },
}

#[derive(Debug)]
pub struct ListSession {
    client: ItemClient,
    items: Vec<Item>,
    page: u32,
    has_more: bool,
    loading: bool,
    refreshing: bool,
    form_open: bool,
    input: String,
    pending_delete: Option<u64>,
    generation: u64,
    next_ticket: u64,
    in_flight: HashMap<TicketId, Pending>,
    events: VecDeque<SessionEvent>,
}

impl ListSession {
    pub fn new(client: ItemClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            page: 1,
            has_more: true,
            loading: false,
            refreshing: false,
            form_open: false,
            input: String::new(),
            pending_delete: None,
            generation: 0,
            next_ticket: 1,
            in_flight: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(ItemClient::from_config(config))
    }

    // -----------------------------------------------------------------------
    // Read-only view state
    // -----------------------------------------------------------------------

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Next page to request.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// The list footer shows a spinner while more data is on its way.
    pub fn shows_footer_spinner(&self) -> bool {
        self.loading && self.has_more
    }

    pub fn form_open(&self) -> bool {
        self.form_open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Id awaiting the user's cancel/delete choice, if the prompt is up.
    pub fn pending_delete(&self) -> Option<u64> {
        self.pending_delete
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    pub fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.pop_front()
    }

    // -----------------------------------------------------------------------
    // Pagination
    // -----------------------------------------------------------------------

    /// First fetch when the screen mounts.
    pub fn start(&mut self) -> Option<Effect> {
        self.load_next_page()
    }

    /// Request page `page` unless a fetch is already running or the data is
    /// exhausted.
    pub fn load_next_page(&mut self) -> Option<Effect> {
        if self.loading || self.refreshing || !self.has_more {
            return None;
        }
        self.loading = true;
        let page = self.page;
        let request = self.client.build_list_page(page);
        debug!(page, "requesting page");
        Some(self.issue(
            Pending::LoadPage {
                page,
                generation: self.generation,
            },
            request,
        ))
    }

    /// The view scrolled near the end of the list.
    pub fn advance_page_trigger(&mut self) -> Option<Effect> {
        if !self.has_more || self.loading {
            return None;
        }
        self.load_next_page()
    }

    /// Pull-to-refresh: drop everything and start again from page 1.
    ///
    /// The list is cleared up front and stays empty if the refresh fails.
    pub fn refresh(&mut self) -> Option<Effect> {
        self.generation += 1;
        self.loading = false;
        self.page = 1;
        self.has_more = true;
        self.items.clear();
        self.pending_delete = None;
        self.refreshing = true;
        let request = self.client.build_list_page(1);
        debug!(generation = self.generation, "refreshing");
        Some(self.issue(
            Pending::Refresh {
                generation: self.generation,
            },
            request,
        ))
    }

    // -----------------------------------------------------------------------
    // Add-item form
    // -----------------------------------------------------------------------

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    pub fn set_input(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
    }

    pub fn cancel_form(&mut self) {
        self.form_open = false;
        self.input.clear();
    }

    /// Submit the form's current input.
    pub fn submit_form(&mut self) -> Option<Effect> {
        let title = self.input.clone();
        self.create_item(&title)
    }

    /// Send a create request for `title`. Blank titles are rejected locally.
    pub fn create_item(&mut self, title: &str) -> Option<Effect> {
        if title.trim().is_empty() {
            self.events.push_back(SessionEvent::Notice(Notice::EMPTY_TITLE));
            return None;
        }
        let input = NewItem {
            title: title.to_string(),
        };
        match self.client.build_create_item(&input) {
            Ok(request) => Some(self.issue(Pending::Create, request)),
            Err(err) => {
                warn!(error = %err, "could not build create request");
                self.events.push_back(SessionEvent::Notice(Notice::ADD_FAILED));
                None
            }
        }
    }

    // -----------------------------------------------------------------------
    // Deletion
    // -----------------------------------------------------------------------

    /// Ask for confirmation before deleting `id`. Nothing goes over the
    /// network until `confirm_delete`.
    pub fn delete_item(&mut self, id: u64) {
        if !self.items.iter().any(|item| item.id == id) {
            warn!(id, "delete requested for an item that is not listed");
            self.events.push_back(SessionEvent::Notice(Notice::DELETE_FAILED));
            return;
        }
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Option<Effect> {
        let id = self.pending_delete.take()?;
        if !self.items.iter().any(|item| item.id == id) {
            warn!(id, "confirmed delete for an item that is no longer listed");
            self.events.push_back(SessionEvent::Notice(Notice::DELETE_FAILED));
            return None;
        }
        let request = self.client.build_delete_item(id);
        Some(self.issue(Pending::Delete { id }, request))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn scroll_to_top(&mut self) {
        self.events.push_back(SessionEvent::Scroll(ScrollTarget::Top));
    }

    pub fn scroll_to_bottom(&mut self) {
        self.events.push_back(SessionEvent::Scroll(ScrollTarget::Bottom));
    }

    // -----------------------------------------------------------------------
    // Completions
    // -----------------------------------------------------------------------

    /// Feed back the outcome of an `Effect`. Unknown tickets are ignored.
    pub fn complete(&mut self, ticket: TicketId, outcome: Outcome) {
        let Some(pending) = self.in_flight.remove(&ticket) else {
            warn!(ticket = ticket.0, "completion for unknown ticket");
            return;
        };
        match pending {
            Pending::LoadPage { page, generation } => {
                self.finish_load_page(page, generation, outcome)
            }
            Pending::Refresh { generation } => self.finish_refresh(generation, outcome),
            Pending::Create => self.finish_create(outcome),
            Pending::Delete { id } => self.finish_delete(id, outcome),
        }
    }

    fn finish_load_page(&mut self, page: u32, generation: u64, outcome: Outcome) {
        if generation != self.generation {
            debug!(page, generation, "dropping page from before refresh");
            return;
        }
        self.loading = false;
        match settle(outcome, |response| self.client.parse_list_page(response)) {
            Ok(items) if items.is_empty() => {
                debug!(page, "reached end of data");
                self.has_more = false;
            }
            Ok(items) => {
                debug!(page, count = items.len(), "page loaded");
                self.items.extend(items);
                self.page = page + 1;
            }
            Err(err) => {
                warn!(page, error = %err, "page load failed");
                self.events.push_back(SessionEvent::Notice(Notice::FETCH_FAILED));
            }
        }
    }

    fn finish_refresh(&mut self, generation: u64, outcome: Outcome) {
        if generation != self.generation {
            debug!(generation, "dropping superseded refresh");
            return;
        }
        self.refreshing = false;
        match settle(outcome, |response| self.client.parse_list_page(response)) {
            Ok(items) => {
                debug!(count = items.len(), "refresh loaded");
                if items.is_empty() {
                    self.has_more = false;
                } else {
                    self.page = 2;
                }
                self.items = items;
            }
            Err(err) => {
                warn!(error = %err, "refresh failed");
                self.events
                    .push_back(SessionEvent::Notice(Notice::REFRESH_FAILED));
            }
        }
    }

    fn finish_create(&mut self, outcome: Outcome) {
        match settle(outcome, |response| self.client.parse_create_item(response)) {
            Ok(item) => {
                debug!(id = item.id, "item created");
                self.items.insert(0, item);
                self.input.clear();
                self.form_open = false;
                self.events.push_back(SessionEvent::Notice(Notice::ITEM_ADDED));
                self.events.push_back(SessionEvent::Scroll(ScrollTarget::Top));
            }
            Err(err) => {
                warn!(error = %err, "create failed");
                self.events.push_back(SessionEvent::Notice(Notice::ADD_FAILED));
            }
        }
    }

    fn finish_delete(&mut self, id: u64, outcome: Outcome) {
        match settle(outcome, |response| self.client.parse_delete_item(response)) {
            Ok(()) => match self.items.iter().position(|item| item.id == id) {
                Some(pos) => {
                    self.items.remove(pos);
                    debug!(id, "item deleted");
                    self.events
                        .push_back(SessionEvent::Notice(Notice::ITEM_DELETED));
                }
                None => {
                    warn!(id, "deleted item was no longer listed");
                    self.events
                        .push_back(SessionEvent::Notice(Notice::DELETE_FAILED));
                }
            },
            Err(err) => {
                warn!(id, error = %err, "delete failed");
                self.events
                    .push_back(SessionEvent::Notice(Notice::DELETE_FAILED));
            }
        }
    }

    fn issue(&mut self, pending: Pending, request: HttpRequest) -> Effect {
        let ticket = TicketId(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(ticket, pending);
        Effect { ticket, request }
    }
}

/// Fold a transport outcome and the matching parse step into one result.
fn settle<T>(
    outcome: Outcome,
    parse: impl FnOnce(HttpResponse) -> Result<T, ApiError>,
) -> Result<T, RequestError> {
    Ok(parse(outcome?)?)
}
