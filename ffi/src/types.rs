//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`,
//! and enums with explicit discriminants. Conversions live here so `lib.rs`
//! stays focused on the `extern "C"` surface. Everything returned to C is
//! heap-allocated here and released by the matching `itemlist_free_*`.

use std::ffi::CString;
use std::os::raw::c_char;

use itemlist_core::{
    Effect, HttpMethod, HttpRequest, ListSession, Notice, NoticeKind, ScrollTarget, SessionEvent,
};

/// Opaque handle to a `ListSession`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiSession {
    pub(crate) inner: ListSession,
}

/// Convert to an owned C string, dropping interior NUL bytes.
pub(crate) fn into_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|e| {
            let mut bytes = e.into_vec();
            bytes.retain(|b| *b != 0);
            CString::new(bytes).unwrap_or_default()
        })
        .into_raw()
}

/// Release a string produced by `into_c_string`. Null is ignored.
pub(crate) unsafe fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Delete = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request the host must execute. `path` is the absolute URL.
/// `body` is null when there is none.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: usize,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    fn from_core(req: HttpRequest) -> Self {
        let body = match req.body {
            Some(b) => into_c_string(b),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len();
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        FfiHttpRequest {
            method: req.method.into(),
            path: into_c_string(req.path),
            headers,
            headers_len,
            body,
        }
    }

    unsafe fn free_fields(&mut self) {
        unsafe {
            free_c_string(self.path);
            free_c_string(self.body);
        }
        if !self.headers.is_null() && self.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    self.headers,
                    self.headers_len,
                ))
            };
            for h in headers.iter() {
                unsafe {
                    free_c_string(h.key);
                    free_c_string(h.value);
                }
            }
        }
    }
}

/// A request plus the ticket to hand back to `itemlist_session_complete`.
#[repr(C)]
pub struct FfiEffect {
    pub ticket: u64,
    pub request: FfiHttpRequest,
}

impl FfiEffect {
    /// Heap-allocate `effect`, or return null when there is none.
    pub(crate) fn from_core(effect: Option<Effect>) -> *mut Self {
        match effect {
            Some(effect) => Box::into_raw(Box::new(FfiEffect {
                ticket: effect.ticket.0,
                request: FfiHttpRequest::from_core(effect.request),
            })),
            None => std::ptr::null_mut(),
        }
    }

    pub(crate) unsafe fn free(effect: *mut Self) {
        let mut effect = unsafe { Box::from_raw(effect) };
        unsafe { effect.request.free_fields() };
    }
}

/// An HTTP response constructed by the C caller after executing an
/// `FfiEffect`. The FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One list row. `id` doubles as the row key.
#[repr(C)]
pub struct FfiItem {
    pub id: u64,
    pub title: *mut c_char,
}

/// Everything the list screen renders, copied out of the session.
#[repr(C)]
pub struct FfiSnapshot {
    pub items: *mut FfiItem,
    pub items_len: usize,
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub refreshing: bool,
    pub footer_spinner: bool,
    pub form_open: bool,
    pub input: *mut c_char,
    pub delete_pending: bool,
    pub pending_delete_id: u64,
}

impl FfiSnapshot {
    pub(crate) fn from_session(session: &ListSession) -> *mut Self {
        let items_len = session.items().len();
        let items = if session.items().is_empty() {
            std::ptr::null_mut()
        } else {
            let rows: Box<[FfiItem]> = session
                .items()
                .iter()
                .map(|item| FfiItem {
                    id: item.key(),
                    title: into_c_string(item.title.as_str()),
                })
                .collect();
            Box::into_raw(rows) as *mut FfiItem
        };

        Box::into_raw(Box::new(FfiSnapshot {
            items,
            items_len,
            page: session.page(),
            has_more: session.has_more(),
            loading: session.is_loading(),
            refreshing: session.is_refreshing(),
            footer_spinner: session.shows_footer_spinner(),
            form_open: session.form_open(),
            input: into_c_string(session.input()),
            delete_pending: session.pending_delete().is_some(),
            pending_delete_id: session.pending_delete().unwrap_or(0),
        }))
    }

    pub(crate) unsafe fn free(snapshot: *mut Self) {
        let snapshot = unsafe { Box::from_raw(snapshot) };
        unsafe { free_c_string(snapshot.input) };
        if !snapshot.items.is_null() && snapshot.items_len > 0 {
            let rows = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    snapshot.items,
                    snapshot.items_len,
                ))
            };
            for row in rows.iter() {
                unsafe { free_c_string(row.title) };
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEventKind {
    Notice = 0,
    ScrollTop = 1,
    ScrollBottom = 2,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiNoticeKind {
    Success = 0,
    Error = 1,
    Validation = 2,
}

impl From<NoticeKind> for FfiNoticeKind {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Success => FfiNoticeKind::Success,
            NoticeKind::Error => FfiNoticeKind::Error,
            NoticeKind::Validation => FfiNoticeKind::Validation,
        }
    }
}

/// A queued view event. For scroll events `title` and `message` are null
/// and `notice_kind` is meaningless.
#[repr(C)]
pub struct FfiEvent {
    pub kind: FfiEventKind,
    pub notice_kind: FfiNoticeKind,
    pub title: *mut c_char,
    pub message: *mut c_char,
}

impl FfiEvent {
    pub(crate) fn from_core(event: SessionEvent) -> *mut Self {
        let event = match event {
            SessionEvent::Notice(Notice {
                kind,
                title,
                message,
            }) => FfiEvent {
                kind: FfiEventKind::Notice,
                notice_kind: kind.into(),
                title: into_c_string(title),
                message: into_c_string(message),
            },
            SessionEvent::Scroll(target) => FfiEvent {
                kind: match target {
                    ScrollTarget::Top => FfiEventKind::ScrollTop,
                    ScrollTarget::Bottom => FfiEventKind::ScrollBottom,
                },
                notice_kind: FfiNoticeKind::Success,
                title: std::ptr::null_mut(),
                message: std::ptr::null_mut(),
            },
        };
        Box::into_raw(Box::new(event))
    }

    pub(crate) unsafe fn free(event: *mut Self) {
        let event = unsafe { Box::from_raw(event) };
        unsafe {
            free_c_string(event.title);
            free_c_string(event.message);
        }
    }
}
