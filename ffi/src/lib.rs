//! C-ABI wrapper around `itemlist-core`.
//!
//! # Overview
//! Exposes a `ListSession` through `extern "C"` functions so a mobile host
//! (Swift, Kotlin, a JS bridge) can drive the list screen: call a gesture
//! function, execute the returned `FfiEffect` with its own HTTP stack, then
//! report the response back with `itemlist_session_complete`. After each
//! step the host re-reads `itemlist_session_snapshot` and drains
//! `itemlist_session_next_event`.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Gesture functions return null when the gesture produced no request.
//! - The session is single-threaded: all calls for one handle must come
//!   from the same thread.
//! - The C caller owns all returned pointers and must call the matching
//!   `itemlist_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use itemlist_core::{Effect, HttpResponse, ListSession, SessionConfig, TicketId, TransportError};
use tracing::warn;

use types::*;

/// Borrow a C string as UTF-8, lossy for invalid bytes.
///
/// # Safety
/// `s` must be non-null and NUL-terminated.
unsafe fn read_c_str(s: *const c_char) -> String {
    unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned()
}

/// Run `f` against the session behind `session`, returning its effect.
fn with_session<F>(session: *mut FfiSession, f: F) -> *mut FfiEffect
where
    F: FnOnce(&mut ListSession) -> Option<Effect>,
{
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &mut *session };
        FfiEffect::from_core(f(&mut session.inner))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Like `with_session` for gestures that never issue a request.
fn update_session<F>(session: *mut FfiSession, f: F)
where
    F: FnOnce(&mut ListSession),
{
    let _ = catch_unwind(AssertUnwindSafe(|| {
        if !session.is_null() {
            let session = unsafe { &mut *session };
            f(&mut session.inner);
        }
    }));
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Create a session for the item service at `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `itemlist_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_new(base_url: *const c_char) -> *mut FfiSession {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_c_str(base_url) };
        let session = ListSession::from_config(&SessionConfig::new(&url));
        Box::into_raw(Box::new(FfiSession { inner: session }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session created by `itemlist_session_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(session) });
        });
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Initial load when the screen mounts.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_start(session: *mut FfiSession) -> *mut FfiEffect {
    with_session(session, ListSession::start)
}

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_load_next_page(session: *mut FfiSession) -> *mut FfiEffect {
    with_session(session, ListSession::load_next_page)
}

/// Call when the list scrolls past its end-reached threshold.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_advance_page_trigger(
    session: *mut FfiSession,
) -> *mut FfiEffect {
    with_session(session, ListSession::advance_page_trigger)
}

/// Pull-to-refresh. Always returns a request for a non-null session.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_refresh(session: *mut FfiSession) -> *mut FfiEffect {
    with_session(session, ListSession::refresh)
}

// ---------------------------------------------------------------------------
// Add-item form
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_open_form(session: *mut FfiSession) {
    update_session(session, ListSession::open_form);
}

/// Replace the form's input buffer. A null `text` clears it.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_set_input(session: *mut FfiSession, text: *const c_char) {
    let text = if text.is_null() {
        String::new()
    } else {
        unsafe { read_c_str(text) }
    };
    update_session(session, |s| s.set_input(&text));
}

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_cancel_form(session: *mut FfiSession) {
    update_session(session, ListSession::cancel_form);
}

/// Submit the form. Returns null (and queues a validation notice) for a
/// blank input.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_submit_form(session: *mut FfiSession) -> *mut FfiEffect {
    with_session(session, ListSession::submit_form)
}

/// Create an item without going through the form buffer. A null `title`
/// counts as empty and queues the validation notice.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_create_item(
    session: *mut FfiSession,
    title: *const c_char,
) -> *mut FfiEffect {
    let title = if title.is_null() {
        String::new()
    } else {
        unsafe { read_c_str(title) }
    };
    with_session(session, |s| s.create_item(&title))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// Open the confirmation prompt for `id`. No request is made until
/// `itemlist_session_confirm_delete`.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_delete_item(session: *mut FfiSession, id: u64) {
    update_session(session, |s| s.delete_item(id));
}

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_cancel_delete(session: *mut FfiSession) {
    update_session(session, ListSession::cancel_delete);
}

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_confirm_delete(session: *mut FfiSession) -> *mut FfiEffect {
    with_session(session, ListSession::confirm_delete)
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_scroll_to_top(session: *mut FfiSession) {
    update_session(session, ListSession::scroll_to_top);
}

#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_scroll_to_bottom(session: *mut FfiSession) {
    update_session(session, ListSession::scroll_to_bottom);
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Report the outcome of the effect identified by `ticket`.
///
/// Pass the received response, or null for `response` when the request
/// failed before any response arrived; `error` may then describe why and
/// may itself be null.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_complete(
    session: *mut FfiSession,
    ticket: u64,
    response: *const FfiHttpResponse,
    error: *const c_char,
) {
    let outcome = if response.is_null() {
        let message = if error.is_null() {
            "request failed".to_string()
        } else {
            unsafe { read_c_str(error) }
        };
        Err(TransportError::new(message))
    } else {
        let resp = unsafe { &*response };
        let body = if resp.body.is_null() {
            String::new()
        } else {
            unsafe { read_c_str(resp.body) }
        };
        Ok(HttpResponse::new(resp.status, body))
    };
    if session.is_null() {
        warn!(ticket, "completion for null session");
        return;
    }
    update_session(session, |s| s.complete(TicketId(ticket), outcome));
}

// ---------------------------------------------------------------------------
// Reading state
// ---------------------------------------------------------------------------

/// Copy the current view state. Returns null for a null session.
/// Free with `itemlist_free_snapshot`.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_snapshot(session: *const FfiSession) -> *mut FfiSnapshot {
    catch_unwind(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &*session };
        FfiSnapshot::from_session(&session.inner)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Pop the oldest queued event, or null when the queue is empty.
/// Free with `itemlist_free_event`.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_session_next_event(session: *mut FfiSession) -> *mut FfiEvent {
    catch_unwind(AssertUnwindSafe(|| {
        if session.is_null() {
            return std::ptr::null_mut();
        }
        let session = unsafe { &mut *session };
        match session.inner.next_event() {
            Some(event) => FfiEvent::from_core(event),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiEffect` returned by any gesture function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_free_effect(effect: *mut FfiEffect) {
    if effect.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiEffect::free(effect) });
}

/// Free an `FfiSnapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_free_snapshot(snapshot: *mut FfiSnapshot) {
    if snapshot.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiSnapshot::free(snapshot) });
}

/// Free an `FfiEvent`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn itemlist_free_event(event: *mut FfiEvent) {
    if event.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiEvent::free(event) });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
