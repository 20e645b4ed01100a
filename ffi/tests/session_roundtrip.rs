//! Drive a session through the C ABI against the live mock server.
//!
//! Plays the role of a mobile host: every `FfiEffect` is executed with ureq
//! and its response handed back through `itemlist_session_complete`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use itemlist_ffi::types::{FfiEffect, FfiEventKind, FfiHttpMethod, FfiHttpResponse, FfiNoticeKind};
use itemlist_ffi::*;

fn spawn_server(seed: u64) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, seed).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn c_str(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

/// Execute `effect` over HTTP, complete it, and free it. Null is a no-op.
fn run(session: *mut itemlist_ffi::types::FfiSession, effect: *mut FfiEffect) {
    if effect.is_null() {
        return;
    }
    let (ticket, method, path, body) = unsafe {
        let e = &*effect;
        let body = if e.request.body.is_null() {
            None
        } else {
            Some(c_str(e.request.body))
        };
        let method = match e.request.method {
            FfiHttpMethod::Get => "GET",
            FfiHttpMethod::Post => "POST",
            FfiHttpMethod::Delete => "DELETE",
        };
        (e.ticket, method, c_str(e.request.path), body)
    };

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let mut response = match (method, body) {
        ("GET", _) => agent.get(&path).call(),
        ("DELETE", _) => agent.delete(&path).call(),
        (_, Some(body)) => agent
            .post(&path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (_, None) => agent.post(&path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let text = CString::new(response.body_mut().read_to_string().unwrap_or_default()).unwrap();
    let resp = FfiHttpResponse {
        status,
        body: text.as_ptr(),
    };
    itemlist_session_complete(session, ticket, &resp, std::ptr::null());
    itemlist_free_effect(effect);
}

fn item_count(session: *mut itemlist_ffi::types::FfiSession) -> usize {
    let snap = itemlist_session_snapshot(session);
    let len = unsafe { (*snap).items_len };
    itemlist_free_snapshot(snap);
    len
}

fn drain_kinds(session: *mut itemlist_ffi::types::FfiSession) -> Vec<(FfiEventKind, String)> {
    let mut out = Vec::new();
    loop {
        let event = itemlist_session_next_event(session);
        if event.is_null() {
            return out;
        }
        let e = unsafe { &*event };
        if e.kind == FfiEventKind::Notice {
            assert_eq!(e.notice_kind, FfiNoticeKind::Success);
        }
        let message = if e.message.is_null() {
            String::new()
        } else {
            c_str(e.message)
        };
        out.push((e.kind, message));
        itemlist_free_event(event);
    }
}

#[test]
fn host_drives_full_list_screen() {
    let base_url = CString::new(spawn_server(15)).unwrap();
    let session = itemlist_session_new(base_url.as_ptr());
    assert!(!session.is_null());

    // Mount, then keep scrolling until the footer spinner would disappear.
    run(session, itemlist_session_start(session));
    assert_eq!(item_count(session), 10);
    run(session, itemlist_session_advance_page_trigger(session));
    run(session, itemlist_session_advance_page_trigger(session));
    assert_eq!(item_count(session), 15);
    assert!(itemlist_session_advance_page_trigger(session).is_null());

    // Add an item through the form.
    itemlist_session_open_form(session);
    let title = CString::new("From the host").unwrap();
    itemlist_session_set_input(session, title.as_ptr());
    run(session, itemlist_session_submit_form(session));
    assert_eq!(item_count(session), 16);
    assert_eq!(
        drain_kinds(session),
        vec![
            (FfiEventKind::Notice, "Item added successfully.".to_string()),
            (FfiEventKind::ScrollTop, String::new()),
        ]
    );

    // Delete the new item (id 16) after confirming.
    itemlist_session_delete_item(session, 16);
    run(session, itemlist_session_confirm_delete(session));
    assert_eq!(item_count(session), 15);
    assert_eq!(
        drain_kinds(session),
        vec![(FfiEventKind::Notice, "Item deleted successfully.".to_string())]
    );

    // Refresh brings back the first page only.
    run(session, itemlist_session_refresh(session));
    let snap = itemlist_session_snapshot(session);
    unsafe {
        assert_eq!((*snap).items_len, 10);
        assert_eq!((*snap).page, 2);
        assert!((*snap).has_more);
        assert!(!(*snap).refreshing);
    }
    itemlist_free_snapshot(snap);

    itemlist_session_free(session);
}
