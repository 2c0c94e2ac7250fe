// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extension messaging.
//!
//! The popup sends a [`Request`] to the content script of the active tab with
//! [`send_to_active_tab`]; the content script answers through the handler
//! installed by [`listen`]. Both ends convert to and from plain JS objects
//! with `serde-wasm-bindgen`.
//!
//! Delivery is best-effort. When the active tab has no content script, or the
//! reply does not decode, the reply callback is never called.

use alloc::boxed::Box;

use js_sys::{Array, Function, Object, Reflect};
use playrate_core::protocol::{
    GetSpeedResponse, Request, RequestKind, Response, SetSpeedResponse, StartGambleResponse,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime", "onMessage"], js_name = "addListener")]
    fn add_message_listener(callback: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = "query")]
    fn tabs_query(query: &JsValue, callback: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = "sendMessage")]
    fn tabs_send_message(tab_id: f64, message: &JsValue, callback: &JsValue) -> Result<(), JsValue>;
}

type ListenerClosure = Closure<dyn FnMut(JsValue, JsValue, Function) -> bool>;

/// Installs `handler` as the content script's message handler.
///
/// Messages that do not decode as a [`Request`], and requests for which
/// `handler` returns `None`, are left unanswered. Replies are sent
/// synchronously, so the listener never keeps the channel open.
///
/// # Errors
///
/// Fails if `chrome.runtime.onMessage` is unavailable, i.e. outside an
/// extension context.
pub fn listen(mut handler: impl FnMut(Request) -> Option<Response> + 'static) -> Result<(), JsValue> {
    let on_message = move |message: JsValue, _sender: JsValue, send_response: Function| {
        let Ok(request) = serde_wasm_bindgen::from_value::<Request>(message) else {
            return false;
        };
        let Some(response) = handler(request) else {
            return false;
        };
        match serde_wasm_bindgen::to_value(&response) {
            Ok(value) => {
                if let Err(err) = send_response.call1(&JsValue::NULL, &value) {
                    web_sys::console::warn_1(&err);
                }
            }
            Err(err) => web_sys::console::warn_1(&err.into()),
        }
        false
    };
    let closure: ListenerClosure = Closure::wrap(Box::new(on_message));
    add_message_listener(closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Sends `request` to the content script of the active tab in the current
/// window and passes the decoded reply to `on_reply`.
///
/// # Errors
///
/// Fails if the request cannot be encoded or `chrome.tabs` is unavailable.
/// Failures after the tab lookup (no active tab, no content script, an
/// undecodable reply) are silent: `on_reply` is simply not called.
pub fn send_to_active_tab(
    request: Request,
    on_reply: impl FnOnce(Response) + 'static,
) -> Result<(), JsValue> {
    let message = serde_wasm_bindgen::to_value(&request)?;
    let kind = request.kind();

    let query = Object::new();
    Reflect::set(&query, &"active".into(), &JsValue::TRUE)?;
    Reflect::set(&query, &"currentWindow".into(), &JsValue::TRUE)?;

    let on_tabs = Closure::once_into_js(move |tabs: JsValue| {
        let Some(tab_id) = first_tab_id(&tabs) else {
            return;
        };
        let on_response = Closure::once_into_js(move |reply: JsValue| {
            // Marks lastError as checked.
            if take_last_error().is_some() {
                return;
            }
            if let Ok(response) = decode_response(kind, reply) {
                on_reply(response);
            }
        });
        if let Err(err) = tabs_send_message(tab_id, &message, &on_response) {
            web_sys::console::warn_1(&err);
        }
    });
    tabs_query(&query, &on_tabs)
}

/// Decodes a reply to a request of the given kind.
///
/// # Errors
///
/// Returns the decoding error if `value` does not have the shape of that
/// kind's response.
pub fn decode_response(kind: RequestKind, value: JsValue) -> Result<Response, JsValue> {
    let response = match kind {
        RequestKind::SetSpeed => {
            serde_wasm_bindgen::from_value::<SetSpeedResponse>(value).map(Response::from)
        }
        RequestKind::GetSpeed => {
            serde_wasm_bindgen::from_value::<GetSpeedResponse>(value).map(Response::from)
        }
        RequestKind::StartGamble => {
            serde_wasm_bindgen::from_value::<StartGambleResponse>(value).map(Response::from)
        }
    };
    response.map_err(JsValue::from)
}

fn first_tab_id(tabs: &JsValue) -> Option<f64> {
    let tabs: &Array = tabs.dyn_ref()?;
    let id = Reflect::get(&tabs.get(0), &"id".into()).ok()?;
    id.as_f64()
}

fn take_last_error() -> Option<JsValue> {
    let chrome = Reflect::get(&js_sys::global(), &"chrome".into()).ok()?;
    let runtime = Reflect::get(&chrome, &"runtime".into()).ok()?;
    let err = Reflect::get(&runtime, &"lastError".into()).ok()?;
    (!err.is_undefined() && !err.is_null()).then_some(err)
}
