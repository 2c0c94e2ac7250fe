// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-context entry point.
//!
//! Hosts one [`PageController`] per page load. Each request snapshots the
//! document's videos afresh, reads `Date.now()`, and lets the controller
//! answer. The gamble lock lives only as long as this module instance, so a
//! reload clears it.
//!
//! Build with: `wasm-pack build --target web apps/content_script --out-dir
//! ../../extension/pkg/content_script`.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

use playrate_backend_web::{ConsoleSink, DocumentVideos, MathRandom, messaging};
use playrate_core::controller::{PageContext, PageController};
use playrate_core::lock::GambleConfig;
use playrate_core::protocol::{Request, Response};
use playrate_core::trace::Tracer;
use wasm_bindgen::prelude::*;
use web_sys::Document;

struct PageState {
    document: Document,
    controller: PageController,
    random: MathRandom,
    sink: ConsoleSink,
}

impl PageState {
    /// Answers `request`, or returns `None` if the document cannot be queried.
    fn handle(&mut self, request: Request) -> Option<Response> {
        let mut videos = match DocumentVideos::query(&self.document) {
            Ok(videos) => videos,
            Err(err) => {
                web_sys::console::warn_1(&err);
                return None;
            }
        };
        let mut cx = PageContext {
            videos: &mut videos,
            random: &mut self.random,
            now: playrate_backend_web::now(),
            tracer: Tracer::new(&mut self.sink),
        };
        Some(self.controller.handle(&mut cx, request))
    }
}

/// Entry point for the content script.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("content script has no document"))?;

    let mut state = PageState {
        document,
        controller: PageController::new(GambleConfig::standard()),
        random: MathRandom,
        sink: ConsoleSink::new("content"),
    };

    messaging::listen(move |request| state.handle(request))
}
