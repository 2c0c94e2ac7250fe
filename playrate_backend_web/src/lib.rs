// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for playrate.
//!
//! This crate provides integration with browser and extension APIs:
//!
//! - [`now`]: wall-clock time from `Date.now()`
//! - [`MathRandom`]: a [`RandomSource`] backed by `Math.random()`
//! - [`DocumentVideos`]: the document's `<video>` elements as a [`VideoSet`]
//! - [`IntervalLoop`]: a `setInterval` tick source for the popup countdown
//! - [`messaging`]: `chrome.runtime` / `chrome.tabs` request plumbing
//! - [`ConsoleSink`]: a [`TraceSink`] writing to the browser console
//!
//! [`VideoSet`]: playrate_core::video::VideoSet
//! [`TraceSink`]: playrate_core::trace::TraceSink

#![no_std]

extern crate alloc;

mod console;
mod dom;
mod interval;
pub mod messaging;

pub use console::ConsoleSink;
pub use dom::DocumentVideos;
pub use interval::IntervalLoop;

use playrate_core::random::RandomSource;
use playrate_core::time::EpochMillis;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = "now")]
    fn date_now() -> f64;

    #[wasm_bindgen(js_namespace = Math, js_name = "random")]
    fn math_random() -> f64;
}

/// Returns the current wall-clock time from `Date.now()`.
#[must_use]
pub fn now() -> EpochMillis {
    EpochMillis::from_f64_millis(date_now())
}

/// A [`RandomSource`] backed by `Math.random()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MathRandom;

impl RandomSource for MathRandom {
    fn next_unit(&mut self) -> f64 {
        math_random()
    }
}
