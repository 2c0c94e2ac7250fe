// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use alloc::format;
use alloc::string::String;

use playrate_core::trace::{
    GambleExpiredEvent, GambleStartedEvent, InputRejectedEvent, PanelTransitionEvent,
    RequestEvent, SetSpeedIgnoredEvent, SpeedAppliedEvent, TraceSink,
};
use wasm_bindgen::JsValue;

/// Writes one `console.debug` line per trace event, prefixed with a context
/// name such as `content` or `popup`.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleSink {
    context: &'static str,
}

impl ConsoleSink {
    /// Creates a sink that tags its lines with `context`.
    #[must_use]
    pub const fn new(context: &'static str) -> Self {
        Self { context }
    }

    fn emit(&self, line: &str) {
        let text: String = format!("[playrate:{}] {line}", self.context);
        web_sys::console::debug_1(&JsValue::from_str(&text));
    }
}

impl TraceSink for ConsoleSink {
    fn on_request(&mut self, e: &RequestEvent) {
        self.emit(&format!(
            "[request] {} videos={}",
            e.kind.as_str(),
            e.video_count
        ));
    }

    fn on_speed_applied(&mut self, e: &SpeedAppliedEvent) {
        self.emit(&format!(
            "[speed] {:.2}x on {} video(s) source={:?}",
            e.speed, e.count, e.source
        ));
    }

    fn on_set_speed_ignored(&mut self, e: &SetSpeedIgnoredEvent) {
        let line = match e.locked_speed {
            Some(locked) => format!(
                "[speed:ignored] {}x requested, locked at {locked:.2}x for {}s",
                e.requested,
                e.remaining.whole_secs()
            ),
            None => format!("[speed:ignored] {}x is not a usable rate", e.requested),
        };
        self.emit(&line);
    }

    fn on_gamble_started(&mut self, e: &GambleStartedEvent) {
        self.emit(&format!(
            "[gamble] locked at {:.2}x until {}{}",
            e.speed,
            e.ends_at.millis(),
            if e.replaced_active { " (replaced)" } else { "" }
        ));
    }

    fn on_gamble_expired(&mut self, e: &GambleExpiredEvent) {
        self.emit(&format!(
            "[gamble:expired] {:.2}x ended at {}",
            e.speed,
            e.ended_at.millis()
        ));
    }

    fn on_panel_transition(&mut self, e: &PanelTransitionEvent) {
        self.emit(&format!("[panel] {:?} -> {:?}", e.from, e.to));
    }

    fn on_input_rejected(&mut self, e: &InputRejectedEvent) {
        self.emit(&format!("[input:rejected] {}", e.reason));
    }
}
