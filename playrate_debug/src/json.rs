// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace export.
//!
//! [`JsonLinesSink`] writes one JSON object per event, each on its own line.
//! Every object has an `"event"` field naming the event; page times are
//! epoch milliseconds under `"at"`.

use std::io::Write;

use serde_json::{Value, json};

use playrate_core::panel::PanelPhase;
use playrate_core::trace::{
    GambleExpiredEvent, GambleStartedEvent, InputRejectedEvent, PanelTransitionEvent,
    RequestEvent, SetSpeedIgnoredEvent, SpeedAppliedEvent, SpeedSource, TraceSink,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: u64,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Returns how many lines were written.
    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if writeln!(self.writer, "{value}").is_ok() {
            self.lines += 1;
        }
    }
}

fn phase(p: PanelPhase) -> Value {
    match p {
        PanelPhase::Idle => json!({ "phase": "idle" }),
        PanelPhase::Locked { remaining_secs } => {
            json!({ "phase": "locked", "remaining_secs": remaining_secs })
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_request(&mut self, e: &RequestEvent) {
        self.emit(&json!({
            "event": "request",
            "at": e.at.millis(),
            "kind": e.kind.as_str(),
            "video_count": e.video_count,
        }));
    }

    fn on_speed_applied(&mut self, e: &SpeedAppliedEvent) {
        self.emit(&json!({
            "event": "speed_applied",
            "at": e.at.millis(),
            "speed": e.speed,
            "count": e.count,
            "source": match e.source {
                SpeedSource::User => "user",
                SpeedSource::Gamble => "gamble",
            },
        }));
    }

    fn on_set_speed_ignored(&mut self, e: &SetSpeedIgnoredEvent) {
        self.emit(&json!({
            "event": "set_speed_ignored",
            "at": e.at.millis(),
            "requested": e.requested,
            "locked_speed": e.locked_speed,
            "remaining_ms": e.remaining.millis(),
        }));
    }

    fn on_gamble_started(&mut self, e: &GambleStartedEvent) {
        self.emit(&json!({
            "event": "gamble_started",
            "at": e.at.millis(),
            "speed": e.speed,
            "ends_at": e.ends_at.millis(),
            "replaced_active": e.replaced_active,
        }));
    }

    fn on_gamble_expired(&mut self, e: &GambleExpiredEvent) {
        self.emit(&json!({
            "event": "gamble_expired",
            "at": e.at.millis(),
            "speed": e.speed,
            "ended_at": e.ended_at.millis(),
        }));
    }

    fn on_panel_transition(&mut self, e: &PanelTransitionEvent) {
        self.emit(&json!({
            "event": "panel_transition",
            "from": phase(e.from),
            "to": phase(e.to),
        }));
    }

    fn on_input_rejected(&mut self, e: &InputRejectedEvent) {
        self.emit(&json!({
            "event": "input_rejected",
            "reason": e.reason.to_string(),
        }));
    }
}
