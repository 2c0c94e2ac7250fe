// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Page times
//! are printed relative to the first timestamped event.

use std::io::Write;

use playrate_core::time::{EpochMillis, Millis};
use playrate_core::trace::{
    GambleExpiredEvent, GambleStartedEvent, InputRejectedEvent, PanelTransitionEvent,
    RequestEvent, SetSpeedIgnoredEvent, SpeedAppliedEvent, SpeedSource, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    origin: Option<EpochMillis>,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            origin: None,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            origin: None,
        }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn stamp(&mut self, at: EpochMillis) -> String {
        let origin = *self.origin.get_or_insert(at);
        secs(at.saturating_duration_since(origin))
    }
}

fn secs(d: Millis) -> String {
    format!("+{}.{:03}s", d.millis() / 1000, d.millis() % 1000)
}

fn source_name(source: SpeedSource) -> &'static str {
    match source {
        SpeedSource::User => "user",
        SpeedSource::Gamble => "gamble",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_request(&mut self, e: &RequestEvent) {
        let t = self.stamp(e.at);
        let _ = writeln!(
            self.writer,
            "{t} [request] {} videos={}",
            e.kind.as_str(),
            e.video_count,
        );
    }

    fn on_speed_applied(&mut self, e: &SpeedAppliedEvent) {
        let t = self.stamp(e.at);
        let _ = writeln!(
            self.writer,
            "{t} [speed] {:.2}x count={} source={}",
            e.speed,
            e.count,
            source_name(e.source),
        );
    }

    fn on_set_speed_ignored(&mut self, e: &SetSpeedIgnoredEvent) {
        let t = self.stamp(e.at);
        let _ = match e.locked_speed {
            Some(locked) => writeln!(
                self.writer,
                "{t} [speed:ignored] requested={}x locked={locked:.2}x remaining={}",
                e.requested,
                secs(e.remaining),
            ),
            None => writeln!(
                self.writer,
                "{t} [speed:ignored] requested={}x unusable",
                e.requested,
            ),
        };
    }

    fn on_gamble_started(&mut self, e: &GambleStartedEvent) {
        let t = self.stamp(e.at);
        let lasts = e.ends_at.saturating_duration_since(e.at);
        let replaced = if e.replaced_active { " REPLACED" } else { "" };
        let _ = writeln!(
            self.writer,
            "{t} [gamble] {:.2}x for {}{replaced}",
            e.speed,
            secs(lasts),
        );
    }

    fn on_gamble_expired(&mut self, e: &GambleExpiredEvent) {
        let t = self.stamp(e.at);
        let late = e.at.saturating_duration_since(e.ended_at);
        let _ = writeln!(
            self.writer,
            "{t} [gamble:expired] {:.2}x noticed {} late",
            e.speed,
            secs(late),
        );
    }

    fn on_panel_transition(&mut self, e: &PanelTransitionEvent) {
        let _ = writeln!(self.writer, "[panel] {:?} -> {:?}", e.from, e.to);
    }

    fn on_input_rejected(&mut self, e: &InputRejectedEvent) {
        let _ = writeln!(self.writer, "[input:rejected] {}", e.reason);
    }
}
