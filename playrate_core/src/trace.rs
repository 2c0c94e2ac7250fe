// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the page controller and the control panel.
//!
//! This module provides a [`TraceSink`] trait with per-event methods. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.

use crate::panel::{PanelPhase, SpeedInputError};
use crate::protocol::RequestKind;
use crate::time::{EpochMillis, Millis};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a speed was applied to the videos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedSource {
    /// A `setSpeed` request.
    User,
    /// A gamble roll.
    Gamble,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the page controller receives a request.
#[derive(Clone, Copy, Debug)]
pub struct RequestEvent {
    /// Which request arrived.
    pub kind: RequestKind,
    /// Page time when it was handled.
    pub at: EpochMillis,
    /// Video elements found for this request.
    pub video_count: u32,
}

/// Emitted after a playback rate is written to the videos.
#[derive(Clone, Copy, Debug)]
pub struct SpeedAppliedEvent {
    /// Page time.
    pub at: EpochMillis,
    /// The rate written.
    pub speed: f64,
    /// How many videos were updated.
    pub count: u32,
    /// What caused the write.
    pub source: SpeedSource,
}

/// Emitted when a `setSpeed` request is ignored.
#[derive(Clone, Copy, Debug)]
pub struct SetSpeedIgnoredEvent {
    /// Page time.
    pub at: EpochMillis,
    /// The rate that was asked for.
    pub requested: f64,
    /// The gamble speed that stays in force, or `None` if the request was
    /// rejected because the speed was not finite.
    pub locked_speed: Option<f64>,
    /// Time left on the gamble.
    pub remaining: Millis,
}

/// Emitted when a gamble is rolled and locked.
#[derive(Clone, Copy, Debug)]
pub struct GambleStartedEvent {
    /// Page time.
    pub at: EpochMillis,
    /// The rolled speed.
    pub speed: f64,
    /// When the lock will release.
    pub ends_at: EpochMillis,
    /// Whether an unexpired gamble was overwritten.
    pub replaced_active: bool,
}

/// Emitted when a query notices that the gamble lock has expired.
#[derive(Clone, Copy, Debug)]
pub struct GambleExpiredEvent {
    /// Page time of the query that noticed.
    pub at: EpochMillis,
    /// The speed that was locked.
    pub speed: f64,
    /// When the lock ended.
    pub ended_at: EpochMillis,
}

/// Emitted by control panel hosts when the panel's phase changes.
#[derive(Clone, Copy, Debug)]
pub struct PanelTransitionEvent {
    /// Phase before the input.
    pub from: PanelPhase,
    /// Phase after the input.
    pub to: PanelPhase,
}

/// Emitted by control panel hosts when custom speed input is rejected.
#[derive(Clone, Copy, Debug)]
pub struct InputRejectedEvent {
    /// Why it was rejected.
    pub reason: SpeedInputError,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the page controller receives a request.
    fn on_request(&mut self, e: &RequestEvent) {
        _ = e;
    }

    /// Called after a playback rate is written to the videos.
    fn on_speed_applied(&mut self, e: &SpeedAppliedEvent) {
        _ = e;
    }

    /// Called when a `setSpeed` request is ignored.
    fn on_set_speed_ignored(&mut self, e: &SetSpeedIgnoredEvent) {
        _ = e;
    }

    /// Called when a gamble is rolled.
    fn on_gamble_started(&mut self, e: &GambleStartedEvent) {
        _ = e;
    }

    /// Called when a query notices the gamble has expired.
    fn on_gamble_expired(&mut self, e: &GambleExpiredEvent) {
        _ = e;
    }

    /// Called when the control panel changes phase.
    fn on_panel_transition(&mut self, e: &PanelTransitionEvent) {
        _ = e;
    }

    /// Called when custom speed input is rejected.
    fn on_input_rejected(&mut self, e: &InputRejectedEvent) {
        _ = e;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn on_request(&mut self, e: &RequestEvent) {
        (**self).on_request(e);
    }

    fn on_speed_applied(&mut self, e: &SpeedAppliedEvent) {
        (**self).on_speed_applied(e);
    }

    fn on_set_speed_ignored(&mut self, e: &SetSpeedIgnoredEvent) {
        (**self).on_set_speed_ignored(e);
    }

    fn on_gamble_started(&mut self, e: &GambleStartedEvent) {
        (**self).on_gamble_started(e);
    }

    fn on_gamble_expired(&mut self, e: &GambleExpiredEvent) {
        (**self).on_gamble_expired(e);
    }

    fn on_panel_transition(&mut self, e: &PanelTransitionEvent) {
        (**self).on_panel_transition(e);
    }

    fn on_input_rejected(&mut self, e: &InputRejectedEvent) {
        (**self).on_input_rejected(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($(#[$meta:meta])* $name:ident => $method:ident($ty:ty)) => {
        $(#[$meta])*
        #[inline]
        pub fn $name(&mut self, e: &$ty) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    dispatch!(
        /// Emits a [`RequestEvent`].
        request => on_request(RequestEvent)
    );
    dispatch!(
        /// Emits a [`SpeedAppliedEvent`].
        speed_applied => on_speed_applied(SpeedAppliedEvent)
    );
    dispatch!(
        /// Emits a [`SetSpeedIgnoredEvent`].
        set_speed_ignored => on_set_speed_ignored(SetSpeedIgnoredEvent)
    );
    dispatch!(
        /// Emits a [`GambleStartedEvent`].
        gamble_started => on_gamble_started(GambleStartedEvent)
    );
    dispatch!(
        /// Emits a [`GambleExpiredEvent`].
        gamble_expired => on_gamble_expired(GambleExpiredEvent)
    );
    dispatch!(
        /// Emits a [`PanelTransitionEvent`].
        panel_transition => on_panel_transition(PanelTransitionEvent)
    );
    dispatch!(
        /// Emits an [`InputRejectedEvent`].
        input_rejected => on_input_rejected(InputRejectedEvent)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        requests: u32,
        expired: u32,
    }

    impl TraceSink for CountingSink {
        fn on_request(&mut self, _e: &RequestEvent) {
            self.requests += 1;
        }

        fn on_gamble_expired(&mut self, _e: &GambleExpiredEvent) {
            self.expired += 1;
        }
    }

    fn request() -> RequestEvent {
        RequestEvent {
            kind: RequestKind::GetSpeed,
            at: EpochMillis(5),
            video_count: 1,
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_request(&request());
        sink.on_input_rejected(&InputRejectedEvent {
            reason: SpeedInputError::Empty,
        });
    }

    fn emit_pair<S: TraceSink>(mut sink: S) {
        sink.on_request(&request());
        sink.on_gamble_expired(&GambleExpiredEvent {
            at: EpochMillis(10),
            speed: 1.5,
            ended_at: EpochMillis(9),
        });
    }

    #[test]
    fn mut_ref_forwards_to_inner_sink() {
        let mut sink = CountingSink::default();
        emit_pair(&mut sink);
        emit_pair(&mut sink);
        assert_eq!(sink.requests, 2);
        assert_eq!(sink.expired, 2);
    }

    #[test]
    fn tracer_none_is_silent() {
        let mut tracer = Tracer::none();
        tracer.request(&request());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_when_enabled() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.request(&request());
            tracer.request(&request());
        }
        assert_eq!(sink.requests, 2);
    }

    #[cfg(not(feature = "trace"))]
    #[test]
    fn tracer_compiles_out_when_disabled() {
        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.request(&request());
        }
        assert_eq!(sink.requests, 0);
    }
}
