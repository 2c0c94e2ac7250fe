// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A popup and a page wired back to back.

use alloc::collections::VecDeque;

use playrate_core::controller::{PageContext, PageController};
use playrate_core::lock::GambleConfig;
use playrate_core::panel::{ControlPanel, PanelCommand, PanelConfig, PanelPhase, SpeedInputError};
use playrate_core::protocol::{Request, Response};
use playrate_core::random::Lcg;
use playrate_core::time::Millis;
use playrate_core::trace::{
    InputRejectedEvent, NoopSink, PanelTransitionEvent, TraceSink, Tracer,
};

use crate::{ManualClock, VideoBank};

/// Configuration for a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Page-side gamble configuration.
    pub gamble: GambleConfig,
    /// Popup configuration.
    pub panel: PanelConfig,
    /// Seed for the page's random source.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gamble: GambleConfig::standard(),
            panel: PanelConfig::standard(),
            seed: 0x5eed,
        }
    }
}

/// Simulated countdown interval.
#[derive(Clone, Copy, Debug, Default)]
struct Countdown {
    period: Option<Millis>,
    elapsed: Millis,
    starts: u32,
    replaced: u32,
}

impl Countdown {
    fn start(&mut self, period: Millis) {
        if self.period.is_some() {
            self.replaced += 1;
        }
        self.period = Some(period);
        self.elapsed = Millis::ZERO;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.period = None;
        self.elapsed = Millis::ZERO;
    }
}

/// A [`ControlPanel`] talking to a [`PageController`] through a simulated
/// message channel, with simulated time.
///
/// Requests queue up in an outbox and are delivered by
/// [`pump`](Self::pump), mirroring the asynchronous delivery of the real
/// channel: a response never re-enters the panel while it is handling an
/// input. Every user-facing method pumps before returning.
#[derive(Debug)]
pub struct Session<S: TraceSink = NoopSink> {
    config: SessionConfig,
    page: PageController,
    videos: VideoBank,
    clock: ManualClock,
    random: Lcg,
    panel: ControlPanel,
    outbox: VecDeque<Request>,
    countdown: Countdown,
    page_reachable: bool,
    exchanges: u32,
    sink: S,
}

impl Session {
    /// Creates a session over `videos` with the default configuration. The
    /// popup is not open yet.
    #[must_use]
    pub fn new(videos: VideoBank) -> Self {
        Self::with_sink(videos, SessionConfig::default(), NoopSink)
    }
}

impl<S: TraceSink> Session<S> {
    /// Creates a session that reports trace events to `sink`.
    #[must_use]
    pub fn with_sink(videos: VideoBank, config: SessionConfig, sink: S) -> Self {
        Self {
            config,
            page: PageController::new(config.gamble),
            videos,
            clock: ManualClock::default(),
            random: Lcg::new(config.seed),
            panel: ControlPanel::new(config.panel),
            outbox: VecDeque::new(),
            countdown: Countdown::default(),
            page_reachable: true,
            exchanges: 0,
            sink,
        }
    }

    /// Returns the popup state.
    #[must_use]
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Returns the page state.
    #[must_use]
    pub fn page(&self) -> &PageController {
        &self.page
    }

    /// Returns the page's videos.
    #[must_use]
    pub fn videos(&self) -> &VideoBank {
        &self.videos
    }

    /// Returns the page's videos for direct manipulation.
    pub fn videos_mut(&mut self) -> &mut VideoBank {
        &mut self.videos
    }

    /// Returns the page clock.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Returns the trace sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the session and returns its trace sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Returns `true` while the simulated countdown interval is scheduled.
    #[must_use]
    pub fn countdown_running(&self) -> bool {
        self.countdown.period.is_some()
    }

    /// Returns how many times a countdown was started.
    #[must_use]
    pub fn countdown_starts(&self) -> u32 {
        self.countdown.starts
    }

    /// Returns how many times a running countdown was replaced by a new one.
    #[must_use]
    pub fn countdown_replacements(&self) -> u32 {
        self.countdown.replaced
    }

    /// Returns how many requests were delivered (answered or not).
    #[must_use]
    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    /// Makes the page stop answering, as if the content script were absent.
    pub fn set_page_reachable(&mut self, reachable: bool) {
        self.page_reachable = reachable;
    }

    /// Opens the popup.
    pub fn open(&mut self) {
        let cmds = self.panel.open();
        self.run(&cmds);
        self.pump();
    }

    /// Closes the popup, dropping its state, pending requests and countdown.
    pub fn close(&mut self) {
        self.panel = ControlPanel::new(self.config.panel);
        self.outbox.clear();
        self.countdown.stop();
    }

    /// Reloads the page: the controller's lock is lost and videos reset.
    pub fn reload_page(&mut self) {
        self.page = PageController::new(self.config.gamble);
        self.videos.reset();
    }

    /// Clicks a preset or drags the slider to `speed`.
    pub fn select_speed(&mut self, speed: f64) {
        let cmds = self.panel.select_speed(speed);
        self.run(&cmds);
        self.pump();
    }

    /// Types `text` into the custom speed field and presses Enter.
    ///
    /// # Errors
    ///
    /// Returns the panel's rejection; the error is also traced.
    pub fn enter_custom_speed(&mut self, text: &str) -> Result<(), SpeedInputError> {
        self.panel.set_custom_input(text);
        match self.panel.apply_custom_input() {
            Ok(cmds) => {
                self.run(&cmds);
                self.pump();
                Ok(())
            }
            Err(reason) => {
                Tracer::new(&mut self.sink).input_rejected(&InputRejectedEvent { reason });
                Err(reason)
            }
        }
    }

    /// Clicks the gamble button.
    pub fn press_gamble(&mut self) {
        let cmds = self.panel.start_gamble();
        self.run(&cmds);
        self.pump();
    }

    /// Lets `secs` seconds pass, firing the countdown as a real interval
    /// would.
    pub fn advance_secs(&mut self, secs: u64) {
        for _ in 0..secs {
            self.advance(Millis::SECOND);
        }
    }

    /// Lets `d` pass on the page clock, firing the countdown whenever a full
    /// period has elapsed.
    pub fn advance(&mut self, d: Millis) {
        let mut left = d;
        while left > Millis::ZERO {
            let Some(period) = self.countdown.period else {
                self.clock.advance(left);
                return;
            };
            let until_tick = period.saturating_sub(self.countdown.elapsed);
            if left < until_tick {
                self.clock.advance(left);
                self.countdown.elapsed = self.countdown.elapsed + left;
                return;
            }
            self.clock.advance(until_tick);
            left = left.saturating_sub(until_tick);
            self.countdown.elapsed = Millis::ZERO;
            self.tick();
        }
    }

    /// Delivers queued requests until the outbox is empty.
    pub fn pump(&mut self) {
        while let Some(request) = self.outbox.pop_front() {
            self.exchanges += 1;
            let Some(response) = self.deliver(request) else {
                continue;
            };
            let before = self.panel.phase();
            let cmds = self.panel.on_response(response);
            self.trace_transition(before);
            self.run(&cmds);
        }
    }

    fn tick(&mut self) {
        let before = self.panel.phase();
        let cmds = self.panel.tick();
        self.trace_transition(before);
        self.run(&cmds);
        self.pump();
    }

    fn deliver(&mut self, request: Request) -> Option<Response> {
        if !self.page_reachable {
            return None;
        }
        let mut cx = PageContext {
            videos: &mut self.videos,
            random: &mut self.random,
            now: self.clock.now(),
            tracer: Tracer::new(&mut self.sink),
        };
        Some(self.page.handle(&mut cx, request))
    }

    fn run(&mut self, cmds: &[PanelCommand]) {
        for cmd in cmds {
            match *cmd {
                PanelCommand::Send(request) => self.outbox.push_back(request),
                PanelCommand::StartCountdown { period } => self.countdown.start(period),
                PanelCommand::StopCountdown => self.countdown.stop(),
            }
        }
    }

    fn trace_transition(&mut self, before: PanelPhase) {
        let after = self.panel.phase();
        if before.is_locked() != after.is_locked() {
            Tracer::new(&mut self.sink).panel_transition(&PanelTransitionEvent {
                from: before,
                to: after,
            });
        }
    }
}
