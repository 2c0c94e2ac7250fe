// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The popup-side state machine.
//!
//! [`ControlPanel`] mirrors the page's gamble lock and drives the popup UI. It
//! performs no I/O: every input returns a list of [`PanelCommand`]s that the
//! host executes (send a request, start or stop the one-second countdown), and
//! [`ControlPanel::view`] produces the strings to render.
//!
//! # Phases
//!
//! ```text
//!              getSpeed / startGamble response with gambleActive
//!   ┌──────┐ ───────────────────────────────────────────────► ┌────────────────┐
//!   │ Idle │                                                  │ Locked(secs)   │ ◄─┐ tick: secs - 1
//!   └──────┘ ◄─────────────────────────────────────────────── └────────────────┘ ──┘
//!              tick with secs ≤ 1: StopCountdown + Send(GetSpeed)
//! ```
//!
//! The countdown is local and approximate. When it runs out the panel asks the
//! page again instead of trusting itself, so drift or a reloaded page that
//! dropped its lock early is corrected on the next response.
//!
//! # Usage
//!
//! ```rust,ignore
//! for command in panel.open() {
//!     host.execute(command); // sends getSpeed
//! }
//! // later, when the response arrives:
//! for command in panel.on_response(response) {
//!     host.execute(command); // may start the countdown
//! }
//! render(&panel.view());
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::label::{PRESET_TOLERANCE, SPEED_PRESETS, SpeedLabel, format_countdown, matching_preset};
use crate::protocol::{GetSpeedResponse, Request, Response, StartGambleResponse};
use crate::time::Millis;
use crate::video::DEFAULT_RATE;

/// Heading shown at the top of the popup.
pub const HEADING: &str = "Video Speed Controller";
/// Shown instead of the controls when the page has no videos.
pub const NO_VIDEOS_TITLE: &str = "No videos found on this page.";
/// Hint below [`NO_VIDEOS_TITLE`].
pub const NO_VIDEOS_HINT: &str = "Open a page with videos and try again.";
/// Title of the gamble alert box.
pub const GAMBLE_ALERT_TITLE: &str = "GAMBLE MODE ACTIVE";
/// Gamble button text while unlocked.
pub const GAMBLE_BUTTON_IDLE: &str = "GAMBLE 🎰";
/// Gamble button text while locked.
pub const GAMBLE_BUTTON_LOCKED: &str = "GAMBLING LOCKED";
/// Placeholder of the custom speed input.
pub const CUSTOM_PLACEHOLDER: &str = "Custom speed (0.1 - 16)";

/// An inclusive range of speeds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedRange {
    /// Lowest accepted speed.
    pub min: f64,
    /// Highest accepted speed.
    pub max: f64,
}

impl SpeedRange {
    /// Returns `true` if `speed` lies within the range. `NaN` never does.
    #[must_use]
    pub fn contains(&self, speed: f64) -> bool {
        speed >= self.min && speed <= self.max
    }
}

/// Slider bounds and granularity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderConfig {
    /// Left end.
    pub min: f64,
    /// Right end.
    pub max: f64,
    /// Step between positions.
    pub step: f64,
}

/// Configuration for the [`ControlPanel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelConfig {
    /// Preset speeds, in display order.
    pub presets: &'static [f64],
    /// How close a speed must be to a preset to match it.
    pub preset_tolerance: f64,
    /// Accepted range for typed-in speeds.
    pub custom_range: SpeedRange,
    /// Slider bounds.
    pub slider: SliderConfig,
    /// Countdown tick period.
    pub countdown_period: Millis,
}

impl PanelConfig {
    /// The standard popup: ten presets, custom speeds in `[0.1, 16]`, a
    /// `[0.25, 3]` slider, and a one-second countdown.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            presets: &SPEED_PRESETS,
            preset_tolerance: PRESET_TOLERANCE,
            custom_range: SpeedRange {
                min: 0.1,
                max: 16.0,
            },
            slider: SliderConfig {
                min: 0.25,
                max: 3.0,
                step: 0.05,
            },
            countdown_period: Millis::SECOND,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// The panel's view of the page's gamble lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PanelPhase {
    /// No gamble is known to be locked.
    #[default]
    Idle,
    /// A gamble is locked; the countdown shows `remaining_secs`.
    Locked {
        /// Seconds left on the local countdown.
        remaining_secs: u32,
    },
}

impl PanelPhase {
    /// Returns `true` for [`PanelPhase::Locked`].
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}

/// Work for the panel's host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanelCommand {
    /// Send a request to the page and feed the response to
    /// [`ControlPanel::on_response`].
    Send(Request),
    /// Start calling [`ControlPanel::tick`] every `period`, cancelling any
    /// countdown already running.
    StartCountdown {
        /// Tick period.
        period: Millis,
    },
    /// Cancel the countdown.
    StopCountdown,
}

/// Why typed-in speed text was not applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedInputError {
    /// Speed changes are blocked by a locked gamble.
    Locked,
    /// The input is empty.
    Empty,
    /// The input is not a decimal number.
    NotANumber,
    /// The number lies outside the accepted range.
    OutOfRange {
        /// The parsed value.
        value: f64,
    },
}

impl fmt::Display for SpeedInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("speed is locked by a gamble"),
            Self::Empty => f.write_str("no speed entered"),
            Self::NotANumber => f.write_str("speed is not a number"),
            Self::OutOfRange { value } => write!(f, "speed {value} is out of range"),
        }
    }
}

impl core::error::Error for SpeedInputError {}

/// Everything the popup renders.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelView {
    /// The page has no videos; only the notice is shown.
    NoVideos {
        /// [`NO_VIDEOS_TITLE`].
        title: &'static str,
        /// [`NO_VIDEOS_HINT`].
        hint: &'static str,
    },
    /// The page has videos.
    Controls(ControlsView),
}

/// The control surface for a page with videos.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlsView {
    /// E.g. `2 videos found on page`.
    pub video_count_text: String,
    /// E.g. `Current speed: 1.25x`.
    pub speed_text: String,
    /// Label next to the speed.
    pub label: SpeedLabel,
    /// `Locked at 1.37x for 4:59`, while locked.
    pub gamble_info: Option<String>,
    /// Slider position.
    pub slider_value: f64,
    /// Index into the presets of the highlighted button.
    pub active_preset: Option<usize>,
    /// Whether speed inputs and the gamble button accept input.
    pub inputs_enabled: bool,
    /// Text on the gamble button.
    pub gamble_button_text: &'static str,
    /// `Speed is locked for 4:59`, while locked.
    pub timer_text: Option<String>,
}

/// The popup-side state machine.
#[derive(Clone, Debug)]
pub struct ControlPanel {
    config: PanelConfig,
    speed: f64,
    video_count: u32,
    phase: PanelPhase,
    gamble_speed: f64,
    custom_input: String,
    countdown_running: bool,
}

impl ControlPanel {
    /// Creates a panel showing the defaults until the first response.
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            speed: DEFAULT_RATE,
            video_count: 0,
            phase: PanelPhase::Idle,
            gamble_speed: 0.0,
            custom_input: String::new(),
            countdown_running: false,
        }
    }

    /// Returns the panel's configuration.
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Returns the displayed speed.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns the displayed video count.
    #[must_use]
    pub fn video_count(&self) -> u32 {
        self.video_count
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Returns `true` while a gamble is believed locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase.is_locked()
    }

    /// Returns the countdown value, or zero when idle.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        match self.phase {
            PanelPhase::Locked { remaining_secs } => remaining_secs,
            PanelPhase::Idle => 0,
        }
    }

    /// Returns the custom speed text buffer.
    #[must_use]
    pub fn custom_input(&self) -> &str {
        &self.custom_input
    }

    /// Returns `true` if the host should have a countdown running.
    #[must_use]
    pub fn countdown_running(&self) -> bool {
        self.countdown_running
    }

    /// Returns the label for the displayed speed.
    #[must_use]
    pub fn label(&self) -> SpeedLabel {
        SpeedLabel::derive(
            self.speed,
            self.config.presets,
            self.config.preset_tolerance,
            self.is_locked(),
        )
    }

    /// Called when the popup opens. Asks the page for its state.
    #[must_use]
    pub fn open(&mut self) -> Vec<PanelCommand> {
        vec![PanelCommand::Send(Request::GetSpeed)]
    }

    /// Called when the user picks a speed from a preset or the slider.
    ///
    /// Ignored while locked.
    #[must_use]
    pub fn select_speed(&mut self, speed: f64) -> Vec<PanelCommand> {
        if self.is_locked() {
            return Vec::new();
        }
        self.speed = speed;
        vec![PanelCommand::Send(Request::SetSpeed { speed })]
    }

    /// Replaces the custom speed text buffer.
    pub fn set_custom_input(&mut self, text: &str) {
        self.custom_input.clear();
        self.custom_input.push_str(text);
    }

    /// Validates the custom speed text and, if it is acceptable, clears the
    /// buffer and selects the speed.
    ///
    /// # Errors
    ///
    /// Returns a [`SpeedInputError`] and leaves the buffer untouched when a
    /// gamble is locked, the buffer is empty, it does not start with a
    /// decimal number, or the number lies outside
    /// [`PanelConfig::custom_range`]. Trailing text after the number, as in
    /// `"1.5x"`, is ignored.
    pub fn apply_custom_input(&mut self) -> Result<Vec<PanelCommand>, SpeedInputError> {
        if self.is_locked() {
            return Err(SpeedInputError::Locked);
        }
        let text = self.custom_input.trim();
        if text.is_empty() {
            return Err(SpeedInputError::Empty);
        }
        let value = leading_number(text).ok_or(SpeedInputError::NotANumber)?;
        if !self.config.custom_range.contains(value) {
            return Err(SpeedInputError::OutOfRange { value });
        }
        self.custom_input.clear();
        Ok(self.select_speed(value))
    }

    /// Called when the user presses the gamble button. Ignored while locked.
    #[must_use]
    pub fn start_gamble(&mut self) -> Vec<PanelCommand> {
        if self.is_locked() {
            return Vec::new();
        }
        vec![PanelCommand::Send(Request::StartGamble)]
    }

    /// Feeds a response from the page.
    #[must_use]
    pub fn on_response(&mut self, response: Response) -> Vec<PanelCommand> {
        match response {
            Response::SetSpeed(r) => {
                self.video_count = r.count;
                Vec::new()
            }
            Response::GetSpeed(r) => self.on_get_speed(r),
            Response::StartGamble(r) => self.on_start_gamble(r),
        }
    }

    /// Advances the countdown by one period.
    #[must_use]
    pub fn tick(&mut self) -> Vec<PanelCommand> {
        match self.phase {
            PanelPhase::Locked { remaining_secs } if remaining_secs <= 1 => {
                self.phase = PanelPhase::Idle;
                self.countdown_running = false;
                vec![
                    PanelCommand::StopCountdown,
                    PanelCommand::Send(Request::GetSpeed),
                ]
            }
            PanelPhase::Locked { remaining_secs } => {
                self.phase = PanelPhase::Locked {
                    remaining_secs: remaining_secs - 1,
                };
                Vec::new()
            }
            PanelPhase::Idle if self.countdown_running => {
                self.countdown_running = false;
                vec![PanelCommand::StopCountdown]
            }
            PanelPhase::Idle => Vec::new(),
        }
    }

    /// Builds the view for the current state.
    #[must_use]
    pub fn view(&self) -> PanelView {
        if self.video_count == 0 {
            return PanelView::NoVideos {
                title: NO_VIDEOS_TITLE,
                hint: NO_VIDEOS_HINT,
            };
        }

        let locked = self.is_locked();
        let countdown = locked.then(|| format_countdown(self.remaining_secs()));
        let plural = if self.video_count == 1 { "" } else { "s" };

        PanelView::Controls(ControlsView {
            video_count_text: format!("{} video{plural} found on page", self.video_count),
            speed_text: format!("Current speed: {:.2}x", self.speed),
            label: self.label(),
            gamble_info: countdown
                .as_ref()
                .map(|c| format!("Locked at {:.2}x for {c}", self.gamble_speed)),
            slider_value: self.speed,
            active_preset: matching_preset(
                self.speed,
                self.config.presets,
                self.config.preset_tolerance,
            ),
            inputs_enabled: !locked,
            gamble_button_text: if locked {
                GAMBLE_BUTTON_LOCKED
            } else {
                GAMBLE_BUTTON_IDLE
            },
            timer_text: countdown.map(|c| format!("Speed is locked for {c}")),
        })
    }

    fn on_get_speed(&mut self, r: GetSpeedResponse) -> Vec<PanelCommand> {
        self.speed = r.speed;
        self.video_count = r.count;

        if r.gamble_active {
            self.gamble_speed = r.speed;
            self.lock(r.gamble_time_remaining.unwrap_or(0))
        } else {
            self.phase = PanelPhase::Idle;
            if self.countdown_running {
                self.countdown_running = false;
                vec![PanelCommand::StopCountdown]
            } else {
                Vec::new()
            }
        }
    }

    fn on_start_gamble(&mut self, r: StartGambleResponse) -> Vec<PanelCommand> {
        if !r.success {
            return Vec::new();
        }
        self.gamble_speed = r.gamble_speed;
        self.speed = r.gamble_speed;
        self.video_count = r.count;
        self.lock(r.gamble_time_remaining)
    }

    fn lock(&mut self, remaining_secs: u32) -> Vec<PanelCommand> {
        self.phase = PanelPhase::Locked { remaining_secs };
        self.countdown_running = true;
        vec![PanelCommand::StartCountdown {
            period: self.config.countdown_period,
        }]
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(PanelConfig::standard())
    }
}

/// Parses the decimal number at the start of `text`, ignoring whatever
/// follows it. Returns `None` if `text` does not start with one.
fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::SetSpeedResponse;

    fn idle_response(speed: f64, count: u32) -> Response {
        Response::GetSpeed(GetSpeedResponse {
            speed,
            count,
            gamble_active: false,
            gamble_time_remaining: None,
        })
    }

    fn locked_response(speed: f64, count: u32, remaining: u32) -> Response {
        Response::GetSpeed(GetSpeedResponse {
            speed,
            count,
            gamble_active: true,
            gamble_time_remaining: Some(remaining),
        })
    }

    fn gamble_response(speed: f64, count: u32) -> Response {
        Response::StartGamble(StartGambleResponse {
            success: true,
            gamble_speed: speed,
            count,
            gamble_active: true,
            gamble_time_remaining: 300,
        })
    }

    fn controls(panel: &ControlPanel) -> ControlsView {
        match panel.view() {
            PanelView::Controls(c) => c,
            PanelView::NoVideos { .. } => panic!("expected controls"),
        }
    }

    #[test]
    fn open_asks_for_speed() {
        let mut panel = ControlPanel::default();
        assert_eq!(panel.open(), [PanelCommand::Send(Request::GetSpeed)]);
    }

    #[test]
    fn zero_videos_show_notice_only() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 0));
        assert_eq!(
            panel.view(),
            PanelView::NoVideos {
                title: NO_VIDEOS_TITLE,
                hint: NO_VIDEOS_HINT,
            }
        );
    }

    #[test]
    fn idle_response_renders_controls() {
        let mut panel = ControlPanel::default();
        let cmds = panel.on_response(idle_response(1.25, 2));
        assert!(cmds.is_empty());

        let c = controls(&panel);
        assert_eq!(c.video_count_text, "2 videos found on page");
        assert_eq!(c.speed_text, "Current speed: 1.25x");
        assert_eq!(c.label, SpeedLabel::Preset(1.25));
        assert_eq!(c.active_preset, Some(4));
        assert!(c.inputs_enabled);
        assert_eq!(c.gamble_button_text, GAMBLE_BUTTON_IDLE);
        assert_eq!(c.gamble_info, None);
        assert_eq!(c.timer_text, None);
    }

    #[test]
    fn single_video_is_singular() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 1));
        assert_eq!(controls(&panel).video_count_text, "1 video found on page");
    }

    #[test]
    fn select_speed_sends_request_and_updates_count_from_response() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 1));

        let cmds = panel.select_speed(2.0);
        assert_eq!(cmds, [PanelCommand::Send(Request::SetSpeed { speed: 2.0 })]);
        assert_eq!(panel.speed(), 2.0);

        let _ = panel.on_response(Response::SetSpeed(SetSpeedResponse {
            success: true,
            count: 3,
        }));
        assert_eq!(panel.video_count(), 3);
    }

    #[test]
    fn locked_response_starts_countdown_with_gamble_label() {
        let mut panel = ControlPanel::default();
        let cmds = panel.on_response(locked_response(1.25, 1, 42));
        assert_eq!(
            cmds,
            [PanelCommand::StartCountdown {
                period: Millis::SECOND,
            }]
        );
        assert_eq!(panel.phase(), PanelPhase::Locked { remaining_secs: 42 });

        let c = controls(&panel);
        assert_eq!(c.label, SpeedLabel::Gamble);
        assert!(!c.inputs_enabled);
        assert_eq!(c.gamble_button_text, GAMBLE_BUTTON_LOCKED);
        assert_eq!(c.gamble_info.as_deref(), Some("Locked at 1.25x for 0:42"));
        assert_eq!(c.timer_text.as_deref(), Some("Speed is locked for 0:42"));
    }

    #[test]
    fn inputs_are_blocked_while_locked() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(gamble_response(2.37, 1));

        assert!(panel.select_speed(1.0).is_empty());
        assert_eq!(panel.speed(), 2.37);
        assert!(panel.start_gamble().is_empty());

        panel.set_custom_input("1.5");
        assert_eq!(panel.apply_custom_input(), Err(SpeedInputError::Locked));
        assert_eq!(panel.custom_input(), "1.5");
    }

    #[test]
    fn custom_input_validation() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 1));

        assert_eq!(panel.apply_custom_input(), Err(SpeedInputError::Empty));

        panel.set_custom_input("fast");
        assert_eq!(panel.apply_custom_input(), Err(SpeedInputError::NotANumber));
        assert_eq!(panel.custom_input(), "fast");

        panel.set_custom_input("0.05");
        assert_eq!(
            panel.apply_custom_input(),
            Err(SpeedInputError::OutOfRange { value: 0.05 })
        );

        panel.set_custom_input("16.5");
        assert!(panel.apply_custom_input().is_err());

        panel.set_custom_input("NaN");
        assert!(panel.apply_custom_input().is_err());
        assert_eq!(panel.custom_input(), "NaN");

        panel.set_custom_input("x2");
        assert_eq!(panel.apply_custom_input(), Err(SpeedInputError::NotANumber));
        panel.set_custom_input("-.");
        assert_eq!(panel.apply_custom_input(), Err(SpeedInputError::NotANumber));

        panel.set_custom_input("20x");
        assert_eq!(
            panel.apply_custom_input(),
            Err(SpeedInputError::OutOfRange { value: 20.0 })
        );
    }

    #[test]
    fn custom_input_ignores_trailing_text() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 1));

        panel.set_custom_input("2x");
        let cmds = panel.apply_custom_input().unwrap();
        assert_eq!(cmds, [PanelCommand::Send(Request::SetSpeed { speed: 2.0 })]);
        assert_eq!(panel.custom_input(), "");

        panel.set_custom_input("1.5x speed");
        let cmds = panel.apply_custom_input().unwrap();
        assert_eq!(cmds, [PanelCommand::Send(Request::SetSpeed { speed: 1.5 })]);

        panel.set_custom_input(".75");
        assert!(panel.apply_custom_input().is_ok());
        assert_eq!(panel.speed(), 0.75);

        panel.set_custom_input("1e1e");
        assert!(panel.apply_custom_input().is_ok());
        assert_eq!(panel.speed(), 10.0);
    }

    #[test]
    fn fresh_panel_shows_no_videos_notice() {
        let panel = ControlPanel::default();
        assert!(matches!(panel.view(), PanelView::NoVideos { .. }));
        assert_eq!(panel.video_count(), 0);
        assert!(!panel.countdown_running());
    }

    #[test]
    fn accepted_custom_input_clears_buffer() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 1));

        panel.set_custom_input(" 4.2 ");
        let cmds = panel.apply_custom_input().unwrap();
        assert_eq!(cmds, [PanelCommand::Send(Request::SetSpeed { speed: 4.2 })]);
        assert_eq!(panel.custom_input(), "");
        assert_eq!(panel.label(), SpeedLabel::Custom);

        panel.set_custom_input("16");
        assert!(panel.apply_custom_input().is_ok());
        panel.set_custom_input("0.1");
        assert!(panel.apply_custom_input().is_ok());
    }

    #[test]
    fn gamble_response_seeds_state() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 2));
        assert_eq!(panel.start_gamble(), [PanelCommand::Send(Request::StartGamble)]);

        let cmds = panel.on_response(gamble_response(0.83, 2));
        assert_eq!(
            cmds,
            [PanelCommand::StartCountdown {
                period: Millis::SECOND,
            }]
        );
        assert_eq!(panel.speed(), 0.83);
        assert_eq!(panel.remaining_secs(), 300);
        assert!(panel.countdown_running());
        assert_eq!(
            controls(&panel).timer_text.as_deref(),
            Some("Speed is locked for 5:00")
        );
    }

    #[test]
    fn unsuccessful_gamble_response_is_ignored() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(idle_response(1.0, 2));
        let cmds = panel.on_response(Response::StartGamble(StartGambleResponse {
            success: false,
            gamble_speed: 2.0,
            count: 2,
            gamble_active: true,
            gamble_time_remaining: 300,
        }));
        assert!(cmds.is_empty());
        assert!(!panel.is_locked());
    }

    #[test]
    fn countdown_runs_down_then_resyncs() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(locked_response(1.5, 1, 3));

        assert!(panel.tick().is_empty());
        assert_eq!(panel.remaining_secs(), 2);
        assert!(panel.tick().is_empty());
        assert_eq!(panel.remaining_secs(), 1);

        let cmds = panel.tick();
        assert_eq!(
            cmds,
            [
                PanelCommand::StopCountdown,
                PanelCommand::Send(Request::GetSpeed),
            ]
        );
        assert_eq!(panel.phase(), PanelPhase::Idle);
        assert!(!panel.countdown_running());
        assert_eq!(panel.label(), SpeedLabel::Preset(1.5));
    }

    #[test]
    fn zero_remaining_resyncs_on_first_tick() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(locked_response(1.5, 1, 0));
        assert_eq!(panel.tick().len(), 2);
        assert!(!panel.is_locked());
    }

    #[test]
    fn idle_answer_while_locked_stops_countdown() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(locked_response(2.0, 1, 100));
        // The page was reloaded and lost its lock.
        let cmds = panel.on_response(idle_response(1.0, 1));
        assert_eq!(cmds, [PanelCommand::StopCountdown]);
        assert!(!panel.is_locked());
        assert!(!panel.countdown_running());
    }

    #[test]
    fn stray_tick_while_idle_stops_countdown_once() {
        let mut panel = ControlPanel::default();
        assert!(panel.tick().is_empty());
        let _ = panel.on_response(locked_response(2.0, 1, 5));
        panel.phase = PanelPhase::Idle;
        assert_eq!(panel.tick(), [PanelCommand::StopCountdown]);
        assert!(panel.tick().is_empty());
    }

    #[test]
    fn relock_restarts_countdown() {
        let mut panel = ControlPanel::default();
        let _ = panel.on_response(locked_response(2.0, 1, 100));
        let cmds = panel.on_response(locked_response(2.0, 1, 90));
        assert_eq!(
            cmds,
            [PanelCommand::StartCountdown {
                period: Millis::SECOND,
            }]
        );
        assert_eq!(panel.remaining_secs(), 90);
    }

    #[test]
    fn input_error_messages() {
        use alloc::string::ToString as _;
        assert_eq!(
            SpeedInputError::OutOfRange { value: 20.0 }.to_string(),
            "speed 20 is out of range"
        );
        assert_eq!(SpeedInputError::Empty.to_string(), "no speed entered");
    }
}
