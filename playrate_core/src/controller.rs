// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-side request handler.
//!
//! [`PageController`] lives for as long as the page context does and owns the
//! [`GambleLock`]. Everything else it needs (the videos, the clock reading,
//! the random source, a tracer) is lent to it per request through a
//! [`PageContext`], because none of those may be cached between requests.
//!
//! # Usage
//!
//! ```rust
//! use playrate_core::controller::{PageContext, PageController};
//! use playrate_core::lock::GambleConfig;
//! use playrate_core::protocol::{Request, Response};
//! use playrate_core::random::Lcg;
//! use playrate_core::time::EpochMillis;
//! use playrate_core::trace::Tracer;
//!
//! let mut controller = PageController::new(GambleConfig::standard());
//! let mut videos = vec![1.0, 1.0];
//! let mut random = Lcg::default();
//! let mut cx = PageContext {
//!     videos: &mut videos,
//!     random: &mut random,
//!     now: EpochMillis(1_000),
//!     tracer: Tracer::none(),
//! };
//! let response = controller.handle(&mut cx, Request::SetSpeed { speed: 2.0 });
//! assert_eq!(response.count(), 2);
//! assert_eq!(videos, [2.0, 2.0]);
//! ```

use crate::lock::{GambleConfig, GambleLock, LockStatus};
use crate::protocol::{
    GetSpeedResponse, Request, Response, SetSpeedResponse, StartGambleResponse,
};
use crate::random::RandomSource;
use crate::time::{EpochMillis, Millis};
use crate::trace::{
    GambleExpiredEvent, GambleStartedEvent, RequestEvent, SetSpeedIgnoredEvent, SpeedAppliedEvent,
    SpeedSource, Tracer,
};
use crate::video::VideoSet;

/// Everything a request borrows from the page for its duration.
pub struct PageContext<'a, V: ?Sized, R: ?Sized> {
    /// The document's video elements, queried for this request.
    pub videos: &'a mut V,
    /// Source for gamble rolls.
    pub random: &'a mut R,
    /// Page time at which the request is handled.
    pub now: EpochMillis,
    /// Trace destination.
    pub tracer: Tracer<'a>,
}

impl<V: VideoSet + ?Sized, R: ?Sized> core::fmt::Debug for PageContext<'_, V, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageContext")
            .field("videos", &self.videos.len())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// Owns the gamble lock and answers requests from the popup.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageController {
    config: GambleConfig,
    lock: GambleLock,
}

impl PageController {
    /// Creates a controller with a released lock.
    #[must_use]
    pub const fn new(config: GambleConfig) -> Self {
        Self {
            config,
            lock: GambleLock::new(),
        }
    }

    /// Returns the controller's configuration.
    #[must_use]
    pub const fn config(&self) -> &GambleConfig {
        &self.config
    }

    /// Returns the gamble lock, as last evaluated.
    #[must_use]
    pub const fn lock(&self) -> &GambleLock {
        &self.lock
    }

    /// Dispatches a request to the matching handler.
    pub fn handle<V, R>(&mut self, cx: &mut PageContext<'_, V, R>, request: Request) -> Response
    where
        V: VideoSet + ?Sized,
        R: RandomSource + ?Sized,
    {
        cx.tracer.request(&RequestEvent {
            kind: request.kind(),
            at: cx.now,
            video_count: cx.videos.count(),
        });
        match request {
            Request::SetSpeed { speed } => self.set_speed(cx, speed).into(),
            Request::GetSpeed => self.get_speed(cx).into(),
            Request::StartGamble => self.start_gamble(cx).into(),
        }
    }

    /// Sets every video to `speed` unless a gamble is locked.
    ///
    /// A locked gamble turns this into a no-op that still reports success and
    /// the current count. A non-finite `speed` is refused with
    /// `success = false`.
    pub fn set_speed<V, R>(&mut self, cx: &mut PageContext<'_, V, R>, speed: f64) -> SetSpeedResponse
    where
        V: VideoSet + ?Sized,
        R: ?Sized,
    {
        let count = cx.videos.count();

        match self.poll(cx) {
            LockStatus::Active {
                speed: locked,
                remaining,
            } => {
                cx.tracer.set_speed_ignored(&SetSpeedIgnoredEvent {
                    at: cx.now,
                    requested: speed,
                    locked_speed: Some(locked),
                    remaining,
                });
                return SetSpeedResponse {
                    success: true,
                    count,
                };
            }
            LockStatus::Idle | LockStatus::Expired { .. } => {}
        }

        if !speed.is_finite() {
            cx.tracer.set_speed_ignored(&SetSpeedIgnoredEvent {
                at: cx.now,
                requested: speed,
                locked_speed: None,
                remaining: Millis::ZERO,
            });
            return SetSpeedResponse {
                success: false,
                count,
            };
        }

        cx.videos.set_all_rates(speed);
        cx.tracer.speed_applied(&SpeedAppliedEvent {
            at: cx.now,
            speed,
            count,
            source: SpeedSource::User,
        });
        SetSpeedResponse {
            success: true,
            count,
        }
    }

    /// Reports the current speed and gamble state, releasing an expired lock.
    pub fn get_speed<V, R>(&mut self, cx: &mut PageContext<'_, V, R>) -> GetSpeedResponse
    where
        V: VideoSet + ?Sized,
        R: ?Sized,
    {
        let count = cx.videos.count();
        match self.poll(cx) {
            LockStatus::Active { speed, remaining } => GetSpeedResponse {
                speed,
                count,
                gamble_active: true,
                gamble_time_remaining: Some(remaining.whole_secs_u32()),
            },
            LockStatus::Expired { .. } => GetSpeedResponse {
                speed: cx.videos.current_rate(),
                count,
                gamble_active: false,
                gamble_time_remaining: Some(0),
            },
            LockStatus::Idle => GetSpeedResponse {
                speed: cx.videos.current_rate(),
                count,
                gamble_active: false,
                gamble_time_remaining: None,
            },
        }
    }

    /// Rolls a speed, locks it for the configured duration, and applies it.
    ///
    /// An unexpired gamble is overwritten and its timer restarted.
    pub fn start_gamble<V, R>(&mut self, cx: &mut PageContext<'_, V, R>) -> StartGambleResponse
    where
        V: VideoSet + ?Sized,
        R: RandomSource + ?Sized,
    {
        let replaced_active = self.poll(cx).is_active();
        let speed = self.config.roll_with(&mut *cx.random);
        let duration = self.config.duration;
        self.lock.engage(speed, cx.now, duration);

        let count = cx.videos.count();
        cx.videos.set_all_rates(speed);

        cx.tracer.gamble_started(&GambleStartedEvent {
            at: cx.now,
            speed,
            ends_at: cx.now + duration,
            replaced_active,
        });
        cx.tracer.speed_applied(&SpeedAppliedEvent {
            at: cx.now,
            speed,
            count,
            source: SpeedSource::Gamble,
        });

        StartGambleResponse {
            success: true,
            gamble_speed: speed,
            count,
            gamble_active: true,
            gamble_time_remaining: duration.whole_secs_u32(),
        }
    }

    /// Polls the lock at the request time, tracing an observed expiry.
    fn poll<V: ?Sized, R: ?Sized>(&mut self, cx: &mut PageContext<'_, V, R>) -> LockStatus {
        let status = self.lock.poll(cx.now);
        if let LockStatus::Expired { speed, ended_at } = status {
            cx.tracer.gamble_expired(&GambleExpiredEvent {
                at: cx.now,
                speed,
                ended_at,
            });
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, Lcg};
    use alloc::vec;
    use alloc::vec::Vec;

    const T0: EpochMillis = EpochMillis(1_700_000_000_000);

    struct Page {
        controller: PageController,
        videos: Vec<f64>,
        random: Lcg,
        now: EpochMillis,
    }

    impl Page {
        fn with_videos(n: usize) -> Self {
            Self {
                controller: PageController::new(GambleConfig::standard()),
                videos: vec![1.0; n],
                random: Lcg::new(3),
                now: T0,
            }
        }

        fn send(&mut self, request: Request) -> Response {
            let mut cx = PageContext {
                videos: &mut self.videos,
                random: &mut self.random,
                now: self.now,
                tracer: Tracer::none(),
            };
            self.controller.handle(&mut cx, request)
        }

        fn get(&mut self) -> GetSpeedResponse {
            match self.send(Request::GetSpeed) {
                Response::GetSpeed(r) => r,
                other => panic!("unexpected response {other:?}"),
            }
        }

        fn gamble(&mut self) -> StartGambleResponse {
            match self.send(Request::StartGamble) {
                Response::StartGamble(r) => r,
                other => panic!("unexpected response {other:?}"),
            }
        }

        fn advance(&mut self, d: Millis) {
            self.now = self.now + d;
        }
    }

    #[test]
    fn set_then_get_round_trips_speed() {
        let mut page = Page::with_videos(1);
        for speed in [0.1, 0.25, 1.0, 1.2345, 3.7, 8.0, 16.0] {
            page.send(Request::SetSpeed { speed });
            let got = page.get();
            assert_eq!(got.speed, speed);
            assert!(!got.gamble_active);
            assert_eq!(got.gamble_time_remaining, None);
        }
    }

    #[test]
    fn set_speed_updates_every_video() {
        let mut page = Page::with_videos(2);
        let r = page.send(Request::SetSpeed { speed: 2.0 });
        assert_eq!(
            r,
            Response::SetSpeed(SetSpeedResponse {
                success: true,
                count: 2,
            })
        );
        assert_eq!(page.videos, [2.0, 2.0]);
    }

    #[test]
    fn zero_videos_report_zero_count_and_default_rate() {
        let mut page = Page::with_videos(0);
        assert_eq!(page.send(Request::SetSpeed { speed: 2.0 }).count(), 0);
        let got = page.get();
        assert_eq!(got.count, 0);
        assert_eq!(got.speed, 1.0);
        let g = page.gamble();
        assert_eq!(g.count, 0);
        assert!(g.gamble_active);
    }

    #[test]
    fn gamble_locks_speed_for_three_hundred_seconds() {
        let mut page = Page::with_videos(3);
        let g = page.gamble();
        assert!(g.success);
        assert!((0.25..=3.0).contains(&g.gamble_speed));
        assert_eq!(g.gamble_time_remaining, 300);
        assert_eq!(page.videos, [g.gamble_speed; 3]);

        let got = page.get();
        assert!(got.gamble_active);
        assert_eq!(got.speed, g.gamble_speed);
        assert_eq!(got.gamble_time_remaining, Some(300));
    }

    #[test]
    fn set_speed_during_gamble_is_ignored_but_succeeds() {
        let mut page = Page::with_videos(2);
        let g = page.gamble();
        page.advance(Millis::from_secs(10));

        let r = page.send(Request::SetSpeed { speed: 0.5 });
        assert_eq!(r.count(), 2);
        assert!(matches!(r, Response::SetSpeed(SetSpeedResponse { success: true, .. })));
        assert_eq!(page.videos, [g.gamble_speed; 2]);
    }

    #[test]
    fn remaining_seconds_round_down() {
        let mut page = Page::with_videos(1);
        page.gamble();
        page.advance(Millis(1_500));
        assert_eq!(page.get().gamble_time_remaining, Some(298));
        page.advance(Millis(298_000));
        // 500 ms left: still locked, zero whole seconds.
        let got = page.get();
        assert!(got.gamble_active);
        assert_eq!(got.gamble_time_remaining, Some(0));
    }

    #[test]
    fn expired_gamble_reports_real_rate_not_locked_speed() {
        let mut page = Page::with_videos(1);
        let mut fixed = FixedRandom(0.5);
        {
            let mut cx = PageContext {
                videos: &mut page.videos,
                random: &mut fixed,
                now: page.now,
                tracer: Tracer::none(),
            };
            page.controller.start_gamble(&mut cx);
        }
        assert_eq!(page.videos, [1.63]);
        // The page itself changes the rate behind the lock's back.
        page.videos[0] = 0.9;

        page.advance(Millis::from_secs(300));
        let got = page.get();
        assert!(!got.gamble_active);
        assert_eq!(got.speed, 0.9);
        assert_eq!(got.gamble_time_remaining, Some(0));
        assert!(!page.controller.lock().is_engaged());

        // Subsequent queries look like a page that never gambled.
        assert_eq!(page.get().gamble_time_remaining, None);
    }

    #[test]
    fn set_speed_after_expiry_applies() {
        let mut page = Page::with_videos(2);
        page.gamble();
        page.advance(Millis::from_secs(301));
        let r = page.send(Request::SetSpeed { speed: 1.75 });
        assert_eq!(r.count(), 2);
        assert_eq!(page.videos, [1.75, 1.75]);
        assert!(!page.controller.lock().is_engaged());
    }

    #[test]
    fn second_gamble_restarts_timer() {
        let mut page = Page::with_videos(1);
        page.gamble();
        page.advance(Millis::from_secs(120));
        let g = page.gamble();
        assert_eq!(g.gamble_time_remaining, 300);
        page.advance(Millis::from_secs(200));
        let got = page.get();
        assert!(got.gamble_active);
        assert_eq!(got.gamble_time_remaining, Some(100));
    }

    #[test]
    fn non_finite_speed_is_refused() {
        let mut page = Page::with_videos(2);
        let r = page.send(Request::SetSpeed { speed: f64::NAN });
        assert_eq!(
            r,
            Response::SetSpeed(SetSpeedResponse {
                success: false,
                count: 2,
            })
        );
        assert_eq!(page.videos, [1.0, 1.0]);
    }
}
