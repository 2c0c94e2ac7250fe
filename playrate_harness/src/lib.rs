// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable stand-ins for the browser, for tests and simulated demos.
//!
//! - [`VideoBank`]: an in-memory [`VideoSet`].
//! - [`ManualClock`]: page time that only moves when told to.
//! - [`Session`]: a popup and a page wired back to back, with the message
//!   channel and the countdown interval simulated.

#![no_std]

extern crate alloc;

mod session;

pub use session::{Session, SessionConfig};

use alloc::vec;
use alloc::vec::Vec;

use playrate_core::time::{EpochMillis, Millis};
use playrate_core::video::{DEFAULT_RATE, VideoSet};

/// An in-memory set of videos, each reduced to its playback rate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoBank {
    rates: Vec<f64>,
}

impl VideoBank {
    /// Creates `count` videos playing at normal speed.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            rates: vec![DEFAULT_RATE; count],
        }
    }

    /// Creates videos with the given rates.
    #[must_use]
    pub fn from_rates(rates: &[f64]) -> Self {
        Self {
            rates: rates.to_vec(),
        }
    }

    /// Returns every video's rate, in document order.
    #[must_use]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Adds a video, as if the page inserted a new element.
    pub fn add_video(&mut self, rate: f64) {
        self.rates.push(rate);
    }

    /// Sets one video's rate behind the controller's back, as the page's own
    /// player controls would.
    pub fn set_rate(&mut self, index: usize, rate: f64) {
        if let Some(r) = self.rates.get_mut(index) {
            *r = rate;
        }
    }

    /// Resets every video to normal speed, as a reload would.
    pub fn reset(&mut self) {
        self.rates.fill(DEFAULT_RATE);
    }
}

impl VideoSet for VideoBank {
    fn len(&self) -> usize {
        self.rates.len()
    }

    fn first_rate(&self) -> Option<f64> {
        self.rates.first().copied()
    }

    fn set_all_rates(&mut self, rate: f64) -> usize {
        self.rates.set_all_rates(rate)
    }
}

/// A clock that advances only when told to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManualClock {
    now: EpochMillis,
}

impl ManualClock {
    /// An arbitrary, realistic starting point (November 2023).
    pub const DEFAULT_START: EpochMillis = EpochMillis(1_700_000_000_000);

    /// Creates a clock reading `start`.
    #[must_use]
    pub const fn new(start: EpochMillis) -> Self {
        Self { now: start }
    }

    /// Returns the current reading.
    #[must_use]
    pub const fn now(&self) -> EpochMillis {
        self.now
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, d: Millis) {
        self.now = self.now + d;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START)
    }
}
