// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The video-element contract.
//!
//! A [`VideoSet`] is a snapshot of the video elements in a document, taken at
//! request time. Nothing caches it between requests: the page may add or
//! remove elements at any moment, so each request queries afresh.

use alloc::vec::Vec;

/// Playback rate reported when a document has no video elements.
pub const DEFAULT_RATE: f64 = 1.0;

/// The video elements of a document, in document order.
pub trait VideoSet {
    /// Returns the number of video elements.
    fn len(&self) -> usize;

    /// Returns `true` if there are no video elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the playback rate of the first video element, if any.
    fn first_rate(&self) -> Option<f64>;

    /// Sets the playback rate of every video element and returns how many
    /// were affected.
    fn set_all_rates(&mut self, rate: f64) -> usize;

    /// Returns [`len`](Self::len) clamped into a `u32` for the wire protocol.
    fn count(&self) -> u32 {
        u32::try_from(self.len()).unwrap_or(u32::MAX)
    }

    /// Returns the first video's rate, or [`DEFAULT_RATE`] when there is none.
    fn current_rate(&self) -> f64 {
        self.first_rate().unwrap_or(DEFAULT_RATE)
    }
}

impl VideoSet for [f64] {
    fn len(&self) -> usize {
        <[f64]>::len(self)
    }

    fn first_rate(&self) -> Option<f64> {
        self.first().copied()
    }

    fn set_all_rates(&mut self, rate: f64) -> usize {
        self.fill(rate);
        <[f64]>::len(self)
    }
}

impl VideoSet for Vec<f64> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn first_rate(&self) -> Option<f64> {
        self.as_slice().first_rate()
    }

    fn set_all_rates(&mut self, rate: f64) -> usize {
        self.as_mut_slice().set_all_rates(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_reports_default_rate() {
        let videos: [f64; 0] = [];
        assert!(videos[..].is_empty());
        assert_eq!(videos[..].current_rate(), DEFAULT_RATE);
        assert_eq!(videos[..].count(), 0);
    }

    #[test]
    fn set_all_rates_touches_every_video() {
        let mut videos = [1.0, 0.5, 2.0];
        let n = videos[..].set_all_rates(1.5);
        assert_eq!(n, 3);
        assert_eq!(videos, [1.5, 1.5, 1.5]);
        assert_eq!(videos[..].first_rate(), Some(1.5));
    }
}
