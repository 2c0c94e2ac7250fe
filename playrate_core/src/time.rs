// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wall-clock timestamps and millisecond durations.
//!
//! [`EpochMillis`] is a point in time as milliseconds since the Unix epoch,
//! matching `Date.now()` in the browser. The gamble lock stores its end time
//! in this unit so that it can be compared against whatever clock the page
//! context reads at request time.
//!
//! [`Millis`] is a duration in the same unit. All arithmetic saturates.

use core::fmt;
use core::ops::{Add, Sub};

/// Milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// A point in time expressed as milliseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EpochMillis(pub u64);

impl EpochMillis {
    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> u64 {
        self.0
    }

    /// Creates a timestamp from a fractional millisecond reading such as the
    /// value of `Date.now()`.
    ///
    /// Negative and non-finite readings map to the epoch.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clock readings are small positive f64 values; sub-millisecond part is dropped"
    )]
    pub fn from_f64_millis(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Self(ms as u64)
        } else {
            Self(0)
        }
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }

    /// Saturating addition of a duration.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, duration: Millis) -> Self {
        Self(self.0.saturating_add(duration.0))
    }
}

impl Add<Millis> for EpochMillis {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Millis) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for EpochMillis {
    type Output = Millis;

    #[inline]
    fn sub(self, rhs: Self) -> Millis {
        self.saturating_duration_since(rhs)
    }
}

impl fmt::Debug for EpochMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EpochMillis({})", self.0)
    }
}

/// A duration in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(pub u64);

impl Millis {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// One second.
    pub const SECOND: Self = Self(MILLIS_PER_SEC);

    /// Creates a duration from whole seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(MILLIS_PER_SEC))
    }

    /// Creates a duration from whole minutes.
    #[inline]
    #[must_use]
    pub const fn from_mins(mins: u64) -> Self {
        Self::from_secs(mins.saturating_mul(60))
    }

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn millis(self) -> u64 {
        self.0
    }

    /// Returns the number of whole seconds, rounding down.
    #[inline]
    #[must_use]
    pub const fn whole_secs(self) -> u64 {
        self.0 / MILLIS_PER_SEC
    }

    /// Returns [`whole_secs`](Self::whole_secs) clamped into a `u32`.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped to u32::MAX first"
    )]
    pub const fn whole_secs_u32(self) -> u32 {
        let secs = self.whole_secs();
        if secs > u32::MAX as u64 {
            u32::MAX
        } else {
            secs as u32
        }
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Millis {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Millis({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_secs_rounds_down() {
        assert_eq!(Millis(299_999).whole_secs(), 299);
        assert_eq!(Millis(300_000).whole_secs(), 300);
        assert_eq!(Millis(999).whole_secs(), 0);
    }

    #[test]
    fn five_minutes_is_three_hundred_seconds() {
        assert_eq!(Millis::from_mins(5), Millis(300_000));
        assert_eq!(Millis::from_mins(5).whole_secs_u32(), 300);
    }

    #[test]
    fn duration_since_saturates() {
        let t = EpochMillis(1_000);
        assert_eq!(t.saturating_duration_since(EpochMillis(400)), Millis(600));
        assert_eq!(t.saturating_duration_since(EpochMillis(1_500)), Millis::ZERO);
        assert_eq!(t - EpochMillis(2_000), Millis::ZERO);
    }

    #[test]
    fn from_f64_millis_drops_fraction_and_garbage() {
        assert_eq!(
            EpochMillis::from_f64_millis(1_700_000_000_123.9),
            EpochMillis(1_700_000_000_123)
        );
        assert_eq!(EpochMillis::from_f64_millis(-5.0), EpochMillis(0));
        assert_eq!(EpochMillis::from_f64_millis(f64::NAN), EpochMillis(0));
    }

    #[test]
    fn add_saturates() {
        assert_eq!(EpochMillis(u64::MAX) + Millis(1), EpochMillis(u64::MAX));
        assert_eq!(EpochMillis(10) + Millis::SECOND, EpochMillis(1_010));
    }
}
