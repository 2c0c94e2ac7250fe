// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gamble lock.
//!
//! While engaged, the lock pins every video to a randomly rolled speed until
//! its end time. Expiry is lazy: nothing runs in the background, and the lock
//! only notices it has expired when [`GambleLock::poll`] is called with a time
//! at or past the end.

use crate::random::RandomSource;
use crate::time::{EpochMillis, Millis};

/// Configuration for gamble rolls and lock duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GambleConfig {
    /// Lowest speed a roll can produce.
    pub min_speed: f64,
    /// Highest speed a roll can produce.
    pub max_speed: f64,
    /// How long a gamble stays locked.
    pub duration: Millis,
}

impl GambleConfig {
    /// Speeds in `[0.25, 3.0]`, locked for five minutes.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            min_speed: 0.25,
            max_speed: 3.0,
            duration: Millis::from_mins(5),
        }
    }

    /// Rolls a gamble speed from a unit sample.
    ///
    /// `unit` is clamped into `[0, 1]`; the result is
    /// `min_speed + unit × (max_speed − min_speed)` rounded half-up to two
    /// decimal places, so it always lands in `[min_speed, max_speed]` when
    /// both bounds have at most two decimals.
    #[must_use]
    pub fn roll(&self, unit: f64) -> f64 {
        let unit = if unit.is_nan() { 0.0 } else { unit.clamp(0.0, 1.0) };
        let raw = self.min_speed + unit * (self.max_speed - self.min_speed);
        round_hundredths(raw)
    }

    /// Draws from `random` and rolls a gamble speed.
    #[must_use]
    pub fn roll_with<R: RandomSource + ?Sized>(&self, random: &mut R) -> f64 {
        self.roll(random.next_unit())
    }
}

impl Default for GambleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Rounds a non-negative value half-up to two decimal places.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "playback rates are small positive values; hundredths fit in u64 exactly"
)]
fn round_hundredths(value: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    let hundredths = (value * 100.0 + 0.5) as u64;
    hundredths as f64 / 100.0
}

/// What [`GambleLock::poll`] observed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LockStatus {
    /// No gamble is engaged.
    Idle,
    /// A gamble is engaged and has not expired.
    Active {
        /// The locked speed.
        speed: f64,
        /// Time until the lock releases.
        remaining: Millis,
    },
    /// A gamble was engaged but its end time has passed. The lock has been
    /// released by this poll.
    Expired {
        /// The speed that was locked.
        speed: f64,
        /// When the lock ended.
        ended_at: EpochMillis,
    },
}

impl LockStatus {
    /// Returns `true` for [`LockStatus::Active`].
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
enum LockState {
    #[default]
    Unlocked,
    Locked {
        speed: f64,
        ends_at: EpochMillis,
    },
}

/// A gamble lock with lazy expiry.
///
/// The speed and end time exist only while the lock is engaged, so a released
/// lock has nothing stale to read.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GambleLock {
    state: LockState,
}

impl GambleLock {
    /// Creates a released lock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LockState::Unlocked,
        }
    }

    /// Engages the lock at `speed` until `now + duration`, replacing any
    /// existing engagement.
    pub fn engage(&mut self, speed: f64, now: EpochMillis, duration: Millis) {
        self.state = LockState::Locked {
            speed,
            ends_at: now + duration,
        };
    }

    /// Releases the lock unconditionally.
    pub fn release(&mut self) {
        self.state = LockState::Unlocked;
    }

    /// Evaluates the lock at `now`, releasing it if `now` has reached the end
    /// time.
    pub fn poll(&mut self, now: EpochMillis) -> LockStatus {
        match self.state {
            LockState::Unlocked => LockStatus::Idle,
            LockState::Locked { speed, ends_at } if now >= ends_at => {
                self.state = LockState::Unlocked;
                LockStatus::Expired {
                    speed,
                    ended_at: ends_at,
                }
            }
            LockState::Locked { speed, ends_at } => LockStatus::Active {
                speed,
                remaining: ends_at.saturating_duration_since(now),
            },
        }
    }

    /// Returns `true` if the lock is engaged, without evaluating expiry.
    ///
    /// An engaged lock may already be past its end time; only
    /// [`poll`](Self::poll) settles that.
    #[must_use]
    pub const fn is_engaged(&self) -> bool {
        matches!(self.state, LockState::Locked { .. })
    }

    /// Returns the locked speed, without evaluating expiry.
    #[must_use]
    pub const fn engaged_speed(&self) -> Option<f64> {
        match self.state {
            LockState::Locked { speed, .. } => Some(speed),
            LockState::Unlocked => None,
        }
    }

    /// Returns the end time, without evaluating expiry.
    #[must_use]
    pub const fn ends_at(&self) -> Option<EpochMillis> {
        match self.state {
            LockState::Locked { ends_at, .. } => Some(ends_at),
            LockState::Unlocked => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Lcg;

    const T0: EpochMillis = EpochMillis(1_700_000_000_000);

    #[test]
    fn roll_bounds() {
        let cfg = GambleConfig::standard();
        assert_eq!(cfg.roll(0.0), 0.25);
        assert_eq!(cfg.roll(0.999_999_9), 3.0);
        assert_eq!(cfg.roll(1.0), 3.0);
        assert_eq!(cfg.roll(-3.0), 0.25);
        assert_eq!(cfg.roll(f64::NAN), 0.25);
    }

    #[test]
    fn roll_rounds_half_up_to_hundredths() {
        let cfg = GambleConfig::standard();
        // 0.25 + 0.5 * 2.75 = 1.625
        assert_eq!(cfg.roll(0.5), 1.63);
        // 0.25 + 0.1 * 2.75 = 0.525
        assert_eq!(cfg.roll(0.1), 0.53);
    }

    #[test]
    fn rolled_speeds_stay_in_range_with_two_decimals() {
        let cfg = GambleConfig::standard();
        let mut rng = Lcg::new(99);
        for _ in 0..5_000 {
            let s = cfg.roll_with(&mut rng);
            assert!((0.25..=3.0).contains(&s), "{s} out of range");
            let hundredths = s * 100.0;
            let nearest = round_hundredths(s) * 100.0;
            assert!(
                (hundredths - nearest) < 1e-6 && (nearest - hundredths) < 1e-6,
                "{s} has more than two decimals"
            );
        }
    }

    #[test]
    fn poll_idle_when_never_engaged() {
        let mut lock = GambleLock::new();
        assert_eq!(lock.poll(T0), LockStatus::Idle);
        assert!(!lock.is_engaged());
        assert_eq!(lock.engaged_speed(), None);
    }

    #[test]
    fn poll_reports_remaining_until_end() {
        let mut lock = GambleLock::new();
        lock.engage(1.37, T0, Millis::from_mins(5));
        let status = lock.poll(EpochMillis(T0.0 + 1_500));
        assert_eq!(
            status,
            LockStatus::Active {
                speed: 1.37,
                remaining: Millis(298_500),
            }
        );
        assert!(lock.is_engaged());
    }

    #[test]
    fn poll_at_end_time_expires_and_releases() {
        let mut lock = GambleLock::new();
        lock.engage(2.1, T0, Millis::from_mins(5));
        let end = T0 + Millis::from_mins(5);

        assert_eq!(
            lock.poll(end),
            LockStatus::Expired {
                speed: 2.1,
                ended_at: end,
            }
        );
        assert!(!lock.is_engaged());
        assert_eq!(lock.poll(end), LockStatus::Idle);
    }

    #[test]
    fn engage_replaces_existing_lock() {
        let mut lock = GambleLock::new();
        lock.engage(0.5, T0, Millis::from_mins(5));
        let later = EpochMillis(T0.0 + 60_000);
        lock.engage(2.5, later, Millis::from_mins(5));
        assert_eq!(lock.engaged_speed(), Some(2.5));
        assert_eq!(lock.ends_at(), Some(later + Millis::from_mins(5)));
    }

    #[test]
    fn expiry_is_lazy() {
        let mut lock = GambleLock::new();
        lock.engage(1.1, T0, Millis::SECOND);
        // Long past the end, but nothing has polled yet.
        assert!(lock.is_engaged());
        assert!(!lock.poll(EpochMillis(T0.0 + 10_000)).is_active());
        assert!(!lock.is_engaged());
    }
}
