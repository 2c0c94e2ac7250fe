// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Speed labels and countdown text.

use alloc::string::String;
use core::fmt;

/// The preset speeds offered as buttons, in display order.
pub const SPEED_PRESETS: [f64; 10] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0, 2.5, 3.0];

/// How close a speed must be to a preset to count as that preset.
pub const PRESET_TOLERANCE: f64 = 0.001;

/// The label shown next to the current speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpeedLabel {
    /// The speed matches a preset; displays as e.g. `1.25x` or `1x`.
    Preset(f64),
    /// The speed matches no preset.
    Custom,
    /// A gamble is locked.
    Gamble,
}

impl SpeedLabel {
    /// Derives the label for `speed`.
    ///
    /// While `gambling` the label is always [`SpeedLabel::Gamble`]. Otherwise
    /// the first preset within `tolerance` wins.
    #[must_use]
    pub fn derive(speed: f64, presets: &[f64], tolerance: f64, gambling: bool) -> Self {
        if gambling {
            return Self::Gamble;
        }
        match matching_preset(speed, presets, tolerance) {
            Some(idx) => Self::Preset(presets[idx]),
            None => Self::Custom,
        }
    }
}

impl fmt::Display for SpeedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(p) => write!(f, "{p}x"),
            Self::Custom => f.write_str("Custom"),
            Self::Gamble => f.write_str("Gamble"),
        }
    }
}

/// Returns the index of the first preset within `tolerance` of `speed`.
#[must_use]
pub fn matching_preset(speed: f64, presets: &[f64], tolerance: f64) -> Option<usize> {
    presets.iter().position(|&p| {
        let d = p - speed;
        d < tolerance && d > -tolerance
    })
}

/// Formats whole seconds as `m:ss`.
#[must_use]
pub fn format_countdown(secs: u32) -> String {
    alloc::format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;

    fn label(speed: f64, gambling: bool) -> String {
        SpeedLabel::derive(speed, &SPEED_PRESETS, PRESET_TOLERANCE, gambling).to_string()
    }

    #[test]
    fn preset_speed_uses_preset_label() {
        assert_eq!(label(1.25, false), "1.25x");
        assert_eq!(label(0.25, false), "0.25x");
        assert_eq!(label(2.5, false), "2.5x");
    }

    #[test]
    fn whole_presets_print_without_decimals() {
        assert_eq!(label(1.0, false), "1x");
        assert_eq!(label(3.0, false), "3x");
    }

    #[test]
    fn near_preset_matches_within_tolerance() {
        assert_eq!(label(1.5004, false), "1.5x");
        assert_eq!(label(1.502, false), "Custom");
    }

    #[test]
    fn off_preset_speed_is_custom() {
        assert_eq!(label(1.2345, false), "Custom");
        assert_eq!(label(16.0, false), "Custom");
    }

    #[test]
    fn gamble_overrides_numeric_match() {
        assert_eq!(label(1.25, true), "Gamble");
        assert_eq!(label(1.2345, true), "Gamble");
    }

    #[test]
    fn countdown_is_minutes_and_padded_seconds() {
        assert_eq!(format_countdown(300), "5:00");
        assert_eq!(format_countdown(299), "4:59");
        assert_eq!(format_countdown(61), "1:01");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn matching_preset_returns_index() {
        assert_eq!(matching_preset(2.0, &SPEED_PRESETS, PRESET_TOLERANCE), Some(7));
        assert_eq!(matching_preset(2.2, &SPEED_PRESETS, PRESET_TOLERANCE), None);
    }
}
