// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Messages exchanged between the popup and the page.
//!
//! Every [`Request`] is answered by exactly one response of the matching kind.
//! On the wire requests are objects tagged by an `action` field and responses
//! are plain objects, both in camelCase:
//!
//! ```text
//! { "action": "setSpeed", "speed": 1.5 }   → { "success": true, "count": 2 }
//! { "action": "getSpeed" }                 → { "speed": 1.5, "count": 2, "gambleActive": false }
//! { "action": "startGamble" }              → { "success": true, "gambleSpeed": 2.13, "count": 2,
//!                                              "gambleActive": true, "gambleTimeRemaining": 300 }
//! ```

use serde::{Deserialize, Serialize};

/// A request from the popup to the page.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Set every video to `speed`, unless a gamble is locked.
    SetSpeed {
        /// Requested playback rate.
        speed: f64,
    },
    /// Report the current speed and gamble state.
    GetSpeed,
    /// Roll a random speed and lock it.
    StartGamble,
}

impl Request {
    /// Returns the kind of this request.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::SetSpeed { .. } => RequestKind::SetSpeed,
            Self::GetSpeed => RequestKind::GetSpeed,
            Self::StartGamble => RequestKind::StartGamble,
        }
    }
}

/// The kind of a [`Request`], used to pick the response type to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// [`Request::SetSpeed`].
    SetSpeed,
    /// [`Request::GetSpeed`].
    GetSpeed,
    /// [`Request::StartGamble`].
    StartGamble,
}

impl RequestKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetSpeed => "setSpeed",
            Self::GetSpeed => "getSpeed",
            Self::StartGamble => "startGamble",
        }
    }
}

/// Answer to [`Request::SetSpeed`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSpeedResponse {
    /// `true` unless the requested speed was unusable.
    ///
    /// A request ignored because of an active gamble still reports success.
    pub success: bool,
    /// Number of video elements in the document.
    pub count: u32,
}

/// Answer to [`Request::GetSpeed`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSpeedResponse {
    /// The locked speed during a gamble, otherwise the first video's rate
    /// (or 1.0 without videos).
    pub speed: f64,
    /// Number of video elements in the document.
    pub count: u32,
    /// Whether a gamble is locked.
    pub gamble_active: bool,
    /// Whole seconds left on the gamble. Present while locked and on the
    /// response that observed the expiry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamble_time_remaining: Option<u32>,
}

/// Answer to [`Request::StartGamble`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGambleResponse {
    /// Always `true`; the page never refuses a gamble.
    pub success: bool,
    /// The rolled speed.
    pub gamble_speed: f64,
    /// Number of video elements in the document.
    pub count: u32,
    /// Always `true` right after a roll.
    pub gamble_active: bool,
    /// Whole seconds the lock lasts.
    pub gamble_time_remaining: u32,
}

/// Any response.
///
/// Serializes as the inner object. Deserializing without knowing the request
/// kind tries the most specific shape first; prefer
/// [`RequestKind`]-directed decoding where the kind is known.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// See [`StartGambleResponse`].
    StartGamble(StartGambleResponse),
    /// See [`GetSpeedResponse`].
    GetSpeed(GetSpeedResponse),
    /// See [`SetSpeedResponse`].
    SetSpeed(SetSpeedResponse),
}

impl Response {
    /// Returns the kind of request this response answers.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::SetSpeed(_) => RequestKind::SetSpeed,
            Self::GetSpeed(_) => RequestKind::GetSpeed,
            Self::StartGamble(_) => RequestKind::StartGamble,
        }
    }

    /// Returns the number of videos the page reported.
    #[must_use]
    pub const fn count(&self) -> u32 {
        match self {
            Self::SetSpeed(r) => r.count,
            Self::GetSpeed(r) => r.count,
            Self::StartGamble(r) => r.count,
        }
    }
}

impl From<SetSpeedResponse> for Response {
    fn from(r: SetSpeedResponse) -> Self {
        Self::SetSpeed(r)
    }
}

impl From<GetSpeedResponse> for Response {
    fn from(r: GetSpeedResponse) -> Self {
        Self::GetSpeed(r)
    }
}

impl From<StartGambleResponse> for Response {
    fn from(r: StartGambleResponse) -> Self {
        Self::StartGamble(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_use_action_tag() {
        assert_eq!(
            serde_json::to_value(Request::SetSpeed { speed: 1.5 }).unwrap(),
            json!({ "action": "setSpeed", "speed": 1.5 })
        );
        assert_eq!(
            serde_json::to_value(Request::GetSpeed).unwrap(),
            json!({ "action": "getSpeed" })
        );
        assert_eq!(
            serde_json::to_value(Request::StartGamble).unwrap(),
            json!({ "action": "startGamble" })
        );
    }

    #[test]
    fn request_parses_from_page_message() {
        let req: Request =
            serde_json::from_value(json!({ "action": "setSpeed", "speed": 2 })).unwrap();
        assert_eq!(req, Request::SetSpeed { speed: 2.0 });
        assert_eq!(req.kind().as_str(), "setSpeed");
    }

    #[test]
    fn unknown_action_is_rejected() {
        let res = serde_json::from_value::<Request>(json!({ "action": "reload" }));
        assert!(res.is_err(), "unknown actions must not decode");
    }

    #[test]
    fn get_speed_omits_remaining_when_absent() {
        let idle = GetSpeedResponse {
            speed: 1.0,
            count: 0,
            gamble_active: false,
            gamble_time_remaining: None,
        };
        assert_eq!(
            serde_json::to_value(idle).unwrap(),
            json!({ "speed": 1.0, "count": 0, "gambleActive": false })
        );

        let locked: GetSpeedResponse = serde_json::from_value(json!({
            "speed": 2.13, "count": 1, "gambleActive": true, "gambleTimeRemaining": 12
        }))
        .unwrap();
        assert_eq!(locked.gamble_time_remaining, Some(12));
    }

    #[test]
    fn untagged_response_picks_matching_shape() {
        let r: Response = serde_json::from_value(json!({ "success": true, "count": 2 })).unwrap();
        assert_eq!(r.kind(), RequestKind::SetSpeed);

        let r: Response =
            serde_json::from_value(json!({ "speed": 1.0, "count": 2, "gambleActive": false }))
                .unwrap();
        assert_eq!(r.kind(), RequestKind::GetSpeed);

        let r: Response = serde_json::from_value(json!({
            "success": true,
            "gambleSpeed": 0.83,
            "count": 3,
            "gambleActive": true,
            "gambleTimeRemaining": 300
        }))
        .unwrap();
        assert_eq!(r.kind(), RequestKind::StartGamble);
        assert_eq!(r.count(), 3);
    }
}
