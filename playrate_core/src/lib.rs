// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gamble lock, request protocol, and control panel state machine for video
//! playback-rate control.
//!
//! `playrate_core` holds everything that does not touch a browser: the
//! page-side controller that owns the gamble lock, the typed request/response
//! protocol spoken between the page and the popup, and the popup-side state
//! machine that mirrors the lock with a local countdown. It is `no_std`
//! compatible (with `alloc`).
//!
//! # Architecture
//!
//! Two single-threaded contexts exchange short-lived messages:
//!
//! ```text
//!   ControlPanel (popup)                         PageController (page)
//!       │                                              │
//!       │ PanelCommand::Send(Request) ───────────────► │ handle(PageContext, Request)
//!       │                                              │   ├─ GambleLock::poll (lazy expiry)
//!       │                                              │   └─ VideoSet::set_all_rates
//!       │ ◄──────────────────────────────── Response   │
//!       ▼                                              │
//!   on_response() ──► PanelCommand::StartCountdown     │
//!       │                                              │
//!   tick() once per second ... Locked → Idle ──► Send(GetSpeed)
//! ```
//!
//! **[`controller`]**: [`PageController`](controller::PageController) owns the
//! [`GambleLock`](lock::GambleLock) and answers the three request kinds.
//!
//! **[`lock`]**: The gamble lock and its lazy expiry, plus the random speed
//! roll.
//!
//! **[`protocol`]**: Wire types: [`Request`](protocol::Request) and the three
//! response structs, serialized with `serde` in camelCase.
//!
//! **[`panel`]**: [`ControlPanel`](panel::ControlPanel), an I/O-free state
//! machine that returns [`PanelCommand`](panel::PanelCommand)s for its host to
//! execute, and a [`PanelView`](panel::PanelView) for rendering.
//!
//! **[`label`]**: Preset matching and countdown formatting.
//!
//! **[`video`]**: The [`VideoSet`](video::VideoSet) trait that backends
//! implement over live video elements.
//!
//! **[`random`]**: The [`RandomSource`](random::RandomSource) trait and a
//! deterministic [`Lcg`](random::Lcg).
//!
//! **[`time`]**: Wall-clock timestamps and millisecond durations.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod controller;
pub mod label;
pub mod lock;
pub mod panel;
pub mod protocol;
pub mod random;
pub mod time;
pub mod trace;
pub mod video;
