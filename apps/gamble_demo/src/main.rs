// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated popup-and-page session that exercises the tracing pipeline.
//!
//! Plays a scripted session against two in-memory videos on a manual clock:
//! a preset, a typed-in speed, a gamble, blocked input while locked, a popup
//! reopened mid-gamble, and the resync after the countdown runs out. Events
//! go to both a [`PrettyPrintSink`] on stdout and a [`JsonLinesSink`] written
//! to `gamble_trace.jsonl`.

use std::fs::File;
use std::io::{BufWriter, Write};

use playrate_core::panel::PanelView;
use playrate_core::time::Millis;
use playrate_core::trace::{
    GambleExpiredEvent, GambleStartedEvent, InputRejectedEvent, PanelTransitionEvent,
    RequestEvent, SetSpeedIgnoredEvent, SpeedAppliedEvent, TraceSink,
};
use playrate_debug::json::JsonLinesSink;
use playrate_debug::pretty::PrettyPrintSink;
use playrate_harness::{Session, SessionConfig, VideoBank};

/// Forwards every event to two sinks.
#[derive(Debug)]
struct Tee<A, B>(A, B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_request(&mut self, e: &RequestEvent) {
        self.0.on_request(e);
        self.1.on_request(e);
    }

    fn on_speed_applied(&mut self, e: &SpeedAppliedEvent) {
        self.0.on_speed_applied(e);
        self.1.on_speed_applied(e);
    }

    fn on_set_speed_ignored(&mut self, e: &SetSpeedIgnoredEvent) {
        self.0.on_set_speed_ignored(e);
        self.1.on_set_speed_ignored(e);
    }

    fn on_gamble_started(&mut self, e: &GambleStartedEvent) {
        self.0.on_gamble_started(e);
        self.1.on_gamble_started(e);
    }

    fn on_gamble_expired(&mut self, e: &GambleExpiredEvent) {
        self.0.on_gamble_expired(e);
        self.1.on_gamble_expired(e);
    }

    fn on_panel_transition(&mut self, e: &PanelTransitionEvent) {
        self.0.on_panel_transition(e);
        self.1.on_panel_transition(e);
    }

    fn on_input_rejected(&mut self, e: &InputRejectedEvent) {
        self.0.on_input_rejected(e);
        self.1.on_input_rejected(e);
    }
}

type DemoSink = Tee<PrettyPrintSink, JsonLinesSink<BufWriter<File>>>;

fn main() {
    let path = "gamble_trace.jsonl";
    let file = File::create(path).expect("failed to create gamble_trace.jsonl");
    let sink = Tee(
        PrettyPrintSink::new(Box::new(std::io::stdout())),
        JsonLinesSink::new(BufWriter::new(file)),
    );

    let mut session = Session::with_sink(VideoBank::new(2), SessionConfig::default(), sink);

    session.open();
    show(&session, "opened");

    session.select_speed(1.5);
    show(&session, "picked 1.5x");

    if let Err(err) = session.enter_custom_speed("abc") {
        println!("-- rejected \"abc\": {err}");
    }
    session
        .enter_custom_speed("2.25")
        .expect("2.25 is a valid custom speed");
    show(&session, "typed 2.25");

    session.press_gamble();
    show(&session, "gambled");

    session.select_speed(0.5);
    show(&session, "tried 0.5x while locked");

    session.close();
    session.advance(Millis::from_secs(120));
    session.open();
    show(&session, "reopened two minutes later");

    session.advance_secs(u64::from(session.panel().remaining_secs()));
    show(&session, "countdown ran out");

    session.select_speed(1.0);
    show(&session, "back to normal");

    let Tee(_, json) = session.into_sink();
    let lines = json.lines();
    json.into_writer()
        .flush()
        .expect("failed to write gamble_trace.jsonl");
    println!("Wrote {path} ({lines} events)");
}

fn show(session: &Session<DemoSink>, step: &str) {
    let rates = session.videos().rates();
    match session.panel().view() {
        PanelView::NoVideos { title, .. } => println!("-- {step}: {title}"),
        PanelView::Controls(c) => {
            println!(
                "-- {step}: {} [{}] rates={rates:?}",
                c.speed_text, c.label
            );
            if let Some(timer) = c.timer_text {
                println!("   {timer} ({})", c.gamble_button_text);
            }
        }
    }
}
