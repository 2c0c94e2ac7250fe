// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Popup entry point.
//!
//! Builds the control surface into the popup document, feeds user input and
//! page responses to a [`ControlPanel`], executes the commands it returns,
//! and re-renders from [`ControlPanel::view`] after every change.
//!
//! Build with: `wasm-pack build --target web apps/popup --out-dir
//! ../../extension/pkg/popup`.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::ToString as _;
use alloc::vec::Vec;
use core::cell::RefCell;

use playrate_backend_web::{ConsoleSink, IntervalLoop, messaging};
use playrate_core::panel::{
    CUSTOM_PLACEHOLDER, ControlPanel, ControlsView, HEADING, GAMBLE_ALERT_TITLE, PanelCommand,
    PanelConfig, PanelPhase, PanelView,
};
use playrate_core::protocol::Response;
use playrate_core::time::Millis;
use playrate_core::trace::{InputRejectedEvent, PanelTransitionEvent, Tracer};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlButtonElement, HtmlElement, HtmlInputElement, KeyboardEvent};

const PRESET_CSS: &str = "border: 1px solid #c9d3e0; border-radius: 6px; padding: 6px 0; background: #f5f8fc; color: #1d2b3a; cursor: pointer;";
const PRESET_ACTIVE_CSS: &str = "border: 1px solid #2b6cb0; border-radius: 6px; padding: 6px 0; background: #2b6cb0; color: #ffffff; font-weight: 600; cursor: pointer;";
const GAMBLE_CSS: &str = "width: 100%; border: 0; border-radius: 8px; padding: 10px 0; background: linear-gradient(90deg, #d53f8c, #dd6b20); color: #ffffff; font-weight: 700; cursor: pointer;";
const GAMBLE_LOCKED_CSS: &str = "width: 100%; border: 0; border-radius: 8px; padding: 10px 0; background: #a0aec0; color: #ffffff; font-weight: 700; cursor: not-allowed;";

struct PopupUi {
    notice: HtmlElement,
    notice_title: HtmlElement,
    notice_hint: HtmlElement,
    controls: HtmlElement,
    video_count: HtmlElement,
    speed: HtmlElement,
    label: HtmlElement,
    gamble_alert: HtmlElement,
    gamble_info: HtmlElement,
    presets: Vec<HtmlButtonElement>,
    slider: HtmlInputElement,
    custom: HtmlInputElement,
    apply: HtmlButtonElement,
    gamble: HtmlButtonElement,
    timer: HtmlElement,
}

struct PopupState {
    panel: ControlPanel,
    ui: PopupUi,
    countdown: Option<IntervalLoop>,
    sink: ConsoleSink,
}

/// Entry point for the popup.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("popup has no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("popup has no body"))?;

    let config = PanelConfig::standard();
    let ui = build_ui(&document, &body, &config)?;
    let state = Rc::new(RefCell::new(PopupState {
        panel: ControlPanel::new(config),
        ui,
        countdown: None,
        sink: ConsoleSink::new("popup"),
    }));

    bind_controls(&state)?;
    render(&state.borrow());

    let cmds = state.borrow_mut().panel.open();
    execute(&state, cmds);
    Ok(())
}

fn build_ui(
    doc: &Document,
    body: &HtmlElement,
    config: &PanelConfig,
) -> Result<PopupUi, JsValue> {
    let shell = element(doc, "main")?;
    style(
        &shell,
        "width: 300px; padding: 14px 16px; display: grid; gap: 10px; font: 13px/1.4 system-ui, sans-serif; color: #1d2b3a;",
    )?;
    body.append_child(&shell)?;

    let heading = element(doc, "h1")?;
    style(&heading, "margin: 0; font-size: 16px;")?;
    heading.set_text_content(Some(HEADING));
    shell.append_child(&heading)?;

    let notice = element(doc, "section")?;
    notice.set_hidden(true);
    let notice_title = element(doc, "p")?;
    style(&notice_title, "margin: 0; font-weight: 600;")?;
    let notice_hint = element(doc, "p")?;
    style(&notice_hint, "margin: 4px 0 0; color: #5a6b7d;")?;
    notice.append_child(&notice_title)?;
    notice.append_child(&notice_hint)?;
    shell.append_child(&notice)?;

    let controls = element(doc, "section")?;
    style(&controls, "display: grid; gap: 10px;")?;
    controls.set_hidden(true);
    shell.append_child(&controls)?;

    let video_count = element(doc, "div")?;
    style(&video_count, "color: #5a6b7d;")?;
    controls.append_child(&video_count)?;

    let speed_row = element(doc, "div")?;
    style(
        &speed_row,
        "display: flex; justify-content: space-between; align-items: center;",
    )?;
    let speed = element(doc, "span")?;
    style(&speed, "font-size: 15px; font-weight: 600;")?;
    let label = element(doc, "span")?;
    style(
        &label,
        "padding: 2px 8px; border-radius: 999px; background: #e6eef8; font-size: 12px;",
    )?;
    speed_row.append_child(&speed)?;
    speed_row.append_child(&label)?;
    controls.append_child(&speed_row)?;

    let gamble_alert = element(doc, "div")?;
    style(
        &gamble_alert,
        "padding: 8px 10px; border-radius: 8px; background: #fff5f7; border: 1px solid #d53f8c;",
    )?;
    gamble_alert.set_hidden(true);
    let alert_title = element(doc, "div")?;
    style(&alert_title, "font-weight: 700; color: #b83280;")?;
    alert_title.set_text_content(Some(GAMBLE_ALERT_TITLE));
    let gamble_info = element(doc, "div")?;
    gamble_alert.append_child(&alert_title)?;
    gamble_alert.append_child(&gamble_info)?;
    controls.append_child(&gamble_alert)?;

    let grid = element(doc, "div")?;
    style(
        &grid,
        "display: grid; grid-template-columns: repeat(5, 1fr); gap: 6px;",
    )?;
    let mut presets = Vec::with_capacity(config.presets.len());
    for preset in config.presets {
        let button: HtmlButtonElement = doc.create_element("button")?.unchecked_into();
        button.set_text_content(Some(&format!("{preset}x")));
        style(&button, PRESET_CSS)?;
        grid.append_child(&button)?;
        presets.push(button);
    }
    controls.append_child(&grid)?;

    let slider: HtmlInputElement = doc.create_element("input")?.unchecked_into();
    slider.set_type("range");
    slider.set_min(&config.slider.min.to_string());
    slider.set_max(&config.slider.max.to_string());
    slider.set_step(&config.slider.step.to_string());
    style(&slider, "width: 100%;")?;
    controls.append_child(&slider)?;

    let custom_row = element(doc, "div")?;
    style(&custom_row, "display: flex; gap: 6px;")?;
    let custom: HtmlInputElement = doc.create_element("input")?.unchecked_into();
    custom.set_type("text");
    custom.set_placeholder(CUSTOM_PLACEHOLDER);
    style(
        &custom,
        "flex: 1; padding: 6px 8px; border: 1px solid #c9d3e0; border-radius: 6px;",
    )?;
    let apply: HtmlButtonElement = doc.create_element("button")?.unchecked_into();
    apply.set_text_content(Some("Apply"));
    style(
        &apply,
        "padding: 6px 12px; border: 0; border-radius: 6px; background: #2b6cb0; color: #ffffff; cursor: pointer;",
    )?;
    custom_row.append_child(&custom)?;
    custom_row.append_child(&apply)?;
    controls.append_child(&custom_row)?;

    let gamble: HtmlButtonElement = doc.create_element("button")?.unchecked_into();
    style(&gamble, GAMBLE_CSS)?;
    controls.append_child(&gamble)?;

    let timer = element(doc, "div")?;
    style(&timer, "text-align: center; color: #b83280; font-weight: 600;")?;
    timer.set_hidden(true);
    controls.append_child(&timer)?;

    Ok(PopupUi {
        notice,
        notice_title,
        notice_hint,
        controls,
        video_count,
        speed,
        label,
        gamble_alert,
        gamble_info,
        presets,
        slider,
        custom,
        apply,
        gamble,
        timer,
    })
}

fn bind_controls(state: &Rc<RefCell<PopupState>>) -> Result<(), JsValue> {
    let presets: Vec<(HtmlButtonElement, f64)> = {
        let s = state.borrow();
        s.ui.presets
            .iter()
            .cloned()
            .zip(s.panel.config().presets.iter().copied())
            .collect()
    };
    for (button, preset) in presets {
        let preset_state = Rc::clone(state);
        on(&button, "click", move |_event: Event| {
            let cmds = preset_state.borrow_mut().panel.select_speed(preset);
            render(&preset_state.borrow());
            execute(&preset_state, cmds);
        })?;
    }

    let slider_state = Rc::clone(state);
    let slider = state.borrow().ui.slider.clone();
    on(&slider, "input", move |_event: Event| {
        let value = slider_state.borrow().ui.slider.value_as_number();
        let cmds = slider_state.borrow_mut().panel.select_speed(value);
        render(&slider_state.borrow());
        execute(&slider_state, cmds);
    })?;

    let apply_state = Rc::clone(state);
    let apply = state.borrow().ui.apply.clone();
    on(&apply, "click", move |_event: Event| apply_custom(&apply_state))?;

    let enter_state = Rc::clone(state);
    let custom = state.borrow().ui.custom.clone();
    on(&custom, "keydown", move |event: Event| {
        if event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|k| k.key() == "Enter")
        {
            apply_custom(&enter_state);
        }
    })?;

    let gamble_state = Rc::clone(state);
    let gamble = state.borrow().ui.gamble.clone();
    on(&gamble, "click", move |_event: Event| {
        let cmds = gamble_state.borrow_mut().panel.start_gamble();
        execute(&gamble_state, cmds);
    })?;

    Ok(())
}

fn apply_custom(state: &Rc<RefCell<PopupState>>) {
    let cmds = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let text = s.ui.custom.value();
        s.panel.set_custom_input(&text);
        match s.panel.apply_custom_input() {
            Ok(cmds) => {
                s.ui.custom.set_value(s.panel.custom_input());
                render(s);
                cmds
            }
            Err(reason) => {
                Tracer::new(&mut s.sink).input_rejected(&InputRejectedEvent { reason });
                return;
            }
        }
    };
    execute(state, cmds);
}

fn on_response(state: &Rc<RefCell<PopupState>>, response: Response) {
    let cmds = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let before = s.panel.phase();
        let cmds = s.panel.on_response(response);
        trace_transition(s, before);
        render(s);
        cmds
    };
    execute(state, cmds);
}

fn on_tick(state: &Rc<RefCell<PopupState>>) {
    let cmds = {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let before = s.panel.phase();
        let cmds = s.panel.tick();
        trace_transition(s, before);
        render(s);
        cmds
    };
    execute(state, cmds);
}

fn trace_transition(s: &mut PopupState, before: PanelPhase) {
    let after = s.panel.phase();
    if before.is_locked() != after.is_locked() {
        Tracer::new(&mut s.sink).panel_transition(&PanelTransitionEvent {
            from: before,
            to: after,
        });
    }
}

/// Carries out panel commands. Must be called without a borrow of `state`.
fn execute(state: &Rc<RefCell<PopupState>>, cmds: Vec<PanelCommand>) {
    for cmd in cmds {
        match cmd {
            PanelCommand::Send(request) => {
                let reply_state = Rc::clone(state);
                let sent = messaging::send_to_active_tab(request, move |response| {
                    on_response(&reply_state, response);
                });
                if let Err(err) = sent {
                    web_sys::console::warn_1(&err);
                }
            }
            PanelCommand::StartCountdown { period } => {
                let countdown = start_countdown(Rc::downgrade(state), period);
                // The replaced loop is dropped after the borrow ends.
                let old = state.borrow_mut().countdown.replace(countdown);
                drop(old);
            }
            PanelCommand::StopCountdown => {
                // Only stopped here: this may run inside the loop's own
                // callback, which must not free its closure.
                if let Some(countdown) = &state.borrow().countdown {
                    countdown.stop();
                }
            }
        }
    }
}

fn start_countdown(state: Weak<RefCell<PopupState>>, period: Millis) -> IntervalLoop {
    let countdown = IntervalLoop::new(
        move || {
            if let Some(state) = state.upgrade() {
                on_tick(&state);
            }
        },
        period,
    );
    countdown.start();
    countdown
}

fn render(s: &PopupState) {
    let ui = &s.ui;
    match s.panel.view() {
        PanelView::NoVideos { title, hint } => {
            ui.controls.set_hidden(true);
            ui.notice.set_hidden(false);
            ui.notice_title.set_text_content(Some(title));
            ui.notice_hint.set_text_content(Some(hint));
        }
        PanelView::Controls(view) => {
            ui.notice.set_hidden(true);
            ui.controls.set_hidden(false);
            render_controls(ui, &view);
        }
    }
}

fn render_controls(ui: &PopupUi, view: &ControlsView) {
    ui.video_count.set_text_content(Some(&view.video_count_text));
    ui.speed.set_text_content(Some(&view.speed_text));
    ui.label.set_text_content(Some(&view.label.to_string()));

    ui.gamble_alert.set_hidden(view.gamble_info.is_none());
    ui.gamble_info.set_text_content(view.gamble_info.as_deref());
    ui.timer.set_hidden(view.timer_text.is_none());
    ui.timer.set_text_content(view.timer_text.as_deref());

    for (i, button) in ui.presets.iter().enumerate() {
        let css = if view.active_preset == Some(i) {
            PRESET_ACTIVE_CSS
        } else {
            PRESET_CSS
        };
        // Styling failures only affect looks.
        let _ = style(button, css);
        button.set_disabled(!view.inputs_enabled);
    }

    ui.slider.set_value_as_number(view.slider_value);
    ui.slider.set_disabled(!view.inputs_enabled);
    ui.custom.set_disabled(!view.inputs_enabled);
    ui.apply.set_disabled(!view.inputs_enabled);

    ui.gamble.set_text_content(Some(view.gamble_button_text));
    ui.gamble.set_disabled(!view.inputs_enabled);
    let _ = style(
        &ui.gamble,
        if view.inputs_enabled {
            GAMBLE_CSS
        } else {
            GAMBLE_LOCKED_CSS
        },
    );
}

fn on(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn element(doc: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(doc.create_element(tag)?.unchecked_into())
}

fn style(el: &web_sys::Element, css: &str) -> Result<(), JsValue> {
    el.set_attribute("style", css)
}
