// Copyright 2026 the Playrate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setInterval` tick source.
//!
//! [`IntervalLoop`] calls a closure every period until stopped. The popup uses
//! one to drive the gamble countdown.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use playrate_core::time::Millis;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setInterval")]
    fn set_interval(callback: &JsValue, delay_ms: u32) -> i32;

    #[wasm_bindgen(js_name = "clearInterval")]
    fn clear_interval(id: i32);
}

/// A `setInterval` loop.
///
/// Create with [`IntervalLoop::new`], then call [`start`](Self::start).
/// Dropping the loop cancels it.
///
/// [`stop`](Self::stop) may be called from inside the callback; dropping the
/// loop from inside its own callback may not, since that would free the
/// closure that is executing.
pub struct IntervalLoop {
    inner: Rc<IntervalInner>,
}

type IntervalClosure = Closure<dyn FnMut()>;

struct IntervalInner {
    /// The JS closure registered with `setInterval`.
    closure: RefCell<Option<IntervalClosure>>,

    /// The user-supplied callback.
    callback: RefCell<Box<dyn FnMut()>>,

    period: Millis,

    /// Number of callbacks delivered so far.
    ticks: Cell<u64>,

    running: Cell<bool>,

    /// The ID returned by `setInterval`, for `clearInterval`.
    interval_id: Cell<i32>,
}

impl IntervalLoop {
    /// Creates a loop that is **not yet running** and will call `callback`
    /// every `period`.
    pub fn new(callback: impl FnMut() + 'static, period: Millis) -> Self {
        Self {
            inner: Rc::new(IntervalInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                period,
                ticks: Cell::new(0),
                running: Cell::new(false),
                interval_id: Cell::new(0),
            }),
        }
    }

    /// Starts the loop. If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move || {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }
                inner.ticks.set(inner.ticks.get() + 1);
                inner.callback.borrow_mut()();
            }) as Box<dyn FnMut()>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        let delay = u32::try_from(self.inner.period.millis()).unwrap_or(u32::MAX);
        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = set_interval(closure.as_ref().unchecked_ref(), delay);
            self.inner.interval_id.set(id);
        }
    }

    /// Stops the loop. Can be restarted with [`start`](Self::start).
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        clear_interval(self.inner.interval_id.get());
    }

    /// Returns `true` if the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Returns the number of callbacks delivered so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.inner.ticks.get()
    }
}

impl Drop for IntervalLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for IntervalLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntervalLoop")
            .field("running", &self.inner.running.get())
            .field("period", &self.inner.period)
            .field("ticks", &self.inner.ticks.get())
            .finish()
    }
}
