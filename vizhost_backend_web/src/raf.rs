// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame loop.
//!
//! [`RafLoop`] drives a [`FrameTick`]-based loop using the browser's
//! `requestAnimationFrame` API. Each callback receives a
//! [`DOMHighResTimeStamp`][mdn] (milliseconds from `performance.now()`),
//! which is converted to microsecond [`HostTime`] ticks.
//!
//! The next frame is requested before the callback runs, so a callback that
//! fails (or traps and is caught by the page) never ends the chain.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp
//! [`FrameTick`]: vizhost_core::timing::FrameTick
//! [`HostTime`]: vizhost_core::time::HostTime

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use vizhost_core::platform::{FrameCallback, FrameLoop};
use vizhost_core::timing::{FrameTick, TimingConfidence};

// Direct global bindings instead of `web_sys::Window` methods: no Window
// lookup (and no fallible unwrapping) on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// A `requestAnimationFrame` loop that emits [`FrameTick`] events.
///
/// Create with [`RafLoop::new`], then call [`start`](FrameLoop::start) to
/// begin receiving callbacks. The loop re-registers itself each frame until
/// it is stopped or dropped.
///
/// [`FrameTick`]: vizhost_core::timing::FrameTick
pub struct RafLoop {
    inner: Rc<RafInner>,
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Stored in its own `RefCell` so it can be referenced from inside itself
    /// without conflicting with `callback`.
    closure: RefCell<Option<RafClosure>>,

    /// Receives the ticks.
    callback: RefCell<FrameCallback>,

    /// Becomes `FrameTick::frame_index`.
    frame_counter: Cell<u64>,

    running: Cell<bool>,

    /// The most recent `requestAnimationFrame` id, for cancelling.
    raf_id: Cell<i32>,
}

impl RafInner {
    fn request(&self) {
        if let Some(ref closure) = *self.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.raf_id.set(id);
        }
    }
}

impl RafLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(FrameTick) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    fn ensure_closure(&self) {
        if self.inner.closure.borrow().is_some() {
            return;
        }
        // Weak: the closure lives inside `inner`, a strong reference would
        // keep both alive forever.
        let weak = Rc::downgrade(&self.inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.running.get() {
                return;
            }

            // Always re-register first.
            inner.request();

            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "rAF timestamp is a small positive f64; µs fits in u64"
            )]
            let now = vizhost_core::time::HostTime((timestamp_ms * 1000.0) as u64);

            let frame_index = inner.frame_counter.get();
            inner.frame_counter.set(frame_index + 1);

            let tick = FrameTick {
                now,
                frame_index,
                confidence: TimingConfidence::PacingOnly,
            };
            // A callback that stops its own loop from inside the tick would
            // find `callback` borrowed; skip rather than panic.
            if let Ok(mut callback) = inner.callback.try_borrow_mut() {
                callback(tick);
            }
        }) as Box<dyn FnMut(f64)>);
        *self.inner.closure.borrow_mut() = Some(closure);
    }
}

impl FrameLoop for RafLoop {
    /// Starts the loop. No-op if already running.
    fn start(&mut self) {
        if self.inner.running.get() {
            return;
        }
        self.ensure_closure();
        self.inner.running.set(true);
        self.inner.request();
    }

    /// Stops the loop and cancels the pending frame. Can be restarted.
    fn stop(&mut self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish()
    }
}
