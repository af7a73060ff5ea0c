// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` visibility watch.

use alloc::boxed::Box;
use alloc::format;
use core::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use vizhost_core::error::HostError;
use vizhost_core::platform::VisibilityCallback;
use vizhost_core::visibility::VisibilityObservation;

type ObserverClosure = Closure<dyn FnMut(Array, JsValue)>;

/// Reports intersection changes of one element.
///
/// Uses threshold 0 ("any overlap") and a root margin so elements just outside
/// the viewport already count as visible. The element may be observed before
/// it is attached to the document. Dropping the watch disconnects the
/// observer.
pub struct IntersectionWatch {
    observer: IntersectionObserver,
    _closure: ObserverClosure,
}

impl IntersectionWatch {
    /// Starts observing `target`.
    pub fn new(
        target: &Element,
        margin_px: u32,
        callback: VisibilityCallback,
    ) -> Result<Self, HostError> {
        let callback = RefCell::new(callback);
        let closure = Closure::wrap(Box::new(move |entries: Array, _observer: JsValue| {
            let Ok(mut callback) = callback.try_borrow_mut() else {
                return;
            };
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                callback(VisibilityObservation::new(entry.intersection_ratio()));
            }
        }) as Box<dyn FnMut(Array, JsValue)>);

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&format!("{margin_px}px"));
        init.set_threshold(&JsValue::from_f64(0.0));
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
                .map_err(|e| HostError::Visibility(format!("{e:?}")))?;
        observer.observe(target);
        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for IntersectionWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl core::fmt::Debug for IntersectionWatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IntersectionWatch").finish_non_exhaustive()
    }
}
