// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blog demos mounted with vizhost.
//!
//! On load, every `div[data-sample]` in the document body gets the demo its
//! `data-sample` names:
//!
//! - `Stars`: [`stars`], a star field and planet, needs `data-planet`
//! - `Roads`: [`roads`], a keyboard-driven road, needs `data-bg` and
//!   `data-tree`
//! - `Plasma`: [`plasma`], palette-cycling plasma
//! - `firestate`: [`fire`], doom fire seeded by the pointer
//! - `Angles`: [`angles`], an SVG angle dial
//!
//! Image attributes are URLs; every placeholder on the page shares one
//! [`BitmapCache`](bitmap::BitmapCache), so each image is fetched once.
//!
//! Placeholders without the attribute ask for `fire`, which is not
//! registered, so they show `unknown` like any other unrecognized kind.
//!
//! Build with: `wasm-pack build --target web demos/blog_samples`

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use vizhost_backend_web::{ConsoleSink, DomPlaceholder};
use vizhost_core::bootstrap::SampleRegistry;

use crate::bitmap::BitmapCache;

pub mod angles;
pub mod bitmap;
pub mod fire;
mod page;
pub mod pixels;
pub mod plasma;
pub mod random;
pub mod roads;
pub mod stars;

/// One console sink shared by every host on the page.
pub type SharedTrace = Rc<RefCell<ConsoleSink>>;

/// Kind assumed when `data-sample` is missing.
pub const DEFAULT_SAMPLE: &str = "fire";

/// The registry of every demo on the blog.
#[must_use]
pub fn registry(trace: &SharedTrace) -> SampleRegistry<DomPlaceholder> {
    let mut registry = SampleRegistry::<DomPlaceholder>::new();
    let bitmaps = BitmapCache::new();
    let (b, t) = (bitmaps.clone(), Rc::clone(trace));
    registry.register(stars::KIND, move |p| stars::mount(p, &b, &t));
    let (b, t) = (bitmaps, Rc::clone(trace));
    registry.register(roads::KIND, move |p| roads::mount(p, &b, &t));
    let t = Rc::clone(trace);
    registry.register(plasma::KIND, move |p| plasma::mount(p, &t));
    let t = Rc::clone(trace);
    registry.register(fire::KIND, move |p| fire::mount(p, &t));
    let t = Rc::clone(trace);
    registry.register(angles::KIND, move |p| angles::mount(p, &t));
    registry.set_default_kind(DEFAULT_SAMPLE);
    registry
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let trace: SharedTrace = Rc::new(RefCell::new(ConsoleSink::new()));
    let registry = registry(&trace);
    // Hosts keep themselves alive through their visibility watch.
    vizhost_backend_web::mount(&body, &registry, &mut Rc::clone(&trace))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(())
}
