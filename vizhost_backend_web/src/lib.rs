// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for vizhost.
//!
//! This crate implements the platform traits of `vizhost_core` with browser
//! APIs:
//!
//! - [`WebPlatform`]: DOM scaffold plus the pieces below, for one container
//! - [`RafLoop`]: `requestAnimationFrame` frame loop (pacing-only timing)
//! - [`IntersectionWatch`]: `IntersectionObserver` visibility watch
//! - [`DomPane`]: parameter panel made of native form inputs
//! - [`PixelView`]: zero-copy `ImageData` over wasm memory
//! - [`ConsoleSink`]: trace sink writing to the browser console
//! - [`mount`]: bootstrap over `div[data-sample]` placeholders

#![no_std]

extern crate alloc;

mod console;
mod memory;
mod mount;
mod pane;
mod pointer;
mod raf;
mod scaffold;
mod visibility;

pub use console::ConsoleSink;
pub use memory::{ImageSize, PixelView};
pub use mount::{DomPlaceholder, PLACEHOLDER_SELECTOR, mount, placeholders};
pub use pane::DomPane;
pub use pointer::{normalize, pointer_position};
pub use raf::RafLoop;
pub use scaffold::{CREATED_ATTRIBUTE, WebPlatform};
pub use visibility::IntersectionWatch;

use vizhost_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = raf::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}
