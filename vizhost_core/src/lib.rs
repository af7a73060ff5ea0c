// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle host for interactive demos embedded in blog articles.
//!
//! `vizhost_core` drives small visualizations backed by compute kernels: it
//! builds the demo lazily when its container scrolls into view, pauses it when
//! it leaves, runs updates at a capped cadence and binds demo state to a
//! parameter panel. It is `no_std` compatible (with `alloc`); everything that
//! touches a real page sits behind the [`platform::Platform`] trait.
//!
//! # Architecture
//!
//! ```text
//!   Platform (frames, visibility, panel, scaffold)
//!       │
//!       ▼
//!   VisibilityGate ──► start()/stop() ──► VisualizationHost
//!                                              │
//!   FrameTick ──► FrameClock::accept() ──► on_update ──► on_change(compute)
//!                                              │
//!   PanelEdit ──► PanelBinding::apply() ───────┘
//! ```
//!
//! **[`host`]**: The [`VisualizationHost`](host::VisualizationHost) state
//! machine: scaffold, lazy construction, pause/resume, teardown.
//!
//! **[`cadence`]**: [`FrameClock`](cadence::FrameClock), the minimum-interval
//! gate over animation-frame timestamps.
//!
//! **[`visibility`]**: [`VisibilityGate`](visibility::VisibilityGate), which
//! turns intersection observations into start/stop transitions.
//!
//! **[`panel`]**: Two-way binding between demo state fields and a
//! [`ParameterPanel`](panel::ParameterPanel) widget.
//!
//! **[`compute`]**: Views over memory shared with a compute kernel, with
//! re-acquisition after memory growth.
//!
//! **[`bootstrap`]**: Mounting every placeholder on a page through a
//! registry of sample factories.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types.
//!
//! **[`time`]**, **[`timing`]**: Host time and frame ticks.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod bootstrap;
pub mod cadence;
pub mod compute;
pub mod error;
pub mod host;
pub mod options;
pub mod panel;
pub mod platform;
pub mod time;
pub mod timing;
pub mod trace;
pub mod visibility;

#[cfg(test)]
mod testing;
