// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform capabilities a host is built on.
//!
//! A [`Platform`] stands for one demo container on one page. It inserts the
//! scaffold (content area plus panel area), builds the parameter panel,
//! provides a frame loop and a visibility watch for the container, and runs
//! local futures. The browser implementation lives in
//! `vizhost_backend_web`; tests use an in-memory fake.

use alloc::boxed::Box;
use core::future::Future;
use core::pin::Pin;

use crate::error::HostError;
use crate::panel::ParameterPanel;
use crate::time::Timebase;
use crate::timing::FrameTick;
use crate::visibility::VisibilityObservation;

/// Called once per animation frame.
pub type FrameCallback = Box<dyn FnMut(FrameTick)>;

/// Called whenever the container's intersection with the viewport changes.
pub type VisibilityCallback = Box<dyn FnMut(VisibilityObservation)>;

/// A future run on the page's single thread.
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// A self-rescheduling animation-frame chain.
///
/// While running, the loop requests the next frame *before* invoking its
/// callback, so a failing callback never ends the chain.
pub trait FrameLoop {
    /// Starts requesting frames. No-op if already running.
    fn start(&mut self);

    /// Cancels the pending frame request. No-op if not running.
    fn stop(&mut self);

    /// Whether a frame request is outstanding.
    fn is_running(&self) -> bool;
}

/// Everything a host needs from its environment.
pub trait Platform {
    /// Handle to the content area demos draw into.
    type Content: 'static;
    /// The parameter panel widget.
    type Panel: ParameterPanel + 'static;
    /// The frame loop.
    type Frames: FrameLoop + 'static;
    /// Keeps the visibility watch alive; dropping it ends the watch.
    type Watch: 'static;

    /// Whether the container already carries a scaffold.
    fn is_scaffolded(&self) -> bool;

    /// Inserts the scaffold and marks the container, returning the content
    /// area.
    fn insert_scaffold(&mut self, title: &str) -> Result<Self::Content, HostError>;

    /// Builds the parameter panel inside the scaffold.
    fn build_panel(&mut self, title: &str) -> Result<Self::Panel, HostError>;

    /// Removes the scaffold and the marker.
    fn clear_scaffold(&mut self);

    /// Timebase of the timestamps delivered to frame callbacks.
    fn timebase(&self) -> Timebase;

    /// Creates a stopped frame loop driving `callback`.
    fn frame_loop(&mut self, callback: FrameCallback) -> Self::Frames;

    /// Starts watching the container's visibility, treating anything within
    /// `margin_px` of the viewport as visible.
    fn watch_visibility(
        &mut self,
        margin_px: u32,
        callback: VisibilityCallback,
    ) -> Result<Self::Watch, HostError>;

    /// Runs `task` to completion on the local executor.
    fn spawn_local(&self, task: LocalTask);
}
