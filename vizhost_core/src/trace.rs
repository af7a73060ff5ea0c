// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for hosts and page bootstrap.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! host and the bootstrap call as things happen. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! A sink is usually shared by every host on a page: `Rc<RefCell<S>>`
//! implements [`TraceSink`] whenever `S` does.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::error::HostError;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A lifecycle transition of one host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// Scaffold inserted and visibility watch attached.
    Scaffolded,
    /// Demo state built; the host is active.
    Constructed,
    /// Work paused (left the viewport, or the pause toggle).
    Paused,
    /// Work resumed.
    Resumed,
    /// The frame chain was cancelled while paused.
    Suspended,
    /// Host torn down.
    Disposed,
}

/// What happened to one placeholder during bootstrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MountOutcome {
    /// A host was built and created.
    Mounted,
    /// No factory is registered for the kind; the fallback text was shown.
    Unknown,
    /// The factory failed; the placeholder was left alone.
    Failed,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted on every lifecycle transition.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent<'a> {
    /// Title of the host.
    pub title: &'a str,
    /// Which transition.
    pub kind: LifecycleKind,
}

/// Emitted for every frame the cadence gate accepted.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent<'a> {
    /// Title of the host.
    pub title: &'a str,
    /// Frame counter of the underlying frame loop.
    pub frame_index: u64,
    /// Timestamp of the frame.
    pub now: HostTime,
    /// Whether this was the first accepted tick since start or resume.
    pub first: bool,
    /// Whether `on_update`/`on_change` ran (false while paused, or for a
    /// static demo past its first tick).
    pub worked: bool,
}

/// Emitted when a demo hook or platform operation fails.
#[derive(Clone, Copy, Debug)]
pub struct FailureEvent<'a> {
    /// Title of the host, or the sample kind during bootstrap.
    pub title: &'a str,
    /// The failure.
    pub error: &'a HostError,
}

/// Emitted for each accepted panel edit.
#[derive(Clone, Copy, Debug)]
pub struct PanelEditEvent<'a> {
    /// Title of the host.
    pub title: &'a str,
    /// Key of the edited control.
    pub key: &'a str,
}

/// Emitted when the visibility watch reports a change.
#[derive(Clone, Copy, Debug)]
pub struct VisibilityEvent<'a> {
    /// Title of the host.
    pub title: &'a str,
    /// Whether the container is now considered visible.
    pub visible: bool,
    /// Reported intersection ratio.
    pub ratio: f64,
}

/// Emitted once per placeholder during bootstrap.
#[derive(Clone, Copy, Debug)]
pub struct MountEvent<'a> {
    /// The sample kind read from the placeholder.
    pub kind: &'a str,
    /// What happened.
    pub outcome: MountOutcome,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from hosts and bootstrap.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called on a lifecycle transition.
    fn on_lifecycle(&mut self, e: &LifecycleEvent<'_>) {
        _ = e;
    }

    /// Called for every accepted tick.
    fn on_tick(&mut self, e: &TickEvent<'_>) {
        _ = e;
    }

    /// Called when something failed.
    fn on_failure(&mut self, e: &FailureEvent<'_>) {
        _ = e;
    }

    /// Called after a panel edit was applied.
    fn on_panel_edit(&mut self, e: &PanelEditEvent<'_>) {
        _ = e;
    }

    /// Called when visibility changes.
    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        _ = e;
    }

    /// Called once per placeholder during bootstrap.
    fn on_mount(&mut self, e: &MountEvent<'_>) {
        _ = e;
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent<'_>) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_lifecycle(e);
        }
    }

    fn on_tick(&mut self, e: &TickEvent<'_>) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_tick(e);
        }
    }

    fn on_failure(&mut self, e: &FailureEvent<'_>) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_failure(e);
        }
    }

    fn on_panel_edit(&mut self, e: &PanelEditEvent<'_>) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_panel_edit(e);
        }
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_visibility(e);
        }
    }

    fn on_mount(&mut self, e: &MountEvent<'_>) {
        if let Ok(mut s) = self.try_borrow_mut() {
            s.on_mount(e);
        }
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Count {
        lifecycle: u32,
        failures: u32,
    }

    impl TraceSink for Count {
        fn on_lifecycle(&mut self, _e: &LifecycleEvent<'_>) {
            self.lifecycle += 1;
        }

        fn on_failure(&mut self, _e: &FailureEvent<'_>) {
            self.failures += 1;
        }
    }

    #[test]
    fn shared_sink_forwards_events() {
        let shared = Rc::new(RefCell::new(Count::default()));
        let mut a = shared.clone();
        let mut b = shared.clone();
        a.on_lifecycle(&LifecycleEvent {
            title: "Plasma",
            kind: LifecycleKind::Scaffolded,
        });
        b.on_failure(&FailureEvent {
            title: "fire",
            error: &HostError::Disposed,
        });
        // Events the sink does not override are dropped.
        b.on_mount(&MountEvent {
            kind: "Angles",
            outcome: MountOutcome::Mounted,
        });
        let count = shared.borrow();
        assert_eq!(count.lifecycle, 1);
        assert_eq!(count.failures, 1);
    }

    #[test]
    fn reentrant_shared_sink_drops_instead_of_panicking() {
        let shared = Rc::new(RefCell::new(Count::default()));
        let _held = shared.borrow_mut();
        let mut sink = shared.clone();
        sink.on_lifecycle(&LifecycleEvent {
            title: "Plasma",
            kind: LifecycleKind::Paused,
        });
    }
}
