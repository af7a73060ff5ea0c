// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace sink writing to the browser console.

use alloc::format;

use vizhost_core::trace::{
    FailureEvent, LifecycleEvent, MountEvent, MountOutcome, PanelEditEvent, TickEvent, TraceSink,
    VisibilityEvent,
};
use web_sys::console;

/// Sends host diagnostics to `console`.
///
/// Failures go to `console.error`, unknown sample kinds to `console.warn`,
/// everything else to `console.debug`. Per-tick lines are only written when
/// [`verbose`](Self::verbose).
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    verbose: bool,
}

impl ConsoleSink {
    /// A sink that skips per-tick events.
    #[must_use]
    pub const fn new() -> Self {
        Self { verbose: false }
    }

    /// A sink that also logs every accepted tick.
    #[must_use]
    pub const fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl TraceSink for ConsoleSink {
    fn on_lifecycle(&mut self, e: &LifecycleEvent<'_>) {
        console::debug_1(&format!("[{}] {:?}", e.title, e.kind).into());
    }

    fn on_tick(&mut self, e: &TickEvent<'_>) {
        if self.verbose {
            console::debug_1(
                &format!(
                    "[{}] tick #{} at {:?} first={} worked={}",
                    e.title, e.frame_index, e.now, e.first, e.worked
                )
                .into(),
            );
        }
    }

    fn on_failure(&mut self, e: &FailureEvent<'_>) {
        console::error_1(&format!("[{}] {}", e.title, e.error).into());
    }

    fn on_panel_edit(&mut self, e: &PanelEditEvent<'_>) {
        console::debug_1(&format!("[{}] edit {}", e.title, e.key).into());
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        console::debug_1(
            &format!("[{}] visible={} ratio={:.2}", e.title, e.visible, e.ratio).into(),
        );
    }

    fn on_mount(&mut self, e: &MountEvent<'_>) {
        let line = format!("sample {:?}: {:?}", e.kind, e.outcome);
        match e.outcome {
            MountOutcome::Unknown => console::warn_1(&line.into()),
            MountOutcome::Mounted | MountOutcome::Failed => console::debug_1(&line.into()),
        }
    }
}
