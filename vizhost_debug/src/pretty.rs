// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Tick
//! timestamps are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use vizhost_core::time::{HostTime, Timebase};
use vizhost_core::trace::{
    FailureEvent, LifecycleEvent, LifecycleKind, MountEvent, MountOutcome, PanelEditEvent,
    TickEvent, TraceSink, VisibilityEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn lifecycle_name(kind: LifecycleKind) -> &'static str {
    match kind {
        LifecycleKind::Scaffolded => "scaffolded",
        LifecycleKind::Constructed => "constructed",
        LifecycleKind::Paused => "paused",
        LifecycleKind::Resumed => "resumed",
        LifecycleKind::Suspended => "suspended",
        LifecycleKind::Disposed => "disposed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent<'_>) {
        let _ = writeln!(self.writer, "[{}] {}", e.title, lifecycle_name(e.kind));
    }

    fn on_tick(&mut self, e: &TickEvent<'_>) {
        let first = if e.first { " first" } else { "" };
        let worked = if e.worked { "" } else { " idle" };
        let _ = writeln!(
            self.writer,
            "[{}] tick frame={} now={:.1}ms{first}{worked}",
            e.title,
            e.frame_index,
            self.host_ms(e.now),
        );
    }

    fn on_failure(&mut self, e: &FailureEvent<'_>) {
        let _ = writeln!(self.writer, "[{}] FAILED: {}", e.title, e.error);
    }

    fn on_panel_edit(&mut self, e: &PanelEditEvent<'_>) {
        let _ = writeln!(self.writer, "[{}] edit {}", e.title, e.key);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        let state = if e.visible { "visible" } else { "hidden" };
        let _ = writeln!(
            self.writer,
            "[{}] {state} ratio={:.2}",
            e.title, e.ratio
        );
    }

    fn on_mount(&mut self, e: &MountEvent<'_>) {
        let outcome = match e.outcome {
            MountOutcome::Mounted => "mounted",
            MountOutcome::Unknown => "unknown",
            MountOutcome::Failed => "FAILED",
        };
        let _ = writeln!(self.writer, "[mount] {} {outcome}", e.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizhost_core::error::HostError;

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_tick(&TickEvent {
            title: "Plasma",
            frame_index: 7,
            now: HostTime(1_500),
            first: false,
            worked: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[Plasma] tick frame=7 now=1.5ms\n");
    }

    #[test]
    fn pretty_print_lines_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_mount(&MountEvent {
            kind: "fire",
            outcome: MountOutcome::Unknown,
        });
        sink.on_visibility(&VisibilityEvent {
            title: "Angles",
            visible: false,
            ratio: 0.0,
        });
        sink.on_failure(&FailureEvent {
            title: "Angles",
            error: &HostError::Disposed,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "[mount] fire unknown",
                "[Angles] hidden ratio=0.00",
                "[Angles] FAILED: host disposed",
            ],
            "got: {output}"
        );
    }
}
