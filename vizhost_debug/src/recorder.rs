// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records; strings are stored with a `u16` length
//! prefix. [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Only ticks carry a timestamp of their own. Every other event is stamped
//! with the time of the most recent tick, so a recording keeps its order when
//! laid out on a timeline.

use vizhost_core::time::HostTime;
use vizhost_core::trace::{
    FailureEvent, LifecycleEvent, LifecycleKind, MountEvent, MountOutcome, PanelEditEvent,
    TickEvent, TraceSink, VisibilityEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LIFECYCLE: u8 = 1;
const TAG_TICK: u8 = 2;
const TAG_FAILURE: u8 = 3;
const TAG_PANEL_EDIT: u8 = 4;
const TAG_VISIBILITY: u8 = 5;
const TAG_MOUNT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
    last_tick: HostTime,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        // Longer strings are cut at a char boundary.
        let mut end = s.len().min(usize::from(u16::MAX));
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length clamped to u16::MAX above"
        )]
        self.buf.extend_from_slice(&(end as u16).to_le_bytes());
        self.buf.extend_from_slice(&s.as_bytes()[..end]);
    }

    fn write_header(&mut self, tag: u8, at: HostTime, title: &str) {
        self.write_u8(tag);
        self.write_u64(at.ticks());
        self.write_str(title);
    }
}

fn lifecycle_code(kind: LifecycleKind) -> u8 {
    match kind {
        LifecycleKind::Scaffolded => 0,
        LifecycleKind::Constructed => 1,
        LifecycleKind::Paused => 2,
        LifecycleKind::Resumed => 3,
        LifecycleKind::Suspended => 4,
        LifecycleKind::Disposed => 5,
    }
}

fn outcome_code(outcome: MountOutcome) -> u8 {
    match outcome {
        MountOutcome::Mounted => 0,
        MountOutcome::Unknown => 1,
        MountOutcome::Failed => 2,
    }
}

impl TraceSink for RecorderSink {
    fn on_lifecycle(&mut self, e: &LifecycleEvent<'_>) {
        self.write_header(TAG_LIFECYCLE, self.last_tick, e.title);
        self.write_u8(lifecycle_code(e.kind));
    }

    fn on_tick(&mut self, e: &TickEvent<'_>) {
        self.last_tick = e.now;
        self.write_header(TAG_TICK, e.now, e.title);
        self.write_u64(e.frame_index);
        self.write_u8(u8::from(e.first) | (u8::from(e.worked) << 1));
    }

    fn on_failure(&mut self, e: &FailureEvent<'_>) {
        self.write_header(TAG_FAILURE, self.last_tick, e.title);
        self.write_str(&e.error.to_string());
    }

    fn on_panel_edit(&mut self, e: &PanelEditEvent<'_>) {
        self.write_header(TAG_PANEL_EDIT, self.last_tick, e.title);
        self.write_str(e.key);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent<'_>) {
        self.write_header(TAG_VISIBILITY, self.last_tick, e.title);
        self.write_u8(u8::from(e.visible));
        self.write_f64(e.ratio);
    }

    fn on_mount(&mut self, e: &MountEvent<'_>) {
        self.write_header(TAG_MOUNT, self.last_tick, e.kind);
        self.write_u8(outcome_code(e.outcome));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A lifecycle transition.
    Lifecycle {
        /// Time of the most recent tick.
        at: HostTime,
        /// Host title.
        title: String,
        /// Which transition.
        kind: LifecycleKind,
    },
    /// An accepted tick.
    Tick {
        /// Tick timestamp.
        at: HostTime,
        /// Host title.
        title: String,
        /// Frame counter.
        frame_index: u64,
        /// First tick since start or resume.
        first: bool,
        /// Whether the demo hooks ran.
        worked: bool,
    },
    /// A failure, with its rendered message.
    Failure {
        /// Time of the most recent tick.
        at: HostTime,
        /// Host title or sample kind.
        title: String,
        /// `Display` rendering of the error.
        message: String,
    },
    /// A panel edit.
    PanelEdit {
        /// Time of the most recent tick.
        at: HostTime,
        /// Host title.
        title: String,
        /// Edited control.
        key: String,
    },
    /// A visibility change.
    Visibility {
        /// Time of the most recent tick.
        at: HostTime,
        /// Host title.
        title: String,
        /// Visible after the change.
        visible: bool,
        /// Reported intersection ratio.
        ratio: f64,
    },
    /// A bootstrap outcome.
    Mount {
        /// Time of the most recent tick.
        at: HostTime,
        /// Sample kind.
        kind: String,
        /// What happened.
        outcome: MountOutcome,
    },
}

impl RecordedEvent {
    /// The event's timestamp.
    #[must_use]
    pub fn at(&self) -> HostTime {
        match self {
            Self::Lifecycle { at, .. }
            | Self::Tick { at, .. }
            | Self::Failure { at, .. }
            | Self::PanelEdit { at, .. }
            | Self::Visibility { at, .. }
            | Self::Mount { at, .. } => *at,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = u16::from_le_bytes(self.take(2)?.try_into().ok()?);
        let bytes = self.take(usize::from(len))?;
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn read_lifecycle(&mut self) -> Option<LifecycleKind> {
        Some(match self.read_u8()? {
            0 => LifecycleKind::Scaffolded,
            1 => LifecycleKind::Constructed,
            2 => LifecycleKind::Paused,
            3 => LifecycleKind::Resumed,
            4 => LifecycleKind::Suspended,
            _ => LifecycleKind::Disposed,
        })
    }

    fn read_outcome(&mut self) -> Option<MountOutcome> {
        Some(match self.read_u8()? {
            0 => MountOutcome::Mounted,
            1 => MountOutcome::Unknown,
            _ => MountOutcome::Failed,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let at = HostTime(self.read_u64()?);
        let title = self.read_string()?;
        match tag {
            TAG_LIFECYCLE => Some(RecordedEvent::Lifecycle {
                at,
                title,
                kind: self.read_lifecycle()?,
            }),
            TAG_TICK => {
                let frame_index = self.read_u64()?;
                let flags = self.read_u8()?;
                Some(RecordedEvent::Tick {
                    at,
                    title,
                    frame_index,
                    first: flags & 1 != 0,
                    worked: flags & 2 != 0,
                })
            }
            TAG_FAILURE => Some(RecordedEvent::Failure {
                at,
                title,
                message: self.read_string()?,
            }),
            TAG_PANEL_EDIT => Some(RecordedEvent::PanelEdit {
                at,
                title,
                key: self.read_string()?,
            }),
            TAG_VISIBILITY => Some(RecordedEvent::Visibility {
                at,
                title,
                visible: self.read_u8()? != 0,
                ratio: self.read_f64()?,
            }),
            TAG_MOUNT => Some(RecordedEvent::Mount {
                at,
                kind: title,
                outcome: self.read_outcome()?,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizhost_core::error::{DemoError, HostError};

    #[test]
    fn events_are_stamped_with_the_last_tick() {
        let mut rec = RecorderSink::new();
        rec.on_lifecycle(&LifecycleEvent {
            title: "Plasma",
            kind: LifecycleKind::Constructed,
        });
        rec.on_tick(&TickEvent {
            title: "Plasma",
            frame_index: 3,
            now: HostTime(40_000),
            first: true,
            worked: true,
        });
        rec.on_failure(&FailureEvent {
            title: "Plasma",
            error: &HostError::Change(DemoError::new("putImageData threw")),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].at(), HostTime(0));
        assert_eq!(
            events[1],
            RecordedEvent::Tick {
                at: HostTime(40_000),
                title: "Plasma".into(),
                frame_index: 3,
                first: true,
                worked: true,
            }
        );
        assert_eq!(
            events[2],
            RecordedEvent::Failure {
                at: HostTime(40_000),
                title: "Plasma".into(),
                message: "demo change failed: putImageData threw".into(),
            }
        );
    }

    #[test]
    fn truncated_recording_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_mount(&MountEvent {
            kind: "Angles",
            outcome: MountOutcome::Unknown,
        });
        rec.on_visibility(&VisibilityEvent {
            title: "Angles",
            visible: true,
            ratio: 0.25,
        });
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        let events: Vec<_> = decode(cut).collect();
        assert_eq!(
            events,
            [RecordedEvent::Mount {
                at: HostTime(0),
                kind: "Angles".into(),
                outcome: MountOutcome::Unknown,
            }]
        );
    }

    #[test]
    fn long_strings_are_cut_on_char_boundaries() {
        let mut rec = RecorderSink::new();
        let key = "é".repeat(40_000);
        rec.on_panel_edit(&PanelEditEvent {
            title: "fire",
            key: &key,
        });
        let Some(RecordedEvent::PanelEdit { key: decoded, .. }) = decode(rec.as_bytes()).next()
        else {
            panic!("expected a panel edit");
        };
        assert_eq!(decoded.len(), 65_534);
        assert!(key.starts_with(&decoded));
    }
}
