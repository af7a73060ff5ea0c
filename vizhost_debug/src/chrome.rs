// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Each host title gets its own track (`tid`). Pauses are rendered as
//! duration slices between the `Paused` and `Resumed` transitions.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use vizhost_core::time::Timebase;
use vizhost_core::trace::LifecycleKind;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut tracks: Vec<String> = Vec::new();
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        let ts = ticks_to_us(recorded.at().ticks(), timebase);
        match recorded {
            RecordedEvent::Lifecycle { title, kind, .. } => {
                let tid = track(&mut tracks, &title);
                let ph = match kind {
                    LifecycleKind::Paused => "B",
                    LifecycleKind::Resumed => "E",
                    _ => "i",
                };
                let name = if ph == "i" {
                    format!("{kind:?}")
                } else {
                    "Paused".to_owned()
                };
                let mut event = json!({
                    "ph": ph,
                    "name": name,
                    "cat": "Lifecycle",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "args": { "title": title }
                });
                if ph == "i" {
                    event["s"] = json!("t");
                }
                events.push(event);
            }
            RecordedEvent::Tick {
                title,
                frame_index,
                first,
                worked,
                ..
            } => {
                let tid = track(&mut tracks, &title);
                events.push(json!({
                    "ph": "i",
                    "name": "Tick",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "first": first,
                        "worked": worked,
                    }
                }));
            }
            RecordedEvent::Failure { title, message, .. } => {
                let tid = track(&mut tracks, &title);
                events.push(json!({
                    "ph": "i",
                    "name": "Failure",
                    "cat": "Error",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "g",
                    "args": { "message": message }
                }));
            }
            RecordedEvent::PanelEdit { title, key, .. } => {
                let tid = track(&mut tracks, &title);
                events.push(json!({
                    "ph": "i",
                    "name": "PanelEdit",
                    "cat": "Input",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": { "key": key }
                }));
            }
            RecordedEvent::Visibility {
                title,
                visible,
                ratio,
                ..
            } => {
                let tid = track(&mut tracks, &title);
                events.push(json!({
                    "ph": "i",
                    "name": if visible { "Visible" } else { "Hidden" },
                    "cat": "Visibility",
                    "ts": ts,
                    "pid": 0,
                    "tid": tid,
                    "s": "t",
                    "args": { "ratio": ratio }
                }));
            }
            RecordedEvent::Mount { kind, outcome, .. } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Mount",
                    "cat": "Bootstrap",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "kind": kind,
                        "outcome": format!("{outcome:?}"),
                    }
                }));
            }
        }
    }

    // Track names as metadata so viewers label each host.
    for (i, title) in tracks.iter().enumerate() {
        events.push(json!({
            "ph": "M",
            "name": "thread_name",
            "pid": 0,
            "tid": i + 1,
            "args": { "name": title }
        }));
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

/// Track id for a host title; 0 is reserved for bootstrap events.
fn track(tracks: &mut Vec<String>, title: &str) -> usize {
    if let Some(i) = tracks.iter().position(|t| t == title) {
        return i + 1;
    }
    tracks.push(title.to_owned());
    tracks.len()
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use vizhost_core::time::HostTime;
    use vizhost_core::trace::{LifecycleEvent, MountEvent, MountOutcome, TickEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_mount(&MountEvent {
            kind: "Plasma",
            outcome: MountOutcome::Mounted,
        });
        rec.on_tick(&TickEvent {
            title: "Plasma",
            frame_index: 0,
            now: HostTime(2_000),
            first: true,
            worked: true,
        });
        rec.on_lifecycle(&LifecycleEvent {
            title: "Plasma",
            kind: LifecycleKind::Paused,
        });
        rec.on_tick(&TickEvent {
            title: "Angles",
            frame_index: 1,
            now: HostTime(3_000),
            first: false,
            worked: false,
        });
        rec.on_lifecycle(&LifecycleEvent {
            title: "Plasma",
            kind: LifecycleKind::Resumed,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::MICROS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 7, "5 events and 2 track names");

        assert_eq!(parsed[0]["name"], "Mount");
        assert_eq!(parsed[0]["tid"], 0);

        assert_eq!(parsed[1]["name"], "Tick");
        assert_eq!(parsed[1]["ts"], 2000.0);
        assert_eq!(parsed[1]["tid"], 1);

        assert_eq!(parsed[2]["ph"], "B");
        assert_eq!(parsed[4]["ph"], "E");
        assert_eq!(parsed[4]["ts"], 3000.0);

        assert_eq!(parsed[3]["tid"], 2);
        assert_eq!(parsed[6]["ph"], "M");
        assert_eq!(parsed[6]["args"]["name"], "Angles");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
