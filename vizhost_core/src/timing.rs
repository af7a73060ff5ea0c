// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame signals delivered by platform frame loops.
//!
//! A backend turns its per-frame callback (e.g. `requestAnimationFrame`) into
//! a [`FrameTick`] and hands it to whatever the loop drives. The host then
//! runs each tick through its [`FrameClock`](crate::cadence::FrameClock) to
//! decide whether any work happens.

use crate::time::HostTime;

/// How much the platform can tell us about frame timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimingConfidence {
    /// Timestamps come from a display-synchronized callback but carry no
    /// present-time prediction (e.g. Web `rAF`).
    PacingOnly,
    /// Timestamps are synthesized by the caller (tests, manual stepping).
    Synthetic,
}

/// A frame opportunity delivered by a frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time the platform attached to this frame.
    pub now: HostTime,
    /// Monotonically increasing frame counter, starting at zero for each loop.
    pub frame_index: u64,
    /// Confidence level for the timestamp.
    pub confidence: TimingConfidence,
}

impl FrameTick {
    /// Creates a synthetic tick, for manual stepping.
    #[must_use]
    pub const fn synthetic(now: HostTime, frame_index: u64) -> Self {
        Self {
            now,
            frame_index,
            confidence: TimingConfidence::Synthetic,
        }
    }
}
