// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport visibility gating.
//!
//! Backends observe the host container (on the web via
//! `IntersectionObserver` with threshold 0) and feed each report into a
//! [`VisibilityGate`]. The gate collapses the report stream into
//! start/stop transitions: any overlap starts the host, no overlap stops it.

/// One intersection report for a host container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityObservation {
    /// Fraction of the container inside the (possibly margin-extended)
    /// viewport, in `0.0..=1.0`.
    pub ratio: f64,
}

impl VisibilityObservation {
    /// Creates an observation with the given intersection ratio.
    #[must_use]
    pub const fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Whether this observation counts as visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.ratio > 0.0
    }
}

/// What the owning host should do after an observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateAction {
    /// The container entered the viewport.
    Start,
    /// The container left the viewport.
    Stop,
}

/// Visible/hidden state machine driven by [`VisibilityObservation`]s.
///
/// The state starts unknown, so the very first observation always produces
/// an action. Repeated observations on the same side produce nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibilityGate {
    visible: Option<bool>,
}

impl VisibilityGate {
    /// Creates a gate with no observation yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { visible: None }
    }

    /// Feeds one observation and returns the transition it causes, if any.
    pub fn observe(&mut self, obs: VisibilityObservation) -> Option<GateAction> {
        let visible = obs.is_visible();
        if self.visible == Some(visible) {
            return None;
        }
        self.visible = Some(visible);
        Some(if visible {
            GateAction::Start
        } else {
            GateAction::Stop
        })
    }

    /// Last known visibility, `None` before the first observation.
    #[must_use]
    pub const fn is_visible(&self) -> Option<bool> {
        self.visible
    }
}
