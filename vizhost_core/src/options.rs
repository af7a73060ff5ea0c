// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-host configuration.

use crate::cadence::DEFAULT_MIN_INTERVAL_MS;

/// What happens to the frame chain while the host is paused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdlePolicy {
    /// Keep requesting frames and skip the work inside them.
    #[default]
    KeepTicking,
    /// Cancel the frame chain on pause and request it again on resume.
    Suspend,
}

/// Options for one visualization host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostOptions {
    /// Render once per start/resume and then stop ticking.
    pub is_static: bool,
    /// Never build a parameter panel.
    pub disable_pane: bool,
    /// Minimum time between accepted ticks.
    pub min_interval_ms: u32,
    /// Frame-chain behavior while paused.
    pub idle_policy: IdlePolicy,
    /// Distance (CSS px) around the viewport that already counts as visible.
    pub visibility_margin_px: u32,
}

impl HostOptions {
    /// The blog's default: at most one tick every 33 ms.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            is_static: false,
            disable_pane: false,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            idle_policy: IdlePolicy::KeepTicking,
            visibility_margin_px: 0,
        }
    }

    /// At most one tick every 16 ms, for cheap kernels.
    #[must_use]
    pub const fn smooth() -> Self {
        Self {
            min_interval_ms: 16,
            ..Self::standard()
        }
    }

    /// Sets [`is_static`](Self::is_static).
    #[must_use]
    pub const fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Sets [`disable_pane`](Self::disable_pane).
    #[must_use]
    pub const fn with_disable_pane(mut self, disable_pane: bool) -> Self {
        self.disable_pane = disable_pane;
        self
    }

    /// Sets [`min_interval_ms`](Self::min_interval_ms).
    #[must_use]
    pub const fn with_min_interval_ms(mut self, ms: u32) -> Self {
        self.min_interval_ms = ms;
        self
    }

    /// Sets [`idle_policy`](Self::idle_policy).
    #[must_use]
    pub const fn with_idle_policy(mut self, policy: IdlePolicy) -> Self {
        self.idle_policy = policy;
        self
    }

    /// Sets [`visibility_margin_px`](Self::visibility_margin_px).
    #[must_use]
    pub const fn with_visibility_margin_px(mut self, px: u32) -> Self {
        self.visibility_margin_px = px;
        self
    }

    /// Reads `static` and `disablepane` through `lookup` (typically the
    /// placeholder's `data-*` attributes) on top of [`standard`](Self::standard).
    ///
    /// Only the exact string `"true"` enables a flag.
    #[must_use]
    pub fn from_attributes<S: AsRef<str>>(lookup: impl Fn(&str) -> Option<S>) -> Self {
        let flag = |name: &str| lookup(name).is_some_and(|v| v.as_ref() == "true");
        Self::standard()
            .with_static(flag("static"))
            .with_disable_pane(flag("disablepane"))
    }
}

impl Default for HostOptions {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_caps_at_about_thirty_hertz() {
        let o = HostOptions::default();
        assert_eq!(o.min_interval_ms, 33);
        assert!(!o.is_static && !o.disable_pane);
        assert_eq!(o.idle_policy, IdlePolicy::KeepTicking);
        assert_eq!(HostOptions::smooth().min_interval_ms, 16);
    }

    #[test]
    fn attributes_enable_only_on_exact_true() {
        let o = HostOptions::from_attributes(|name| match name {
            "static" => Some("true"),
            "disablepane" => Some("1"),
            _ => None,
        });
        assert!(o.is_static);
        assert!(!o.disable_pane, "only \"true\" enables a flag");
        assert_eq!(o.min_interval_ms, 33);
    }
}
