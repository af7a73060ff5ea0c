// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capped update rate derived from the animation-frame signal.
//!
//! The browser calls back at the display refresh rate, which is far more than
//! most compute kernels can keep up with. [`FrameClock`] drops every tick that
//! arrives sooner than `min_interval` after the last accepted one:
//!
//! ```text
//!   Δt = now - last
//!   Δt <  min_interval  → skip, `last` unchanged
//!   Δt >= min_interval  → accept, `last = now`, report and clear `first`
//! ```
//!
//! `last` starts at zero, so a loop whose first timestamp falls below the
//! interval skips that frame.

use crate::time::{Duration, HostTime};

/// The default cadence cap: ~30 Hz.
pub const DEFAULT_MIN_INTERVAL_MS: u32 = 33;

/// An accepted tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    /// `true` for the first accepted tick since construction or the last
    /// [`FrameClock::rearm`].
    pub first: bool,
}

/// Minimum-interval gate over frame timestamps.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    min_interval: Duration,
    last: HostTime,
    first: bool,
}

impl FrameClock {
    /// Creates a clock that accepts at most one tick per `min_interval`.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: HostTime(0),
            first: true,
        }
    }

    /// Runs a frame timestamp through the gate.
    ///
    /// Returns `None` when the tick is too close to the previous accepted one.
    /// The first-tick flag is cleared on every accepted tick, whether or not
    /// the caller ends up doing work for it.
    pub fn accept(&mut self, now: HostTime) -> Option<Cadence> {
        if now.saturating_duration_since(self.last) < self.min_interval {
            return None;
        }
        self.last = now;
        let first = self.first;
        self.first = false;
        Some(Cadence { first })
    }

    /// Makes the next accepted tick count as a first tick again.
    pub fn rearm(&mut self) {
        self.first = true;
    }

    /// Timestamp of the last accepted tick.
    #[must_use]
    pub const fn last_accepted(&self) -> HostTime {
        self.last
    }

    /// The configured minimum interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timebase;

    fn clock() -> FrameClock {
        FrameClock::new(Duration::from_millis(
            DEFAULT_MIN_INTERVAL_MS,
            Timebase::MICROS,
        ))
    }

    fn ms(v: u64) -> HostTime {
        HostTime(v * 1000)
    }

    #[test]
    fn early_first_frame_is_skipped() {
        let mut c = clock();
        assert_eq!(c.accept(ms(16)), None, "16ms after zero is under the cap");
        assert_eq!(c.last_accepted(), HostTime(0), "last must not move on skip");
    }

    #[test]
    fn accepts_once_interval_elapses() {
        let mut c = clock();
        assert_eq!(c.accept(ms(40)), Some(Cadence { first: true }));
        assert_eq!(c.last_accepted(), ms(40));
        assert_eq!(c.accept(ms(60)), None, "20ms since last accepted");
        assert_eq!(c.last_accepted(), ms(40));
        assert_eq!(c.accept(ms(73)), Some(Cadence { first: false }));
        assert_eq!(c.last_accepted(), ms(73));
    }

    #[test]
    fn exact_interval_is_accepted() {
        let mut c = clock();
        assert!(c.accept(ms(33)).is_some(), "Δt == cap is not below the cap");
    }

    #[test]
    fn rearm_marks_next_tick_first() {
        let mut c = clock();
        assert!(c.accept(ms(40)).is_some_and(|t| t.first));
        assert!(c.accept(ms(80)).is_some_and(|t| !t.first));
        c.rearm();
        assert_eq!(c.accept(ms(90)), None, "rearm does not bypass the cap");
        assert!(c.accept(ms(120)).is_some_and(|t| t.first));
    }

    #[test]
    fn timestamps_going_backwards_are_skipped() {
        let mut c = clock();
        assert!(c.accept(ms(100)).is_some());
        assert_eq!(c.accept(ms(50)), None);
        assert_eq!(c.last_accepted(), ms(100));
    }
}
