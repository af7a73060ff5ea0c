// Copyright 2026 the Vizhost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic pseudo-random numbers for the kernels.

/// Marsaglia's 32-bit xorshift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// A generator seeded with `seed`; zero is replaced by a fixed seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9e37_79b9 } else { seed },
        }
    }

    /// The next raw value.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// A value in `0..1`.
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32() >> 8) / f64::from(1_u32 << 24)
    }

    /// A value in `-1..1`.
    pub fn next_signed(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_still_moves() {
        let mut rng = XorShift32::new(0);
        assert_ne!(rng.next_u32(), 0);
        assert_eq!(XorShift32::new(0), XorShift32::default());
    }

    #[test]
    fn unit_values_stay_in_range() {
        let mut rng = XorShift32::new(7);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u), "{u}");
            let s = rng.next_signed();
            assert!((-1.0..1.0).contains(&s), "{s}");
        }
    }
}
