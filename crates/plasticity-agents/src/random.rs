//! Injectable random source for lifecycle and gap-scan probability gates.
//!
//! Every random draw the control loop makes goes through [`RandomSource`].
//! Production code uses [`SeededRandom`] (a seedable [`StdRng`]); tests use
//! [`FixedRandom`] to force a gate open or shut.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random draws.
pub trait RandomSource {
    /// A uniform draw in `[0.0, 1.0)`.
    fn next_unit(&mut self) -> f64;

    /// A uniform index in `0..len`. Returns 0 when `len` is 0.
    fn next_index(&mut self, len: usize) -> usize;

    /// A uniform integer in `low..=high`. The bounds may be given in
    /// either order.
    fn next_in_range(&mut self, low: u32, high: u32) -> u32;

    /// One Bernoulli trial: `true` when a fresh draw falls below
    /// `probability`.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

/// A seedable random source backed by [`StdRng`].
///
/// Two instances built from the same seed produce the same sequence of
/// decisions.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Create a source with a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        let (lo, hi) = if low <= high { (low, high) } else { (high, low) };
        self.rng.random_range(lo..=hi)
    }
}

/// A deterministic source that returns the same draw every time.
///
/// `FixedRandom::always()` opens every probability gate below 1.0 and
/// `FixedRandom::never()` keeps every gate shut. Index and range draws
/// return the configured index (clamped to the range) and the lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom {
    unit: f64,
    index: usize,
}

impl FixedRandom {
    /// A source whose unit draw is always `unit`.
    pub const fn new(unit: f64) -> Self {
        Self { unit, index: 0 }
    }

    /// Every `chance(p)` with `p > 0` succeeds.
    pub const fn always() -> Self {
        Self::new(0.0)
    }

    /// Every `chance(p)` with `p <= 1` fails.
    pub const fn never() -> Self {
        Self::new(1.0)
    }

    /// Use `index` for index draws instead of 0.
    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.unit
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    fn next_in_range(&mut self, low: u32, high: u32) -> u32 {
        low.min(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::from_seed(7);
        let mut b = SeededRandom::from_seed(7);
        for _ in 0..32 {
            assert_eq!(a.next_index(1000), b.next_index(1000));
            assert_eq!(a.chance(0.3), b.chance(0.3));
        }
    }

    #[test]
    fn seeded_draws_stay_in_bounds() {
        let mut rng = SeededRandom::from_seed(42);
        for _ in 0..256 {
            let unit = rng.next_unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(rng.next_index(5) < 5);
            let v = rng.next_in_range(30, 10);
            assert!((10..=30).contains(&v));
        }
        assert_eq!(rng.next_index(0), 0);
    }

    #[test]
    fn fixed_sources_force_gates() {
        let mut open = FixedRandom::always();
        let mut shut = FixedRandom::never();
        assert!(open.chance(0.05));
        assert!(!shut.chance(0.99));
        assert!(!shut.chance(1.0));
    }

    #[test]
    fn fixed_index_is_clamped() {
        let mut rng = FixedRandom::always().with_index(9);
        assert_eq!(rng.next_index(3), 2);
        assert_eq!(rng.next_index(0), 0);
        assert_eq!(rng.next_in_range(5, 2), 2);
    }
}
