//! Randomness used for tile spawning.
//!
//! The engine only ever asks for uniform numbers in `[0, 1)`, so any source
//! can be plugged in: a seeded [`SmallRng`] for real games and replays, or a
//! [`FixedRng`] when a test needs to pin the outcome.

use rand::rngs::SmallRng;
use rand::Rng;

/// A source of uniform samples in `[0, 1)`.
pub trait SpawnRng {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_unit() * len as f64) as usize;
        idx.min(len - 1)
    }
}

impl SpawnRng for SmallRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRng(f64);

impl FixedRng {
    /// `value` is clamped into `[0, 1)`.
    pub fn new(value: f64) -> Self {
        FixedRng(value.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl SpawnRng for FixedRng {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}
