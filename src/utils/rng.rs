//! Seeded random source for weight initialization.
//!
//! A small xorshift generator keeps initial weights reproducible across runs
//! and platforms for a given seed.

use crate::utils::real::Real;

/// Xorshift PRNG used by `NetworkState::initialize_uniform`.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform sample in [0, 1) with 53 bits of resolution.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform sample in [low, high), converted to the working precision.
    pub fn gen_range<T: Real>(&mut self, low: f64, high: f64) -> T {
        T::of(low + (high - low) * self.next_f64())
    }
}
