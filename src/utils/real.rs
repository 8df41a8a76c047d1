//! Numeric precision selection
//!
//! Every buffer and computation in the crate is generic over a single `Real`
//! type chosen once at the call site (`f32` or `f64`).

use num_traits::Float;
use std::fmt::{Debug, Display};

/// Floating-point type usable for weights, activations and the tanh table.
pub trait Real: Float + Debug + Display + Default + Send + Sync + 'static {
    /// Default absolute error bound of the interpolated tanh at this width.
    const DEFAULT_TANH_TOLERANCE: f64;

    /// Smallest tanh tolerance this width can honour.
    const MIN_TANH_TOLERANCE: f64;

    /// Convert an `f64` literal or configuration value.
    fn of(value: f64) -> Self;

    /// Widen to `f64` (used for logging and reports).
    fn as_f64(self) -> f64;

    /// Share of a tanh tolerance reserved for rounding the stored samples
    /// and the lookup arithmetic.
    fn tanh_rounding_margin() -> f64 {
        4.0 * Self::epsilon().as_f64()
    }
}

impl Real for f32 {
    // Interpolation rounding alone is ~1e-7 near ±1 in single width.
    const DEFAULT_TANH_TOLERANCE: f64 = 1e-6;
    const MIN_TANH_TOLERANCE: f64 = 1e-6;

    fn of(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const DEFAULT_TANH_TOLERANCE: f64 = 1e-10;
    const MIN_TANH_TOLERANCE: f64 = 1e-13;

    fn of(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}
