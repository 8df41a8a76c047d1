//! Activation functions for the backpropagation trainer
//!
//! This module provides the hyperbolic tangent in two interchangeable forms:
//! - `TanhInterpolator`: piecewise-linear, table-driven approximation with a
//!   guaranteed absolute error bound (fast path for the training inner loop)
//! - `ExactTanh`: direct evaluation, used as the reference
//!
//! Both implement the `Activation` trait, so the trainer accepts either.

use std::sync::OnceLock;

use crate::error::{Result, TrainError};
use crate::utils::real::Real;

/// Upper bound on table samples accepted by `TanhInterpolator::new`.
const MAX_TABLE_SAMPLES: usize = 1 << 26;

/// Default half-width of the interpolation domain, `12.5 · ln 2`.
///
/// Beyond it tanh is treated as saturated at ±1.
pub fn default_x_max() -> f64 {
    12.5 * std::f64::consts::LN_2
}

/// A squashing function used for hidden and output nodes.
pub trait Activation<T: Real> {
    /// Activation value for a node's net input.
    fn evaluate(&self, x: T) -> T;

    /// Derivative expressed through the activation value `y = evaluate(x)`.
    ///
    /// For tanh this is `1 - y²`.
    fn derivative_from_output(&self, y: T) -> T {
        T::one() - y * y
    }
}

impl<T: Real, A: Activation<T> + ?Sized> Activation<T> for &A {
    fn evaluate(&self, x: T) -> T {
        (**self).evaluate(x)
    }

    fn derivative_from_output(&self, y: T) -> T {
        (**self).derivative_from_output(y)
    }
}

/// Reference tanh computed with the platform math library.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactTanh;

impl<T: Real> Activation<T> for ExactTanh {
    fn evaluate(&self, x: T) -> T {
        x.tanh()
    }
}

/// Table-driven tanh with a bounded absolute error.
///
/// The domain `[-x_max, x_max]` is sampled with step `h = sqrt(6·(ε - m)·√3)`,
/// which bounds the linear-interpolation error of tanh by `ε - m` since
/// `max |tanh''| = 4 / (3√3)`. The margin `m` (see
/// [`Real::tanh_rounding_margin`]) absorbs rounding of the stored samples and
/// of the lookup, so `|evaluate(x) - tanh(x)| ≤ ε` holds in both widths.
/// Samples (stored in `T`) and their forward differences are interleaved
/// (`value, delta, value, delta, …`) so a lookup reads two adjacent entries.
///
/// The table is built at most once, behind a `OnceLock`: the first call to
/// [`init`](Self::init) (or the first evaluation) samples it, every later
/// call returns the same table. Sharing one interpolator between threads is
/// therefore safe.
///
/// # Example
///
/// ```
/// use tanh_backprop::utils::activations::{Activation, TanhInterpolator};
///
/// let tanh = TanhInterpolator::<f64>::with_defaults();
/// assert!((tanh.evaluate(0.5) - 0.5f64.tanh()).abs() < 1e-9);
/// assert_eq!(tanh.evaluate(40.0), 1.0);
/// ```
#[derive(Debug)]
pub struct TanhInterpolator<T: Real> {
    tolerance: T,
    x_max: T,
    // table geometry is kept in double width for every `T`
    x_min: f64,
    step: f64,
    inv_step: f64,
    samples: usize,
    table: OnceLock<Box<[T]>>,
}

impl<T: Real> TanhInterpolator<T> {
    /// Describe an interpolator for `tolerance` over `[-x_max, x_max]`.
    ///
    /// The table itself is sampled lazily; see [`build`](Self::build) for
    /// eager construction.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when either argument is not a positive finite number,
    /// when `tolerance` is below what `T` can honour
    /// ([`Real::MIN_TANH_TOLERANCE`]), or when the requested precision would
    /// need an unreasonably large table.
    pub fn new(tolerance: T, x_max: T) -> Result<Self> {
        if !(tolerance.is_finite() && tolerance > T::zero()) {
            return Err(TrainError::invalid(format!(
                "tanh tolerance must be positive and finite, got {tolerance}"
            )));
        }
        if tolerance < T::of(T::MIN_TANH_TOLERANCE) {
            return Err(TrainError::invalid(format!(
                "tanh tolerance {tolerance} is below the minimum {} for this precision",
                T::MIN_TANH_TOLERANCE
            )));
        }
        if !(x_max.is_finite() && x_max > T::zero()) {
            return Err(TrainError::invalid(format!(
                "tanh domain half-width must be positive and finite, got {x_max}"
            )));
        }

        let interpolator = Self::from_parts(tolerance, x_max);
        if interpolator.samples > MAX_TABLE_SAMPLES {
            return Err(TrainError::invalid(format!(
                "tanh tolerance {tolerance} needs {} samples (limit {MAX_TABLE_SAMPLES})",
                interpolator.samples
            )));
        }
        Ok(interpolator)
    }

    /// Like [`new`](Self::new), but samples the table immediately.
    pub fn build(tolerance: T, x_max: T) -> Result<Self> {
        let interpolator = Self::new(tolerance, x_max)?;
        interpolator.init();
        Ok(interpolator)
    }

    /// Interpolator with the precision's default tolerance and `12.5 · ln 2`.
    pub fn with_defaults() -> Self {
        Self::from_parts(T::of(T::DEFAULT_TANH_TOLERANCE), T::of(default_x_max()))
    }

    fn from_parts(tolerance: T, x_max: T) -> Self {
        let budget = tolerance.as_f64() - T::tanh_rounding_margin();
        let step = (budget * 6.0 * 3.0f64.sqrt()).sqrt();
        let x_min = -x_max.as_f64();
        let samples = (-2.0 * x_min / step).ceil() as usize + 2;

        Self {
            tolerance,
            x_max,
            x_min,
            step,
            inv_step: 1.0 / step,
            samples,
            table: OnceLock::new(),
        }
    }

    /// Sample the table if this has not happened yet and return it.
    ///
    /// Calling it again never reallocates or rewrites the table.
    pub fn init(&self) -> &[T] {
        self.table.get_or_init(|| {
            let mut table = vec![T::zero(); 2 * self.samples];
            for (i, pair) in table.chunks_exact_mut(2).enumerate() {
                pair[0] = T::of((self.x_min + i as f64 * self.step).tanh());
            }
            // forward differences; the last sample keeps a zero delta
            for i in 0..self.samples - 1 {
                table[2 * i + 1] = table[2 * i + 2] - table[2 * i];
            }
            table.into_boxed_slice()
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// Configured absolute error bound.
    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    /// Half-width of the interpolated domain.
    pub fn x_max(&self) -> T {
        self.x_max
    }

    /// Distance between two consecutive samples.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of tanh samples (the table holds twice as many entries).
    pub fn table_len(&self) -> usize {
        self.samples
    }
}

impl<T: Real> Activation<T> for TanhInterpolator<T> {
    /// Interpolated tanh.
    ///
    /// Returns exactly ±1 outside `[-x_max, x_max]` without touching the
    /// table. NaN propagates.
    fn evaluate(&self, x: T) -> T {
        if x.abs() > self.x_max {
            return if x > T::zero() { T::one() } else { -T::one() };
        }
        if x.is_nan() {
            return x;
        }

        let table = self.init();
        // double-width position keeps single-width tables within the bound
        let position = (x.as_f64() - self.x_min) * self.inv_step;
        let index = (position.floor().max(0.0) as usize).min(self.samples - 2);
        let t = T::of(position - index as f64);

        table[2 * index] + t * table[2 * index + 1]
    }
}
