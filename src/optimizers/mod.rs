//! Optimizer abstractions for weight and bias updates
//!
//! An optimizer turns the gradient sums accumulated over a full batch into a
//! parameter step. The step is stored in a velocity buffer owned by the
//! network state, so the optimizer itself only carries its rates.
//!
//! # Available Optimizers
//!
//! - MomentumSgd: gradient descent with a momentum term,
//!   `Δ = η·S + α·Δ_prev`
//!
//! # Example
//!
//! ```
//! use tanh_backprop::optimizers::{MomentumSgd, Optimizer};
//!
//! let optimizer = MomentumSgd::new(0.5, 0.9);
//! let mut weights = vec![1.0f64, -1.0];
//! let mut velocity = vec![0.0, 0.2];
//! optimizer.update(&mut weights, &mut velocity, &[0.2, 0.0]);
//!
//! assert_eq!(velocity, vec![0.1, 0.18000000000000002]);
//! assert_eq!(weights, vec![1.1, -0.82]);
//! ```

pub mod momentum;

pub use momentum::MomentumSgd;

use crate::utils::Real;

/// Core trait for full-batch optimizers.
///
/// `gradient_sums` holds, for each parameter, the batch sum of
/// `δ · input` (the negated error gradient), so optimizers move parameters
/// in the direction of the sums.
pub trait Optimizer<T: Real> {
    /// Apply one step to `parameters`, reading and overwriting `velocity`.
    ///
    /// # Panics
    ///
    /// Panics if the three slices have different lengths.
    fn update(&self, parameters: &mut [T], velocity: &mut [T], gradient_sums: &[T]);

    fn learning_rate(&self) -> T;

    fn set_learning_rate(&mut self, eta: T);

    fn momentum(&self) -> T;

    fn set_momentum(&mut self, alpha: T);
}
