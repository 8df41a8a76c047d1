//! Gradient descent with momentum

use crate::optimizers::Optimizer;
use crate::utils::Real;

/// Full-batch gradient descent with a momentum term.
///
/// For every parameter `w` with batch gradient sum `S` and previous step
/// `Δw_prev`:
///
/// `Δw = η · S + α · Δw_prev`, then `w += Δw` and `Δw_prev = Δw`.
///
/// With `α = 0` the step is exactly `η · S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumSgd<T: Real> {
    eta: T,
    alpha: T,
}

impl<T: Real> MomentumSgd<T> {
    pub fn new(eta: T, alpha: T) -> Self {
        Self { eta, alpha }
    }
}

impl<T: Real> Optimizer<T> for MomentumSgd<T> {
    fn update(&self, parameters: &mut [T], velocity: &mut [T], gradient_sums: &[T]) {
        assert_eq!(
            parameters.len(),
            gradient_sums.len(),
            "Parameters and gradients must have the same length"
        );
        assert_eq!(
            parameters.len(),
            velocity.len(),
            "Parameters and velocities must have the same length"
        );

        for ((param, step), &sum) in parameters.iter_mut().zip(velocity.iter_mut()).zip(gradient_sums) {
            let dw = self.eta * sum + self.alpha * *step;
            *param = *param + dw;
            *step = dw;
        }
    }

    fn learning_rate(&self) -> T {
        self.eta
    }

    fn set_learning_rate(&mut self, eta: T) {
        self.eta = eta;
    }

    fn momentum(&self) -> T {
        self.alpha
    }

    fn set_momentum(&mut self, alpha: T) {
        self.alpha = alpha;
    }
}
