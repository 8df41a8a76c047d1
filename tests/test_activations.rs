//! Tests for the interpolated tanh
//!
//! This file covers:
//! - The absolute error bound in both precisions
//! - Exact saturation outside the domain
//! - Monotonicity of the interpolant
//! - One-time table construction, also under concurrent first use
//! - Substitutability with the exact tanh

use approx::assert_relative_eq;
use tanh_backprop::utils::activations::default_x_max;
use tanh_backprop::utils::{Activation, ExactTanh, TanhInterpolator};
use tanh_backprop::TrainError;

// Evenly spaced points covering [-x_max, x_max], both ends included.
fn domain_points(x_max: f64, count: usize) -> impl Iterator<Item = f64> {
    (0..=count).map(move |k| -x_max + 2.0 * x_max * k as f64 / count as f64)
}

fn max_deviation<A: Activation<f64>>(activation: &A, x_max: f64, count: usize) -> f64 {
    domain_points(x_max, count)
        .map(|x| (activation.evaluate(x) - x.tanh()).abs())
        .fold(0.0, f64::max)
}

// ============================================================================
// Approximation Bound Tests
// ============================================================================

mod bound_tests {
    use super::*;

    #[test]
    fn test_default_double_precision_bound() {
        let tanh = TanhInterpolator::<f64>::with_defaults();
        let worst = max_deviation(&tanh, default_x_max(), 400_000);
        assert!(
            worst <= tanh.tolerance(),
            "worst error {worst} exceeds tolerance {}",
            tanh.tolerance()
        );
    }

    #[test]
    fn test_default_single_precision_bound() {
        let tanh = TanhInterpolator::<f32>::with_defaults();
        let x_max = tanh.x_max() as f64;

        let mut worst = 0.0f64;
        for x in domain_points(x_max, 400_000) {
            let x = x as f32;
            let error = (tanh.evaluate(x) as f64 - (x as f64).tanh()).abs();
            worst = worst.max(error);
        }
        assert!(
            worst <= tanh.tolerance() as f64,
            "worst error {worst} exceeds tolerance {}",
            tanh.tolerance()
        );
    }

    #[test]
    fn test_custom_tolerance_and_domain() {
        let tanh = TanhInterpolator::<f64>::build(1e-6, 4.0).unwrap();
        let worst = max_deviation(&tanh, 4.0, 100_000);
        assert!(worst <= 1e-6);
        // a coarser tolerance is not tighter than requested by accident
        assert!(worst > 1e-8);
    }

    #[test]
    fn test_custom_single_precision_bound() {
        let tanh = TanhInterpolator::<f32>::build(1e-5, 4.0).unwrap();
        let mut worst = 0.0f64;
        for x in domain_points(4.0, 100_000) {
            let x = x as f32;
            worst = worst.max((tanh.evaluate(x) as f64 - (x as f64).tanh()).abs());
        }
        assert!(worst <= tanh.tolerance() as f64, "worst error {worst}");
    }

    #[test]
    fn test_odd_symmetry() {
        let tanh = TanhInterpolator::<f64>::with_defaults();
        for x in [0.1, 0.5, 1.0, 2.5, 7.9] {
            assert_relative_eq!(tanh.evaluate(-x), -tanh.evaluate(x), epsilon = 3e-10);
        }
    }

    #[test]
    fn test_exact_reference() {
        for x in [-3.0f64, -0.5, 0.0, 0.25, 4.0] {
            assert_eq!(ExactTanh.evaluate(x), x.tanh());
        }
    }
}

// ============================================================================
// Saturation Tests
// ============================================================================

mod saturation_tests {
    use super::*;

    #[test]
    fn test_positive_saturation_is_exactly_one() {
        let tanh = TanhInterpolator::<f64>::with_defaults();
        let x_max = tanh.x_max();
        for x in [x_max + 1e-9, x_max + 0.5, 10.0, 1e6, f64::MAX, f64::INFINITY] {
            assert_eq!(tanh.evaluate(x), 1.0, "x = {x}");
        }
    }

    #[test]
    fn test_negative_saturation_is_exactly_minus_one() {
        let tanh = TanhInterpolator::<f64>::with_defaults();
        let x_max = tanh.x_max();
        for x in [-x_max - 1e-9, -9.0, -1e6, f64::NEG_INFINITY] {
            assert_eq!(tanh.evaluate(x), -1.0, "x = {x}");
        }
    }

    #[test]
    fn test_single_precision_saturation() {
        let tanh = TanhInterpolator::<f32>::with_defaults();
        assert_eq!(tanh.evaluate(9.0), 1.0f32);
        assert_eq!(tanh.evaluate(-9.0), -1.0f32);
    }

    #[test]
    fn test_custom_domain_saturates_at_its_edge() {
        let tanh = TanhInterpolator::<f64>::build(1e-6, 2.0).unwrap();
        assert_eq!(tanh.evaluate(2.01), 1.0);
        assert_eq!(tanh.evaluate(-2.01), -1.0);
        assert!(tanh.evaluate(2.0) < 1.0);
    }
}

// ============================================================================
// Monotonicity Tests
// ============================================================================

mod monotonicity_tests {
    use super::*;

    #[test]
    fn test_double_precision_monotone() {
        let tanh = TanhInterpolator::<f64>::with_defaults();
        let mut previous = f64::NEG_INFINITY;
        for x in domain_points(tanh.x_max() + 0.5, 300_001) {
            let y = tanh.evaluate(x);
            assert!(y >= previous, "not monotone at x = {x}");
            previous = y;
        }
    }

    #[test]
    fn test_single_precision_monotone() {
        let tanh = TanhInterpolator::<f32>::with_defaults();
        let mut previous = f32::NEG_INFINITY;
        for x in domain_points(tanh.x_max() as f64 + 0.5, 100_003) {
            let y = tanh.evaluate(x as f32);
            assert!(y >= previous, "not monotone at x = {x}");
            previous = y;
        }
    }
}

// ============================================================================
// One-Time Construction Tests
// ============================================================================

mod construction_tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_table() {
        let tanh = TanhInterpolator::<f64>::build(1e-8, 6.0).unwrap();
        let first = tanh.init();
        let first_ptr = first.as_ptr();
        let snapshot = first.to_vec();
        let before: Vec<f64> = [-1.0, 0.3, 2.2].iter().map(|&x| tanh.evaluate(x)).collect();

        let second = tanh.init();
        assert_eq!(second.as_ptr(), first_ptr);
        assert_eq!(second, snapshot.as_slice());

        let after: Vec<f64> = [-1.0, 0.3, 2.2].iter().map(|&x| tanh.evaluate(x)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_concurrent_init_builds_one_table() {
        let tanh = TanhInterpolator::<f64>::new(1e-8, 6.0).unwrap();
        let addresses: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| tanh.init().as_ptr() as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(addresses[0], tanh.init().as_ptr() as usize);
    }

    #[test]
    fn test_unrepresentable_single_precision_tolerance_rejected() {
        let result = TanhInterpolator::<f32>::new(1e-8, default_x_max() as f32);
        assert!(matches!(result, Err(TrainError::InvalidConfig(_))));
        assert!(TanhInterpolator::<f32>::new(1e-6, default_x_max() as f32).is_ok());
    }

    #[test]
    fn test_lazy_and_eager_tables_agree() {
        let lazy = TanhInterpolator::<f64>::new(1e-7, 5.0).unwrap();
        let eager = TanhInterpolator::<f64>::build(1e-7, 5.0).unwrap();
        for x in [-4.9, -0.01, 0.0, 1.7, 4.99] {
            assert_eq!(lazy.evaluate(x), eager.evaluate(x));
        }
    }
}

// ============================================================================
// Substitutability Tests
// ============================================================================

mod contract_tests {
    use super::*;

    // Any activation works behind a shared reference too.
    fn squash_all<A: Activation<f64>>(activation: A, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| activation.evaluate(x)).collect()
    }

    #[test]
    fn test_interpolated_and_exact_are_interchangeable() {
        let values = [-2.0, -0.5, 0.0, 0.5, 2.0];
        let tanh = TanhInterpolator::<f64>::with_defaults();

        let approximate = squash_all(&tanh, &values);
        let exact = squash_all(ExactTanh, &values);
        for (a, e) in approximate.iter().zip(&exact) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_derivative_uses_output() {
        let tanh = TanhInterpolator::<f64>::with_defaults();
        let y = tanh.evaluate(0.7);
        assert_relative_eq!(tanh.derivative_from_output(y), 1.0 - y * y);
        assert_relative_eq!(
            ExactTanh.derivative_from_output(0.7f64.tanh()),
            1.0 / 0.7f64.cosh().powi(2),
            epsilon = 1e-12
        );
    }
}
