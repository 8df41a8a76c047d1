//! Tests for learning-rate and momentum schedules
//!
//! This file covers:
//! - StepDecay and ExponentialDecay sequences
//! - Reset behavior
//! - Building schedulers from configuration

use tanh_backprop::config::ScheduleConfig;
use tanh_backprop::utils::lr_scheduler::{
    build_scheduler, Constant, ExponentialDecay, RateScheduler, StepDecay,
};

fn collect_rates(scheduler: &mut dyn RateScheduler, generations: usize) -> Vec<f64> {
    let mut rates = Vec::with_capacity(generations);
    for _ in 0..generations {
        rates.push(scheduler.get_rate());
        scheduler.step();
    }
    rates
}

fn schedule(schedule_type: &str, step_size: Option<usize>, gamma: Option<f64>) -> ScheduleConfig {
    ScheduleConfig {
        schedule_type: schedule_type.to_string(),
        step_size,
        gamma,
    }
}

// ============================================================================
// StepDecay Tests
// ============================================================================

mod step_decay_tests {
    use super::*;

    #[test]
    fn test_step_decay_creation() {
        let scheduler = StepDecay::new(0.1, 10, 0.5);
        assert_eq!(scheduler.get_rate(), 0.1);
    }

    #[test]
    fn test_step_decay_sequence() {
        let mut scheduler = StepDecay::new(1.0, 3, 0.5);
        let rates = collect_rates(&mut scheduler, 7);
        assert_eq!(rates, vec![1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.25]);
    }

    #[test]
    fn test_step_decay_reset() {
        let mut scheduler = StepDecay::new(0.8, 1, 0.5);
        scheduler.step();
        scheduler.step();
        assert_eq!(scheduler.get_rate(), 0.2);

        scheduler.reset();
        assert_eq!(scheduler.get_rate(), 0.8);
        scheduler.step();
        assert_eq!(scheduler.get_rate(), 0.4);
    }

    #[test]
    fn test_step_decay_gamma_one_is_constant() {
        let mut scheduler = StepDecay::new(0.3, 2, 1.0);
        let rates = collect_rates(&mut scheduler, 6);
        assert!(rates.iter().all(|&r| r == 0.3));
    }
}

// ============================================================================
// ExponentialDecay Tests
// ============================================================================

mod exponential_tests {
    use super::*;

    #[test]
    fn test_exponential_sequence() {
        let mut scheduler = ExponentialDecay::new(0.9, 0.5);
        let rates = collect_rates(&mut scheduler, 4);
        assert_eq!(rates, vec![0.9, 0.45, 0.225, 0.1125]);
    }

    #[test]
    fn test_exponential_reset() {
        let mut scheduler = ExponentialDecay::new(0.5, 0.9);
        for _ in 0..5 {
            scheduler.step();
        }
        assert!(scheduler.get_rate() < 0.5);
        scheduler.reset();
        assert_eq!(scheduler.get_rate(), 0.5);
    }

    #[test]
    fn test_exponential_matches_closed_form() {
        let mut scheduler = ExponentialDecay::new(0.2, 0.99);
        for _ in 0..50 {
            scheduler.step();
        }
        assert!((scheduler.get_rate() - 0.2 * 0.99f64.powi(50)).abs() < 1e-15);
    }
}

// ============================================================================
// Builder Tests
// ============================================================================

mod builder_tests {
    use super::*;

    #[test]
    fn test_build_constant() {
        let mut scheduler = build_scheduler(Some(&schedule("constant", None, None)), 0.7);
        let rates = collect_rates(scheduler.as_mut(), 5);
        assert!(rates.iter().all(|&r| r == 0.7));
    }

    #[test]
    fn test_build_step_decay() {
        let config = schedule("step_decay", Some(2), Some(0.1));
        let mut scheduler = build_scheduler(Some(&config), 1.0);
        let rates = collect_rates(scheduler.as_mut(), 3);
        assert_eq!(rates[0], 1.0);
        assert_eq!(rates[1], 1.0);
        assert!((rates[2] - 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_build_exponential() {
        let config = schedule("exponential", None, Some(0.5));
        let mut scheduler = build_scheduler(Some(&config), 0.4);
        let rates = collect_rates(scheduler.as_mut(), 3);
        assert_eq!(rates, vec![0.4, 0.2, 0.1]);
    }

    #[test]
    fn test_missing_schedule_is_constant() {
        let mut scheduler = build_scheduler(None, 0.25);
        let mut reference = Constant::new(0.25);
        assert_eq!(
            collect_rates(scheduler.as_mut(), 4),
            collect_rates(&mut reference, 4)
        );
    }
}
