//! Per-generation schedules for the learning rate and momentum coefficient
//!
//! The trainer asks each scheduler for the current rate before a weight update
//! and advances it once per generation. `Constant` keeps plain momentum
//! backpropagation; the decaying schedules shrink the step as training
//! progresses.

use crate::config::ScheduleConfig;

/// Core trait for rate schedulers.
///
/// # Example
///
/// ```
/// use tanh_backprop::utils::lr_scheduler::{RateScheduler, StepDecay};
///
/// let mut scheduler = StepDecay::new(0.5, 2, 0.5);
/// scheduler.step();
/// assert_eq!(scheduler.get_rate(), 0.5);
/// scheduler.step();
/// assert_eq!(scheduler.get_rate(), 0.25);
/// scheduler.reset();
/// assert_eq!(scheduler.get_rate(), 0.5);
/// ```
pub trait RateScheduler: Send {
    /// Rate for the current generation.
    fn get_rate(&self) -> f64;

    /// Advance to the next generation.
    fn step(&mut self);

    /// Return to generation 0.
    fn reset(&mut self);
}

/// Rate that never changes.
#[derive(Debug, Clone)]
pub struct Constant {
    rate: f64,
}

impl Constant {
    /// Creates a scheduler that always returns `rate`.
    ///
    /// # Example
    ///
    /// ```
    /// use tanh_backprop::utils::lr_scheduler::{Constant, RateScheduler};
    ///
    /// let mut scheduler = Constant::new(0.9);
    /// scheduler.step();
    /// assert_eq!(scheduler.get_rate(), 0.9);
    /// ```
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl RateScheduler for Constant {
    fn get_rate(&self) -> f64 {
        self.rate
    }

    fn step(&mut self) {}

    fn reset(&mut self) {}
}

/// Multiplies the rate by `gamma` every `step_size` generations.
///
/// Formula: rate = initial · gamma^(generation / step_size)
#[derive(Debug, Clone)]
pub struct StepDecay {
    initial: f64,
    step_size: usize,
    gamma: f64,
    generation: usize,
    current: f64,
}

impl StepDecay {
    /// Creates a new step decay scheduler.
    ///
    /// # Arguments
    ///
    /// * `initial` - Rate for the first `step_size` generations
    /// * `step_size` - Generations between two decays (0 is treated as 1;
    ///   `validate_config` rejects it for configuration-driven schedules)
    /// * `gamma` - Decay factor applied at each step
    ///
    /// # Example
    ///
    /// ```
    /// use tanh_backprop::utils::lr_scheduler::{RateScheduler, StepDecay};
    ///
    /// // 0.4 for generations 0-9, 0.2 for generations 10-19, etc.
    /// let mut scheduler = StepDecay::new(0.4, 10, 0.5);
    /// for _ in 0..10 {
    ///     scheduler.step();
    /// }
    /// assert_eq!(scheduler.get_rate(), 0.2);
    /// ```
    pub fn new(initial: f64, step_size: usize, gamma: f64) -> Self {
        Self {
            initial,
            step_size: step_size.max(1),
            gamma,
            generation: 0,
            current: initial,
        }
    }
}

impl RateScheduler for StepDecay {
    fn get_rate(&self) -> f64 {
        self.current
    }

    fn step(&mut self) {
        self.generation += 1;
        let num_decays = self.generation / self.step_size;
        self.current = self.initial * self.gamma.powi(num_decays as i32);
    }

    fn reset(&mut self) {
        self.generation = 0;
        self.current = self.initial;
    }
}

/// Multiplies the rate by `gamma` every generation.
///
/// Formula: rate = initial · gamma^generation
#[derive(Debug, Clone)]
pub struct ExponentialDecay {
    initial: f64,
    gamma: f64,
    generation: usize,
    current: f64,
}

impl ExponentialDecay {
    /// Creates a new exponential decay scheduler.
    ///
    /// # Arguments
    ///
    /// * `initial` - Rate at generation 0
    /// * `gamma` - Decay factor applied every generation (typically 0.99-0.999)
    ///
    /// # Example
    ///
    /// ```
    /// use tanh_backprop::utils::lr_scheduler::{ExponentialDecay, RateScheduler};
    ///
    /// // 0.5 at generation 0, 0.25 at generation 1, 0.125 at generation 2
    /// let mut scheduler = ExponentialDecay::new(0.5, 0.5);
    /// scheduler.step();
    /// scheduler.step();
    /// assert_eq!(scheduler.get_rate(), 0.125);
    /// ```
    pub fn new(initial: f64, gamma: f64) -> Self {
        Self {
            initial,
            gamma,
            generation: 0,
            current: initial,
        }
    }
}

impl RateScheduler for ExponentialDecay {
    fn get_rate(&self) -> f64 {
        self.current
    }

    fn step(&mut self) {
        self.generation += 1;
        self.current = self.initial * self.gamma.powi(self.generation as i32);
    }

    fn reset(&mut self) {
        self.generation = 0;
        self.current = self.initial;
    }
}

/// Build the scheduler described by `config`, starting at `initial`.
///
/// A missing schedule means a constant rate. Unknown types are rejected by
/// `validate_config` before this is reached and fall back to constant here.
///
/// # Arguments
///
/// * `config` - Schedule description, usually `eta_schedule` or
///   `alpha_schedule` of a `TrainingConfig`
/// * `initial` - Rate at generation 0 (`eta` or `alpha`)
pub fn build_scheduler(config: Option<&ScheduleConfig>, initial: f64) -> Box<dyn RateScheduler> {
    let Some(config) = config else {
        return Box::new(Constant::new(initial));
    };

    match config.schedule_type.as_str() {
        "step_decay" => Box::new(StepDecay::new(
            initial,
            config.step_size.unwrap_or(1),
            config.gamma.unwrap_or(1.0),
        )),
        "exponential" => Box::new(ExponentialDecay::new(initial, config.gamma.unwrap_or(1.0))),
        _ => Box::new(Constant::new(initial)),
    }
}
