//! Configuration structures for training
//!
//! This module provides the training parameter record consumed by the trainer
//! and its JSON loader.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, TrainError};
use crate::network::Topology;

/// What happens to the per-pattern error accumulators between generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorAccumulation {
    /// Zero every accumulator at the start of each generation, so
    /// `pattern_errors()` describes the latest generation only.
    #[default]
    PerGeneration,
    /// Zero once at allocation and keep adding across generations.
    Running,
}

/// Per-generation schedule for `eta` or `alpha`.
///
/// - **constant**: no fields
/// - **step_decay**: requires `step_size` and `gamma`
/// - **exponential**: requires `gamma`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleConfig {
    /// "constant", "step_decay" or "exponential"
    pub schedule_type: String,

    /// Generations between two decays (step_decay).
    pub step_size: Option<usize>,

    /// Multiplicative decay factor.
    pub gamma: Option<f64>,
}

/// Parameters of a training run.
///
/// `lambda` (weight decay) and `err_toll` (error tolerance) are accepted and
/// validated but have no effect on training: no decay term is applied and
/// no stopping rule consults the error.
///
/// # Example
///
/// ```json
/// {
///   "max_generations": 1000,
///   "num_hidden_nodes": 2,
///   "eta": 0.5,
///   "alpha": 0.9,
///   "error_accumulation": "per_generation",
///   "eta_schedule": { "schedule_type": "exponential", "gamma": 0.999 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingConfig {
    /// Number of full-batch generations to run.
    pub max_generations: usize,

    /// Hidden layer size.
    pub num_hidden_nodes: usize,

    /// Learning rate.
    pub eta: f64,

    /// Momentum coefficient.
    pub alpha: f64,

    /// Weight decay. Accepted, not applied.
    #[serde(default)]
    pub lambda: f64,

    /// Error tolerance. Accepted, not used as a stopping criterion.
    #[serde(default)]
    pub err_toll: f64,

    #[serde(default)]
    pub error_accumulation: ErrorAccumulation,

    pub eta_schedule: Option<ScheduleConfig>,

    pub alpha_schedule: Option<ScheduleConfig>,

    /// Generations between two progress log lines.
    pub log_every: Option<usize>,
}

impl TrainingConfig {
    /// Config with constant rates, per-generation error reset and no decay.
    pub fn new(max_generations: usize, num_hidden_nodes: usize, eta: f64, alpha: f64) -> Self {
        Self {
            max_generations,
            num_hidden_nodes,
            eta,
            alpha,
            lambda: 0.0,
            err_toll: 0.0,
            error_accumulation: ErrorAccumulation::PerGeneration,
            eta_schedule: None,
            alpha_schedule: None,
            log_every: None,
        }
    }

    pub fn with_error_accumulation(mut self, mode: ErrorAccumulation) -> Self {
        self.error_accumulation = mode;
        self
    }

    /// Topology for patterns with the given input and output widths.
    pub fn topology(&self, inputs: usize, outputs: usize) -> Result<Topology> {
        Topology::new(inputs, self.num_hidden_nodes, outputs)
    }

    /// Progress logging interval, at least one generation.
    pub fn log_interval(&self) -> usize {
        self.log_every.unwrap_or(100).max(1)
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `TrainingConfig` and
/// validates it.
///
/// # Errors
///
/// `Io` if the file cannot be read, `Json` if it is malformed,
/// `InvalidConfig` if a value is out of range.
///
/// # Examples
///
/// ```no_run
/// use tanh_backprop::config::load_config;
///
/// let cfg = load_config("config/xor.json").unwrap();
/// assert_eq!(cfg.num_hidden_nodes, 2);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check value ranges of a configuration.
pub fn validate_config(config: &TrainingConfig) -> Result<()> {
    if config.num_hidden_nodes == 0 {
        return Err(TrainError::invalid("num_hidden_nodes must be positive"));
    }

    if !(config.eta.is_finite() && config.eta > 0.0) {
        return Err(TrainError::invalid(format!(
            "eta must be positive and finite, got {}",
            config.eta
        )));
    }

    if !(config.alpha.is_finite() && (0.0..1.0).contains(&config.alpha)) {
        return Err(TrainError::invalid(format!(
            "alpha must be in [0, 1), got {}",
            config.alpha
        )));
    }

    if !(config.lambda.is_finite() && config.lambda >= 0.0) {
        return Err(TrainError::invalid("lambda must be non-negative"));
    }

    if !(config.err_toll.is_finite() && config.err_toll >= 0.0) {
        return Err(TrainError::invalid("err_toll must be non-negative"));
    }

    if config.log_every == Some(0) {
        return Err(TrainError::invalid("log_every must be positive"));
    }

    for (name, schedule) in [
        ("eta_schedule", &config.eta_schedule),
        ("alpha_schedule", &config.alpha_schedule),
    ] {
        if let Some(schedule) = schedule {
            validate_schedule(name, schedule)?;
        }
    }

    Ok(())
}

fn validate_schedule(name: &str, schedule: &ScheduleConfig) -> Result<()> {
    let valid_types = ["constant", "step_decay", "exponential"];
    if !valid_types.contains(&schedule.schedule_type.as_str()) {
        return Err(TrainError::invalid(format!(
            "{name}: invalid schedule type '{}'. Must be one of: {}",
            schedule.schedule_type,
            valid_types.join(", ")
        )));
    }

    let needs_gamma = schedule.schedule_type != "constant";
    if needs_gamma {
        match schedule.gamma {
            Some(gamma) if gamma.is_finite() && gamma >= 0.0 => {}
            Some(_) => {
                return Err(TrainError::invalid(format!(
                    "{name}: gamma must be non-negative"
                )))
            }
            None => return Err(TrainError::invalid(format!("{name}: gamma is required"))),
        }
    }

    if schedule.schedule_type == "step_decay" && !matches!(schedule.step_size, Some(n) if n > 0) {
        return Err(TrainError::invalid(format!(
            "{name}: step_decay requires a positive step_size"
        )));
    }

    Ok(())
}
