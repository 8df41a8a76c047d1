//! Shared utilities for the trainer
//!
//! This module provides the precision trait, the activation functions, the
//! seeded RNG used for weight initialization, and rate schedules.

pub mod activations;
pub mod lr_scheduler;
pub mod real;
pub mod rng;

pub use activations::{Activation, ExactTanh, TanhInterpolator};
pub use real::Real;
pub use rng::SimpleRng;
