//! Layer parameter storage
//!
//! This module provides the per-transition parameter block (weights, biases,
//! and their momentum velocities) used by the network state.

pub mod dense;

pub use dense::{compute_net_inputs, DenseLayer};
