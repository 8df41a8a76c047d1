//! Error types for configuration, allocation and training runs.

use std::collections::TryReserveError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TrainError>;

/// Everything that can abort a training run.
///
/// Activation evaluation never fails, so there is no variant for it.
#[derive(Error, Debug)]
pub enum TrainError {
    /// Non-positive node or pattern counts, malformed parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A buffer could not be reserved. Fatal for the run.
    #[error("failed to allocate {what} ({requested} elements)")]
    Allocation {
        what: &'static str,
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// Pattern widths or the configured hidden size disagree with the
    /// network topology.
    #[error("{what} width {found} does not match topology ({expected})")]
    TopologyMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The trainer already completed `max_generations`.
    #[error("training run already finished; allocate a new trainer")]
    RunFinished,

    /// `apply_updates` was called without a forward/backward pass since the
    /// previous update.
    #[error("no fresh forward/backward pass to apply")]
    StaleDeltas,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrainError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        TrainError::InvalidConfig(message.into())
    }
}

/// Allocate a zero-filled buffer, reporting failure instead of aborting.
pub(crate) fn zeroed<T: Copy + Default>(what: &'static str, len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| TrainError::Allocation {
            what,
            requested: len,
            source,
        })?;
    buffer.resize(len, T::default());
    Ok(buffer)
}
