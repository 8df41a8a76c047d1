//! Training pattern storage.
//!
//! Inputs and targets are kept in two flat, pattern-major buffers: row `p` of
//! the input buffer is pattern `p`'s input vector, row `p` of the target
//! buffer its target vector. Filling them (file parsing, normalization) is
//! the caller's business.

use crate::error::{Result, TrainError};
use crate::utils::Real;

/// An immutable set of (input, target) pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSet<T: Real> {
    input_len: usize,
    target_len: usize,
    count: usize,
    inputs: Vec<T>,
    targets: Vec<T>,
}

impl<T: Real> PatternSet<T> {
    /// Wrap row-major `inputs` and `targets`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for zero widths, an empty set, or buffers that do not
    /// describe the same number of whole patterns.
    ///
    /// # Example
    ///
    /// ```
    /// use tanh_backprop::patterns::PatternSet;
    ///
    /// let set = PatternSet::new(2, 1, vec![0.0, 1.0, 1.0, 1.0], vec![1.0, -1.0]).unwrap();
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.input(1), &[1.0, 1.0]);
    /// ```
    pub fn new(input_len: usize, target_len: usize, inputs: Vec<T>, targets: Vec<T>) -> Result<Self> {
        if input_len == 0 || target_len == 0 {
            return Err(TrainError::invalid(format!(
                "pattern widths must be positive, got input {input_len} and target {target_len}"
            )));
        }
        if inputs.len() % input_len != 0 || targets.len() % target_len != 0 {
            return Err(TrainError::invalid(
                "pattern buffers must hold whole rows",
            ));
        }

        let count = inputs.len() / input_len;
        if count == 0 {
            return Err(TrainError::invalid("pattern set is empty"));
        }
        if targets.len() / target_len != count {
            return Err(TrainError::invalid(format!(
                "{count} input rows but {} target rows",
                targets.len() / target_len
            )));
        }

        Ok(Self {
            input_len,
            target_len,
            count,
            inputs,
            targets,
        })
    }

    /// Build from `(input, target)` rows; widths are taken from the first row.
    pub fn from_rows(rows: &[(Vec<T>, Vec<T>)]) -> Result<Self> {
        let Some((first_input, first_target)) = rows.first() else {
            return Err(TrainError::invalid("pattern set is empty"));
        };
        let (input_len, target_len) = (first_input.len(), first_target.len());

        let mut inputs = Vec::with_capacity(rows.len() * input_len);
        let mut targets = Vec::with_capacity(rows.len() * target_len);
        for (p, (input, target)) in rows.iter().enumerate() {
            if input.len() != input_len || target.len() != target_len {
                return Err(TrainError::invalid(format!(
                    "pattern {p} has widths {}/{}, expected {input_len}/{target_len}",
                    input.len(),
                    target.len()
                )));
            }
            inputs.extend_from_slice(input);
            targets.extend_from_slice(target);
        }

        Self::new(input_len, target_len, inputs, targets)
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Always false: empty sets are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn input(&self, p: usize) -> &[T] {
        &self.inputs[p * self.input_len..(p + 1) * self.input_len]
    }

    pub fn target(&self, p: usize) -> &[T] {
        &self.targets[p * self.target_len..(p + 1) * self.target_len]
    }

    pub fn inputs(&self) -> &[T] {
        &self.inputs
    }

    pub fn targets(&self) -> &[T] {
        &self.targets
    }
}
