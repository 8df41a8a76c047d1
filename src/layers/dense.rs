//! Dense (fully connected) layer parameters
//!
//! This module provides a DenseLayer that owns one layer transition's weights,
//! biases and their momentum velocities, and the net-input primitive:
//! `dest[i] = bias[i] + Σ_j weights[i, j] · inputs[j]`

use crate::error::{zeroed, Result, TrainError};
use crate::utils::{Real, SimpleRng};

/// Compute the net inputs of a layer.
///
/// `weights` is row-major with one row per destination node, so it must hold
/// `dest.len() × inputs.len()` values; `bias` holds one value per destination
/// node. Costs `O(n_dest · n_src)` and writes nothing but `dest`.
///
/// # Example
///
/// ```
/// use tanh_backprop::layers::dense::compute_net_inputs;
///
/// let weights = [1.0, 2.0, 3.0, -1.0, 0.5, 0.0];
/// let mut dest = [0.0; 2];
/// compute_net_inputs(&mut dest, &weights, &[1.0, 1.0, 2.0], &[0.5, -0.5]);
/// assert_eq!(dest, [9.5, -1.0]);
/// ```
pub fn compute_net_inputs<T: Real>(dest: &mut [T], weights: &[T], inputs: &[T], bias: &[T]) {
    let n_src = inputs.len();
    debug_assert_eq!(weights.len(), dest.len() * n_src, "weight matrix shape");
    debug_assert_eq!(bias.len(), dest.len(), "bias length");

    if n_src == 0 {
        dest.copy_from_slice(bias);
        return;
    }

    for ((net, row), &b) in dest.iter_mut().zip(weights.chunks_exact(n_src)).zip(bias) {
        let mut sum = T::zero();
        for (&w, &x) in row.iter().zip(inputs) {
            sum = sum + w * x;
        }
        *net = sum + b;
    }
}

/// One layer transition: `rows` destination nodes fed by `cols` source nodes.
///
/// Velocities mirror the shape of the weights and biases and hold the
/// previous update step for the momentum term. All four buffers start at
/// zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer<T: Real> {
    rows: usize,
    cols: usize,
    weights: Vec<T>,
    biases: Vec<T>,
    weight_velocity: Vec<T>,
    bias_velocity: Vec<T>,
}

impl<T: Real> DenseLayer<T> {
    /// Allocate a `rows × cols` layer.
    ///
    /// # Arguments
    ///
    /// * `rows` - Destination node count
    /// * `cols` - Source node count
    ///
    /// # Returns
    ///
    /// A layer whose weights, biases and velocities are all zero
    ///
    /// # Example
    ///
    /// ```
    /// use tanh_backprop::layers::DenseLayer;
    ///
    /// let layer = DenseLayer::<f64>::new(2, 3).unwrap();
    /// assert_eq!(layer.weights().len(), 6);
    /// assert_eq!(layer.bias_velocity(), &[0.0, 0.0]);
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a zero dimension, `Allocation` if a buffer cannot
    /// be reserved.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(TrainError::invalid(format!(
                "layer dimensions must be positive, got {rows}x{cols}"
            )));
        }
        let count = rows.checked_mul(cols).ok_or_else(|| {
            TrainError::invalid(format!("layer of {rows}x{cols} weights overflows"))
        })?;

        Ok(Self {
            rows,
            cols,
            weights: zeroed("weights", count)?,
            biases: zeroed("biases", rows)?,
            weight_velocity: zeroed("weight velocity", count)?,
            bias_velocity: zeroed("bias velocity", rows)?,
        })
    }

    /// Destination node count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Source node count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Trainable values: weights plus biases.
    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Weight from source node `col` into destination node `row`.
    pub fn weight(&self, row: usize, col: usize) -> T {
        self.weights[row * self.cols + col]
    }

    pub fn set_weight(&mut self, row: usize, col: usize, value: T) {
        self.weights[row * self.cols + col] = value;
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut [T] {
        &mut self.weights
    }

    pub fn biases(&self) -> &[T] {
        &self.biases
    }

    pub fn biases_mut(&mut self) -> &mut [T] {
        &mut self.biases
    }

    pub fn weight_velocity(&self) -> &[T] {
        &self.weight_velocity
    }

    pub fn bias_velocity(&self) -> &[T] {
        &self.bias_velocity
    }

    /// Weights, biases and both velocities, borrowed together for an update.
    pub(crate) fn parts_mut(&mut self) -> (&mut [T], &mut [T], &mut [T], &mut [T]) {
        (
            &mut self.weights,
            &mut self.weight_velocity,
            &mut self.biases,
            &mut self.bias_velocity,
        )
    }

    /// Replace weights (row-major) and biases.
    ///
    /// # Arguments
    ///
    /// * `weights` - `rows × cols` values, one row per destination node
    /// * `biases` - One value per destination node
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if either slice has the wrong length.
    pub fn set_parameters(&mut self, weights: &[T], biases: &[T]) -> Result<()> {
        if weights.len() != self.weights.len() || biases.len() != self.biases.len() {
            return Err(TrainError::invalid(format!(
                "expected {} weights and {} biases, got {} and {}",
                self.weights.len(),
                self.biases.len(),
                weights.len(),
                biases.len()
            )));
        }
        self.weights.copy_from_slice(weights);
        self.biases.copy_from_slice(biases);
        Ok(())
    }

    /// Zero both velocity buffers (no momentum carried into the next update).
    pub fn reset_velocity(&mut self) {
        self.weight_velocity.fill(T::zero());
        self.bias_velocity.fill(T::zero());
    }

    /// Fill weights and biases uniformly from `[-limit, limit)`.
    ///
    /// # Arguments
    ///
    /// * `rng` - Seeded generator; the same seed gives the same weights
    /// * `limit` - Half-width of the sampling interval
    pub fn initialize_uniform(&mut self, rng: &mut SimpleRng, limit: f64) {
        for value in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            *value = rng.gen_range(-limit, limit);
        }
    }

    /// Net inputs of this layer's destination nodes for one source vector.
    pub fn compute_net_inputs(&self, dest: &mut [T], inputs: &[T]) {
        compute_net_inputs(dest, &self.weights, inputs, &self.biases);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_layer_creation() {
        let layer = DenseLayer::<f64>::new(3, 5).unwrap();

        assert_eq!(layer.rows(), 3);
        assert_eq!(layer.cols(), 5);
        assert_eq!(layer.weights().len(), 15);
        assert_eq!(layer.biases().len(), 3);
        assert_eq!(layer.weight_velocity().len(), 15);
        assert_eq!(layer.bias_velocity().len(), 3);
        assert_eq!(layer.parameter_count(), 18);
        assert!(layer.weight_velocity().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            DenseLayer::<f32>::new(0, 4),
            Err(TrainError::InvalidConfig(_))
        ));
        assert!(matches!(
            DenseLayer::<f32>::new(4, 0),
            Err(TrainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_row_major_indexing() {
        let mut layer = DenseLayer::<f64>::new(2, 3).unwrap();
        layer.set_weight(1, 2, 7.0);
        assert_eq!(layer.weights()[5], 7.0);
        assert_eq!(layer.weight(1, 2), 7.0);
    }

    #[test]
    fn test_set_parameters_checks_lengths() {
        let mut layer = DenseLayer::<f64>::new(1, 2).unwrap();
        assert!(layer.set_parameters(&[1.0, 2.0], &[3.0]).is_ok());
        assert_eq!(layer.weights(), &[1.0, 2.0]);
        assert_eq!(layer.biases(), &[3.0]);
        assert!(layer.set_parameters(&[1.0], &[3.0]).is_err());
    }

    #[test]
    fn test_deterministic_initialization() {
        let mut layer1 = DenseLayer::<f64>::new(4, 3).unwrap();
        let mut layer2 = DenseLayer::<f64>::new(4, 3).unwrap();
        layer1.initialize_uniform(&mut SimpleRng::new(42), 0.5);
        layer2.initialize_uniform(&mut SimpleRng::new(42), 0.5);

        assert_eq!(layer1, layer2);
        assert!(layer1.weights().iter().all(|w| (-0.5..0.5).contains(w)));
        assert!(layer1.biases().iter().any(|&b| b != 0.0));
    }

    #[test]
    fn test_layer_net_inputs() {
        let mut layer = DenseLayer::<f64>::new(2, 2).unwrap();
        layer
            .set_parameters(&[1.0, -1.0, 0.5, 0.25], &[0.0, 1.0])
            .unwrap();
        let mut dest = [0.0; 2];
        layer.compute_net_inputs(&mut dest, &[2.0, 4.0]);
        assert_eq!(dest, [-2.0, 3.0]);
    }
}
