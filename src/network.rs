//! Network topology and parameter state for a three-layer network.

use crate::error::{zeroed, Result, TrainError};
use crate::layers::DenseLayer;
use crate::utils::{Activation, Real, SimpleRng};

/// Node counts of the input, hidden and output layers.
///
/// Every buffer size in a training run derives from these three numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    inputs: usize,
    hidden: usize,
    outputs: usize,
}

impl Topology {
    /// # Errors
    ///
    /// `InvalidConfig` if any count is zero.
    pub fn new(inputs: usize, hidden: usize, outputs: usize) -> Result<Self> {
        for (name, count) in [("input", inputs), ("hidden", hidden), ("output", outputs)] {
            if count == 0 {
                return Err(TrainError::invalid(format!(
                    "{name} node count must be positive"
                )));
            }
        }
        Ok(Self {
            inputs,
            hidden,
            outputs,
        })
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn hidden(&self) -> usize {
        self.hidden
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }
}

/// Weights, biases and velocities of the input→hidden and hidden→output
/// transitions.
///
/// Values are zero after [`allocate`](Self::allocate); populate them with
/// [`initialize_uniform`](Self::initialize_uniform) or through the layer
/// accessors before training.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState<T: Real> {
    topology: Topology,
    hidden: DenseLayer<T>,
    output: DenseLayer<T>,
}

impl<T: Real> NetworkState<T> {
    pub fn allocate(topology: Topology) -> Result<Self> {
        Ok(Self {
            topology,
            hidden: DenseLayer::new(topology.hidden, topology.inputs)?,
            output: DenseLayer::new(topology.outputs, topology.hidden)?,
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Input→hidden transition.
    pub fn hidden(&self) -> &DenseLayer<T> {
        &self.hidden
    }

    pub fn hidden_mut(&mut self) -> &mut DenseLayer<T> {
        &mut self.hidden
    }

    /// Hidden→output transition.
    pub fn output(&self) -> &DenseLayer<T> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut DenseLayer<T> {
        &mut self.output
    }

    /// Both layers, mutably, for a simultaneous update.
    pub(crate) fn layers_mut(&mut self) -> (&mut DenseLayer<T>, &mut DenseLayer<T>) {
        (&mut self.hidden, &mut self.output)
    }

    /// Draw every weight and bias uniformly from `[-limit, limit)` and clear
    /// the velocities.
    pub fn initialize_uniform(&mut self, rng: &mut SimpleRng, limit: f64) {
        self.hidden.initialize_uniform(rng, limit);
        self.output.initialize_uniform(rng, limit);
        self.hidden.reset_velocity();
        self.output.reset_velocity();
    }

    /// Forward pass for one pattern.
    ///
    /// Writes hidden activations into `hidden` and output activations into
    /// `output`; both must be sized from the topology.
    pub fn forward<A: Activation<T>>(
        &self,
        activation: &A,
        input: &[T],
        hidden: &mut [T],
        output: &mut [T],
    ) {
        self.hidden.compute_net_inputs(hidden, input);
        for value in hidden.iter_mut() {
            *value = activation.evaluate(*value);
        }

        self.output.compute_net_inputs(output, hidden);
        for value in output.iter_mut() {
            *value = activation.evaluate(*value);
        }
    }

    /// Output activations for a single input vector.
    ///
    /// # Errors
    ///
    /// `TopologyMismatch` if `input` has the wrong width, `Allocation` if the
    /// scratch buffers cannot be reserved.
    pub fn predict<A: Activation<T>>(&self, activation: &A, input: &[T]) -> Result<Vec<T>> {
        if input.len() != self.topology.inputs {
            return Err(TrainError::TopologyMismatch {
                what: "input",
                expected: self.topology.inputs,
                found: input.len(),
            });
        }
        let mut hidden = zeroed("hidden activations", self.topology.hidden)?;
        let mut output = zeroed("output activations", self.topology.outputs)?;
        self.forward(activation, input, &mut hidden, &mut output);
        Ok(output)
    }
}
