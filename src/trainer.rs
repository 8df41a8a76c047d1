//! Full-batch backpropagation with momentum.
//!
//! One generation runs a forward pass and a backward pass for every pattern,
//! storing activations and deltas per pattern, and only then updates the
//! weights once from the batch sums. All buffers are sized from the topology
//! when the trainer is created and owned by it for the whole run.

use tracing::{debug, info, warn};

use crate::config::{validate_config, ErrorAccumulation, TrainingConfig};
use crate::error::{zeroed, Result, TrainError};
use crate::network::NetworkState;
use crate::optimizers::{MomentumSgd, Optimizer};
use crate::patterns::PatternSet;
use crate::utils::lr_scheduler::{build_scheduler, RateScheduler};
use crate::utils::{Activation, Real};

/// Lifecycle of a trainer. There is no early exit: a run ends only after
/// `max_generations` generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    /// Buffers sized, no generation run yet.
    Allocated,
    /// `generation` is the index of the next generation to run.
    Training { generation: usize },
    Done,
}

/// Outcome of [`Trainer::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport<T: Real> {
    /// Generations completed.
    pub generations: usize,
    /// Mean squared error observed during each generation's forward pass,
    /// i.e. before that generation's update. Independent of the
    /// [`ErrorAccumulation`] mode.
    pub mse_history: Vec<T>,
    /// Mean squared error of the final weights.
    pub final_mse: T,
}

/// Batch trainer for a three-layer tanh network.
///
/// `A` is any [`Activation`]; pass `&TanhInterpolator` to share one table
/// between several trainers, or `ExactTanh` for the reference function.
pub struct Trainer<'a, T: Real, A: Activation<T>> {
    network: NetworkState<T>,
    patterns: &'a PatternSet<T>,
    activation: A,
    optimizer: MomentumSgd<T>,
    eta_schedule: Box<dyn RateScheduler>,
    alpha_schedule: Box<dyn RateScheduler>,
    error_accumulation: ErrorAccumulation,
    max_generations: usize,
    log_every: usize,
    generation: usize,
    state: TrainerState,

    // per pattern, row-major
    hidden_out: Vec<T>,
    output_out: Vec<T>,
    hidden_delta: Vec<T>,
    output_delta: Vec<T>,
    pattern_error: Vec<T>,
    generation_mse: T,
    // set by forward_backward, consumed by apply_updates
    deltas_fresh: bool,

    // batch gradient sums, shaped like the parameters
    hidden_weight_sums: Vec<T>,
    hidden_bias_sums: Vec<T>,
    output_weight_sums: Vec<T>,
    output_bias_sums: Vec<T>,
}

impl<'a, T: Real, A: Activation<T>> Trainer<'a, T, A> {
    /// Validate the run and allocate every per-pattern buffer.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for out-of-range parameters
    /// - `TopologyMismatch` if pattern widths or `num_hidden_nodes` disagree
    ///   with the network
    /// - `Allocation` if a buffer cannot be reserved
    pub fn new(
        network: NetworkState<T>,
        patterns: &'a PatternSet<T>,
        activation: A,
        config: &TrainingConfig,
    ) -> Result<Self> {
        validate_config(config)?;

        let topology = network.topology();
        for (what, expected, found) in [
            ("pattern input", topology.inputs(), patterns.input_len()),
            ("pattern target", topology.outputs(), patterns.target_len()),
            ("hidden layer", topology.hidden(), config.num_hidden_nodes),
        ] {
            if expected != found {
                return Err(TrainError::TopologyMismatch {
                    what,
                    expected,
                    found,
                });
            }
        }

        if config.lambda != 0.0 {
            warn!(lambda = config.lambda, "weight decay is accepted but not applied");
        }
        if config.err_toll != 0.0 {
            warn!(
                err_toll = config.err_toll,
                "error tolerance is accepted but not used as a stopping rule"
            );
        }

        let n_patterns = patterns.len();
        let per_pattern = |width: usize| {
            n_patterns
                .checked_mul(width)
                .ok_or_else(|| TrainError::invalid("per-pattern buffer size overflows"))
        };

        Ok(Self {
            optimizer: MomentumSgd::new(T::of(config.eta), T::of(config.alpha)),
            eta_schedule: build_scheduler(config.eta_schedule.as_ref(), config.eta),
            alpha_schedule: build_scheduler(config.alpha_schedule.as_ref(), config.alpha),
            error_accumulation: config.error_accumulation,
            max_generations: config.max_generations,
            log_every: config.log_interval(),
            generation: 0,
            state: TrainerState::Allocated,

            hidden_out: zeroed("hidden activations", per_pattern(topology.hidden())?)?,
            output_out: zeroed("output activations", per_pattern(topology.outputs())?)?,
            hidden_delta: zeroed("hidden deltas", per_pattern(topology.hidden())?)?,
            output_delta: zeroed("output deltas", per_pattern(topology.outputs())?)?,
            pattern_error: zeroed("pattern errors", n_patterns)?,
            generation_mse: T::zero(),
            deltas_fresh: false,

            hidden_weight_sums: zeroed("hidden gradient sums", network.hidden().weights().len())?,
            hidden_bias_sums: zeroed("hidden bias sums", topology.hidden())?,
            output_weight_sums: zeroed("output gradient sums", network.output().weights().len())?,
            output_bias_sums: zeroed("output bias sums", topology.outputs())?,

            network,
            patterns,
            activation,
        })
    }

    /// Forward and backward pass over every pattern (no weight changes).
    ///
    /// Fills the activation and delta caches and adds each pattern's squared
    /// error, averaged over output nodes, to its accumulator. The mean over
    /// patterns of this pass alone becomes
    /// [`mean_squared_error`](Self::mean_squared_error).
    ///
    /// Together with [`apply_updates`](Self::apply_updates) this is one
    /// generation taken apart for inspection; neither advances the
    /// generation counter or the rate schedules.
    ///
    /// # Errors
    ///
    /// `RunFinished` once the trainer is `Done`.
    pub fn forward_backward(&mut self) -> Result<()> {
        if self.state == TrainerState::Done {
            return Err(TrainError::RunFinished);
        }

        let topology = self.network.topology();
        let (n_hidden, n_out) = (topology.hidden(), topology.outputs());
        let outputs = T::of(n_out as f64);

        if self.error_accumulation == ErrorAccumulation::PerGeneration {
            self.pattern_error.fill(T::zero());
        }

        let mut generation_total = T::zero();
        for p in 0..self.patterns.len() {
            let hidden = &mut self.hidden_out[p * n_hidden..(p + 1) * n_hidden];
            let output = &mut self.output_out[p * n_out..(p + 1) * n_out];
            self.network
                .forward(&self.activation, self.patterns.input(p), hidden, output);

            let delta_hidden = &mut self.hidden_delta[p * n_hidden..(p + 1) * n_hidden];
            let delta_output = &mut self.output_delta[p * n_out..(p + 1) * n_out];
            delta_hidden.fill(T::zero());

            let output_weights = self.network.output().weights();
            let mut error = T::zero();
            for (j, ((delta, &o), &t)) in delta_output
                .iter_mut()
                .zip(output.iter())
                .zip(self.patterns.target(p))
                .enumerate()
            {
                let diff = t - o;
                error = error + diff * diff;
                *delta = diff * self.activation.derivative_from_output(o);

                let weights_to_j = &output_weights[j * n_hidden..(j + 1) * n_hidden];
                for (acc, &w) in delta_hidden.iter_mut().zip(weights_to_j) {
                    *acc = *acc + *delta * w;
                }
            }
            let error = error / outputs;
            self.pattern_error[p] = self.pattern_error[p] + error;
            generation_total = generation_total + error;

            // only after every output node has contributed
            for (acc, &a) in delta_hidden.iter_mut().zip(hidden.iter()) {
                *acc = *acc * self.activation.derivative_from_output(a);
            }
        }
        self.generation_mse = generation_total / T::of(self.patterns.len() as f64);
        self.deltas_fresh = true;
        Ok(())
    }

    /// One momentum update of every weight and bias from the batch sums
    /// left by [`forward_backward`](Self::forward_backward).
    ///
    /// # Errors
    ///
    /// `RunFinished` once the trainer is `Done`, `StaleDeltas` if no
    /// forward/backward pass ran since the previous update.
    pub fn apply_updates(&mut self) -> Result<()> {
        if self.state == TrainerState::Done {
            return Err(TrainError::RunFinished);
        }
        if !self.deltas_fresh {
            return Err(TrainError::StaleDeltas);
        }
        self.deltas_fresh = false;

        let topology = self.network.topology();
        let n_patterns = self.patterns.len();

        accumulate_gradient_sums(
            &mut self.output_weight_sums,
            &mut self.output_bias_sums,
            &self.output_delta,
            &self.hidden_out,
            topology.outputs(),
            topology.hidden(),
            n_patterns,
        );
        accumulate_gradient_sums(
            &mut self.hidden_weight_sums,
            &mut self.hidden_bias_sums,
            &self.hidden_delta,
            self.patterns.inputs(),
            topology.hidden(),
            topology.inputs(),
            n_patterns,
        );

        self.optimizer
            .set_learning_rate(T::of(self.eta_schedule.get_rate()));
        self.optimizer
            .set_momentum(T::of(self.alpha_schedule.get_rate()));

        let (hidden_layer, output_layer) = self.network.layers_mut();

        let (weights, weight_velocity, biases, bias_velocity) = output_layer.parts_mut();
        self.optimizer
            .update(weights, weight_velocity, &self.output_weight_sums);
        self.optimizer
            .update(biases, bias_velocity, &self.output_bias_sums);

        let (weights, weight_velocity, biases, bias_velocity) = hidden_layer.parts_mut();
        self.optimizer
            .update(weights, weight_velocity, &self.hidden_weight_sums);
        self.optimizer
            .update(biases, bias_velocity, &self.hidden_bias_sums);
        Ok(())
    }

    /// Run one generation and return its mean squared error (measured
    /// before the update).
    ///
    /// # Errors
    ///
    /// `RunFinished` once `max_generations` generations have run.
    pub fn run_generation(&mut self) -> Result<T> {
        if self.generation >= self.max_generations {
            self.state = TrainerState::Done;
            return Err(TrainError::RunFinished);
        }

        self.forward_backward()?;
        let mse = self.mean_squared_error();
        self.apply_updates()?;
        self.eta_schedule.step();
        self.alpha_schedule.step();

        if self.generation % self.log_every == 0 {
            debug!(
                generation = self.generation,
                mse = mse.as_f64(),
                "generation complete"
            );
        }

        self.generation += 1;
        self.state = if self.generation == self.max_generations {
            TrainerState::Done
        } else {
            TrainerState::Training {
                generation: self.generation,
            }
        };
        Ok(mse)
    }

    /// Run every remaining generation.
    ///
    /// # Errors
    ///
    /// `RunFinished` if the trainer is already done.
    pub fn run(&mut self) -> Result<TrainingReport<T>> {
        if self.state == TrainerState::Done {
            return Err(TrainError::RunFinished);
        }

        let topology = self.network.topology();
        info!(
            inputs = topology.inputs(),
            hidden = topology.hidden(),
            outputs = topology.outputs(),
            patterns = self.patterns.len(),
            generations = self.max_generations,
            eta = self.eta_schedule.get_rate(),
            alpha = self.alpha_schedule.get_rate(),
            "starting batch training"
        );

        let remaining = self.max_generations - self.generation;
        let mut mse_history = Vec::new();
        mse_history
            .try_reserve_exact(remaining)
            .map_err(|source| TrainError::Allocation {
                what: "error history",
                requested: remaining,
                source,
            })?;
        while self.generation < self.max_generations {
            mse_history.push(self.run_generation()?);
        }
        self.state = TrainerState::Done;

        let final_mse = self.evaluate()?;
        info!(
            generations = self.generation,
            final_mse = final_mse.as_f64(),
            "batch training finished"
        );

        Ok(TrainingReport {
            generations: self.generation,
            mse_history,
            final_mse,
        })
    }

    /// Mean squared error of the latest forward pass, zero before the
    /// first one.
    ///
    /// Unlike [`pattern_errors`](Self::pattern_errors) this never includes
    /// earlier generations.
    pub fn mean_squared_error(&self) -> T {
        self.generation_mse
    }

    /// Mean squared error of the current weights, from fresh forward passes.
    ///
    /// Leaves the activation, delta and error caches untouched.
    pub fn evaluate(&self) -> Result<T> {
        let topology = self.network.topology();
        let mut hidden = zeroed("hidden activations", topology.hidden())?;
        let mut output = zeroed("output activations", topology.outputs())?;
        let outputs = T::of(topology.outputs() as f64);

        let mut total = T::zero();
        for p in 0..self.patterns.len() {
            self.network
                .forward(&self.activation, self.patterns.input(p), &mut hidden, &mut output);
            let error = output
                .iter()
                .zip(self.patterns.target(p))
                .fold(T::zero(), |acc, (&o, &t)| acc + (t - o) * (t - o));
            total = total + error / outputs;
        }
        Ok(total / T::of(self.patterns.len() as f64))
    }

    /// Per-pattern error accumulators. With `ErrorAccumulation::Running`
    /// they hold totals over every generation run so far.
    pub fn pattern_errors(&self) -> &[T] {
        &self.pattern_error
    }

    pub fn hidden_activations(&self, p: usize) -> &[T] {
        let n = self.network.topology().hidden();
        &self.hidden_out[p * n..(p + 1) * n]
    }

    pub fn output_activations(&self, p: usize) -> &[T] {
        let n = self.network.topology().outputs();
        &self.output_out[p * n..(p + 1) * n]
    }

    pub fn hidden_deltas(&self, p: usize) -> &[T] {
        let n = self.network.topology().hidden();
        &self.hidden_delta[p * n..(p + 1) * n]
    }

    pub fn output_deltas(&self, p: usize) -> &[T] {
        let n = self.network.topology().outputs();
        &self.output_delta[p * n..(p + 1) * n]
    }

    pub fn network(&self) -> &NetworkState<T> {
        &self.network
    }

    pub fn into_network(self) -> NetworkState<T> {
        self.network
    }

    pub fn patterns(&self) -> &PatternSet<T> {
        self.patterns
    }

    pub fn activation(&self) -> &A {
        &self.activation
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn max_generations(&self) -> usize {
        self.max_generations
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn optimizer(&self) -> &MomentumSgd<T> {
        &self.optimizer
    }
}

/// Batch sums for one layer transition.
///
/// `weight_sums[d, s] = Σ_p deltas[p, d] · sources[p, s]` and
/// `bias_sums[d] = Σ_p deltas[p, d]`; both summed in pattern order.
fn accumulate_gradient_sums<T: Real>(
    weight_sums: &mut [T],
    bias_sums: &mut [T],
    deltas: &[T],
    sources: &[T],
    n_dest: usize,
    n_src: usize,
    n_patterns: usize,
) {
    for d in 0..n_dest {
        let mut bias_sum = T::zero();
        for p in 0..n_patterns {
            bias_sum = bias_sum + deltas[p * n_dest + d];
        }
        bias_sums[d] = bias_sum;

        for s in 0..n_src {
            let mut sum = T::zero();
            for p in 0..n_patterns {
                sum = sum + deltas[p * n_dest + d] * sources[p * n_src + s];
            }
            weight_sums[d * n_src + s] = sum;
        }
    }
}
