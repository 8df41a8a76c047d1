//! Three-layer backpropagation with a table-driven tanh
//!
//! This library trains a fixed input → hidden → output network with
//! full-batch gradient descent and momentum. Activations use a
//! piecewise-linear tanh approximation with a guaranteed error bound.
//!
//! # Modules
//!
//! - `utils`: precision trait, activation functions, RNG, rate schedules
//! - `layers`: per-transition weights, biases and velocities
//! - `network`: topology and the network parameter state
//! - `patterns`: in-memory training patterns
//! - `optimizers`: momentum update rule
//! - `trainer`: the forward/backward/update loop
//! - `config`: training parameters and their JSON loader
//! - `error`: error type shared by all of the above
//!
//! # Example
//!
//! ```
//! use tanh_backprop::config::TrainingConfig;
//! use tanh_backprop::network::NetworkState;
//! use tanh_backprop::patterns::PatternSet;
//! use tanh_backprop::trainer::Trainer;
//! use tanh_backprop::utils::{SimpleRng, TanhInterpolator};
//!
//! let patterns = PatternSet::from_rows(&[
//!     (vec![0.0, 0.0], vec![-1.0]),
//!     (vec![1.0, 1.0], vec![1.0]),
//! ])
//! .unwrap();
//! let config = TrainingConfig::new(50, 2, 0.1, 0.5);
//!
//! let mut network = NetworkState::<f64>::allocate(config.topology(2, 1).unwrap()).unwrap();
//! network.initialize_uniform(&mut SimpleRng::new(7), 0.5);
//!
//! let tanh = TanhInterpolator::<f64>::with_defaults();
//! let mut trainer = Trainer::new(network, &patterns, &tanh, &config).unwrap();
//! let report = trainer.run().unwrap();
//! assert_eq!(report.generations, 50);
//! ```

pub mod config;
pub mod error;
pub mod layers;
pub mod network;
pub mod optimizers;
pub mod patterns;
pub mod trainer;
pub mod utils;

pub use error::{Result, TrainError};
