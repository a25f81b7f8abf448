//! # ml_library - Stateless Feed-Forward Training Engine
//!
//! `ml_library` trains multi-layer perceptrons and single-layer linear models by
//! full-batch gradient descent over one contiguous weight buffer (regression
//! also has a closed-form least-squares solver). Hosts call it
//! through a C ABI (or Python with the `python` feature), hand over row-major
//! samples and receive the trained flat buffer back. No state survives a call.
//!
//! ## Key Features
//!
//! - **Flat weight buffer**: every layer is an `[out, in + 1]` view into one
//!   `Array1<f64>`, bias in column 0
//! - **Closed activations**: ReLU/Tanh hidden layers; Sigmoid, Softmax or Linear output
//! - **Stable training**: global-norm gradient clipping and a per-epoch finiteness check
//! - **Linear models**: perceptron, softmax classifier and least-squares regression
//! - **Boundary**: status-code C functions and optional Python bindings
//!
//! ## Quick Start
//!
//! ```rust
//! use ml_library::activations::{HiddenActivation, OutputActivation};
//! use ml_library::builders::{NetworkBuilder, TrainConfigBuilder};
//! use ml_library::trainer::Trainer;
//! use ndarray::array;
//!
//! let network = NetworkBuilder::new()
//!     .input(2)
//!     .add_hidden(4)
//!     .output(1)
//!     .hidden_activation(HiddenActivation::Tanh)
//!     .output_activation(OutputActivation::Linear)
//!     .build()
//!     .unwrap();
//! let config = TrainConfigBuilder::new()
//!     .learning_rate(0.1)
//!     .n_iters(100)
//!     .build()
//!     .unwrap();
//!
//! let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//! let y = array![[-1.0], [1.0], [1.0], [-1.0]];
//! let mut trainer = Trainer::new(network, config);
//! let (weights, report) = trainer.train(x.view(), y.view()).unwrap();
//! assert_eq!(weights.len(), 17);
//! assert!(report.final_loss.is_finite());
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Hidden and output activation kinds
//! - [`bindings`] - C ABI entry points and Python bindings
//! - [`builders`] - Builder patterns for networks and training configs
//! - [`debug`] - Numerical checks and finite-difference gradient checking
//! - [`error`] - Error types and boundary status codes
//! - [`layers`] - Architecture, weight layout codec, initialization and dense kernels
//! - [`linear`] - Perceptron and multiclass trainers, closed-form regression
//! - [`loss`] - Loss values for reporting
//! - [`metrics`] - Accuracy helpers and training history
//! - [`network`] - Forward and backward passes over a flat buffer
//! - [`optimizer`] - Gradient clipping and the update rule
//! - [`parallel`] - Row-parallel prediction
//! - [`pmc`] - Multi-layer perceptron entry points shared by the bindings
//! - [`trainer`] - Training loop state machine and configuration

pub mod activations;
pub mod bindings;
pub mod builders;
pub mod debug;
pub mod error;
pub mod layers;
pub mod linear;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod parallel;
pub mod pmc;
pub mod trainer;

#[cfg(test)]
mod tests;
