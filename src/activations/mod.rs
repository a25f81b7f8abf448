//! # Activation Functions Module
//!
//! Hidden layers and the output layer draw from two closed sets, chosen once per
//! training call and matched once per layer, never per element.
//!
//! ## Hidden activations
//!
//! - **ReLU**: `max(0, x)`, derivative `1[A > 0]`
//! - **Tanh**: hyperbolic tangent, derivative `1 - A²`
//!
//! ## Output activations
//!
//! - **Sigmoid**: `1 / (1 + e^(-x))`, binary probability
//! - **Softmax**: `exp(z_j - max z) / Σ exp(z_i - max z)`, applied row-wise
//! - **Linear**: identity, regression
//! - **Sign**: `±1` perceptron decision
//!
//! The softmax Jacobian is never formed: paired with cross-entropy the gradient at
//! the logits collapses to `prediction - target`, and the backward pass uses that
//! form for every output kind.
//!
//! ## Usage Example
//!
//! ```rust
//! use ml_library::activations::OutputActivation;
//! use ndarray::array;
//!
//! let mut logits = array![[1.0, 2.0, 3.0]];
//! OutputActivation::Softmax.apply_batch(&mut logits);
//! assert!((logits.sum() - 1.0).abs() < 1e-12);
//! ```

pub mod functions;

pub use functions::{HiddenActivation, OutputActivation};
