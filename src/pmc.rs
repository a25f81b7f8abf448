//! Multi-layer perceptron entry points shared by the C and Python bindings.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::activations::{HiddenActivation, OutputActivation};
use crate::error::{EngineError, Result};
use crate::layers::Architecture;
use crate::network::Network;
use crate::parallel::predict_auto;
use crate::trainer::{TrainConfig, Trainer, TrainingReport};

/// Hidden widths as received from a host, where they are signed integers.
pub fn hidden_widths(sizes: &[i64]) -> Result<Vec<usize>> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            usize::try_from(w).map_err(|_| {
                EngineError::invalid_architecture(format!("hidden layer {} has negative width {}", i, w))
            })
        })
        .collect()
}

/// Network from the boundary description `[d] ++ hidden ++ [k]` and activation codes.
pub fn network_from_codes(
    input_dim: usize,
    hidden: &[usize],
    output_dim: usize,
    hidden_code: usize,
    output_code: usize,
) -> Result<Network> {
    let architecture = Architecture::from_parts(input_dim, hidden, output_dim)?;
    Ok(Network::new(
        architecture,
        HiddenActivation::from_code(hidden_code)?,
        OutputActivation::from_code(output_code)?,
    ))
}

/// Train a fresh network with default config apart from `learning_rate` and `n_iters`.
pub fn train_pmc(
    network: Network,
    inputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    learning_rate: f64,
    n_iters: usize,
) -> Result<(Array1<f64>, TrainingReport)> {
    let config = TrainConfig {
        learning_rate,
        n_iters,
        ..TrainConfig::default()
    };
    train_pmc_with(network, inputs, targets, config)
}

pub fn train_pmc_with(
    network: Network,
    inputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    config: TrainConfig,
) -> Result<(Array1<f64>, TrainingReport)> {
    Trainer::new(network, config).train(inputs, targets)
}

/// Stateless prediction from a flat buffer, parallel for large batches.
pub fn predict_pmc(network: &Network, inputs: ArrayView2<f64>, flat: ArrayView1<f64>) -> Result<Array2<f64>> {
    predict_auto(network, inputs, flat)
}
