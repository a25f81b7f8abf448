//! Single-layer models with architecture `[d, k]`. The perceptrons train
//! through the same gradient engine as the multi-layer perceptron from zero
//! initial weights; regression is solved in closed form.
//!
//! The returned buffers are `[bias, w1, ..., wd]` for one output and
//! `k` such rows, row-major, for `k` outputs.

use nalgebra::{DMatrix, DVector, SVD};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::activations::{HiddenActivation, OutputActivation};
use crate::error::{EngineError, Result};
use crate::layers::{Architecture, WeightInit};
use crate::metrics::argmax;
use crate::network::Network;
use crate::trainer::{TrainConfig, Trainer, TrainingReport};

/// Singular values below `REGRESSION_RCOND * σ_max` are treated as zero.
pub const REGRESSION_RCOND: f64 = 1e-12;
const SVD_MAX_ITERATIONS: usize = 10_000;

fn single_layer(input_dim: usize, output_dim: usize, output: OutputActivation) -> Result<Network> {
    let architecture = Architecture::new(&[input_dim, output_dim])?;
    // a single layer has no hidden units, so the hidden kind is never applied
    Ok(Network::new(architecture, HiddenActivation::default(), output))
}

fn train_single_layer(
    inputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    output: OutputActivation,
    learning_rate: f64,
    n_iters: usize,
) -> Result<(Array1<f64>, TrainingReport)> {
    let network = single_layer(inputs.ncols(), targets.ncols(), output)?;
    let config = TrainConfig {
        learning_rate,
        n_iters,
        init: WeightInit::Zeros,
        ..TrainConfig::default()
    };
    Trainer::new(network, config).train(inputs, targets)
}

fn column_targets(targets: ArrayView1<f64>) -> ArrayView2<f64> {
    targets.insert_axis(Axis(1))
}

/// Binary perceptron on `±1` labels. Output is `sign(score)` with `score >= 0 -> +1`;
/// the batch update moves the weights by the mean of `target - prediction`
/// times the misclassified samples.
pub fn train_perceptron_binary(
    inputs: ArrayView2<f64>,
    labels: ArrayView1<f64>,
    learning_rate: f64,
    n_iters: usize,
) -> Result<(Array1<f64>, TrainingReport)> {
    if let Some(bad) = labels.iter().find(|&&y| y != 1.0 && y != -1.0) {
        return Err(EngineError::shape_mismatch(
            "perceptron labels".to_string(),
            "values in {-1, +1}".to_string(),
            bad.to_string(),
        ));
    }
    train_single_layer(inputs, column_targets(labels), OutputActivation::Sign, learning_rate, n_iters)
}

/// Multiclass linear classifier on one-hot targets `[n, k]`, softmax output.
pub fn train_perceptron_multiclass(
    inputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    learning_rate: f64,
    n_iters: usize,
) -> Result<(Array1<f64>, TrainingReport)> {
    train_single_layer(inputs, targets, OutputActivation::Softmax, learning_rate, n_iters)
}

/// Least-squares linear regression, `w = [1 | X]⁺ · y`.
///
/// The pseudo-inverse comes from an SVD of the bias-augmented design matrix,
/// so rank-deficient (collinear) inputs get the minimum-norm solution.
pub fn train_regression(inputs: ArrayView2<f64>, targets: ArrayView1<f64>) -> Result<Array1<f64>> {
    let (n, d) = inputs.dim();
    Architecture::new(&[d, 1])?;
    if n == 0 {
        return Err(EngineError::shape_mismatch("X".to_string(), "at least one sample".to_string(), "0 rows".to_string()));
    }
    if targets.len() != n {
        return Err(EngineError::shape_mismatch("Y".to_string(), format!("{} values", n), format!("{} values", targets.len())));
    }
    let non_finite = inputs.iter().chain(targets.iter()).filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        return Err(EngineError::shape_mismatch(
            "regression data".to_string(),
            "finite values".to_string(),
            format!("{} non-finite entries", non_finite),
        ));
    }

    let design = DMatrix::from_fn(n, d + 1, |i, j| if j == 0 { 1.0 } else { inputs[[i, j - 1]] });
    let y = DVector::from_iterator(n, targets.iter().copied());

    let svd = SVD::try_new(design, true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(EngineError::NumericDivergence { epoch: 0, non_finite: 0 })?;
    let tolerance = svd.singular_values.max() * REGRESSION_RCOND;
    let pinv = svd
        .pseudo_inverse(tolerance)
        .map_err(|msg| EngineError::invalid_architecture(format!("pseudo-inverse: {}", msg)))?;

    let weights: Array1<f64> = (pinv * y).iter().copied().collect();
    let non_finite = weights.iter().filter(|w| !w.is_finite()).count();
    if non_finite > 0 {
        return Err(EngineError::NumericDivergence { epoch: 0, non_finite });
    }
    log::debug!("train_regression: n={} d={} tolerance={:e}", n, d, tolerance);
    Ok(weights)
}

/// Regression by gradient descent from zero through the shared trainer.
pub fn train_regression_with(
    inputs: ArrayView2<f64>,
    targets: ArrayView1<f64>,
    learning_rate: f64,
    n_iters: usize,
) -> Result<(Array1<f64>, TrainingReport)> {
    train_single_layer(inputs, column_targets(targets), OutputActivation::Linear, learning_rate, n_iters)
}

/// Raw scores `[1 | X] · Wᵀ`, shape `[n, k]`, for a single-layer buffer.
pub fn predict_linear(inputs: ArrayView2<f64>, weights: ArrayView1<f64>, output_dim: usize) -> Result<Array2<f64>> {
    if output_dim == 0 {
        return Err(EngineError::invalid_architecture("output dimension must be non-zero"));
    }
    single_layer(inputs.ncols(), output_dim, OutputActivation::Linear)?.predict(inputs, weights)
}

/// `±1` decisions of a binary perceptron buffer.
pub fn predict_sign(inputs: ArrayView2<f64>, weights: ArrayView1<f64>) -> Result<Array1<f64>> {
    let scores = predict_linear(inputs, weights, 1)?;
    Ok(scores.column(0).mapv(|s| if s >= 0.0 { 1.0 } else { -1.0 }))
}

/// Class index per sample for a `[k, d + 1]` buffer.
pub fn predict_argmax(inputs: ArrayView2<f64>, weights: ArrayView1<f64>, n_classes: usize) -> Result<Vec<usize>> {
    let scores = predict_linear(inputs, weights, n_classes)?;
    Ok(scores.axis_iter(Axis(0)).map(argmax).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_predict_sign_treats_zero_as_positive() {
        let w = array![0.0, 1.0];
        let x = array![[0.0], [-1.0], [2.0]];
        assert_eq!(predict_sign(x.view(), w.view()).unwrap(), array![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_predict_argmax_reads_rows_as_classes() {
        // class 0 prefers x < 0, class 1 prefers x > 0
        let w = array![0.0, -1.0, 0.0, 1.0];
        let x = array![[-2.0], [3.0]];
        assert_eq!(predict_argmax(x.view(), w.view(), 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_perceptron_rejects_non_sign_labels() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 0.0];
        let result = train_perceptron_binary(x.view(), y.view(), 0.1, 10);
        assert!(matches!(result, Err(EngineError::ShapeMismatch { .. })));
    }
}
