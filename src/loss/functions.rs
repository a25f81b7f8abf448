use ndarray::{ArrayView2, Axis};
use serde::{Serialize, Deserialize};

/// Trait defining the interface for loss functions.
///
/// Only the loss value is computed here. The gradient at the logits is always
/// `prediction - target` under each output activation's natural pairing, and the
/// backward pass produces it directly.
pub trait Loss: Send + Sync {
    /// Compute the loss for a batch of predictions and targets, averaged over samples
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64;
}

/// Mean Squared Error loss (halved, so its gradient is `prediction - target`)
pub struct MSE;

impl Loss for MSE {
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64 {
        let diff = &predictions - &targets;
        (&diff * &diff).sum() / (2.0 * predictions.nrows() as f64)
    }
}

/// Binary cross-entropy for sigmoid outputs
pub struct BinaryCrossEntropy;

impl Loss for BinaryCrossEntropy {
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64 {
        let epsilon = 1e-12;
        let total: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &t)| {
                let p = p.clamp(epsilon, 1.0 - epsilon);
                -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
            })
            .sum();
        total / predictions.nrows() as f64
    }
}

/// Cross-entropy loss for softmax outputs and one-hot targets
pub struct CrossEntropyLoss;

impl Loss for CrossEntropyLoss {
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64 {
        let epsilon = 1e-12;
        let mut total_loss = 0.0;
        for (pred_row, target_row) in predictions.axis_iter(Axis(0))
            .zip(targets.axis_iter(Axis(0))) {
            total_loss += -target_row.iter()
                .zip(pred_row.iter())
                .map(|(&t, &p)| t * p.max(epsilon).ln())
                .sum::<f64>();
        }
        total_loss / predictions.nrows() as f64
    }
}

/// Fraction of samples whose `±1` decision disagrees with the target
pub struct PerceptronLoss;

impl Loss for PerceptronLoss {
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64 {
        let wrong = predictions.axis_iter(Axis(0))
            .zip(targets.axis_iter(Axis(0)))
            .filter(|(p, t)| p.iter().zip(t.iter()).any(|(a, b)| a != b))
            .count();
        wrong as f64 / predictions.nrows() as f64
    }
}

/// The closed set of losses, one per output activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossKind {
    MeanSquaredError,
    BinaryCrossEntropy,
    CategoricalCrossEntropy,
    Perceptron,
}

impl Loss for LossKind {
    fn compute_batch(&self, predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> f64 {
        match self {
            LossKind::MeanSquaredError => MSE.compute_batch(predictions, targets),
            LossKind::BinaryCrossEntropy => BinaryCrossEntropy.compute_batch(predictions, targets),
            LossKind::CategoricalCrossEntropy => CrossEntropyLoss.compute_batch(predictions, targets),
            LossKind::Perceptron => PerceptronLoss.compute_batch(predictions, targets),
        }
    }
}
