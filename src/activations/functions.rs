use ndarray::{Array2, ArrayView2, Axis};
use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};
use crate::loss::LossKind;

/// Non-linearity applied by every hidden layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HiddenActivation {
    #[default]
    Relu,
    Tanh,
}

impl HiddenActivation {
    /// Decode the boundary code: `0 = ReLU`, `1 = Tanh`.
    pub fn from_code(code: usize) -> Result<Self> {
        match code {
            0 => Ok(HiddenActivation::Relu),
            1 => Ok(HiddenActivation::Tanh),
            other => Err(EngineError::invalid_architecture(format!(
                "unknown hidden activation code {}",
                other
            ))),
        }
    }

    pub fn code(&self) -> usize {
        match self {
            HiddenActivation::Relu => 0,
            HiddenActivation::Tanh => 1,
        }
    }

    /// Apply the activation to a batch of pre-activations in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f64>) {
        match self {
            HiddenActivation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            HiddenActivation::Tanh => {
                inputs.mapv_inplace(|v| v.tanh());
            }
        }
    }

    /// Derivative with respect to the pre-activation, expressed through the
    /// already computed activation `A`.
    ///
    /// ReLU uses `1[A > 0]`, which equals `1[Z > 0]` since `A = max(0, Z)`.
    pub fn derivative_from_output(&self, outputs: ArrayView2<f64>) -> Array2<f64> {
        match self {
            HiddenActivation::Relu => {
                outputs.mapv(|a| if a > 0.0 { 1.0 } else { 0.0 })
            }
            HiddenActivation::Tanh => {
                outputs.mapv(|a| 1.0 - a * a)
            }
        }
    }
}

/// Non-linearity of the final layer; it selects the task type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputActivation {
    /// Binary probability, paired with binary cross-entropy.
    #[default]
    Sigmoid,
    /// Row-wise distribution, paired with categorical cross-entropy.
    Softmax,
    /// Unconstrained value, paired with squared error.
    Linear,
    /// Perceptron decision: `+1` when the score is `>= 0`, else `-1`.
    /// Only the binary perceptron trainer uses it; it has no boundary code.
    Sign,
}

impl OutputActivation {
    /// Decode the boundary code: `0 = Sigmoid`, `1 = Softmax`, `2 = Linear`.
    pub fn from_code(code: usize) -> Result<Self> {
        match code {
            0 => Ok(OutputActivation::Sigmoid),
            1 => Ok(OutputActivation::Softmax),
            2 => Ok(OutputActivation::Linear),
            other => Err(EngineError::invalid_architecture(format!(
                "unknown output activation code {}",
                other
            ))),
        }
    }

    /// Apply the activation to a batch of logits in-place.
    pub fn apply_batch(&self, inputs: &mut Array2<f64>) {
        match self {
            OutputActivation::Sigmoid => {
                inputs.mapv_inplace(sigmoid);
            }
            OutputActivation::Softmax => {
                for mut row in inputs.axis_iter_mut(Axis(0)) {
                    let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    row.mapv_inplace(|v| (v - max).exp());
                    let sum = row.sum();
                    row.mapv_inplace(|v| v / sum);
                }
            }
            OutputActivation::Linear => {}
            OutputActivation::Sign => {
                inputs.mapv_inplace(|v| if v >= 0.0 { 1.0 } else { -1.0 });
            }
        }
    }

    /// Elementwise derivative through the computed output, when one exists.
    ///
    /// Softmax has no elementwise derivative and returns `None`; it is only ever
    /// differentiated jointly with cross-entropy.
    pub fn derivative_from_output(&self, outputs: ArrayView2<f64>) -> Option<Array2<f64>> {
        match self {
            OutputActivation::Sigmoid => Some(outputs.mapv(|a| a * (1.0 - a))),
            OutputActivation::Softmax => None,
            OutputActivation::Linear => Some(Array2::ones(outputs.dim())),
            OutputActivation::Sign => Some(Array2::zeros(outputs.dim())),
        }
    }

    /// The loss whose gradient with respect to the logits is `prediction - target`.
    pub fn loss(&self) -> LossKind {
        match self {
            OutputActivation::Sigmoid => LossKind::BinaryCrossEntropy,
            OutputActivation::Softmax => LossKind::CategoricalCrossEntropy,
            OutputActivation::Linear => LossKind::MeanSquaredError,
            OutputActivation::Sign => LossKind::Perceptron,
        }
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

