pub mod gradient_clipper;

use ndarray::Array1;
use serde::{Serialize, Deserialize};

pub use gradient_clipper::{ClipOutcome, GradientClipper};

pub trait Optimizer {
    fn update_weights(&mut self, weights: &mut Array1<f64>, gradients: &Array1<f64>, learning_rate: f64);
}

/// Plain full-batch gradient descent: `flat -= lr * gradient`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct SGD;

impl SGD {
    pub fn new() -> SGD {
        SGD
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, weights: &mut Array1<f64>, gradients: &Array1<f64>, learning_rate: f64) {
        weights.zip_mut_with(gradients, |w, &g| *w -= learning_rate * g);
    }
}
