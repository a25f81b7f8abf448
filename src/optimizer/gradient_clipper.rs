use ndarray::Array1;
use serde::{Serialize, Deserialize};

/// Gradient clipping methods, applied to the whole flat gradient before the update
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum GradientClipper {
    /// Clip gradients by value
    ClipByValue { min: f64, max: f64 },

    /// Rescale the gradient so its global L2 norm is at most `max_norm`.
    /// With learning rate `lr` no weight then moves by more than `lr * max_norm`
    /// per epoch.
    ClipByGlobalNorm { max_norm: f64 },

    /// No clipping
    None,
}

impl Default for GradientClipper {
    fn default() -> Self {
        GradientClipper::ClipByGlobalNorm { max_norm: 1.0 }
    }
}

/// What clipping saw and did for one epoch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipOutcome {
    /// Global L2 norm before clipping
    pub norm: f64,
    pub clipped: bool,
}

impl GradientClipper {
    /// Compute global norm of a flat gradient.
    ///
    /// Entries are divided by the largest magnitude before squaring, so the
    /// norm stays finite for any finite gradient.
    pub fn global_norm(gradient: &Array1<f64>) -> f64 {
        let scale = gradient.iter().fold(0.0_f64, |m, &g| m.max(g.abs()));
        if scale == 0.0 || !scale.is_finite() {
            return scale;
        }
        scale * gradient.iter().map(|&g| (g / scale) * (g / scale)).sum::<f64>().sqrt()
    }

    /// Largest step any single weight can take with this clipper and `learning_rate`,
    /// `None` when unbounded.
    pub fn max_step(&self, learning_rate: f64) -> Option<f64> {
        match *self {
            GradientClipper::ClipByValue { min, max } => Some(learning_rate * min.abs().max(max.abs())),
            GradientClipper::ClipByGlobalNorm { max_norm } => Some(learning_rate * max_norm),
            GradientClipper::None => None,
        }
    }

    /// Clip `gradient` in place.
    pub fn clip(&self, gradient: &mut Array1<f64>) -> ClipOutcome {
        let norm = Self::global_norm(gradient);

        let clipped = match *self {
            GradientClipper::ClipByValue { min, max } => {
                let mut changed = false;
                gradient.mapv_inplace(|g| {
                    let c = g.max(min).min(max);
                    changed |= c != g;
                    c
                });
                changed
            }

            GradientClipper::ClipByGlobalNorm { max_norm } => {
                if norm > max_norm {
                    let scale = max_norm / norm;
                    gradient.mapv_inplace(|g| g * scale);
                    true
                } else {
                    false
                }
            }

            GradientClipper::None => false,
        };

        ClipOutcome { norm, clipped }
    }

    pub fn validate(&self) -> bool {
        match *self {
            GradientClipper::ClipByValue { min, max } => min.is_finite() && max.is_finite() && min < max,
            GradientClipper::ClipByGlobalNorm { max_norm } => max_norm.is_finite() && max_norm > 0.0,
            GradientClipper::None => true,
        }
    }
}
