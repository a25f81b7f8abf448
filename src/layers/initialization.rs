use ndarray::{s, Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::{Normal, Uniform};
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};

use crate::error::{EngineError, Result};
use super::layout::{Architecture, WeightLayout};

/// Weight initialization strategies for the flat buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization, zero biases
    XavierUniform,

    /// Xavier/Glorot normal initialization, zero biases
    XavierNormal,

    /// Uniform distribution with custom range, biases included
    Uniform { min: f64, max: f64 },

    /// All zeros. Only sound for single-layer models, which have no hidden
    /// units whose symmetry needs breaking.
    Zeros,
}

impl Default for WeightInit {
    fn default() -> Self {
        WeightInit::Uniform { min: -0.5, max: 0.5 }
    }
}

impl WeightInit {
    pub fn validate(&self) -> Result<()> {
        match *self {
            WeightInit::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite() && min < max) {
                    return Err(EngineError::invalid_architecture(format!(
                        "uniform init needs finite min < max, got [{}, {})",
                        min, max
                    )));
                }
            }
            WeightInit::XavierUniform | WeightInit::XavierNormal | WeightInit::Zeros => {}
        }
        Ok(())
    }

    /// Produce an initial flat buffer for `architecture`.
    pub fn initialize(&self, architecture: &Architecture, rng: &mut StdRng) -> Result<Array1<f64>> {
        self.validate()?;
        let layout = WeightLayout::new(architecture);

        if let WeightInit::Uniform { min, max } = *self {
            return Ok(Array1::random_using(layout.len(), Uniform::new(min, max), rng));
        }

        let mut flat = Array1::zeros(layout.len());
        {
            let layers = layout.decode_mut(flat.view_mut())?;
            for mut matrix in layers {
                let (fan_out, cols) = matrix.dim();
                let shape = (fan_out, cols - 1);
                let weights = self.initialize_weights(shape, rng)?;
                matrix.slice_mut(s![.., 1..]).assign(&weights);
            }
        }
        Ok(flat)
    }

    /// Initialize one `[fan_out, fan_in]` weight block (bias column excluded)
    fn initialize_weights(&self, shape: (usize, usize), rng: &mut StdRng) -> Result<Array2<f64>> {
        let (fan_out, fan_in) = shape;

        match *self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                Ok(Array2::random_using(shape, Uniform::new(-limit, limit), rng))
            }

            WeightInit::XavierNormal => {
                let std = (2.0 / (fan_in + fan_out) as f64).sqrt();
                let normal = Normal::new(0.0, std)
                    .map_err(|e| EngineError::invalid_architecture(e.to_string()))?;
                Ok(Array2::random_using(shape, normal, rng))
            }

            WeightInit::Uniform { min, max } => {
                Ok(Array2::random_using(shape, Uniform::new(min, max), rng))
            }

            WeightInit::Zeros => Ok(Array2::zeros(shape)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_xavier_keeps_bias_column_zero() {
        let arch = Architecture::new(&[3, 5, 2]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let flat = WeightInit::XavierUniform.initialize(&arch, &mut rng).unwrap();
        let layout = WeightLayout::new(&arch);
        for matrix in layout.decode(flat.view()).unwrap() {
            assert!(matrix.column(0).iter().all(|&b| b == 0.0));
            assert!(matrix.slice(s![.., 1..]).iter().any(|&w| w != 0.0));
        }
    }

    #[test]
    fn test_invalid_uniform_range_rejected() {
        let arch = Architecture::new(&[2, 1]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let init = WeightInit::Uniform { min: 0.5, max: 0.5 };
        assert!(init.initialize(&arch, &mut rng).is_err());
    }
}
