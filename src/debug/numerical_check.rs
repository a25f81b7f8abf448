use ndarray::ArrayView1;

use crate::error::Result;
use crate::layers::WeightLayout;

/// Magnitude above which a finite value is reported as an overflow risk
pub const OVERFLOW_THRESHOLD: f64 = 1e150;

/// Types of numerical issues
#[derive(Debug, Clone, PartialEq)]
pub enum NumericalIssue {
    NaN { count: usize },
    Infinity { count: usize },
    Overflow { count: usize },
}

impl NumericalIssue {
    pub fn count(&self) -> usize {
        match *self {
            NumericalIssue::NaN { count }
            | NumericalIssue::Infinity { count }
            | NumericalIssue::Overflow { count } => count,
        }
    }

    /// NaN and infinities are fatal; overflow risk is only a warning.
    pub fn is_non_finite(&self) -> bool {
        !matches!(self, NumericalIssue::Overflow { .. })
    }
}

/// Check a flat buffer for numerical issues
pub fn check_buffer(values: ArrayView1<f64>) -> Vec<NumericalIssue> {
    let mut nan_count = 0;
    let mut inf_count = 0;
    let mut overflow_count = 0;

    for &value in values.iter() {
        if value.is_nan() {
            nan_count += 1;
        } else if value.is_infinite() {
            inf_count += 1;
        } else if value.abs() > OVERFLOW_THRESHOLD {
            overflow_count += 1;
        }
    }

    let mut issues = Vec::new();
    if nan_count > 0 {
        issues.push(NumericalIssue::NaN { count: nan_count });
    }
    if inf_count > 0 {
        issues.push(NumericalIssue::Infinity { count: inf_count });
    }
    if overflow_count > 0 {
        issues.push(NumericalIssue::Overflow { count: overflow_count });
    }
    issues
}

/// Check every layer of a flat weight buffer, logging what each one holds.
/// Returns the issues per layer, in layer order.
pub fn check_layers(layout: &WeightLayout, flat: ArrayView1<f64>) -> Result<Vec<Vec<NumericalIssue>>> {
    let layers = layout.decode(flat)?;
    let mut report = Vec::with_capacity(layers.len());

    for (layer_idx, matrix) in layers.iter().enumerate() {
        let values = matrix.iter().copied().collect::<ndarray::Array1<f64>>();
        let issues = check_buffer(values.view());
        for issue in &issues {
            match issue {
                NumericalIssue::NaN { count } => {
                    log::warn!("Layer {}: Found {} NaN values in weights", layer_idx, count)
                }
                NumericalIssue::Infinity { count } => {
                    log::warn!("Layer {}: Found {} infinite values in weights", layer_idx, count)
                }
                NumericalIssue::Overflow { count } => {
                    log::warn!("Layer {}: Found {} overflow risk values in weights", layer_idx, count)
                }
            }
        }
        report.push(issues);
    }

    Ok(report)
}

/// Number of NaN or infinite entries
pub fn count_non_finite(values: ArrayView1<f64>) -> usize {
    values.iter().filter(|v| !v.is_finite()).count()
}

pub fn is_finite(values: ArrayView1<f64>) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Largest absolute entry, `0.0` for an empty buffer. NaN entries are skipped.
pub fn max_abs(values: ArrayView1<f64>) -> f64 {
    values.iter().fold(0.0f64, |acc, &v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::Architecture;
    use ndarray::{array, Array1};

    #[test]
    fn test_check_buffer_counts_each_kind() {
        let values = array![1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e200, -2.0];
        let issues = check_buffer(values.view());
        assert_eq!(
            issues,
            vec![
                NumericalIssue::NaN { count: 1 },
                NumericalIssue::Infinity { count: 2 },
                NumericalIssue::Overflow { count: 1 },
            ]
        );
        assert_eq!(count_non_finite(values.view()), 3);
        assert!(!is_finite(values.view()));
    }

    #[test]
    fn test_check_layers_reports_the_broken_layer() {
        let arch = Architecture::new(&[2, 2, 1]).unwrap();
        let layout = WeightLayout::new(&arch);
        let mut flat = Array1::zeros(layout.len());
        // first entry of the second layer
        flat[6] = f64::NAN;
        let report = check_layers(&layout, flat.view()).unwrap();
        assert!(report[0].is_empty());
        assert_eq!(report[1], vec![NumericalIssue::NaN { count: 1 }]);
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(array![-3.0, 2.0, 0.5].view()), 3.0);
        assert_eq!(max_abs(Array1::<f64>::zeros(0).view()), 0.0);
    }
}
