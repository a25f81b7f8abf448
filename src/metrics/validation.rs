use ndarray::{ArrayView2, Axis};

use crate::error::{EngineError, Result};

fn check_same_shape(predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<()> {
    if predictions.dim() != targets.dim() {
        return Err(EngineError::shape_mismatch(
            "targets".to_string(),
            format!("{:?}", predictions.dim()),
            format!("{:?}", targets.dim()),
        ));
    }
    if predictions.nrows() == 0 {
        return Err(EngineError::shape_mismatch("predictions", "at least 1 sample", "0"));
    }
    Ok(())
}

fn fraction(hits: usize, total: usize) -> f64 {
    hits as f64 / total as f64
}

/// Fraction of samples whose sign (`>= 0` is `+1`) matches a `±1` target.
/// Every output column must agree for a sample to count.
pub fn sign_accuracy(predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64> {
    check_same_shape(predictions, targets)?;
    let hits = predictions
        .axis_iter(Axis(0))
        .zip(targets.axis_iter(Axis(0)))
        .filter(|(p, t)| {
            p.iter()
                .zip(t.iter())
                .all(|(&p, &t)| (p >= 0.0) == (t >= 0.0))
        })
        .count();
    Ok(fraction(hits, predictions.nrows()))
}

/// Fraction of samples where `prediction > threshold` agrees with `target > threshold`.
pub fn threshold_accuracy(
    predictions: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    threshold: f64,
) -> Result<f64> {
    check_same_shape(predictions, targets)?;
    let hits = predictions
        .axis_iter(Axis(0))
        .zip(targets.axis_iter(Axis(0)))
        .filter(|(p, t)| {
            p.iter()
                .zip(t.iter())
                .all(|(&p, &t)| (p > threshold) == (t > threshold))
        })
        .count();
    Ok(fraction(hits, predictions.nrows()))
}

/// Index of the largest entry, first one on ties.
pub fn argmax(row: ndarray::ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }
    best
}

/// Fraction of samples whose arg-max class matches the one-hot target's.
pub fn argmax_accuracy(predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64> {
    check_same_shape(predictions, targets)?;
    let hits = predictions
        .axis_iter(Axis(0))
        .zip(targets.axis_iter(Axis(0)))
        .filter(|(p, t)| argmax(p.view()) == argmax(t.view()))
        .count();
    Ok(fraction(hits, predictions.nrows()))
}

pub fn mean_squared_error(predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64> {
    check_same_shape(predictions, targets)?;
    let diff = &predictions - &targets;
    Ok(diff.mapv(|d| d * d).sum() / diff.len() as f64)
}

pub fn mean_absolute_error(predictions: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<f64> {
    check_same_shape(predictions, targets)?;
    let diff = &predictions - &targets;
    Ok(diff.mapv(f64::abs).sum() / diff.len() as f64)
}
