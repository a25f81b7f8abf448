//! Parallel prediction using ndarray's rayon integration.
//!
//! Rows are independent at inference time, so a batch can be split across
//! threads without any shared state. Training stays serial: every epoch needs
//! the gradient of the whole batch before the single update.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use ndarray::parallel::prelude::*;

use crate::error::Result;
use crate::network::Network;

/// Row count from which the boundary switches to `predict_parallel`
pub const PARALLEL_THRESHOLD: usize = 1024;

/// Forward every row of `inputs` on the rayon pool.
///
/// Matches `Network::predict` up to floating-point rounding of the matrix
/// products.
pub fn predict_parallel(network: &Network, inputs: ArrayView2<f64>, flat: ArrayView1<f64>) -> Result<Array2<f64>> {
    network.check_inputs(inputs)?;
    network.layout().check_len(flat.len())?;

    let rows: Vec<Array2<f64>> = inputs
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| network.predict(row.insert_axis(Axis(0)), flat))
        .collect::<Result<Vec<_>>>()?;

    let mut outputs = Array2::zeros((inputs.nrows(), network.output_dim()));
    for (mut target, row) in outputs.axis_iter_mut(Axis(0)).zip(rows.iter()) {
        target.assign(&row.row(0));
    }
    Ok(outputs)
}

/// `predict_parallel` for large batches, the serial path otherwise.
pub fn predict_auto(network: &Network, inputs: ArrayView2<f64>, flat: ArrayView1<f64>) -> Result<Array2<f64>> {
    if inputs.nrows() >= PARALLEL_THRESHOLD {
        predict_parallel(network, inputs, flat)
    } else {
        network.predict(inputs, flat)
    }
}
