use ndarray::{ArrayView1, ArrayView2};

use crate::error::{EngineError, Result};
use crate::loss::Loss;
use crate::network::Network;

/// Compare the analytical gradient of `network` against central finite differences
/// of its natural loss. Returns the largest absolute difference over all weights.
///
/// The perceptron output is piecewise constant and has no useful numerical gradient.
pub fn gradient_check(
    network: &Network,
    inputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    flat: ArrayView1<f64>,
    epsilon: f64,
) -> Result<f64> {
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err(EngineError::invalid_architecture(format!(
            "finite-difference step must be positive, got {}",
            epsilon
        )));
    }
    let loss = network.output_activation().loss();

    let pass = network.forward(inputs, flat)?;
    let analytical = network.backward(&pass, targets, flat)?;

    let mut probe = flat.to_owned();
    let mut max_diff = 0.0f64;
    for i in 0..probe.len() {
        let original = probe[i];

        probe[i] = original + epsilon;
        let loss_plus = loss.compute_batch(network.predict(inputs, probe.view())?.view(), targets);

        probe[i] = original - epsilon;
        let loss_minus = loss.compute_batch(network.predict(inputs, probe.view())?.view(), targets);

        probe[i] = original;

        let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
        max_diff = max_diff.max((numerical - analytical[i]).abs());
    }

    Ok(max_diff)
}
