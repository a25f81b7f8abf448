use ndarray::{s, Array2, ArrayView2, ArrayViewMut2, Axis};

/// Kernels for one fully connected layer stored as an `[out, in + 1]` view of
/// the flat buffer, column 0 being the bias.
///
/// The bias column is never materialised on the input side: `[1 | A] · Wᵀ` is
/// computed as `A · W[:, 1..]ᵀ + W[:, 0]`.
pub struct DenseLayer<'a> {
    weights: ArrayView2<'a, f64>,
}

impl<'a> DenseLayer<'a> {
    pub fn new(weights: ArrayView2<'a, f64>) -> Self {
        DenseLayer { weights }
    }

    pub fn input_size(&self) -> usize {
        self.weights.ncols() - 1
    }

    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Pre-activations `Z = [1 | inputs] · Wᵀ`, shape `[n, out]`.
    pub fn forward_batch(&self, inputs: ArrayView2<f64>) -> Array2<f64> {
        let mut outputs = inputs.dot(&self.weights.slice(s![.., 1..]).t());
        outputs += &self.weights.column(0);
        outputs
    }

    /// Write the batch-averaged gradient `δᵀ · [1 | inputs] / n` into `gradient`.
    pub fn accumulate_gradient(
        &self,
        inputs: ArrayView2<f64>,
        error_signal: ArrayView2<f64>,
        gradient: &mut ArrayViewMut2<f64>,
    ) {
        let scale = 1.0 / error_signal.nrows() as f64;
        gradient
            .column_mut(0)
            .assign(&(error_signal.sum_axis(Axis(0)) * scale));
        gradient
            .slice_mut(s![.., 1..])
            .assign(&(error_signal.t().dot(&inputs) * scale));
    }

    /// Error signal with respect to this layer's inputs: `δ · W[:, 1..]`.
    pub fn backward_batch(&self, error_signal: ArrayView2<f64>) -> Array2<f64> {
        error_signal.dot(&self.weights.slice(s![.., 1..]))
    }
}
