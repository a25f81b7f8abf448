use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::activations::{HiddenActivation, OutputActivation};
use crate::error::{EngineError, Result};
use crate::layers::{Architecture, DenseLayer, WeightLayout};

/// Every activation produced by one forward pass, layer 0 being the input batch.
/// Backpropagation reads all of them; prediction only needs the last.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    activations: Vec<Array2<f64>>,
}

impl ForwardPass {
    pub fn activations(&self) -> &[Array2<f64>] {
        &self.activations
    }

    /// Output of the final layer, shape `[n, k]`.
    pub fn output(&self) -> ArrayView2<f64> {
        self.activations[self.activations.len() - 1].view()
    }

    pub fn into_output(mut self) -> Array2<f64> {
        self.activations.pop().unwrap_or_default()
    }
}

/// A feed-forward network description: architecture, layout of its flat weight
/// buffer and the two activation kinds. It owns no weights, so one `Network`
/// can drive any number of independent buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    architecture: Architecture,
    layout: WeightLayout,
    hidden: HiddenActivation,
    output: OutputActivation,
}

impl Network {
    pub fn new(architecture: Architecture, hidden: HiddenActivation, output: OutputActivation) -> Self {
        let layout = WeightLayout::new(&architecture);
        Network {
            architecture,
            layout,
            hidden,
            output,
        }
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn layout(&self) -> &WeightLayout {
        &self.layout
    }

    pub fn hidden_activation(&self) -> HiddenActivation {
        self.hidden
    }

    pub fn output_activation(&self) -> OutputActivation {
        self.output
    }

    pub fn input_dim(&self) -> usize {
        self.architecture.input_dim()
    }

    pub fn output_dim(&self) -> usize {
        self.architecture.output_dim()
    }

    /// Validate an input batch `[n, d]` with `n >= 1`.
    pub fn check_inputs(&self, inputs: ArrayView2<f64>) -> Result<()> {
        if inputs.nrows() == 0 {
            return Err(EngineError::shape_mismatch(
                "X rows".to_string(),
                "at least 1 sample".to_string(),
                "0".to_string(),
            ));
        }
        if inputs.ncols() != self.input_dim() {
            return Err(EngineError::shape_mismatch(
                "X columns".to_string(),
                self.input_dim().to_string(),
                inputs.ncols().to_string(),
            ));
        }
        Ok(())
    }

    /// Validate a target batch against an input batch: `[n, k]`.
    pub fn check_targets(&self, inputs: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<()> {
        let expected = (inputs.nrows(), self.output_dim());
        if targets.dim() != expected {
            return Err(EngineError::shape_mismatch(
                "Y".to_string(),
                format!("{:?}", expected),
                format!("{:?}", targets.dim()),
            ));
        }
        Ok(())
    }

    /// Perform a forward pass over the whole batch, keeping every activation.
    pub fn forward(&self, inputs: ArrayView2<f64>, flat: ArrayView1<f64>) -> Result<ForwardPass> {
        self.check_inputs(inputs)?;
        let weights = self.layout.decode(flat)?;
        let last = weights.len() - 1;

        let mut activations = Vec::with_capacity(weights.len() + 1);
        activations.push(inputs.to_owned());
        for (i, matrix) in weights.iter().enumerate() {
            let layer = DenseLayer::new(matrix.view());
            let mut outputs = layer.forward_batch(activations[i].view());
            if i == last {
                self.output.apply_batch(&mut outputs);
            } else {
                self.hidden.apply_batch(&mut outputs);
            }
            activations.push(outputs);
        }
        Ok(ForwardPass { activations })
    }

    /// Gradient of the natural loss with respect to every weight, laid out like
    /// the flat buffer and averaged over the batch.
    ///
    /// The output error signal is `prediction - target`; each earlier layer gets
    /// `(δ · W[:, 1..]) ⊙ f'(A)`.
    pub fn backward(
        &self,
        pass: &ForwardPass,
        targets: ArrayView2<f64>,
        flat: ArrayView1<f64>,
    ) -> Result<Array1<f64>> {
        let activations = pass.activations();
        if activations.len() != self.architecture.num_layers() + 1 {
            return Err(EngineError::shape_mismatch(
                "forward pass".to_string(),
                format!("{} activations", self.architecture.num_layers() + 1),
                format!("{} activations", activations.len()),
            ));
        }
        self.check_targets(activations[0].view(), targets)?;
        let weights = self.layout.decode(flat)?;

        let mut gradient = Array1::zeros(self.layout.len());
        {
            let mut gradients = self.layout.decode_mut(gradient.view_mut())?;
            let mut error_signal = &pass.output() - &targets;

            for i in (0..weights.len()).rev() {
                let layer = DenseLayer::new(weights[i].view());
                layer.accumulate_gradient(activations[i].view(), error_signal.view(), &mut gradients[i]);

                if i != 0 {
                    let propagated = layer.backward_batch(error_signal.view());
                    error_signal = propagated * &self.hidden.derivative_from_output(activations[i].view());
                }
            }
        }
        Ok(gradient)
    }

    /// Output of the final layer only.
    pub fn predict(&self, inputs: ArrayView2<f64>, flat: ArrayView1<f64>) -> Result<Array2<f64>> {
        Ok(self.forward(inputs, flat)?.into_output())
    }
}
