use crate::activations::{HiddenActivation, OutputActivation};
use crate::error::{EngineError, Result};
use crate::layers::Architecture;
use crate::network::Network;

/// Builder for constructing networks with a fluent API
pub struct NetworkBuilder {
    input_dim: Option<usize>,
    hidden: Vec<usize>,
    output_dim: Option<usize>,
    hidden_activation: HiddenActivation,
    output_activation: OutputActivation,
}

impl NetworkBuilder {
    /// Create a new network builder
    pub fn new() -> Self {
        NetworkBuilder {
            input_dim: None,
            hidden: Vec::new(),
            output_dim: None,
            hidden_activation: HiddenActivation::default(),
            output_activation: OutputActivation::default(),
        }
    }

    pub fn input(mut self, input_dim: usize) -> Self {
        self.input_dim = Some(input_dim);
        self
    }

    /// Append one hidden layer of `width` units
    pub fn add_hidden(mut self, width: usize) -> Self {
        self.hidden.push(width);
        self
    }

    /// Append a sequence of hidden layers
    pub fn add_hidden_layers(mut self, widths: &[usize]) -> Self {
        self.hidden.extend_from_slice(widths);
        self
    }

    pub fn output(mut self, output_dim: usize) -> Self {
        self.output_dim = Some(output_dim);
        self
    }

    pub fn hidden_activation(mut self, activation: HiddenActivation) -> Self {
        self.hidden_activation = activation;
        self
    }

    pub fn output_activation(mut self, activation: OutputActivation) -> Self {
        self.output_activation = activation;
        self
    }

    /// Build the network
    pub fn build(self) -> Result<Network> {
        let input_dim = self
            .input_dim
            .ok_or_else(|| EngineError::invalid_architecture("input dimension not specified"))?;
        let output_dim = self
            .output_dim
            .ok_or_else(|| EngineError::invalid_architecture("output dimension not specified"))?;

        let architecture = Architecture::from_parts(input_dim, &self.hidden, output_dim)?;
        Ok(Network::new(architecture, self.hidden_activation, self.output_activation))
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
