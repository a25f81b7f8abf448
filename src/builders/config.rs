use crate::error::Result;
use crate::layers::WeightInit;
use crate::optimizer::GradientClipper;
use crate::trainer::TrainConfig;

/// Fluent construction of a validated `TrainConfig`
#[derive(Debug, Clone, Default)]
pub struct TrainConfigBuilder {
    config: TrainConfig,
}

impl TrainConfigBuilder {
    pub fn new() -> Self {
        TrainConfigBuilder {
            config: TrainConfig::default(),
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn n_iters(mut self, n_iters: usize) -> Self {
        self.config.n_iters = n_iters;
        self
    }

    pub fn clipper(mut self, clipper: GradientClipper) -> Self {
        self.config.clipper = clipper;
        self
    }

    pub fn init(mut self, init: WeightInit) -> Self {
        self.config.init = init;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn log_every(mut self, epochs: usize) -> Self {
        self.config.log_every = epochs;
        self
    }

    pub fn history_size(mut self, history_size: usize) -> Self {
        self.config.history_size = history_size;
        self
    }

    pub fn build(self) -> Result<TrainConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
