use ndarray::{Array1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};

use crate::debug::{check_layers, count_non_finite};
use crate::error::{EngineError, Result};
use crate::layers::WeightInit;
use crate::loss::Loss;
use crate::metrics::{MetricsTracker, TrainingMetrics};
use crate::network::Network;
use crate::optimizer::{GradientClipper, Optimizer, SGD};

/// Hyper-parameters of one training call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    /// Number of full-batch epochs; `0` returns the initial buffer unchanged
    pub n_iters: usize,
    pub clipper: GradientClipper,
    pub init: WeightInit,
    pub seed: u64,
    /// Emit a progress `debug!` every this many epochs, `0` to disable
    pub log_every: usize,
    /// Per-series bound of the metrics history in the report
    pub history_size: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 0.01,
            n_iters: 1000,
            clipper: GradientClipper::default(),
            init: WeightInit::default(),
            seed: 42,
            log_every: 0,
            history_size: 1000,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(EngineError::invalid_architecture(format!(
                "learning rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !self.clipper.validate() {
            return Err(EngineError::invalid_architecture(format!(
                "invalid gradient clipper {:?}",
                self.clipper
            )));
        }
        self.init.validate()
    }

    /// Parse a JSON config document; missing fields take their defaults.
    pub fn from_json(document: &str) -> Result<Self> {
        let config: TrainConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Where the training loop is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainState {
    Initialized,
    Training { epoch: usize },
    /// The gradient at `epoch` was exactly zero, so no further update could move the weights
    Converged { epoch: usize },
    IterationLimitReached,
}

impl TrainState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TrainState::Converged { .. } | TrainState::IterationLimitReached)
    }
}

/// Outcome of a successful `fit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub state: TrainState,
    /// Updates applied to the weights
    pub epochs_run: usize,
    /// Natural loss of the returned weights
    pub final_loss: f64,
    pub history: TrainingMetrics,
}

/// Full-batch gradient descent over a flat weight buffer.
pub struct Trainer {
    network: Network,
    config: TrainConfig,
    optimizer: SGD,
}

impl Trainer {
    pub fn new(network: Network, config: TrainConfig) -> Self {
        Trainer {
            network,
            config,
            optimizer: SGD::new(),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Fresh flat buffer drawn with the configured init and seed.
    pub fn initialize(&self) -> Result<Array1<f64>> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.config.init.initialize(self.network.architecture(), &mut rng)
    }

    /// Initialize then fit, returning the trained buffer.
    pub fn train(&mut self, inputs: ArrayView2<f64>, targets: ArrayView2<f64>) -> Result<(Array1<f64>, TrainingReport)> {
        let mut flat = self.initialize()?;
        let report = self.fit(inputs, targets, &mut flat)?;
        Ok((flat, report))
    }

    /// Train `flat` in place. On error `flat` is left as it was passed in.
    pub fn fit(
        &mut self,
        inputs: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        flat: &mut Array1<f64>,
    ) -> Result<TrainingReport> {
        self.config.validate()?;
        self.network.check_inputs(inputs)?;
        self.network.check_targets(inputs, targets)?;
        self.network.layout().check_len(flat.len())?;

        log::debug!(
            "Training {:?} ({:?} hidden, {:?} output) on {} samples: lr={}, n_iters={}",
            self.network.architecture().widths(),
            self.network.hidden_activation(),
            self.network.output_activation(),
            inputs.nrows(),
            self.config.learning_rate,
            self.config.n_iters
        );

        let loss = self.network.output_activation().loss();
        let mut tracker = MetricsTracker::new(self.config.history_size);
        let mut weights = flat.clone();
        let mut state = TrainState::Initialized;
        let mut epochs_run = 0;

        for epoch in 1..=self.config.n_iters {
            state = TrainState::Training { epoch };

            let pass = self.network.forward(inputs, weights.view())?;
            let epoch_loss = loss.compute_batch(pass.output(), targets);
            let mut gradient = self.network.backward(&pass, targets, weights.view())?;
            let outcome = self.config.clipper.clip(&mut gradient);
            tracker.record_epoch(epoch_loss, outcome.norm, outcome.clipped);

            if outcome.norm == 0.0 {
                state = TrainState::Converged { epoch };
                break;
            }

            self.optimizer.update_weights(&mut weights, &gradient, self.config.learning_rate);
            epochs_run = epoch;

            let non_finite = count_non_finite(weights.view());
            if non_finite > 0 {
                check_layers(self.network.layout(), weights.view())?;
                return Err(EngineError::NumericDivergence { epoch, non_finite });
            }

            if self.config.log_every > 0 && epoch % self.config.log_every == 0 {
                log::debug!(
                    "Epoch {}: loss={:.6}, gradient norm={:.6}, clipped={}",
                    epoch,
                    epoch_loss,
                    outcome.norm,
                    outcome.clipped
                );
            }
        }

        if !matches!(state, TrainState::Converged { .. }) {
            state = TrainState::IterationLimitReached;
        }

        let final_loss = loss.compute_batch(self.network.predict(inputs, weights.view())?.view(), targets);
        log::info!(
            "Training finished in state {:?} after {} epochs, final loss {:.6}",
            state,
            epochs_run,
            final_loss
        );

        *flat = weights;
        Ok(TrainingReport {
            state,
            epochs_run,
            final_loss,
            history: tracker.into_metrics(),
        })
    }
}
