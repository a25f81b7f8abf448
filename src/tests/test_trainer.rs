use ndarray::{array, Array1};
use crate::activations::{HiddenActivation, OutputActivation};
use crate::error::EngineError;
use crate::layers::{Architecture, WeightInit};
use crate::network::Network;
use crate::optimizer::GradientClipper;
use crate::trainer::{TrainConfig, TrainState, Trainer};

fn linear_network(d: usize) -> Network {
    Network::new(
        Architecture::new(&[d, 1]).unwrap(),
        HiddenActivation::Relu,
        OutputActivation::Linear,
    )
}

#[test]
fn test_zero_iterations_returns_initial_buffer() {
    let network = Network::new(
        Architecture::new(&[2, 3, 1]).unwrap(),
        HiddenActivation::Tanh,
        OutputActivation::Sigmoid,
    );
    let config = TrainConfig { n_iters: 0, ..TrainConfig::default() };
    let mut trainer = Trainer::new(network, config);

    let initial = trainer.initialize().unwrap();
    let mut flat = initial.clone();
    let x = array![[0.0, 1.0], [1.0, 0.0]];
    let y = array![[1.0], [0.0]];
    let report = trainer.fit(x.view(), y.view(), &mut flat).unwrap();

    assert_eq!(flat, initial);
    assert_eq!(report.state, TrainState::IterationLimitReached);
    assert_eq!(report.epochs_run, 0);
    assert!(report.history.losses.is_empty());
    assert!(report.final_loss.is_finite());
}

#[test]
fn test_runs_full_budget_without_zero_gradient() {
    let config = TrainConfig {
        learning_rate: 0.05,
        n_iters: 200,
        init: WeightInit::Zeros,
        ..TrainConfig::default()
    };
    let mut trainer = Trainer::new(linear_network(1), config);
    let x = array![[1.0], [2.0], [3.0]];
    let y = array![[2.0], [4.1], [5.9]];
    let (_, report) = trainer.train(x.view(), y.view()).unwrap();

    assert_eq!(report.state, TrainState::IterationLimitReached);
    assert_eq!(report.epochs_run, 200);
    assert_eq!(report.history.epochs, 200);
    let first = report.history.losses.front().copied().unwrap();
    assert!(report.final_loss < first);
}

#[test]
fn test_zero_gradient_converges_immediately() {
    // weights already reproduce the targets exactly
    let config = TrainConfig { n_iters: 50, ..TrainConfig::default() };
    let mut trainer = Trainer::new(linear_network(1), config);
    let x = array![[1.0], [2.0]];
    let y = array![[3.0], [5.0]];
    let mut flat = array![1.0, 2.0];
    let report = trainer.fit(x.view(), y.view(), &mut flat).unwrap();

    assert_eq!(report.state, TrainState::Converged { epoch: 1 });
    assert_eq!(report.epochs_run, 0);
    assert_eq!(flat, array![1.0, 2.0]);
    assert_eq!(report.final_loss, 0.0);
    assert!(report.state.is_terminal());
}

#[test]
fn test_divergence_is_reported_and_buffer_untouched() {
    let config = TrainConfig {
        learning_rate: 1e300,
        n_iters: 10,
        clipper: GradientClipper::None,
        init: WeightInit::Zeros,
        ..TrainConfig::default()
    };
    let mut trainer = Trainer::new(linear_network(1), config);
    let x = array![[1e10]];
    let y = array![[1.0]];
    let mut flat = Array1::zeros(2);
    let err = trainer.fit(x.view(), y.view(), &mut flat).unwrap_err();

    assert_eq!(err, EngineError::NumericDivergence { epoch: 1, non_finite: 1 });
    assert_eq!(flat, Array1::<f64>::zeros(2));
}

#[test]
fn test_clipping_prevents_that_divergence() {
    let config = TrainConfig {
        learning_rate: 0.01,
        n_iters: 100,
        init: WeightInit::Zeros,
        ..TrainConfig::default()
    };
    let mut trainer = Trainer::new(linear_network(1), config);
    let x = array![[1e10]];
    let y = array![[1.0]];
    let (flat, report) = trainer.train(x.view(), y.view()).unwrap();

    assert!(flat.iter().all(|w| w.is_finite()));
    assert!(report.history.clip_events > 0);
}

#[test]
fn test_fit_validates_before_training() {
    let mut trainer = Trainer::new(linear_network(2), TrainConfig::default());
    let x = array![[1.0, 2.0]];
    let y = array![[1.0]];

    let mut short = Array1::zeros(2);
    assert_eq!(
        trainer.fit(x.view(), y.view(), &mut short).unwrap_err(),
        EngineError::LayoutError { expected: 3, actual: 2 }
    );

    let mut flat = Array1::zeros(3);
    let y_wrong = array![[1.0], [2.0]];
    assert!(matches!(
        trainer.fit(x.view(), y_wrong.view(), &mut flat),
        Err(EngineError::ShapeMismatch { .. })
    ));

    let config = TrainConfig { learning_rate: f64::NAN, ..TrainConfig::default() };
    let mut bad = Trainer::new(linear_network(2), config);
    assert!(matches!(
        bad.fit(x.view(), y.view(), &mut flat),
        Err(EngineError::InvalidArchitecture(_))
    ));
}

#[test]
fn test_history_is_bounded_by_config() {
    let config = TrainConfig {
        n_iters: 30,
        history_size: 10,
        init: WeightInit::Zeros,
        ..TrainConfig::default()
    };
    let mut trainer = Trainer::new(linear_network(1), config);
    let x = array![[1.0], [2.0]];
    let y = array![[1.0], [-1.0]];
    let (_, report) = trainer.train(x.view(), y.view()).unwrap();
    assert_eq!(report.history.losses.len(), 10);
    assert_eq!(report.history.gradient_norms.len(), 10);
    assert_eq!(report.history.epochs, 30);
}

#[test]
fn test_config_json() {
    let config = TrainConfig::from_json(r#"{"learning_rate": 0.1, "n_iters": 5}"#).unwrap();
    assert_eq!(config.learning_rate, 0.1);
    assert_eq!(config.n_iters, 5);
    assert_eq!(config.seed, 42);
    assert_eq!(config.clipper, GradientClipper::ClipByGlobalNorm { max_norm: 1.0 });

    let custom = TrainConfig {
        clipper: GradientClipper::ClipByValue { min: -2.0, max: 2.0 },
        init: WeightInit::XavierUniform,
        ..TrainConfig::default()
    };
    let parsed = TrainConfig::from_json(&custom.to_json().unwrap()).unwrap();
    assert_eq!(parsed, custom);

    assert!(matches!(
        TrainConfig::from_json("{not json"),
        Err(EngineError::InvalidArchitecture(_))
    ));
    assert!(TrainConfig::from_json(r#"{"learning_rate": -1.0}"#).is_err());
}

#[test]
fn test_same_seed_same_result() {
    let network = Network::new(
        Architecture::new(&[2, 4, 1]).unwrap(),
        HiddenActivation::Tanh,
        OutputActivation::Linear,
    );
    let config = TrainConfig { learning_rate: 0.1, n_iters: 50, ..TrainConfig::default() };
    let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let y = array![[-1.0], [1.0], [1.0], [-1.0]];

    let (a, _) = Trainer::new(network.clone(), config.clone()).train(x.view(), y.view()).unwrap();
    let (b, _) = Trainer::new(network, config).train(x.view(), y.view()).unwrap();
    assert_eq!(a, b);
}
