use ndarray::{array, Array2};
use crate::linear::{
    predict_argmax,
    predict_linear,
    predict_sign,
    train_perceptron_binary,
    train_perceptron_multiclass,
    train_regression,
    train_regression_with,
};
use crate::error::EngineError;
use crate::trainer::TrainState;

#[test]
fn test_perceptron_separates_and_stops() {
    let x = array![[1.0, 1.0], [2.0, 3.0], [3.0, 3.0]];
    let y = array![1.0, -1.0, -1.0];
    let (weights, report) = train_perceptron_binary(x.view(), y.view(), 0.1, 1000).unwrap();

    assert_eq!(weights.len(), 3);
    assert_eq!(predict_sign(x.view(), weights.view()).unwrap(), y);
    // every sample classified means a zero perceptron gradient
    assert!(matches!(report.state, TrainState::Converged { .. }));
    assert_eq!(report.final_loss, 0.0);
}

#[test]
fn test_perceptron_zero_iterations_is_zero_vector() {
    let x = array![[1.0, 1.0], [2.0, 3.0]];
    let y = array![1.0, -1.0];
    let (weights, _) = train_perceptron_binary(x.view(), y.view(), 0.1, 0).unwrap();
    assert_eq!(weights, array![0.0, 0.0, 0.0]);
}

#[test]
fn test_regression_collinear_inputs() {
    let x = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
    let y = array![1.0, 2.0, 3.0];
    let weights = train_regression(x.view(), y.view()).unwrap();

    assert!(weights.iter().all(|w| w.is_finite() && w.abs() < 10.0));
    // minimum-norm solution splits the slope evenly
    assert!(weights[0].abs() < 1e-9);
    assert!((weights[1] - 0.5).abs() < 1e-9);
    assert!((weights[2] - 0.5).abs() < 1e-9);

    let fitted = predict_linear(x.view(), weights.view(), 1).unwrap();
    for (p, t) in fitted.iter().zip(y.iter()) {
        assert!((p - t).abs() < 1e-9);
    }
}

#[test]
fn test_regression_exact_fit_at_large_scale() {
    for scale in [10.0, 100.0, 1000.0] {
        let x = array![[scale], [2.0 * scale], [3.0 * scale]];
        let y = x.column(0).mapv(|v| 1.0 + 2.0 * v);
        let weights = train_regression(x.view(), y.view()).unwrap();

        assert!((weights[0] - 1.0).abs() < 1e-8, "bias {} at scale {}", weights[0], scale);
        assert!((weights[1] - 2.0).abs() < 1e-8, "slope {} at scale {}", weights[1], scale);
        let fitted = predict_linear(x.view(), weights.view(), 1).unwrap();
        for (p, t) in fitted.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8 * scale);
        }
    }
}

#[test]
fn test_regression_multivariate_exact_fit() {
    let x = array![[1.0, 0.0], [0.0, 1.0], [2.0, 3.0], [5.0, -1.0], [-4.0, 7.0]];
    let y = x.rows().into_iter().map(|r| -3.0 + 0.5 * r[0] + 4.0 * r[1]).collect::<ndarray::Array1<f64>>();
    let weights = train_regression(x.view(), y.view()).unwrap();
    for (w, e) in weights.iter().zip([-3.0, 0.5, 4.0].iter()) {
        assert!((w - e).abs() < 1e-9);
    }
}

#[test]
fn test_regression_least_squares_on_noisy_line() {
    // points off a line: the fit is the normal-equation solution, not an interpolation
    let x = array![[0.0], [1.0], [2.0], [3.0]];
    let y = array![1.0, 2.0, 2.0, 4.0];
    let weights = train_regression(x.view(), y.view()).unwrap();
    assert!((weights[0] - 0.9).abs() < 1e-9);
    assert!((weights[1] - 0.9).abs() < 1e-9);
}

#[test]
fn test_regression_rejects_bad_data() {
    let x = array![[1.0], [2.0]];
    let short = array![1.0];
    assert!(matches!(
        train_regression(x.view(), short.view()),
        Err(EngineError::ShapeMismatch { .. })
    ));

    let y = array![1.0, f64::NAN];
    assert!(matches!(
        train_regression(x.view(), y.view()),
        Err(EngineError::ShapeMismatch { .. })
    ));

    let empty = Array2::<f64>::zeros((0, 1));
    let none = ndarray::Array1::<f64>::zeros(0);
    assert!(train_regression(empty.view(), none.view()).is_err());
}

#[test]
fn test_gradient_regression_step_with_huge_feature() {
    // the squared gradient overflows, the clipped step must still move the weights
    let x = array![[1e160]];
    let y = array![1.0];
    let (weights, report) = train_regression_with(x.view(), y.view(), 0.05, 1).unwrap();
    assert!((weights[1] - 0.05).abs() < 1e-12);
    assert!(weights[0] > 0.0);
    assert_eq!(report.epochs_run, 1);
}

#[test]
fn test_regression_reports_iterations() {
    let x = array![[0.0], [1.0], [2.0]];
    let y = array![1.0, 3.0, 5.0];
    let (weights, report) = train_regression_with(x.view(), y.view(), 0.05, 5000).unwrap();
    assert!((weights[0] - 1.0).abs() < 1e-3);
    assert!((weights[1] - 2.0).abs() < 1e-3);
    assert_eq!(report.state, TrainState::IterationLimitReached);
}

#[test]
fn test_multiclass_on_separated_points() {
    let x = array![
        [0.0, 0.0], [0.3, -0.2], [-0.1, 0.2],
        [4.0, 4.0], [4.2, 3.9], [3.8, 4.1],
        [0.0, 4.0], [0.2, 4.2], [-0.3, 3.8],
    ];
    let mut y = Array2::zeros((9, 3));
    for i in 0..9 {
        y[[i, i / 3]] = 1.0;
    }
    let (weights, _) = train_perceptron_multiclass(x.view(), y.view(), 0.1, 2000).unwrap();

    assert_eq!(weights.len(), 9);
    let classes = predict_argmax(x.view(), weights.view(), 3).unwrap();
    assert_eq!(classes, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
}
