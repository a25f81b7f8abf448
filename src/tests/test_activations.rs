use ndarray::{array, Array2};
use crate::activations::{HiddenActivation, OutputActivation};
use crate::loss::LossKind;

#[test]
fn test_relu() {
    let mut z = array![[-1.0, 0.0, 2.5]];
    HiddenActivation::Relu.apply_batch(&mut z);
    assert_eq!(z, array![[0.0, 0.0, 2.5]]);

    let d = HiddenActivation::Relu.derivative_from_output(z.view());
    assert_eq!(d, array![[0.0, 0.0, 1.0]]);
}

#[test]
fn test_tanh_derivative_from_output() {
    let mut z = array![[0.0, 0.5, -2.0]];
    HiddenActivation::Tanh.apply_batch(&mut z);
    let d = HiddenActivation::Tanh.derivative_from_output(z.view());
    for (&a, &g) in z.iter().zip(d.iter()) {
        assert!((g - (1.0 - a * a)).abs() < 1e-15);
    }
    assert_eq!(d[[0, 0]], 1.0);
}

#[test]
fn test_sigmoid_is_stable_for_large_logits() {
    let mut z = array![[-1000.0, 0.0, 1000.0]];
    OutputActivation::Sigmoid.apply_batch(&mut z);
    assert!(z.iter().all(|v| v.is_finite()));
    assert_eq!(z[[0, 0]], 0.0);
    assert_eq!(z[[0, 1]], 0.5);
    assert_eq!(z[[0, 2]], 1.0);
}

#[test]
fn test_softmax_rows() {
    let mut z = array![[1.0, 2.0, 3.0], [1000.0, 1000.0, 1000.0]];
    OutputActivation::Softmax.apply_batch(&mut z);
    for row in z.rows() {
        assert!((row.sum() - 1.0).abs() < 1e-12);
    }
    assert!(z[[0, 2]] > z[[0, 1]] && z[[0, 1]] > z[[0, 0]]);
    for &p in z.row(1).iter() {
        assert!((p - 1.0 / 3.0).abs() < 1e-12);
    }
}

#[test]
fn test_linear_is_identity() {
    let mut z = array![[-3.0, 7.5]];
    OutputActivation::Linear.apply_batch(&mut z);
    assert_eq!(z, array![[-3.0, 7.5]]);
    assert_eq!(
        OutputActivation::Linear.derivative_from_output(z.view()),
        Some(Array2::ones((1, 2)))
    );
    assert_eq!(OutputActivation::Softmax.derivative_from_output(z.view()), None);
}

#[test]
fn test_sign_maps_zero_to_positive() {
    let mut z = array![[0.0, -0.0, -1e-9, 3.0]];
    OutputActivation::Sign.apply_batch(&mut z);
    assert_eq!(z, array![[1.0, 1.0, -1.0, 1.0]]);
}

#[test]
fn test_codes() {
    assert_eq!(HiddenActivation::from_code(0).unwrap(), HiddenActivation::Relu);
    assert_eq!(HiddenActivation::from_code(1).unwrap(), HiddenActivation::Tanh);
    assert!(HiddenActivation::from_code(2).is_err());

    assert_eq!(OutputActivation::from_code(0).unwrap(), OutputActivation::Sigmoid);
    assert_eq!(OutputActivation::from_code(1).unwrap(), OutputActivation::Softmax);
    assert_eq!(OutputActivation::from_code(2).unwrap(), OutputActivation::Linear);
    assert!(OutputActivation::from_code(3).is_err());

    for code in 0..2 {
        assert_eq!(HiddenActivation::from_code(code).unwrap().code(), code);
    }
}

#[test]
fn test_natural_losses() {
    assert_eq!(OutputActivation::Sigmoid.loss(), LossKind::BinaryCrossEntropy);
    assert_eq!(OutputActivation::Softmax.loss(), LossKind::CategoricalCrossEntropy);
    assert_eq!(OutputActivation::Linear.loss(), LossKind::MeanSquaredError);
    assert_eq!(OutputActivation::Sign.loss(), LossKind::Perceptron);
}
