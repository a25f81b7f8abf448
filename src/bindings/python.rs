use pyo3::prelude::*;
use pyo3::exceptions::PyValueError;
use numpy::{PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};

use crate::error::EngineError;
use crate::linear;
use crate::pmc;

fn to_py_err(err: EngineError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Train a multi-layer perceptron and return its flat weight buffer.
#[pyfunction]
#[pyo3(signature = (x, y, hidden_sizes, hidden_act = 0, output_act = 0, lr = 0.01, n_iters = 1000))]
#[allow(clippy::too_many_arguments)]
fn train_pmc<'py>(
    py: Python<'py>,
    x: PyReadonlyArray2<f64>,
    y: PyReadonlyArray2<f64>,
    hidden_sizes: Vec<usize>,
    hidden_act: usize,
    output_act: usize,
    lr: f64,
    n_iters: usize,
) -> PyResult<&'py PyArray1<f64>> {
    let x = x.as_array();
    let y = y.as_array();
    let network = pmc::network_from_codes(x.ncols(), &hidden_sizes, y.ncols(), hidden_act, output_act)
        .map_err(to_py_err)?;
    let (weights, _) = py
        .allow_threads(|| pmc::train_pmc(network, x, y, lr, n_iters))
        .map_err(to_py_err)?;
    Ok(PyArray1::from_owned_array(py, weights))
}

/// Predict from a flat buffer produced by `train_pmc`.
#[pyfunction]
#[pyo3(signature = (x, weights, hidden_sizes, n_outputs, hidden_act = 0, output_act = 0))]
fn predict_pmc<'py>(
    py: Python<'py>,
    x: PyReadonlyArray2<f64>,
    weights: PyReadonlyArray1<f64>,
    hidden_sizes: Vec<usize>,
    n_outputs: usize,
    hidden_act: usize,
    output_act: usize,
) -> PyResult<&'py PyArray2<f64>> {
    let x = x.as_array();
    let weights = weights.as_array();
    let network = pmc::network_from_codes(x.ncols(), &hidden_sizes, n_outputs, hidden_act, output_act)
        .map_err(to_py_err)?;
    let predictions = py
        .allow_threads(|| pmc::predict_pmc(&network, x, weights))
        .map_err(to_py_err)?;
    Ok(PyArray2::from_owned_array(py, predictions))
}

#[pyfunction]
#[pyo3(signature = (x, y, lr = 0.1, n_iters = 1000))]
fn train_perceptron_binary<'py>(
    py: Python<'py>,
    x: PyReadonlyArray2<f64>,
    y: PyReadonlyArray1<f64>,
    lr: f64,
    n_iters: usize,
) -> PyResult<&'py PyArray1<f64>> {
    let x = x.as_array();
    let y = y.as_array();
    let (weights, _) = py
        .allow_threads(|| linear::train_perceptron_binary(x, y, lr, n_iters))
        .map_err(to_py_err)?;
    Ok(PyArray1::from_owned_array(py, weights))
}

#[pyfunction]
#[pyo3(signature = (x, y, lr = 0.1, n_iters = 1000))]
fn train_perceptron_multiclass<'py>(
    py: Python<'py>,
    x: PyReadonlyArray2<f64>,
    y: PyReadonlyArray2<f64>,
    lr: f64,
    n_iters: usize,
) -> PyResult<&'py PyArray1<f64>> {
    let x = x.as_array();
    let y = y.as_array();
    let (weights, _) = py
        .allow_threads(|| linear::train_perceptron_multiclass(x, y, lr, n_iters))
        .map_err(to_py_err)?;
    Ok(PyArray1::from_owned_array(py, weights))
}

#[pyfunction]
fn train_regression<'py>(
    py: Python<'py>,
    x: PyReadonlyArray2<f64>,
    y: PyReadonlyArray1<f64>,
) -> PyResult<&'py PyArray1<f64>> {
    let x = x.as_array();
    let y = y.as_array();
    let weights = py
        .allow_threads(|| linear::train_regression(x, y))
        .map_err(to_py_err)?;
    Ok(PyArray1::from_owned_array(py, weights))
}

#[pymodule]
fn ml_library(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(train_pmc, m)?)?;
    m.add_function(wrap_pyfunction!(predict_pmc, m)?)?;
    m.add_function(wrap_pyfunction!(train_perceptron_binary, m)?)?;
    m.add_function(wrap_pyfunction!(train_perceptron_multiclass, m)?)?;
    m.add_function(wrap_pyfunction!(train_regression, m)?)?;
    Ok(())
}
