//! C ABI entry points.
//!
//! Every function returns an `i32` status: `0` on success, otherwise the
//! `EngineError::status_code` of the failure (`6` for a caught panic). Output
//! buffers are only written when the call succeeds. Each call is independent;
//! nothing is kept between calls.

use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use ndarray::{ArrayView, ArrayView1, ArrayView2, Dimension};

use crate::error::{EngineError, Result, STATUS_OK, STATUS_PANIC};
use crate::layers::encoded_len;
use crate::linear;
use crate::pmc;

/// Run `body`, turning errors and panics into a status code.
fn guarded<F>(entry: &'static str, body: F) -> i32
where
    F: FnOnce() -> Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => STATUS_OK,
        Ok(Err(err)) => {
            log::error!("{} failed: {}", entry, err);
            err.status_code()
        }
        Err(_) => {
            log::error!("{} panicked", entry);
            STATUS_PANIC
        }
    }
}

fn element_count(what: &'static str, rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        EngineError::shape_mismatch(what.to_string(), "a length that fits in usize".to_string(), format!("{} x {}", rows, cols))
    })
}

/// Copy `values` in logical (row-major) order.
fn write_values<D: Dimension>(out: &mut [f64], values: ArrayView<f64, D>) {
    for (dst, src) in out.iter_mut().zip(values.iter()) {
        *dst = *src;
    }
}

/// # Safety
/// `ptr` must be null or valid for reads of `len` values.
unsafe fn input_slice<'a, T>(ptr: *const T, len: usize, name: &'static str) -> Result<&'a [T]> {
    if ptr.is_null() {
        return Err(EngineError::NullPointer(name));
    }
    Ok(slice::from_raw_parts(ptr, len))
}

/// # Safety
/// `ptr` must be null or valid for writes of `len` values.
unsafe fn output_slice<'a>(ptr: *mut f64, len: usize, name: &'static str) -> Result<&'a mut [f64]> {
    if ptr.is_null() {
        return Err(EngineError::NullPointer(name));
    }
    Ok(slice::from_raw_parts_mut(ptr, len))
}

/// # Safety
/// `ptr` must be null or valid for reads of `rows * cols` values.
unsafe fn matrix<'a>(ptr: *const f64, rows: usize, cols: usize, name: &'static str) -> Result<ArrayView2<'a, f64>> {
    let len = element_count(name, rows, cols)?;
    let values = input_slice(ptr, len, name)?;
    Ok(ArrayView2::from_shape((rows, cols), values)?)
}

/// # Safety
/// `hidden_sizes` must be valid for reads of `n_hidden` values when `n_hidden > 0`.
unsafe fn hidden_sizes_slice(hidden_sizes: *const i64, n_hidden: usize) -> Result<Vec<usize>> {
    if n_hidden == 0 {
        return Ok(Vec::new());
    }
    pmc::hidden_widths(input_slice(hidden_sizes, n_hidden, "hidden_sizes")?)
}

/// Train a multi-layer perceptron and write its flat buffer to `out_weights`.
///
/// `Y` holds `n * n_outputs` values: one per sample for Sigmoid/Linear with a
/// single output, one-hot rows for Softmax.
///
/// # Safety
/// `x` must be valid for `n * d` reads, `y` for `n * n_outputs` reads,
/// `hidden_sizes` for `n_hidden_layers` reads and `out_weights` for
/// `pmc_weights_len(d, n_hidden_layers, hidden_sizes, n_outputs)` writes.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn train_pmc(
    x: *const f64,
    y: *const f64,
    n: usize,
    d: usize,
    n_hidden_layers: usize,
    hidden_sizes: *const i64,
    n_outputs: usize,
    hidden_act: usize,
    output_act: usize,
    lr: f64,
    n_iters: usize,
    out_weights: *mut f64,
) -> i32 {
    guarded("train_pmc", || {
        let hidden = hidden_sizes_slice(hidden_sizes, n_hidden_layers)?;
        let network = pmc::network_from_codes(d, &hidden, n_outputs, hidden_act, output_act)?;
        let inputs = matrix(x, n, d, "X")?;
        let targets = matrix(y, n, n_outputs, "Y")?;
        let out = output_slice(out_weights, network.layout().len(), "out_weights")?;

        let (weights, _) = pmc::train_pmc(network, inputs, targets, lr, n_iters)?;
        write_values(out, weights.view());
        Ok(())
    })
}

/// Predict `n * n_outputs` values into `out` from a flat buffer produced by `train_pmc`.
///
/// # Safety
/// `x` must be valid for `n * d` reads, `hidden_sizes` for `n_hidden_layers`
/// reads, `weights` for `pmc_weights_len(..)` reads and `out` for
/// `n * n_outputs` writes.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn predict_pmc(
    x: *const f64,
    n: usize,
    d: usize,
    n_hidden_layers: usize,
    hidden_sizes: *const i64,
    n_outputs: usize,
    hidden_act: usize,
    output_act: usize,
    weights: *const f64,
    out: *mut f64,
) -> i32 {
    guarded("predict_pmc", || {
        let hidden = hidden_sizes_slice(hidden_sizes, n_hidden_layers)?;
        let network = pmc::network_from_codes(d, &hidden, n_outputs, hidden_act, output_act)?;
        let inputs = matrix(x, n, d, "X")?;
        let flat = ArrayView1::from(input_slice(weights, network.layout().len(), "weights")?);
        let out = output_slice(out, element_count("out", n, n_outputs)?, "out")?;

        let predictions = pmc::predict_pmc(&network, inputs, flat)?;
        write_values(out, predictions.view());
        Ok(())
    })
}

/// Length of the flat buffer for `[d] ++ hidden_sizes ++ [n_outputs]`, `0` when
/// the architecture is invalid.
///
/// # Safety
/// `hidden_sizes` must be valid for `n_hidden_layers` reads.
#[no_mangle]
pub unsafe extern "C" fn pmc_weights_len(
    d: usize,
    n_hidden_layers: usize,
    hidden_sizes: *const i64,
    n_outputs: usize,
) -> usize {
    let widths = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Vec<usize>> {
        let hidden = hidden_sizes_slice(hidden_sizes, n_hidden_layers)?;
        let network = pmc::network_from_codes(d, &hidden, n_outputs, 0, 0)?;
        Ok(network.architecture().widths().to_vec())
    }));
    match widths {
        Ok(Ok(widths)) => encoded_len(&widths),
        _ => 0,
    }
}

/// Binary perceptron on `±1` labels; writes `d + 1` weights, bias first.
///
/// # Safety
/// `x` must be valid for `n * d` reads, `y` for `n` reads and `out_weights`
/// for `d + 1` writes.
#[no_mangle]
pub unsafe extern "C" fn train_perceptron_binary(
    x: *const f64,
    y: *const f64,
    n: usize,
    d: usize,
    lr: f64,
    n_iters: usize,
    out_weights: *mut f64,
) -> i32 {
    guarded("train_perceptron_binary", || {
        let inputs = matrix(x, n, d, "X")?;
        let labels = ArrayView1::from(input_slice(y, n, "Y")?);
        let out = output_slice(out_weights, encoded_len(&[d, 1]), "out_weights")?;

        let (weights, _) = linear::train_perceptron_binary(inputs, labels, lr, n_iters)?;
        write_values(out, weights.view());
        Ok(())
    })
}

/// Multiclass linear classifier on one-hot `Y`; writes `k * (d + 1)` weights.
///
/// # Safety
/// `x` must be valid for `n * d` reads, `y` for `n * k` reads and
/// `out_weights` for `k * (d + 1)` writes.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn train_perceptron_multiclass(
    x: *const f64,
    y: *const f64,
    n: usize,
    d: usize,
    k: usize,
    lr: f64,
    n_iters: usize,
    out_weights: *mut f64,
) -> i32 {
    guarded("train_perceptron_multiclass", || {
        let inputs = matrix(x, n, d, "X")?;
        let targets = matrix(y, n, k, "Y")?;
        let out = output_slice(out_weights, encoded_len(&[d, k]), "out_weights")?;

        let (weights, _) = linear::train_perceptron_multiclass(inputs, targets, lr, n_iters)?;
        write_values(out, weights.view());
        Ok(())
    })
}

/// Least-squares regression; writes `d + 1` weights, bias first.
///
/// # Safety
/// `x` must be valid for `n * d` reads, `y` for `n` reads and `out_weights`
/// for `d + 1` writes.
#[no_mangle]
pub unsafe extern "C" fn train_regression(
    x: *const f64,
    y: *const f64,
    n: usize,
    d: usize,
    out_weights: *mut f64,
) -> i32 {
    guarded("train_regression", || {
        let inputs = matrix(x, n, d, "X")?;
        let targets = ArrayView1::from(input_slice(y, n, "Y")?);
        let out = output_slice(out_weights, encoded_len(&[d, 1]), "out_weights")?;

        let weights = linear::train_regression(inputs, targets)?;
        write_values(out, weights.view());
        Ok(())
    })
}

/// Static, NUL-terminated description of a status code.
#[no_mangle]
pub extern "C" fn ml_status_message(code: i32) -> *const c_char {
    let message: &'static [u8] = match code {
        0 => b"ok\0",
        1 => b"shape mismatch\0",
        2 => b"weight buffer length does not match the architecture\0",
        3 => b"numeric divergence during training\0",
        4 => b"invalid architecture or hyper-parameter\0",
        5 => b"null pointer argument\0",
        6 => b"internal panic\0",
        _ => b"unknown status\0",
    };
    message.as_ptr() as *const c_char
}
