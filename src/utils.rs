//! Conversion helpers for the Python bindings.
//!
//! Everything here turns Python objects into validated crate types; numerical
//! work stays in the inner modules.
#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::{
    cascades::{AdjacencyMatrix, CascadeSet, ExponentialKernel},
    estimation::{EstimationOptions, Formulation, Init},
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 1-D candidate column into an owned `Array1`.
#[cfg(feature = "python-bindings")]
pub fn extract_column<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err("candidate must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Rows of a 2-D float array or a sequence of float sequences.
#[cfg(feature = "python-bindings")]
pub fn extract_rows<'py>(raw: &Bound<'py, PyAny>) -> PyResult<Vec<Vec<f64>>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().outer_iter().map(|row| row.to_vec()).collect());
    }
    raw.extract::<Vec<Vec<f64>>>().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray or a sequence of float64 sequences")
    })
}

/// Cascade set from raw rows (`-1` marks never infected).
#[cfg(feature = "python-bindings")]
pub fn build_cascade_set<'py>(raw: &Bound<'py, PyAny>, rate: f64) -> PyResult<CascadeSet> {
    let rows = extract_rows(raw)?;
    let kernel = ExponentialKernel::new(rate)?;
    Ok(CascadeSet::from_raw(&rows, kernel)?)
}

/// Adjacency matrix from a square 2-D input.
#[cfg(feature = "python-bindings")]
pub fn build_adjacency<'py>(raw: &Bound<'py, PyAny>) -> PyResult<AdjacencyMatrix> {
    let rows = extract_rows(raw)?;
    Ok(AdjacencyMatrix::from_rows(&rows)?)
}

#[cfg(feature = "python-bindings")]
pub fn build_estimation_options<'py>(
    py: Python<'py>, node: usize, n_nodes: usize, formulation: Option<&str>, penalty: Option<f64>,
    init: Option<&str>, init_fixed: Option<f64>, init_vector: Option<&Bound<'py, PyAny>>,
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<EstimationOptions> {
    let formulation = match formulation {
        Some(name) => Formulation::from_str(name)?,
        None => Formulation::Convex,
    };
    let init = extract_init(py, node, n_nodes, init, init_fixed, init_vector)?;
    let mle_opts = extract_mle_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem)?;
    Ok(EstimationOptions::new(formulation, penalty.unwrap_or(0.0), init, mle_opts)?)
}

#[cfg(feature = "python-bindings")]
fn extract_init<'py>(
    py: Python<'py>, node: usize, n_nodes: usize, init: Option<&str>, init_fixed: Option<f64>,
    init_vector: Option<&Bound<'py, PyAny>>,
) -> PyResult<Init> {
    let init_str = init.unwrap_or("fixed").to_lowercase();

    let policy = match init_str.as_str() {
        "fixed" => Init::fixed(init_fixed.unwrap_or(0.5))?,
        "fixed_vector" => {
            let raw = init_vector.ok_or_else(|| {
                PyValueError::new_err("init_vector must be provided when init='fixed_vector'")
            })?;
            let column = extract_column(py, raw)?;
            Init::fixed_vector(column, node, n_nodes)?
        }
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid init {:?} (expected 'fixed' or 'fixed_vector')",
                other
            )));
        }
    };
    Ok(policy)
}

#[cfg(feature = "python-bindings")]
fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<MLEOptions> {
    if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        let mut opts = MLEOptions::default();
        if let Some(name) = line_searcher {
            opts.line_searcher = LineSearcher::from_str(name)?;
        }
        return Ok(MLEOptions::new(opts.tols, opts.line_searcher, false, lbfgs_mem)?);
    }

    let tols = Tolerances::new(tol_grad, tol_cost, max_iter)?;
    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name)?,
        None => LineSearcher::MoreThuente,
    };
    Ok(MLEOptions::new(tols, ls, false, lbfgs_mem)?)
}
