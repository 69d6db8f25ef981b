//! rust_connie — network inference from diffusion cascades, with Python bindings.
//!
//! Purpose
//! -------
//! Recover the hidden edge weights of a diffusion network from observed
//! infection cascades (ConNIe), and serve as the PyO3 bridge that exposes the
//! cascade containers, the objectives and the estimators to Python via the
//! `_rust_connie` extension module.
//!
//! Key behaviors
//! -------------
//! - [`cascades`]: timing kernel, cascades, cascade sets, adjacency matrices
//!   and the seeded diffusion simulator.
//! - [`connie`]: the exact likelihood and its convex relaxation for one
//!   column of the network, plus the analytic convex gradient.
//! - [`estimation`]: column and network estimators built on the
//!   [`optimization`] L-BFGS driver.
//! - With `python-bindings`, `#[pyclass]` wrappers and the `#[pymodule]`
//!   initializer registering the `cascades`, `connie` and `estimation`
//!   submodules.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; the binding layer only
//!   converts inputs, dispatches and maps errors.
//! - Errors from core Rust code are rich error enums internally and become
//!   Python `ValueError`s at the PyO3 boundary.
//!
//! Conventions
//! -----------
//! - Nodes are `0..n`. A candidate column for node `i` holds the incoming
//!   weights `A[j][i]`; entry `i` is ignored.
//! - Raw cascade rows use `-1` for "never infected".
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code; `tests/` runs the simulate → estimate
//!   pipeline and the seven-cascade reference scenario.

pub mod cascades;
pub mod connie;
pub mod estimation;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    cascades::{CascadeSet, DiffusionSimulator, ExponentialKernel},
    estimation::{ColumnEstimate, NetworkEstimate, estimate_column, estimate_network},
    utils::{build_adjacency, build_cascade_set, build_estimation_options, extract_column},
};

/// CascadeSet — Python-facing wrapper for an observed cascade set.
///
/// Constructed from Python via `CascadeSet(cascades, rate=1.0)` where
/// `cascades` is a 2-D array or a sequence of equal-length rows of infection
/// times, `-1` marking nodes that were never infected.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CascadeSet", module = "rust_connie.cascades")]
pub struct PyCascadeSet {
    pub inner: CascadeSet,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCascadeSet {
    #[new]
    #[pyo3(signature = (cascades, rate = 1.0), text_signature = "(cascades, /, rate=1.0)")]
    pub fn new<'py>(cascades: &Bound<'py, PyAny>, rate: f64) -> PyResult<Self> {
        Ok(PyCascadeSet { inner: build_cascade_set(cascades, rate)? })
    }

    #[getter]
    pub fn n_nodes(&self) -> usize {
        self.inner.n_nodes()
    }

    #[getter]
    pub fn rate(&self) -> f64 {
        self.inner.kernel().rate()
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    /// Positions of the cascades in which `node` was infected.
    pub fn where_infected(&self, node: usize) -> Vec<usize> {
        self.inner.where_infected_indices(node).collect()
    }

    /// Positions of the cascades in which `node` was never infected.
    pub fn where_never_infected(&self, node: usize) -> Vec<usize> {
        self.inner.where_never_infected_indices(node).collect()
    }

    /// Raw rows with `-1` for never infected.
    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_raw()
    }
}

/// DiffusionSimulator — generate cascades from a ground-truth matrix.
///
/// Constructed via `DiffusionSimulator(matrix, rate=1.0)`; `matrix[j][k]` is
/// the probability that `j` infects `k`.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "DiffusionSimulator", module = "rust_connie.cascades")]
pub struct PyDiffusionSimulator {
    pub inner: DiffusionSimulator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyDiffusionSimulator {
    #[new]
    #[pyo3(signature = (matrix, rate = 1.0), text_signature = "(matrix, /, rate=1.0)")]
    pub fn new<'py>(matrix: &Bound<'py, PyAny>, rate: f64) -> PyResult<Self> {
        let matrix = build_adjacency(matrix)?;
        let kernel = ExponentialKernel::new(rate)?;
        Ok(PyDiffusionSimulator { inner: DiffusionSimulator::new(matrix, kernel) })
    }

    /// Simulate `count` cascades; identical `seed` gives identical output.
    #[pyo3(signature = (count, seed = 0), text_signature = "(count, /, seed=0)")]
    pub fn simulate_set(&self, py: Python<'_>, count: usize, seed: u64) -> PyResult<PyCascadeSet> {
        let inner = py.allow_threads(|| self.inner.simulate_set(count, seed))?;
        Ok(PyCascadeSet { inner })
    }
}

/// ColumnEstimate — estimated incoming weights of one node.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "ColumnEstimate", module = "rust_connie.estimation")]
pub struct PyColumnEstimate {
    pub inner: ColumnEstimate,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyColumnEstimate {
    #[getter]
    pub fn node(&self) -> usize {
        self.inner.node
    }

    #[getter]
    pub fn weights(&self) -> Vec<f64> {
        self.inner.weights.to_vec()
    }

    #[getter]
    pub fn objective(&self) -> f64 {
        self.inner.objective
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }

    #[getter]
    pub fn status(&self) -> Option<String> {
        self.inner.outcome.as_ref().map(|o| o.status.clone())
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.outcome.as_ref().map_or(0, |o| o.iterations)
    }

    #[getter]
    pub fn grad_norm(&self) -> Option<f64> {
        self.inner.outcome.as_ref().and_then(|o| o.grad_norm)
    }
}

/// NetworkEstimate — estimated `n × n` weight matrix.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "NetworkEstimate", module = "rust_connie.estimation")]
pub struct PyNetworkEstimate {
    pub inner: NetworkEstimate,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyNetworkEstimate {
    /// Row-major matrix; `weights[j][i]` is the estimated `j → i` weight.
    #[getter]
    pub fn weights(&self) -> Vec<Vec<f64>> {
        self.inner.weights().outer_iter().map(|row| row.to_vec()).collect()
    }

    #[getter]
    pub fn total_objective(&self) -> f64 {
        self.inner.total_objective()
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.converged()
    }
}

// ---- connie functions ----

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, cascades))]
fn likelihood<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, cascades: &PyCascadeSet,
) -> PyResult<f64> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::likelihood(&candidate, node, &cascades.inner)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, cascades))]
fn negative_log_likelihood<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, cascades: &PyCascadeSet,
) -> PyResult<f64> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::negative_log_likelihood(&candidate, node, &cascades.inner)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, cascades, rho = 0.0))]
fn convex_objective<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, cascades: &PyCascadeSet,
    rho: f64,
) -> PyResult<f64> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::convex_objective_penalized(&candidate, node, &cascades.inner, rho)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, cascades, rho = 0.0))]
fn convex_gradient<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, cascades: &PyCascadeSet,
    rho: f64,
) -> PyResult<Vec<f64>> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::convex_gradient(&candidate, node, &cascades.inner, rho)?.to_vec())
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, cascades))]
fn sum_minus_gamma_hat<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, cascades: &PyCascadeSet,
) -> PyResult<f64> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::sum_minus_gamma_hat(&candidate, node, &cascades.inner)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, cascades))]
fn sum_bji_hat<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, cascades: &PyCascadeSet,
) -> PyResult<f64> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::sum_bji_hat(&candidate, node, &cascades.inner)?)
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (candidate, node, rho))]
fn penalty<'py>(
    py: Python<'py>, candidate: &Bound<'py, PyAny>, node: usize, rho: f64,
) -> PyResult<f64> {
    let candidate = extract_column(py, candidate)?;
    Ok(connie::penalty(&candidate, node, rho)?)
}

// ---- estimation functions ----

#[cfg(feature = "python-bindings")]
#[pyfunction(name = "estimate_column")]
#[pyo3(
    signature = (
        cascades,
        node,
        formulation = None,
        penalty = None,
        init = None,
        init_fixed = None,
        init_vector = None,
        tol_grad = None,
        tol_cost = None,
        max_iter = None,
        line_searcher = None,
        lbfgs_mem = None,
    ),
    text_signature = "(cascades, node, /, formulation=None, penalty=None, init=None, \
                      init_fixed=None, init_vector=None, tol_grad=None, tol_cost=None, \
                      max_iter=None, line_searcher=None, lbfgs_mem=None)"
)]
fn py_estimate_column<'py>(
    py: Python<'py>, cascades: &PyCascadeSet, node: usize, formulation: Option<&str>,
    penalty: Option<f64>, init: Option<&str>, init_fixed: Option<f64>,
    init_vector: Option<&Bound<'py, PyAny>>, tol_grad: Option<f64>, tol_cost: Option<f64>,
    max_iter: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<PyColumnEstimate> {
    let opts = build_estimation_options(
        py,
        node,
        cascades.inner.n_nodes(),
        formulation,
        penalty,
        init,
        init_fixed,
        init_vector,
        tol_grad,
        tol_cost,
        max_iter,
        line_searcher,
        lbfgs_mem,
    )?;
    let inner = py.allow_threads(|| estimate_column(&cascades.inner, node, &opts))?;
    Ok(PyColumnEstimate { inner })
}

#[cfg(feature = "python-bindings")]
#[pyfunction(name = "estimate_network")]
#[pyo3(
    signature = (
        cascades,
        formulation = None,
        penalty = None,
        init_fixed = None,
        tol_grad = None,
        tol_cost = None,
        max_iter = None,
        line_searcher = None,
        lbfgs_mem = None,
    ),
    text_signature = "(cascades, /, formulation=None, penalty=None, init_fixed=None, \
                      tol_grad=None, tol_cost=None, max_iter=None, line_searcher=None, \
                      lbfgs_mem=None)"
)]
fn py_estimate_network<'py>(
    py: Python<'py>, cascades: &PyCascadeSet, formulation: Option<&str>, penalty: Option<f64>,
    init_fixed: Option<f64>, tol_grad: Option<f64>, tol_cost: Option<f64>,
    max_iter: Option<usize>, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
) -> PyResult<PyNetworkEstimate> {
    let opts = build_estimation_options(
        py,
        0,
        cascades.inner.n_nodes(),
        formulation,
        penalty,
        None,
        init_fixed,
        None,
        tol_grad,
        tol_cost,
        max_iter,
        line_searcher,
        lbfgs_mem,
    )?;
    let inner = py.allow_threads(|| estimate_network(&cascades.inner, &opts))?;
    Ok(PyNetworkEstimate { inner })
}

/// _rust_connie — PyO3 module initializer for the Python extension.
///
/// Creates the `cascades`, `connie` and `estimation` submodules, attaches
/// them to `_rust_connie` and registers them in `sys.modules` so dotted
/// imports work.
///
/// # Errors
/// - `PyErr` if creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_connie<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let cascades_mod = PyModule::new(_py, "cascades")?;
    let connie_mod = PyModule::new(_py, "connie")?;
    let estimation_mod = PyModule::new(_py, "estimation")?;
    register_cascades(m, &cascades_mod)?;
    register_connie(m, &connie_mod)?;
    register_estimation(m, &estimation_mod)?;

    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_connie.cascades", cascades_mod)?;
    modules.set_item("rust_connie.connie", connie_mod)?;
    modules.set_item("rust_connie.estimation", estimation_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn register_cascades<'py>(
    rust_connie: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyCascadeSet>()?;
    m.add_class::<PyDiffusionSimulator>()?;
    rust_connie.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn register_connie<'py>(
    rust_connie: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(likelihood, m)?)?;
    m.add_function(wrap_pyfunction!(negative_log_likelihood, m)?)?;
    m.add_function(wrap_pyfunction!(convex_objective, m)?)?;
    m.add_function(wrap_pyfunction!(convex_gradient, m)?)?;
    m.add_function(wrap_pyfunction!(sum_minus_gamma_hat, m)?)?;
    m.add_function(wrap_pyfunction!(sum_bji_hat, m)?)?;
    m.add_function(wrap_pyfunction!(penalty, m)?)?;
    rust_connie.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn register_estimation<'py>(
    rust_connie: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyColumnEstimate>()?;
    m.add_class::<PyNetworkEstimate>()?;
    m.add_function(wrap_pyfunction!(py_estimate_column, m)?)?;
    m.add_function(wrap_pyfunction!(py_estimate_network, m)?)?;
    rust_connie.add_submodule(m)?;
    Ok(())
}
