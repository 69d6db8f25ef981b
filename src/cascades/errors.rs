//! Errors for cascade data, adjacency matrices, and the diffusion simulator.
//!
//! This module defines [`CascadeError`], raised when raw infection times,
//! kernel rates, or ground-truth matrices fail validation at construction
//! time. These are caller bugs (shape and consistency problems), so they fail
//! fast instead of being coerced. Numerical domain problems inside the
//! objectives never surface here; they become `+∞` in `connie`.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - `node` always refers to a position in the cascade node space; `index`
//!   refers to a position inside a [`CascadeSet`](super::cascade_set::CascadeSet).
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for cascade construction and simulation.
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Validation errors for cascades, cascade sets, matrices, and simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum CascadeError {
    // ---- Cascade ----
    /// A cascade needs at least one node.
    EmptyCascade,

    /// An infection time is NaN/±inf.
    NonFiniteTime { node: usize, value: f64 },

    // ---- Kernel ----
    /// Kernel rate must be finite and strictly positive.
    InvalidKernelRate { rate: f64, reason: &'static str },

    // ---- CascadeSet ----
    /// A cascade set needs at least one cascade.
    EmptyCascadeSet,

    /// Every cascade in a set must cover the same node space.
    CascadeLengthMismatch { index: usize, expected: usize, actual: usize },

    /// Every cascade in a set must share one kernel rate.
    KernelRateMismatch { index: usize, expected: f64, actual: f64 },

    // ---- Adjacency matrix ----
    /// Matrix has no rows or no columns.
    EmptyMatrix,

    /// Matrix is not n × n.
    NotSquare { rows: usize, cols: usize },

    /// A row of a nested input has the wrong length.
    RaggedRow { row: usize, expected: usize, actual: usize },

    /// Edge weights must be finite probabilities in [0, 1].
    InvalidEdgeWeight { row: usize, col: usize, value: f64 },

    // ---- Simulation / lookup ----
    /// Requested seed node does not exist.
    SeedOutOfRange { seed: usize, n_nodes: usize },

    /// Requested node does not exist.
    NodeOutOfRange { node: usize, n_nodes: usize },
}

impl std::error::Error for CascadeError {}

impl std::fmt::Display for CascadeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Cascade ----
            CascadeError::EmptyCascade => write!(f, "Cascade must contain at least one node"),
            CascadeError::NonFiniteTime { node, value } => {
                write!(f, "Non-finite infection time at node {node}: {value}")
            }

            // ---- Kernel ----
            CascadeError::InvalidKernelRate { rate, reason } => {
                write!(f, "Invalid kernel rate {rate}: {reason}")
            }

            // ---- CascadeSet ----
            CascadeError::EmptyCascadeSet => write!(f, "Cascade set must contain at least one cascade"),
            CascadeError::CascadeLengthMismatch { index, expected, actual } => write!(
                f,
                "Cascade {index} has {actual} nodes, expected {expected} like the first cascade"
            ),
            CascadeError::KernelRateMismatch { index, expected, actual } => write!(
                f,
                "Cascade {index} uses kernel rate {actual}, expected {expected} like the first cascade"
            ),

            // ---- Adjacency matrix ----
            CascadeError::EmptyMatrix => write!(f, "Adjacency matrix must not be empty"),
            CascadeError::NotSquare { rows, cols } => {
                write!(f, "Adjacency matrix must be square, got {rows} x {cols}")
            }
            CascadeError::RaggedRow { row, expected, actual } => {
                write!(f, "Adjacency row {row} has {actual} entries, expected {expected}")
            }
            CascadeError::InvalidEdgeWeight { row, col, value } => {
                write!(f, "Edge weight A[{row}][{col}] = {value} must be a finite value in [0, 1]")
            }

            // ---- Simulation / lookup ----
            CascadeError::SeedOutOfRange { seed, n_nodes } => {
                write!(f, "Seed node {seed} is out of range for {n_nodes} nodes")
            }
            CascadeError::NodeOutOfRange { node, n_nodes } => {
                write!(f, "Node {node} is out of range for {n_nodes} nodes")
            }
        }
    }
}

/// Convert a [`CascadeError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<CascadeError> for PyErr {
    fn from(err: CascadeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
