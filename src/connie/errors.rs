//! Errors for the ConNIe objectives.
//!
//! Only shape and argument problems are errors here: a node outside the
//! cascade node space, a candidate column of the wrong length, or an invalid
//! penalty weight. Numerical domain problems (logarithms of non-positive
//! arguments, saturated edge weights) are not errors; the objectives report
//! them as `+∞` so an optimizer can keep comparing values.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for objective evaluation.
pub type ConnieResult<T> = Result<T, ConnieError>;

/// Argument errors raised before an objective is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnieError {
    /// Target node is not part of the cascade node space.
    NodeOutOfRange { node: usize, n_nodes: usize },

    /// Candidate column length does not match the node count.
    CandidateLengthMismatch { expected: usize, actual: usize },

    /// Penalty weight must be finite and non-negative.
    InvalidPenalty { value: f64, reason: &'static str },
}

impl std::error::Error for ConnieError {}

impl std::fmt::Display for ConnieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnieError::NodeOutOfRange { node, n_nodes } => {
                write!(f, "Node {node} is out of range for {n_nodes} nodes")
            }
            ConnieError::CandidateLengthMismatch { expected, actual } => {
                write!(f, "Candidate column length mismatch: expected {expected}, actual {actual}")
            }
            ConnieError::InvalidPenalty { value, reason } => {
                write!(f, "Invalid penalty weight {value}: {reason}")
            }
        }
    }
}

/// Convert a [`ConnieError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ConnieError> for PyErr {
    fn from(err: ConnieError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
