//! Ground-truth adjacency matrix of transmission probabilities.
//!
//! `A[j][k]` is the probability that node `j`, once infected, infects a
//! susceptible node `k`. The diagonal is accepted but never read by the
//! simulator or the objectives.
use ndarray::{Array1, Array2, ArrayView2};

use crate::cascades::errors::{CascadeError, CascadeResult};

/// Validated square matrix of edge weights in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    weights: Array2<f64>,
}

impl AdjacencyMatrix {
    /// Validate and wrap an `n × n` matrix.
    ///
    /// # Errors
    /// - `CascadeError::EmptyMatrix` if either dimension is zero.
    /// - `CascadeError::NotSquare` if `rows != cols`.
    /// - `CascadeError::InvalidEdgeWeight` for the first entry that is
    ///   non-finite or outside `[0, 1]` (row-major order).
    pub fn new(weights: Array2<f64>) -> CascadeResult<Self> {
        let (rows, cols) = weights.dim();
        if rows == 0 || cols == 0 {
            return Err(CascadeError::EmptyMatrix);
        }
        if rows != cols {
            return Err(CascadeError::NotSquare { rows, cols });
        }
        for ((row, col), &value) in weights.indexed_iter() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CascadeError::InvalidEdgeWeight { row, col, value });
            }
        }
        Ok(Self { weights })
    }

    /// Build from nested rows, e.g. a literal `vec![vec![..], ..]`.
    ///
    /// # Errors
    /// - `CascadeError::EmptyMatrix` if `rows` is empty.
    /// - `CascadeError::RaggedRow` if any row length differs from `rows.len()`.
    /// - Any error from [`AdjacencyMatrix::new`].
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> CascadeResult<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(CascadeError::EmptyMatrix);
        }
        for (row, values) in rows.iter().enumerate() {
            let actual = values.as_ref().len();
            if actual != n {
                return Err(CascadeError::RaggedRow { row, expected: n, actual });
            }
        }
        Self::new(Array2::from_shape_fn((n, n), |(r, c)| rows[r].as_ref()[c]))
    }

    pub fn n_nodes(&self) -> usize {
        self.weights.nrows()
    }

    /// `A[from][to]`.
    ///
    /// # Panics
    /// If either index is out of range.
    #[inline]
    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[[from, to]]
    }

    /// Incoming weights of `node` (column `node`) with the self-edge zeroed.
    ///
    /// This is the true candidate column for `node`, directly comparable with
    /// an estimated column.
    ///
    /// # Errors
    /// - `CascadeError::NodeOutOfRange` if `node >= n_nodes`.
    pub fn incoming(&self, node: usize) -> CascadeResult<Array1<f64>> {
        let n_nodes = self.n_nodes();
        if node >= n_nodes {
            return Err(CascadeError::NodeOutOfRange { node, n_nodes });
        }
        let mut column = self.weights.column(node).to_owned();
        column[node] = 0.0;
        Ok(column)
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }
}
