//! Column model: one node's incoming weights as an optimizer problem.
//!
//! Purpose
//! -------
//! Expose the ConNIe objective for a single target node as a
//! [`LogLikelihood`] over an unconstrained parameter vector, so the
//! argmin-backed L-BFGS driver can solve the bounded column problem.
//!
//! Key behaviors
//! -------------
//! - `θ ∈ ℝ^{n−1}` holds one entry per candidate predecessor `j ≠ node`, in
//!   increasing `j` order. Weights are recovered as
//!   `A_j = clamp(logistic(θ_j), LOGIT_EPS, 1 − LOGIT_EPS)` and `A_node = 0`.
//! - `ℓ(θ) = −objective(A(θ))`, so maximizing `ℓ` minimizes the chosen
//!   ConNIe objective.
//! - The convex formulation returns an analytic gradient (chain rule through
//!   the logistic); the likelihood formulation returns
//!   `GradientNotImplemented` and the adapter falls back to finite
//!   differences.
//!
//! Invariants & assumptions
//! ------------------------
//! - `check` is the only place that validates `θ` against the data; `value`
//!   and `grad` still reject a wrong `θ` length instead of panicking.
//! - An infinite objective at the starting point is reported as
//!   `OptError::NonFiniteCost`. For the likelihood formulation this happens
//!   whenever the node is infected in some cascade without any predecessor.
use ndarray::{Array1, ArrayView1};

use crate::{
    cascades::CascadeSet,
    connie::{
        convex::{convex_gradient, convex_objective_penalized},
        likelihood::negative_log_likelihood,
        validation::{validate_node, validate_penalty},
    },
    estimation::options::Formulation,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, Theta},
        numerical_stability::transformations::{
            clamped_logistic, clamped_logistic_deriv, logit,
        },
    },
};

/// Incoming-weight problem for `node` in an `n_nodes` network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnModel {
    pub node: usize,
    pub n_nodes: usize,
    pub formulation: Formulation,
    pub penalty: f64,
}

impl ColumnModel {
    /// # Errors
    /// - `OptError::NodeOutOfRange` if `node >= n_nodes`.
    /// - `OptError::InvalidPenalty` if `penalty` is negative or non-finite.
    pub fn new(
        node: usize, n_nodes: usize, formulation: Formulation, penalty: f64,
    ) -> OptResult<Self> {
        validate_node(node, n_nodes)?;
        validate_penalty(penalty)?;
        Ok(Self { node, n_nodes, formulation, penalty })
    }

    /// Number of free parameters, `n_nodes − 1`.
    pub fn dim(&self) -> usize {
        self.n_nodes - 1
    }

    /// Map `θ` to a full candidate column with the self-edge fixed at 0.
    ///
    /// # Errors
    /// - `OptError::ThetaLengthMismatch` if `theta.len() != n_nodes − 1`.
    pub fn column_from_theta(&self, theta: ArrayView1<'_, f64>) -> OptResult<Array1<f64>> {
        self.check_theta_len(theta.len())?;
        let mut column = Array1::<f64>::zeros(self.n_nodes);
        for (j, &t) in self.free_indices().zip(theta.iter()) {
            column[j] = clamped_logistic(t);
        }
        Ok(column)
    }

    /// Map a full candidate column to `θ`; the self-edge entry is dropped.
    ///
    /// Entries on or outside `[0, 1]` are clamped before the logit.
    ///
    /// # Errors
    /// - `OptError::CandidateLengthMismatch` if `column.len() != n_nodes`.
    pub fn theta_from_column(&self, column: ArrayView1<'_, f64>) -> OptResult<Theta> {
        if column.len() != self.n_nodes {
            return Err(OptError::CandidateLengthMismatch {
                expected: self.n_nodes,
                actual: column.len(),
            });
        }
        Ok(self.free_indices().map(|j| logit(column[j])).collect())
    }

    /// Objective of the configured formulation at a full candidate column.
    ///
    /// # Errors
    /// Shape and penalty errors from the objective functions.
    pub fn objective(&self, column: ArrayView1<'_, f64>, data: &CascadeSet) -> OptResult<f64> {
        let value = match self.formulation {
            Formulation::Convex => {
                convex_objective_penalized(column, self.node, data, self.penalty)?
            }
            Formulation::MaxLikelihood => negative_log_likelihood(column, self.node, data)?,
        };
        Ok(value)
    }

    fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_nodes).filter(move |&j| j != self.node)
    }

    fn check_theta_len(&self, actual: usize) -> OptResult<()> {
        if actual != self.dim() {
            return Err(OptError::ThetaLengthMismatch { expected: self.dim(), actual });
        }
        Ok(())
    }
}

impl LogLikelihood for ColumnModel {
    type Data = CascadeSet;

    /// `ℓ(θ) = −objective(A(θ))`; may be `−∞` where the objective is `+∞`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let column = self.column_from_theta(theta.view())?;
        Ok(-self.objective(column.view(), data)?)
    }

    /// Validate `θ` and the data before a run.
    ///
    /// # Errors
    /// - `OptError::ThetaLengthMismatch` for a wrong `θ` length.
    /// - `OptError::CandidateLengthMismatch` if the set's node count differs
    ///   from the model's.
    /// - `OptError::NonFiniteCost` if the objective at `θ` is not finite.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        self.check_theta_len(theta.len())?;
        if data.n_nodes() != self.n_nodes {
            return Err(OptError::CandidateLengthMismatch {
                expected: data.n_nodes(),
                actual: self.n_nodes,
            });
        }
        let value = self.value(theta, data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value: -value });
        }
        Ok(())
    }

    /// Analytic gradient for the convex formulation:
    /// `∂ℓ/∂θ_j = −∂f/∂A_j · A_j (1 − A_j)`, and `0` for coordinates whose
    /// weight sits on the clamp.
    ///
    /// # Errors
    /// - `OptError::GradientNotImplemented` for the likelihood formulation.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        if self.formulation == Formulation::MaxLikelihood {
            return Err(OptError::GradientNotImplemented);
        }
        let column = self.column_from_theta(theta.view())?;
        let g = convex_gradient(column.view(), self.node, data, self.penalty)?;
        Ok(self
            .free_indices()
            .zip(theta.iter())
            .map(|(j, &t)| -g[j] * clamped_logistic_deriv(t))
            .collect())
    }
}
