//! Column and network estimators.
//!
//! Purpose
//! -------
//! Recover incoming edge weights from a cascade set by minimizing a ConNIe
//! objective with the argmin-backed L-BFGS driver, one column at a time or
//! for the whole network.
//!
//! Key behaviors
//! -------------
//! - [`estimate_column`] builds a [`ColumnModel`], seeds `θ` from the
//!   configured [`Init`](super::options::Init), runs
//!   [`maximize`] and maps `θ̂` back to weights in `[0, 1]` with the
//!   self-edge at 0.
//! - [`estimate_network`] solves every column independently on the rayon
//!   pool over the shared, read-only [`CascadeSet`] and assembles the
//!   `n × n` estimate, column `i` holding the incoming weights of node `i`.
//!
//! Invariants & assumptions
//! ------------------------
//! - A one-node network has no free weight; its column is `[0]` and no
//!   optimizer run takes place (`outcome = None`).
//! - Any column failure aborts the network estimate with that error.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

use crate::{
    cascades::{AdjacencyMatrix, CascadeSet},
    estimation::{column::ColumnModel, options::EstimationOptions},
    optimization::{
        errors::OptResult,
        loglik_optimizer::{OptimOutcome, maximize},
    },
};

/// Estimated incoming weights of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEstimate {
    pub node: usize,
    /// Full column, `weights[node] = 0`.
    pub weights: Array1<f64>,
    /// Objective of the chosen formulation at `weights`.
    pub objective: f64,
    /// Optimizer report; `None` when there was nothing to optimize.
    pub outcome: Option<OptimOutcome>,
}

impl ColumnEstimate {
    /// `true` when no optimizer run was needed or the run terminated.
    pub fn converged(&self) -> bool {
        self.outcome.as_ref().is_none_or(|o| o.converged)
    }
}

/// Estimated network: one [`ColumnEstimate`] per node.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEstimate {
    weights: Array2<f64>,
    columns: Vec<ColumnEstimate>,
}

impl NetworkEstimate {
    fn from_columns(columns: Vec<ColumnEstimate>) -> Self {
        let n = columns.len();
        let mut weights = Array2::<f64>::zeros((n, n));
        for column in &columns {
            weights.column_mut(column.node).assign(&column.weights);
        }
        Self { weights, columns }
    }

    /// `weights[[j, i]]`: estimated probability that `j` infects `i`.
    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    pub fn columns(&self) -> &[ColumnEstimate] {
        &self.columns
    }

    /// Incoming weights of `node`, if it exists.
    pub fn column(&self, node: usize) -> Option<ArrayView1<'_, f64>> {
        (node < self.weights.ncols()).then(|| self.weights.column(node))
    }

    /// Sum of the per-column objectives.
    pub fn total_objective(&self) -> f64 {
        self.columns.iter().map(|c| c.objective).sum()
    }

    /// `true` when every column converged.
    pub fn converged(&self) -> bool {
        self.columns.iter().all(ColumnEstimate::converged)
    }

    /// Reinterpret the estimate as an adjacency matrix, e.g. to simulate
    /// from it.
    ///
    /// # Errors
    /// - `OptError::InvalidCascadeData` if a weight left `[0, 1]`.
    pub fn to_adjacency(&self) -> OptResult<AdjacencyMatrix> {
        Ok(AdjacencyMatrix::new(self.weights.clone())?)
    }
}

/// Estimate the incoming weights of `node`.
///
/// # Errors
/// - `OptError::NodeOutOfRange` / `OptError::InvalidPenalty` for bad
///   arguments.
/// - `OptError::InitLengthMismatch` if a vector init has the wrong length.
/// - `OptError::NonFiniteCost` if the objective is infinite at the start or
///   becomes infinite during the run.
/// - Any optimizer error from [`maximize`].
///
/// # Example
/// ```no_run
/// use rust_connie::cascades::{AdjacencyMatrix, DiffusionSimulator, ExponentialKernel};
/// use rust_connie::estimation::{EstimationOptions, estimate_column};
///
/// let truth = AdjacencyMatrix::from_rows(&[[0.0, 0.6], [0.3, 0.0]])?;
/// let sim = DiffusionSimulator::new(truth, ExponentialKernel::default());
/// let set = sim.simulate_set(500, 7)?;
/// let est = estimate_column(&set, 1, &EstimationOptions::default())?;
/// println!("A[0][1] ≈ {:.3}", est.weights[0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn estimate_column(
    cascades: &CascadeSet, node: usize, opts: &EstimationOptions,
) -> OptResult<ColumnEstimate> {
    let n_nodes = cascades.n_nodes();
    let model = ColumnModel::new(node, n_nodes, opts.formulation, opts.penalty)?;
    let start = opts.init.column(node, n_nodes)?;

    if model.dim() == 0 {
        let objective = model.objective(start.view(), cascades)?;
        return Ok(ColumnEstimate { node, weights: start, objective, outcome: None });
    }

    let theta0 = model.theta_from_column(start.view())?;
    let outcome = maximize(&model, theta0, cascades, &opts.mle_opts)?;
    let weights = model.column_from_theta(outcome.theta_hat.view())?;
    let objective = -outcome.value;
    Ok(ColumnEstimate { node, weights, objective, outcome: Some(outcome) })
}

/// Estimate every column of the network in parallel.
///
/// # Errors
/// One of the failing columns' errors, see [`estimate_column`].
pub fn estimate_network(
    cascades: &CascadeSet, opts: &EstimationOptions,
) -> OptResult<NetworkEstimate> {
    let columns = (0..cascades.n_nodes())
        .into_par_iter()
        .map(|node| estimate_column(cascades, node, opts))
        .collect::<OptResult<Vec<_>>>()?;
    Ok(NetworkEstimate::from_columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cascades::ExponentialKernel,
        connie::{convex_objective, test_support::*},
        estimation::options::{Formulation, Init},
        optimization::{errors::OptError, loglik_optimizer::MLEOptions},
    };
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Single-column runs on the seven-cascade reference set (bounds,
    //   self-edge, objective decrease).
    // - The infeasible likelihood start and the one-node shortcut.
    // - Network assembly from columns.
    //
    // Recovery of a simulated ground truth lives in the integration tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A convex run returns weights in [0, 1] with the self-edge at 0 and an
    // objective no worse than the starting column.
    //
    // Given
    // -----
    // - Reference set, node 3, default options (start at 0.5).
    //
    // Expect
    // ------
    // - weights[3] == 0, all weights in [0, 1], objective ≤ objective(start),
    //   and the reported objective equals the objective at the weights.
    fn convex_column_improves_on_start() {
        let set = reference_set();
        let opts = EstimationOptions::default();

        let est = estimate_column(&set, 3, &opts).unwrap();

        assert_eq!(est.node, 3);
        assert_eq!(est.weights[3], 0.0);
        assert!(est.weights.iter().all(|&a| (0.0..=1.0).contains(&a)));
        let start = convex_objective(&[0.5, 0.5, 0.5, 0.0], 3, &set).unwrap();
        assert!(est.objective <= start);
        assert_relative_eq!(
            est.objective,
            convex_objective(&est.weights, 3, &set).unwrap(),
            epsilon = 1e-9
        );
        assert!(est.outcome.is_some());
    }

    #[test]
    // Purpose
    // -------
    // The likelihood formulation is infeasible for a node that seeds a
    // cascade and feasible for a node that always has a predecessor.
    fn likelihood_column_feasibility_follows_predecessors() {
        let set = reference_set();
        let opts = EstimationOptions {
            formulation: Formulation::MaxLikelihood,
            ..EstimationOptions::default()
        };

        assert!(matches!(
            estimate_column(&set, 0, &opts),
            Err(OptError::NonFiniteCost { .. })
        ));

        let est = estimate_column(&set, 1, &opts).unwrap();
        assert_eq!(est.weights[1], 0.0);
        assert!(est.objective.is_finite());
    }

    #[test]
    // Purpose
    // -------
    // A one-node network has nothing to estimate.
    fn single_node_network_skips_optimizer() {
        let set = CascadeSet::from_raw(&[[0.0], [0.0]], ExponentialKernel::default()).unwrap();

        let est = estimate_column(&set, 0, &EstimationOptions::default()).unwrap();

        assert_eq!(est.weights, Array1::from(vec![0.0]));
        assert_eq!(est.objective, 0.0);
        assert!(est.outcome.is_none());
        assert!(est.converged());
    }

    #[test]
    // Purpose
    // -------
    // Argument errors surface before any optimizer work.
    fn estimate_column_rejects_bad_arguments() {
        let set = reference_set();

        assert_eq!(
            estimate_column(&set, 9, &EstimationOptions::default()),
            Err(OptError::NodeOutOfRange { node: 9, n_nodes: 4 })
        );

        let opts = EstimationOptions {
            init: Init::FixedVector(Array1::from(vec![0.5, 0.5])),
            ..EstimationOptions::default()
        };
        assert_eq!(
            estimate_column(&set, 0, &opts),
            Err(OptError::InitLengthMismatch { expected: 4, actual: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The network estimate places column `i` of the matrix at node `i` and
    // agrees with the per-column runs.
    //
    // Given
    // -----
    // - Reference set, convex formulation with ρ = 0.1.
    //
    // Expect
    // ------
    // - 4 × 4 matrix, zero diagonal, columns identical to `estimate_column`.
    fn network_estimate_assembles_columns() {
        let set = reference_set();
        let opts = EstimationOptions::new(
            Formulation::Convex,
            0.1,
            Init::default(),
            MLEOptions::default(),
        )
        .unwrap();

        let net = estimate_network(&set, &opts).unwrap();

        assert_eq!(net.weights().dim(), (4, 4));
        assert_eq!(net.columns().len(), 4);
        for node in 0..4 {
            assert_eq!(net.weights()[[node, node]], 0.0);
            let single = estimate_column(&set, node, &opts).unwrap();
            assert_eq!(net.column(node).unwrap(), single.weights.view());
        }
        assert!(net.column(4).is_none());
        assert!(net.to_adjacency().is_ok());
        assert_relative_eq!(
            net.total_objective(),
            net.columns().iter().map(|c| c.objective).sum::<f64>()
        );
    }
}
