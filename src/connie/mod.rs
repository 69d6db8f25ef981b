//! connie — likelihood and convex objectives for one column of the network.
//!
//! Purpose
//! -------
//! Score a candidate column `A_i` (the hypothesized incoming edge weights of
//! node `i`) against an observed [`CascadeSet`](crate::cascades::CascadeSet).
//! Two formulations are provided: the exact, non-convex likelihood
//! ([`likelihood`]) and its convex log-domain relaxation ([`convex`]), which
//! is the one normally optimized.
//!
//! Key behaviors
//! -------------
//! - Every aggregate has the shape
//!   `(candidate, node, cascades[, rho]) → ConnieResult<f64>` and accepts
//!   slices, vectors, fixed arrays, `Array1` and views for the candidate.
//! - Domain errors become `+∞`; only shape and argument problems are
//!   reported as [`ConnieError`].
//! - [`convex_gradient`] supplies the analytic gradient of the convex
//!   objective for gradient-based optimizers.
//!
//! Invariants & assumptions
//! ------------------------
//! - The candidate entry for `node` itself is ignored; keeping it at 0 is
//!   the caller's contract.
//! - Objectives are pure functions of their arguments and can be evaluated
//!   concurrently over a shared cascade set.
//!
//! Downstream usage
//! ----------------
//! - `estimation` wraps these objectives as log-likelihoods for the
//!   argmin-backed optimizer.
//!
//! Testing notes
//! -------------
//! - Unit tests reproduce the four-decimal reference values on a fixed
//!   seven-cascade, four-node data set and check the gradient against
//!   central differences.

pub mod convex;
pub mod errors;
pub mod likelihood;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::convex::{
    bji_hat, convex_gradient, convex_objective, convex_objective_penalized, minus_gamma_hat,
    penalty, sum_bji_hat, sum_minus_gamma_hat,
};
pub use self::errors::{ConnieError, ConnieResult};
pub use self::likelihood::{
    likelihood, negative_log_likelihood, prob_infected_at_time, prob_never_infected,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::cascades::{CascadeSet, ExponentialKernel};
    use ndarray::{Array1, array};

    /// Seven cascades over four nodes, λ = 1.
    pub fn reference_set() -> CascadeSet {
        let rows = [
            [-1.0, -1.0, 0.0, -1.0],
            [0.0, -1.0, -1.0, -1.0],
            [0.0, 3.5866, -1.0, -1.0],
            [-1.0, -1.0, 0.6115, 0.0],
            [1.7403, 0.8380, 0.3760, 0.0],
            [1.3690, -1.0, 0.0, 1.1501],
            [1.6617, 0.1125, 0.1946, 0.0],
        ];
        CascadeSet::from_raw(&rows, ExponentialKernel::default()).expect("reference set is valid")
    }

    /// Candidate columns A0..A3 with the self-edge at 0.
    pub fn reference_columns() -> Vec<Array1<f64>> {
        vec![
            array![0.0, 0.025, 0.1, 0.25],
            array![0.2, 0.0, 0.1, 0.45],
            array![0.05, 0.3, 0.0, 0.7],
            array![0.2, 0.6, 0.1, 0.0],
        ]
    }
}
