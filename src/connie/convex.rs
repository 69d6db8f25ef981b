//! Convex (log-domain) relaxation of the ConNIe estimation problem.
//!
//! Purpose
//! -------
//! Provide the objective that is handed to the optimizer in practice:
//!
//! ```text
//! f(A_i) = Σ_{c: i infected} γ̂(c) − Σ_{c: i never infected} B̂(c) + ρ · Σ_{j≠i} 1 / (1 − A_i[j])
//! γ̂(c) = −log(1 − Π_{j infected before i} (1 − w(t_i, t_j) · A_i[j]))
//! B̂(c) = Σ_{j≠i infected in c} log(1 − A_i[j])
//! ```
//!
//! together with its analytic gradient.
//!
//! Key behaviors
//! -------------
//! - `γ̂ = 0` when the predecessor product is exactly 1 (no predecessor, or
//!   only zero-weight ones): no evidence, no cost.
//! - Domain errors are values, not errors: `γ̂ = +∞` when `1 − Π ≤ 0`, each
//!   saturated `B̂` term (`A_i[j] ≥ 1`) contributes `+∞`, and each saturated
//!   penalty term contributes `+∞`.
//! - Because `B̂` is subtracted, a saturated `B̂` would drive `f` to `−∞`;
//!   the aggregate reports `+∞` instead so infeasible columns always rank
//!   last.
//! - `ρ = 0` disables the penalty entirely (no `0 · ∞`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Aggregates validate the node, the candidate length and `ρ` once; the
//!   per-cascade terms then index freely.
//! - Entry `A_i[i]` is never read and its gradient entry is 0.
//!
//! Conventions
//! -----------
//! - [`convex_objective`] is the unpenalized objective;
//!   [`convex_objective_penalized`] adds the `ρ` term.
use ndarray::{Array1, ArrayView1};

use crate::{
    cascades::{Cascade, CascadeSet},
    connie::{
        errors::ConnieResult,
        likelihood::predecessor_survival,
        validation::{validate_column, validate_penalty},
    },
};

/// `γ̂(c) = −log(1 − Π (1 − w · A_i[j]))` over predecessors of `node`.
pub fn minus_gamma_hat(cascade: &Cascade, node: usize, candidate: ArrayView1<'_, f64>) -> f64 {
    let survival = predecessor_survival(cascade, node, candidate);
    if survival == 1.0 {
        return 0.0;
    }
    let arg = 1.0 - survival;
    if arg > 0.0 { -arg.ln() } else { f64::INFINITY }
}

/// `B̂(c) = Σ log(1 − A_i[j])` over infected `j ≠ node`; `+∞` per saturated term.
pub fn bji_hat(cascade: &Cascade, node: usize, candidate: ArrayView1<'_, f64>) -> f64 {
    cascade
        .infected_nodes()
        .filter(|&(j, _)| j != node)
        .map(|(j, _)| log_escape(candidate[j]))
        .sum()
}

/// `log(1 − a)`, or `+∞` when `1 − a ≤ 0`.
#[inline]
fn log_escape(a: f64) -> f64 {
    let arg = 1.0 - a;
    if arg > 0.0 { arg.ln() } else { f64::INFINITY }
}

/// `ρ · Σ_{j≠node} 1 / (1 − A_i[j])` without argument checks.
fn penalty_term(candidate: ArrayView1<'_, f64>, node: usize, rho: f64) -> f64 {
    if rho == 0.0 {
        return 0.0;
    }
    let total: f64 = candidate
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != node)
        .map(|(_, &a)| {
            let arg = 1.0 - a;
            if arg > 0.0 { 1.0 / arg } else { f64::INFINITY }
        })
        .sum();
    rho * total
}

/// Sparsity penalty `ρ · Σ_{j≠node} 1 / (1 − A_i[j])`.
///
/// # Errors
/// - `ConnieError::InvalidPenalty` if `rho` is negative or non-finite.
/// - `ConnieError::NodeOutOfRange` if `node >= candidate.len()`.
pub fn penalty<'a, C>(candidate: C, node: usize, rho: f64) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let candidate = candidate.into();
    validate_penalty(rho)?;
    validate_column(&candidate, node, candidate.len())?;
    Ok(penalty_term(candidate, node, rho))
}

/// `Σ γ̂(c)` over cascades where `node` was infected.
///
/// # Errors
/// Node and candidate-length errors, as in [`convex_objective`].
pub fn sum_minus_gamma_hat<'a, C>(
    candidate: C, node: usize, cascades: &CascadeSet,
) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let candidate = candidate.into();
    validate_column(&candidate, node, cascades.n_nodes())?;
    Ok(gamma_sum(candidate, node, cascades))
}

/// `Σ B̂(c)` over cascades where `node` was never infected.
///
/// # Errors
/// Node and candidate-length errors, as in [`convex_objective`].
pub fn sum_bji_hat<'a, C>(candidate: C, node: usize, cascades: &CascadeSet) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let candidate = candidate.into();
    validate_column(&candidate, node, cascades.n_nodes())?;
    Ok(bji_sum(candidate, node, cascades))
}

fn gamma_sum(candidate: ArrayView1<'_, f64>, node: usize, cascades: &CascadeSet) -> f64 {
    cascades.where_infected(node).map(|c| minus_gamma_hat(c, node, candidate)).sum()
}

fn bji_sum(candidate: ArrayView1<'_, f64>, node: usize, cascades: &CascadeSet) -> f64 {
    cascades.where_never_infected(node).map(|c| bji_hat(c, node, candidate)).sum()
}

/// Unpenalized convex objective (`ρ = 0`).
///
/// # Errors
/// - `ConnieError::CandidateLengthMismatch` if `candidate.len() != n_nodes`.
/// - `ConnieError::NodeOutOfRange` if `node >= n_nodes`.
///
/// # Example
/// ```
/// use rust_connie::cascades::{CascadeSet, ExponentialKernel};
/// use rust_connie::connie::convex_objective;
///
/// let set = CascadeSet::from_raw(
///     &[vec![0.0, 0.7, -1.0], vec![-1.0, 0.0, 0.3]],
///     ExponentialKernel::default(),
/// )?;
/// let f = convex_objective(&vec![0.5, 0.0, 0.1], 1, &set)?;
/// assert!(f.is_finite() && f > 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convex_objective<'a, C>(candidate: C, node: usize, cascades: &CascadeSet) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    convex_objective_penalized(candidate, node, cascades, 0.0)
}

/// Convex objective with sparsity penalty `ρ`.
///
/// # Errors
/// - Node and candidate-length errors, as in [`convex_objective`].
/// - `ConnieError::InvalidPenalty` if `rho` is negative or non-finite.
pub fn convex_objective_penalized<'a, C>(
    candidate: C, node: usize, cascades: &CascadeSet, rho: f64,
) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let candidate = candidate.into();
    validate_penalty(rho)?;
    validate_column(&candidate, node, cascades.n_nodes())?;

    let bji = bji_sum(candidate, node, cascades);
    if bji == f64::INFINITY {
        return Ok(f64::INFINITY);
    }
    Ok(gamma_sum(candidate, node, cascades) - bji + penalty_term(candidate, node, rho))
}

/// Gradient of [`convex_objective_penalized`] with respect to the candidate.
///
/// For a cascade where `node` was infected with predecessor factors
/// `f_k = 1 − w_k · A_k` and product `P ≠ 1`,
/// `∂γ̂/∂A_k = −w_k · Π_{j≠k} f_j / (1 − P)`; each never-infected cascade
/// adds `1 / (1 − A_k)` for every infected `k ≠ node`; the penalty adds
/// `ρ / (1 − A_k)²`. Entry `node` is 0. Entries are non-finite wherever
/// the objective is infinite.
///
/// # Errors
/// Same as [`convex_objective_penalized`].
pub fn convex_gradient<'a, C>(
    candidate: C, node: usize, cascades: &CascadeSet, rho: f64,
) -> ConnieResult<Array1<f64>>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let candidate = candidate.into();
    validate_penalty(rho)?;
    validate_column(&candidate, node, cascades.n_nodes())?;

    let mut grad = Array1::<f64>::zeros(candidate.len());
    let mut factors: Vec<(usize, f64, f64)> = Vec::with_capacity(candidate.len());
    let mut suffix: Vec<f64> = Vec::with_capacity(candidate.len() + 1);

    for cascade in cascades.where_infected(node) {
        let Some(t_i) = cascade.time(node) else { continue };
        factors.clear();
        factors.extend(cascade.predecessors(node).map(|(j, t_j)| {
            let w = cascade.weight(t_i, t_j);
            (j, w, 1.0 - w * candidate[j])
        }));
        let survival: f64 = factors.iter().map(|&(_, _, f)| f).product();
        if survival == 1.0 {
            continue;
        }
        let denom = 1.0 - survival;
        if denom <= 0.0 {
            grad.fill(f64::NAN);
            return Ok(grad);
        }

        // Leave-one-out products via suffix products.
        suffix.clear();
        suffix.resize(factors.len() + 1, 1.0);
        for k in (0..factors.len()).rev() {
            suffix[k] = suffix[k + 1] * factors[k].2;
        }
        let mut prefix = 1.0;
        for (k, &(j, w, f)) in factors.iter().enumerate() {
            grad[j] -= w * prefix * suffix[k + 1] / denom;
            prefix *= f;
        }
    }

    for cascade in cascades.where_never_infected(node) {
        for (j, _) in cascade.infected_nodes().filter(|&(j, _)| j != node) {
            let arg = 1.0 - candidate[j];
            grad[j] += if arg > 0.0 { 1.0 / arg } else { f64::INFINITY };
        }
    }

    if rho > 0.0 {
        for (j, &a) in candidate.iter().enumerate().filter(|&(j, _)| j != node) {
            grad[j] += rho / ((1.0 - a) * (1.0 - a));
        }
    }

    grad[node] = 0.0;
    Ok(grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connie::{errors::ConnieError, test_support::*};
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - γ̂ and B̂ on the reference set, including the no-predecessor case.
    // - The aggregate objective for all four reference columns, with and
    //   without penalty.
    // - Saturation policy (`+∞`) and argument errors.
    // - The analytic gradient against central differences.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // γ̂ reproduces the reference values and is 0 without predecessors.
    //
    // Given
    // -----
    // - Reference set, node 0, column A0.
    //
    // Expect
    // ------
    // - 0 on cascades 1 and 2 (node 0 is the seed), ≈ 2.5543, 1.5088, 2.5988
    //   on cascades 4–6.
    fn minus_gamma_hat_matches_reference_values() {
        let set = reference_set();
        let a0 = reference_columns()[0].clone();

        assert_eq!(minus_gamma_hat(&set[1], 0, a0.view()), 0.0);
        assert_eq!(minus_gamma_hat(&set[2], 0, a0.view()), 0.0);
        assert_relative_eq!(minus_gamma_hat(&set[4], 0, a0.view()), 2.5543, epsilon = 5e-5);
        assert_relative_eq!(minus_gamma_hat(&set[5], 0, a0.view()), 1.5088, epsilon = 5e-5);
        assert_relative_eq!(minus_gamma_hat(&set[6], 0, a0.view()), 2.5988, epsilon = 5e-5);
    }

    #[test]
    // Purpose
    // -------
    // Predecessors with zero weight leave the product at exactly 1, which is
    // scored as "no evidence" rather than `−log 0`.
    fn minus_gamma_hat_is_zero_for_zero_weight_predecessors() {
        let set = reference_set();
        let zeros = Array1::<f64>::zeros(4);

        for c in &set {
            assert_eq!(minus_gamma_hat(c, 0, zeros.view()), 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // B̂ reproduces the reference values for node 0.
    fn bji_hat_matches_reference_values() {
        let set = reference_set();
        let a0 = reference_columns()[0].clone();

        assert_relative_eq!(bji_hat(&set[0], 0, a0.view()), -0.1054, epsilon = 5e-5);
        assert_eq!(bji_hat(&set[1], 0, a0.view()), 0.0);
        assert_relative_eq!(bji_hat(&set[3], 0, a0.view()), -0.3930, epsilon = 5e-5);
    }

    #[test]
    // Purpose
    // -------
    // The aggregates only visit the cascades selected by the views.
    fn partial_sums_use_filtered_views() {
        let set = reference_set();
        let a0 = reference_columns()[0].clone();

        let gamma: f64 = [1, 2, 4, 5, 6].iter().map(|&k| minus_gamma_hat(&set[k], 0, a0.view())).sum();
        let bji: f64 = [0, 3].iter().map(|&k| bji_hat(&set[k], 0, a0.view())).sum();

        assert_relative_eq!(sum_minus_gamma_hat(&a0, 0, &set).unwrap(), gamma, epsilon = 1e-12);
        assert_relative_eq!(sum_bji_hat(&a0, 0, &set).unwrap(), bji, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The convex objective reproduces the reference value of every column.
    //
    // Expect
    // ------
    // - 7.1603, 9.47, 2.5264, 4.9206 for nodes 0..4, identical for vector and
    //   array inputs.
    fn convex_objective_matches_reference_values() {
        let set = reference_set();
        let expected = [7.1603, 9.4700, 2.5264, 4.9206];

        for (node, col) in reference_columns().iter().enumerate() {
            let from_array = convex_objective(col, node, &set).unwrap();
            let as_vec = col.to_vec();
            let from_vec = convex_objective(&as_vec, node, &set).unwrap();

            assert_relative_eq!(from_array, expected[node], epsilon = 5e-5);
            assert_eq!(from_array, from_vec);
        }
    }

    #[test]
    // Purpose
    // -------
    // The penalty adds `ρ Σ 1/(1 − A_j)` and `ρ = 0` matches the plain
    // objective.
    fn penalty_is_added_to_objective() {
        let set = reference_set();
        let a0 = reference_columns()[0].clone();

        let p = penalty(&a0, 0, 1.0).unwrap();
        assert_relative_eq!(p, 3.470085, epsilon = 1e-6);
        assert_relative_eq!(
            convex_objective_penalized(&a0, 0, &set, 1.0).unwrap(),
            convex_objective(&a0, 0, &set).unwrap() + p,
            epsilon = 1e-12
        );
        assert_eq!(
            convex_objective_penalized(&a0, 0, &set, 0.0).unwrap(),
            convex_objective(&a0, 0, &set).unwrap()
        );
        assert_eq!(penalty(&a0, 0, 0.0).unwrap(), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Saturated weights make the relevant terms and the aggregate `+∞`.
    //
    // Given
    // -----
    // - Node 0, column with A[3] = 1 (node 3 is infected in both
    //   never-infected cascades of node 0).
    //
    // Expect
    // ------
    // - B̂ = +∞ on cascade 3, penalty = +∞, objective = +∞ with and without ρ.
    fn saturated_weights_map_to_positive_infinity() {
        let set = reference_set();
        let saturated = array![0.0, 0.025, 0.1, 1.0];

        assert_eq!(bji_hat(&set[3], 0, saturated.view()), f64::INFINITY);
        assert_eq!(penalty(&saturated, 0, 0.5).unwrap(), f64::INFINITY);
        assert_eq!(convex_objective(&saturated, 0, &set).unwrap(), f64::INFINITY);
        assert_eq!(convex_objective_penalized(&saturated, 0, &set, 0.5).unwrap(), f64::INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Invalid penalties and shapes fail fast.
    fn rejects_invalid_arguments() {
        let set = reference_set();
        let a0 = reference_columns()[0].clone();

        assert!(matches!(
            convex_objective_penalized(&a0, 0, &set, -1.0),
            Err(ConnieError::InvalidPenalty { .. })
        ));
        assert_eq!(
            convex_objective(&[0.1, 0.2], 0, &set),
            Err(ConnieError::CandidateLengthMismatch { expected: 4, actual: 2 })
        );
        assert_eq!(penalty(&a0, 5, 1.0), Err(ConnieError::NodeOutOfRange { node: 5, n_nodes: 4 }));
    }

    #[test]
    // Purpose
    // -------
    // The analytic gradient agrees with central differences of the
    // objective for every reference column, with and without penalty.
    //
    // Expect
    // ------
    // - Agreement to 1e-5; the self-edge entry is exactly 0.
    fn gradient_matches_central_differences() {
        let set = reference_set();
        let h = 1e-6;

        for (node, col) in reference_columns().iter().enumerate() {
            for rho in [0.0, 0.7] {
                let grad = convex_gradient(col, node, &set, rho).unwrap();
                assert_eq!(grad[node], 0.0);
                for k in (0..4).filter(|&k| k != node) {
                    let mut up = col.clone();
                    let mut down = col.clone();
                    up[k] += h;
                    down[k] -= h;
                    let fd = (convex_objective_penalized(&up, node, &set, rho).unwrap()
                        - convex_objective_penalized(&down, node, &set, rho).unwrap())
                        / (2.0 * h);
                    assert_relative_eq!(grad[k], fd, epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Spot-check one gradient against hand-derived values.
    fn gradient_for_column_zero_matches_known_values() {
        let set = reference_set();
        let a0 = reference_columns()[0].clone();

        let grad = convex_gradient(&a0, 0, &set, 0.0).unwrap();

        assert_relative_eq!(grad[1], -7.519111, epsilon = 1e-5);
        assert_relative_eq!(grad[2], -4.745863, epsilon = 1e-5);
        assert_relative_eq!(grad[3], -6.864024, epsilon = 1e-5);
    }
}
