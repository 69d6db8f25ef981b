//! Max-likelihood formulation of ConNIe.
//!
//! Purpose
//! -------
//! Score a candidate column `A_i` (incoming edge weights of node `i`)
//! against a cascade set by the exact likelihood
//!
//! ```text
//! L(A_i) = Π_{c: i never infected} P_never(c) · Π_{c: i infected} P_inf(c)
//! P_inf(c)   = 1 − Π_{j infected before i} (1 − w(t_i, t_j) · A_i[j])
//! P_never(c) = Π_{j ≠ i infected in c} (1 − A_i[j])
//! ```
//!
//! and expose `−log L` for minimization.
//!
//! Key behaviors
//! -------------
//! - An infected node without predecessors gets `P_inf = 0`: nobody could
//!   have caused the infection under the hypothesis, so the cascade makes the
//!   hypothesis impossible instead of being skipped.
//! - `negative_log_likelihood` returns `+∞` whenever `L ≤ 0` (or is NaN);
//!   the surface is non-convex and possibly discontinuous, and callers are
//!   expected to tolerate the infinite value.
//!
//! Conventions
//! -----------
//! - Per-cascade functions take a validated `ArrayView1` and never fail.
//! - Aggregates accept anything convertible into an `ArrayView1<f64>`
//!   (`&[f64]`, `&Vec<f64>`, `&[f64; N]`, `&Array1<f64>`, views) and validate
//!   the node and candidate length against the set.
//! - Entry `A_i[i]` is never read.
use ndarray::ArrayView1;

use crate::{
    cascades::{Cascade, CascadeSet},
    connie::{errors::ConnieResult, validation::validate_column},
};

/// `Π_j (1 − w(t_i, t_j) · A_i[j])` over predecessors `j` of `node`.
///
/// Equals exactly `1.0` when `node` has no predecessor (or was never
/// infected).
pub(crate) fn predecessor_survival(
    cascade: &Cascade, node: usize, candidate: ArrayView1<'_, f64>,
) -> f64 {
    let Some(t_i) = cascade.time(node) else {
        return 1.0;
    };
    cascade
        .predecessors(node)
        .map(|(j, t_j)| 1.0 - cascade.weight(t_i, t_j) * candidate[j])
        .product()
}

/// Probability that `node` was infected exactly when observed in `cascade`.
pub fn prob_infected_at_time(
    cascade: &Cascade, node: usize, candidate: ArrayView1<'_, f64>,
) -> f64 {
    1.0 - predecessor_survival(cascade, node, candidate)
}

/// Probability that `node` escaped every infected node of `cascade`.
///
/// Timing-independent; equals 1 when every other infected node has weight 0.
pub fn prob_never_infected(cascade: &Cascade, node: usize, candidate: ArrayView1<'_, f64>) -> f64 {
    cascade
        .infected_nodes()
        .filter(|&(j, _)| j != node)
        .map(|(j, _)| 1.0 - candidate[j])
        .product()
}

/// Likelihood `L(A_i)` of the candidate column for `node`.
///
/// # Errors
/// - `ConnieError::CandidateLengthMismatch` if `candidate.len() != n_nodes`.
/// - `ConnieError::NodeOutOfRange` if `node >= n_nodes`.
pub fn likelihood<'a, C>(candidate: C, node: usize, cascades: &CascadeSet) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let candidate = candidate.into();
    validate_column(&candidate, node, cascades.n_nodes())?;
    let never: f64 =
        cascades.where_never_infected(node).map(|c| prob_never_infected(c, node, candidate)).product();
    let infected: f64 =
        cascades.where_infected(node).map(|c| prob_infected_at_time(c, node, candidate)).product();
    Ok(never * infected)
}

/// `−log L(A_i)`, or `+∞` when `L(A_i) ≤ 0`.
///
/// # Errors
/// Same as [`likelihood`].
///
/// # Example
/// ```
/// use rust_connie::cascades::{CascadeSet, ExponentialKernel};
/// use rust_connie::connie::negative_log_likelihood;
///
/// let set = CascadeSet::from_raw(
///     &[[0.0, 0.5, -1.0], [-1.0, 0.0, 0.2]],
///     ExponentialKernel::default(),
/// )?;
/// let nll = negative_log_likelihood(&[0.4, 0.3, 0.0], 2, &set)?;
/// assert!(nll.is_finite());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn negative_log_likelihood<'a, C>(
    candidate: C, node: usize, cascades: &CascadeSet,
) -> ConnieResult<f64>
where
    C: Into<ArrayView1<'a, f64>>,
{
    let l = likelihood(candidate, node, cascades)?;
    if l > 0.0 { Ok(-l.ln()) } else { Ok(f64::INFINITY) }
}
