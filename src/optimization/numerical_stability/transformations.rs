//! Numerical stability utilities.
//!
//! Guarded transforms between the unconstrained optimizer space and the unit
//! interval in which ConNIe edge weights live. Naïve `1 / (1 + exp(-x))`
//! overflows for large negative `x`; the implementations here branch on the
//! sign so every intermediate `exp` has a non-positive argument.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: clamp distance from `0` and `1` for mapped edge weights.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, ℝ → (0, 1).
//! - [`clamped_logistic(x)`]: `safe_logistic` clamped into
//!   `[LOGIT_EPS, 1 − LOGIT_EPS]`.
//! - [`logit(p)`]: inverse of the logistic map on `(0, 1)`.
//! - [`logistic_deriv(p)`]: `dp/dx = p (1 − p)` expressed through the output.
//! - [`clamped_logistic_deriv(x)`]: derivative of `clamped_logistic`, zero
//!   where the clamp is active.

/// Clamp distance for edge weights produced from optimizer space.
///
/// A weight of exactly `1` makes `1 − A_j` vanish and sends the convex
/// objective to `+∞`; a weight of exactly `0` is harmless for the objective
/// but pins the logit at `−∞`. Both ends are kept `LOGIT_EPS` away.
pub const LOGIT_EPS: f64 = 1e-10;

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `σ(x)` in `[0, 1]`; the endpoints are only reached through `f64`
///   rounding for `|x|` beyond roughly 37.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Logistic map clamped into `[LOGIT_EPS, 1 − LOGIT_EPS]`.
pub fn clamped_logistic(x: f64) -> f64 {
    safe_logistic(x).clamp(LOGIT_EPS, 1.0 - LOGIT_EPS)
}

/// Inverse logistic `logit(p) = ln(p / (1 − p))`.
///
/// The input is clamped into `[LOGIT_EPS, 1 − LOGIT_EPS]` first, so `0` and `1`
/// map to large finite values instead of `∓∞`.
pub fn logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

/// Derivative of the logistic map written in terms of its output `p = σ(x)`.
#[inline]
pub fn logistic_deriv(p: f64) -> f64 {
    p * (1.0 - p)
}

/// Derivative of [`clamped_logistic`] at `x`.
///
/// Equals `logistic_deriv(σ(x))` inside the clamp and `0` once `σ(x)` hits
/// either bound, matching the flat map the optimizer evaluates there.
#[inline]
pub fn clamped_logistic_deriv(x: f64) -> f64 {
    let p = safe_logistic(x);
    if p <= LOGIT_EPS || p >= 1.0 - LOGIT_EPS { 0.0 } else { logistic_deriv(p) }
}
