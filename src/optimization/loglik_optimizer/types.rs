//! Numeric aliases and pre-wired L-BFGS types for the column optimizer.
//!
//! A column problem for node `i` in an `n`-node network lives in
//! `θ ∈ ℝ^{n−1}` (logits of the incoming weights, self-edge excluded), so
//! parameters and gradients are plain `Array1<f64>` vectors of that length
//! and the cost is the scalar ConNIe objective `c(θ) = −ℓ(θ)`.
//!
//! The line-search aliases follow argmin's `(Param, Gradient, Float)`
//! parameter order.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector `θ` (one logit per free edge weight).
pub type Theta = Array1<f64>;

/// `∇ℓ(θ)` on the model side, `∇c(θ)` on the argmin side; same length as `Theta`.
pub type Grad = Array1<f64>;

/// Cost seen by argmin: the column objective, `c(θ) = −ℓ(θ)`.
pub type Cost = f64;

/// argmin evaluation counters keyed by name (`"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// L-BFGS history length used when `MLEOptions::lbfgs_mem` is `None`.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS over column parameters with Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS over column parameters with More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
