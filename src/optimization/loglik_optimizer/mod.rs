//! loglik_optimizer — argmin L-BFGS driver for the column problems.
//!
//! Purpose
//! -------
//! Solve one ConNIe column at a time. A column model implements
//! [`LogLikelihood`] with `ℓ(θ) = −objective(A(θ))`; [`maximize`] checks the
//! starting point, wraps the model in [`adapter::ArgMinAdapter`] (cost
//! `c = −ℓ`), builds L-BFGS with the requested line search and returns an
//! [`OptimOutcome`] expressed in `ℓ`.
//!
//! Key behaviors
//! -------------
//! - Models without an analytic gradient (the exact-likelihood column) get
//!   central, then forward, finite differences of the cost.
//! - An infinite objective anywhere in the run stops it with
//!   `OptError::NonFiniteCost`; argmin never sees `±∞`.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction and
//!   trusted afterwards.
//!
//! Conventions
//! -----------
//! - Gradients returned by models are `∇ℓ`; only the adapter flips signs.
//! - Bounds are handled by the model's reparameterization, not here.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign handling and the finite-difference fallback
//!   ([`adapter`]), solver wiring ([`builders`]), end-to-end runs on small
//!   quadratics ([`api`]), and option/outcome validation ([`traits`],
//!   [`validation`]).

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_connie::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
