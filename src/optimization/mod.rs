//! optimization — argmin-backed maximizer, stable transforms, and error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to estimate ConNIe transmission
//! columns: an Argmin-backed log-likelihood maximizer, the guarded transforms
//! that map unconstrained parameters into edge weights, and a single
//! error/result surface shared by the estimation layer.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including solver selection and stopping criteria.
//! - Supply scalar transforms (`numerical_stability`) between `θ ∈ ℝ` and
//!   edge weights in `(0, 1)`.
//! - Normalize configuration issues, numerical failures, objective and
//!   cascade errors, and backend solver errors into one enum
//!   (`errors::OptError`) with a common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained parameter space `θ` and assume
//!   inputs are finite once validation has passed; invalid states are
//!   reported as `OptError`, not panics.
//! - An infinite ConNIe objective is treated as infeasibility and surfaces as
//!   `OptError::NonFiniteCost`.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; the column models
//!   define `ℓ` as the negated ConNIe objective, so `c` is the objective
//!   itself.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never see
//!   raw Argmin errors.
//! - Progress logging is opt-in through the `obs_slog` feature and
//!   `MLEOptions::verbose`; nothing here writes to stdout otherwise.
//!
//! Downstream usage
//! ----------------
//! - `estimation` implements `LogLikelihood` for one column of the network
//!   and calls `maximize` per node.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules cover solver wiring, tolerance handling,
//!   finite-difference fallbacks, transforms, and error conversions.
//! - Integration tests under `tests/` exercise end-to-end column estimation on
//!   simulated cascades.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_connie::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
