//! numerical_stability — guarded transforms between optimizer space and (0, 1).
//!
//! Purpose
//! -------
//! Collect the small, numerically robust scalar transforms the column
//! estimators need to move between an unconstrained parameter vector `θ`
//! and edge weights `A_j ∈ (0, 1)`. Centralizing the clamp tolerance here
//! keeps the estimation layer and its tests on one consistent guard.
//!
//! Key behaviors
//! -------------
//! - Map reals into the unit interval without overflow (`safe_logistic`).
//! - Clamp mapped weights into `[LOGIT_EPS, 1 − LOGIT_EPS]`
//!   (`clamped_logistic`) so the convex objective stays finite for every `θ`.
//! - Map starting weights back into optimizer space (`logit`) and provide the
//!   chain-rule factor `p (1 − p)` (`logistic_deriv`) for analytic gradients,
//!   zeroed where the clamp is active (`clamped_logistic_deriv`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs; range validation of user
//!   weights happens in the estimation options, not here.
//!
//! Conventions
//! -----------
//! - Pure functions with no I/O, logging, or global state, suitable for
//!   tight inner loops.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement with naïve formulas,
//!   tail behavior, clamping, and the logit inverse.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    LOGIT_EPS, clamped_logistic, clamped_logistic_deriv, logistic_deriv, logit, safe_logistic,
};

pub mod prelude {
    pub use super::transformations::{LOGIT_EPS, clamped_logistic, logit, safe_logistic};
}
