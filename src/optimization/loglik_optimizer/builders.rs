//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Build L-BFGS solvers for the column estimators with either line search,
//! applying the tolerances and history size carried in [`MLEOptions`]. The
//! initial parameter vector and the iteration cap are runtime concerns and
//! are applied by [`run_lbfgs`](super::run::run_lbfgs), which keeps these
//! builders side-effect free.
//!
//! Conventions
//! -----------
//! - The L-BFGS memory is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Tolerances rejected by Argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   through `From<argmin::core::Error>`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// Returns an `OptError` when Argmin rejects a configured tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// Construct L-BFGS with More–Thuente line search.
///
/// # Errors
/// Returns an `OptError` when Argmin rejects a configured tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient and cost-change tolerances to an L-BFGS solver.
///
/// Generic over the line-search type `L`; a `None` tolerance leaves Argmin's
/// default in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
