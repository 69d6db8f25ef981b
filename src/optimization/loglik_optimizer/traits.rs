//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait implemented by the per-column ConNIe models.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. The ConNIe objectives are already costs, so column models
//! report `ℓ(θ) = -objective(θ)` and the adapter flips the sign back.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇ℓ(θ)`.
///   If not implemented, finite differences are used automatically.
pub trait LogLikelihood {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`). Unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `line_searcher: LineSearcher` — line-search algorithm used by L-BFGS.
/// - `verbose: bool` — if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints progress.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history size, `None` for the default.
///
/// Default:
/// - `tols`: `tol_grad = 1e-6`, `tol_cost = None`, `max_iter = 300`
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None` (uses default of 7)
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Create a new set of optimizer options.
    ///
    /// Numeric tolerances are validated in [`Tolerances::new`]; this only
    /// checks the L-BFGS memory.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` if the solver reported a terminating status other
///   than `NotTerminated`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`
///   (e.g. `cost_count`, `gradient_count`).
/// - `grad_norm`: norm of the last available gradient, if present.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` (missing or non-finite)
    ///   and `value` (non-finite).
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, converged: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let status: String;
        let converged = match converged {
            TerminationStatus::NotTerminated => {
                status = "Not terminated".to_string();
                false
            }
            _ => {
                status = format!("{converged:?}");
                true
            }
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::TerminationReason;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation rules of `Tolerances::new` and `MLEOptions::new`.
    // - Case-insensitive parsing of `LineSearcher`.
    // - Status mapping and validation in `OptimOutcome::new`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `Tolerances::new` must reject the all-`None` configuration.
    fn tolerances_require_at_least_one_criterion() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
    }

    #[test]
    // Purpose
    // -------
    // Non-positive tolerances and zero iterations are rejected.
    fn tolerances_reject_invalid_values() {
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, Some(f64::NAN), None),
            Err(OptError::InvalidTolCost { .. })
        ));
        assert!(matches!(Tolerances::new(None, None, Some(0)), Err(OptError::InvalidMaxIter { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A zero L-BFGS memory is a configuration error.
    fn mle_options_reject_zero_memory() {
        let tols = Tolerances::new(Some(1e-6), None, Some(10)).unwrap();

        let result = MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(0));

        assert!(matches!(result, Err(OptError::InvalidLBFGSMem { mem: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Line-search names parse regardless of case; unknown names fail.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("morethuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A terminated run is reported as converged with the gradient norm
    // computed from the final gradient.
    //
    // Given
    // -----
    // - `theta_hat = [0.0, 1.0]`, value `-2.5`, gradient `[3.0, 4.0]`.
    //
    // Expect
    // ------
    // - `converged == true`, `grad_norm == Some(5.0)`, `iterations == 12`.
    fn optim_outcome_reports_terminated_run() {
        let outcome = OptimOutcome::new(
            Some(array![0.0, 1.0]),
            -2.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .unwrap();

        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 12);
        assert_eq!(outcome.grad_norm, Some(5.0));
    }

    #[test]
    // Purpose
    // -------
    // Missing parameters and non-finite values are rejected.
    fn optim_outcome_rejects_invalid_state() {
        let missing = OptimOutcome::new(
            None,
            0.0,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );
        let non_finite = OptimOutcome::new(
            Some(array![0.0]),
            f64::NEG_INFINITY,
            TerminationStatus::NotTerminated,
            0,
            FnEvalMap::new(),
            None,
        );

        assert_eq!(missing, Err(OptError::MissingThetaHat));
        assert!(matches!(non_finite, Err(OptError::NonFiniteCost { .. })));
    }
}
