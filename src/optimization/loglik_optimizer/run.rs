//! Execution helper that runs an `argmin` solver on a column problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run an `argmin` solver for a log-likelihood problem.
///
/// Shared runner for both line-search variants. It seeds the executor with
/// `theta0`, applies `max_iter` when configured, optionally attaches the slog
/// observer, runs, and converts the final state into an [`OptimOutcome`]
/// (best parameters, `ℓ(θ̂) = -best_cost`, termination status, iteration and
/// evaluation counters, final gradient norm).
///
/// # Type Parameters
/// - `F`: model implementing [`LogLikelihood`].
/// - `S`: any `argmin` solver over `ArgMinAdapter<'a, F>` whose state uses
///   `Theta` for parameters, `Grad` for gradients and `f64` costs.
///
/// # Feature flags
/// With `obs_slog` and `opts.verbose == true`, a terminal slog observer is
/// attached with `ObserverMode::Always` and the starting objective (and
/// gradient norm, when available) is printed once before the first iteration.
///
/// # Errors
/// - Any `argmin` runtime error, including a column objective turning
///   infinite during a line search, via `From<argmin::core::Error> for OptError`.
/// - Validation errors raised while building the [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let objective0 = problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: objective(theta0) = {:.6}{}",
        objective0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
