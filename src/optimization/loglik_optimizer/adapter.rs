//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ(θ)`. For the ConNIe column
//! models this recovers the original objective (convex relaxation or negative
//! log-likelihood). Analytic gradients are negated accordingly. If a gradient
//! is not provided, we finite-difference the **cost** closure, so no sign flip
//! is needed in that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if the model provides an analytic gradient, or
///   - a finite-difference gradient of the cost (no sign flip needed).
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -ℓ(θ)`.
    ///
    /// An infinite objective (the ConNIe infeasibility marker) surfaces here
    /// as `OptError::NonFiniteCost`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(-output)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// - Analytic gradients are validated and negated.
    /// - Otherwise central differences of the cost are tried first; if any
    ///   cost evaluation failed or the result is not finite, forward
    ///   differences are used instead.
    ///
    /// The FD closure must return `f64`, so errors raised inside it are parked
    /// in `closure_err` and the closure returns `NaN`.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_some() {
                    return run_fd_diff(theta, &cost_func, &closure_err);
                }
                match validate_grad(&fd_grad, dim) {
                    Ok(()) => Ok(fd_grad),
                    Err(_) => run_fd_diff(theta, &cost_func, &closure_err),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a model and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

/// Compute a forward-difference gradient of `func` at `theta`, with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, returns any captured error, and
/// otherwise validates the gradient.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sign convention of `cost` (c = -ℓ) and of analytic gradients.
    // - Finite-difference fallback when `grad` is not implemented.
    // - Non-finite objectives surfacing as `NonFiniteCost`.
    // -------------------------------------------------------------------------

    // ℓ(θ) = -Σ (θ_k - c_k)², with an analytic gradient.
    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = Theta;

        fn value(&self, theta: &Theta, centre: &Theta) -> OptResult<f64> {
            Ok(-(theta - centre).mapv(|d| d * d).sum())
        }

        fn check(&self, _theta: &Theta, _centre: &Theta) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, centre: &Theta) -> OptResult<Grad> {
            Ok((theta - centre).mapv(|d| -2.0 * d))
        }
    }

    // Same objective without a gradient, forcing finite differences.
    struct QuadraticNoGrad;

    impl LogLikelihood for QuadraticNoGrad {
        type Data = Theta;

        fn value(&self, theta: &Theta, centre: &Theta) -> OptResult<f64> {
            Ok(-(theta - centre).mapv(|d| d * d).sum())
        }

        fn check(&self, _theta: &Theta, _centre: &Theta) -> OptResult<()> {
            Ok(())
        }
    }

    // Always infeasible.
    struct Infeasible;

    impl LogLikelihood for Infeasible {
        type Data = ();

        fn value(&self, _theta: &Theta, _data: &()) -> OptResult<f64> {
            Ok(f64::NEG_INFINITY)
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The cost is the negated log-likelihood and the analytic gradient is
    // negated to match it.
    fn cost_and_analytic_gradient_are_negated() {
        let centre = array![1.0, -1.0];
        let adapter = ArgMinAdapter::new(&Quadratic, &centre);
        let theta = array![2.0, 1.0];

        let cost = adapter.cost(&theta).unwrap();
        let grad = adapter.gradient(&theta).unwrap();

        assert_relative_eq!(cost, 5.0);
        assert_relative_eq!(grad[0], 2.0);
        assert_relative_eq!(grad[1], 4.0);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient, the finite-difference gradient of the
    // cost matches the analytic one.
    fn finite_difference_fallback_matches_analytic_gradient() {
        let centre = array![0.3, 0.7, -0.2];
        let theta = array![0.0, 1.0, 0.5];
        let fd = ArgMinAdapter::new(&QuadraticNoGrad, &centre).gradient(&theta).unwrap();
        let exact = ArgMinAdapter::new(&Quadratic, &centre).gradient(&theta).unwrap();

        for k in 0..theta.len() {
            assert_relative_eq!(fd[k], exact[k], epsilon = 1e-5);
        }
    }

    #[test]
    // Purpose
    // -------
    // An infinite log-likelihood is rejected by the cost function.
    fn infinite_objective_is_reported_as_non_finite_cost() {
        let adapter = ArgMinAdapter::new(&Infeasible, &());

        let err = adapter.cost(&array![0.0]).unwrap_err();

        assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
    }
}
