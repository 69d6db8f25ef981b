//! Exponential timing kernel shared by cascades and the simulator.
//!
//! The kernel turns the delay between two infection times into a relative
//! weight of timing evidence, `density(x) = λ · e^(−λx)` evaluated at the
//! **signed** difference `x = t_i − t_j`. It is not clamped to `x ≥ 0`; the
//! objectives only evaluate it for `t_j < t_i`, and callers evaluating it
//! elsewhere get the unrestricted formula.
//!
//! The same rate drives the simulator, which draws infection delays from
//! Exponential(λ) through `statrs`.
use rand::{Rng, distributions::Distribution};
use statrs::distribution::Exp;

use crate::cascades::errors::{CascadeError, CascadeResult};

/// Rate used when no kernel is specified.
pub const DEFAULT_KERNEL_RATE: f64 = 1.0;

/// Exponential kernel with rate `λ > 0`.
///
/// The rate is a property of the model, not of any node; every cascade in a
/// set carries the same kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialKernel {
    rate: f64,
    dist: Exp,
}

impl ExponentialKernel {
    /// Build a kernel with rate `rate`.
    ///
    /// # Errors
    /// - `CascadeError::InvalidKernelRate` if `rate` is non-finite or `≤ 0`.
    pub fn new(rate: f64) -> CascadeResult<Self> {
        if !rate.is_finite() {
            return Err(CascadeError::InvalidKernelRate { rate, reason: "must be finite" });
        }
        let dist = Exp::new(rate).map_err(|_| CascadeError::InvalidKernelRate {
            rate,
            reason: "must be strictly positive",
        })?;
        Ok(Self { rate, dist })
    }

    /// Rate parameter `λ`.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// `λ · e^(−λx)` for a signed `x`.
    #[inline]
    pub fn density(&self, x: f64) -> f64 {
        self.rate * (-x * self.rate).exp()
    }

    /// Timing weight of `j` (infected at `t_j`) as a cause of `i` (infected at `t_i`).
    #[inline]
    pub fn weight(&self, t_i: f64, t_j: f64) -> f64 {
        self.density(t_i - t_j)
    }

    /// Draw one Exponential(λ) infection delay.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }
}

/// Kernel with [`DEFAULT_KERNEL_RATE`].
///
/// # Panics
/// Only if `Exp::new` rejects the constant rate, which is finite and positive.
impl Default for ExponentialKernel {
    fn default() -> Self {
        let dist = Exp::new(DEFAULT_KERNEL_RATE).expect("rate = 1");
        Self { rate: DEFAULT_KERNEL_RATE, dist }
    }
}
