//! Estimation options: objective formulation, starting column, optimizer.
//!
//! Purpose
//! -------
//! Collect everything needed to estimate one column of the network from a
//! cascade set: which ConNIe objective to optimize, the penalty weight, how
//! to seed the candidate column, and the optimizer configuration.
//!
//! Key behaviors
//! -------------
//! - [`Formulation`] selects the convex relaxation (default, analytic
//!   gradient) or the exact likelihood (finite-difference gradient).
//! - [`Init`] seeds every free edge weight with one value or with a full
//!   column; all values must lie strictly inside `(0, 1)` so they map to
//!   finite logits.
//! - [`EstimationOptions::new`] validates the penalty weight once so column
//!   runs never see an invalid `ρ`.
//!
//! Conventions
//! -----------
//! - The penalty only applies to the convex formulation; the likelihood
//!   formulation ignores it.
//! - Init vectors are full columns of length `n`; the self-edge entry is
//!   ignored.
use std::str::FromStr;

use ndarray::Array1;

use crate::{
    connie::validation::validate_penalty,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::MLEOptions,
    },
};

/// Which ConNIe objective to optimize.
///
/// Parsing is case-insensitive (`"convex"`, `"max_likelihood"`). Unknown
/// names return `OptError::InvalidFormulation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formulation {
    /// Convex log-domain relaxation with optional penalty.
    #[default]
    Convex,
    /// Exact negative log-likelihood (non-convex).
    MaxLikelihood,
}

impl FromStr for Formulation {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "convex" => Ok(Formulation::Convex),
            "max_likelihood" | "maxlikelihood" => Ok(Formulation::MaxLikelihood),
            _ => Err(OptError::InvalidFormulation {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'convex' or 'max_likelihood'.",
            }),
        }
    }
}

/// Starting candidate column.
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// Same weight for every incoming edge.
    Fixed(f64),
    /// Full column of starting weights; the self-edge entry is ignored.
    FixedVector(Array1<f64>),
}

impl Init {
    /// Uniform starting weight `value ∈ (0, 1)`.
    ///
    /// # Errors
    /// - `OptError::InvalidInitWeight` if `value` is outside `(0, 1)` or NaN.
    pub fn fixed(value: f64) -> OptResult<Self> {
        validate_init_weight(0, value)?;
        Ok(Init::Fixed(value))
    }

    /// Full starting column for `node` in an `n_nodes` network.
    ///
    /// # Errors
    /// - `OptError::InitLengthMismatch` if `column.len() != n_nodes`.
    /// - `OptError::InvalidInitWeight` for the first entry `j ≠ node` outside
    ///   `(0, 1)`.
    pub fn fixed_vector(column: Array1<f64>, node: usize, n_nodes: usize) -> OptResult<Self> {
        if column.len() != n_nodes {
            return Err(OptError::InitLengthMismatch { expected: n_nodes, actual: column.len() });
        }
        for (index, &value) in column.iter().enumerate().filter(|&(j, _)| j != node) {
            validate_init_weight(index, value)?;
        }
        Ok(Init::FixedVector(column))
    }

    /// Materialize the starting column for `node`, self-edge set to 0.
    ///
    /// # Errors
    /// - `OptError::InitLengthMismatch` if a vector init does not have
    ///   `n_nodes` entries.
    pub fn column(&self, node: usize, n_nodes: usize) -> OptResult<Array1<f64>> {
        let mut column = match self {
            Init::Fixed(value) => Array1::from_elem(n_nodes, *value),
            Init::FixedVector(column) => {
                if column.len() != n_nodes {
                    return Err(OptError::InitLengthMismatch {
                        expected: n_nodes,
                        actual: column.len(),
                    });
                }
                column.clone()
            }
        };
        if node < n_nodes {
            column[node] = 0.0;
        }
        Ok(column)
    }
}

impl Default for Init {
    fn default() -> Self {
        Init::Fixed(0.5)
    }
}

fn validate_init_weight(index: usize, value: f64) -> OptResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(OptError::InvalidInitWeight { index, value });
    }
    Ok(())
}

/// Per-column estimation settings.
///
/// Default: convex formulation, `ρ = 0`, every weight started at 0.5, and
/// `MLEOptions::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationOptions {
    pub formulation: Formulation,
    pub penalty: f64,
    pub init: Init,
    pub mle_opts: MLEOptions,
}

impl EstimationOptions {
    /// # Errors
    /// - `OptError::InvalidPenalty` if `penalty` is negative or non-finite.
    pub fn new(
        formulation: Formulation, penalty: f64, init: Init, mle_opts: MLEOptions,
    ) -> OptResult<Self> {
        validate_penalty(penalty)?;
        Ok(Self { formulation, penalty, init, mle_opts })
    }
}

impl Default for EstimationOptions {
    fn default() -> Self {
        Self {
            formulation: Formulation::Convex,
            penalty: 0.0,
            init: Init::default(),
            mle_opts: MLEOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover parsing of `Formulation`, validation of `Init`
    // policies, and the penalty check in `EstimationOptions::new`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Formulation names parse case-insensitively; unknown names are rejected.
    fn formulation_parses_known_names() {
        assert_eq!("Convex".parse::<Formulation>(), Ok(Formulation::Convex));
        assert_eq!("MAX_LIKELIHOOD".parse::<Formulation>(), Ok(Formulation::MaxLikelihood));
        assert!(matches!(
            "newton".parse::<Formulation>(),
            Err(OptError::InvalidFormulation { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `Init::fixed` accepts interior weights and rejects the closed bounds
    // and NaN.
    fn init_fixed_requires_open_unit_interval() {
        assert_eq!(Init::fixed(0.3), Ok(Init::Fixed(0.3)));
        for value in [0.0, 1.0, -0.2] {
            assert_eq!(Init::fixed(value), Err(OptError::InvalidInitWeight { index: 0, value }));
        }
        assert!(Init::fixed(f64::NAN).is_err());
    }

    #[test]
    // Purpose
    // -------
    // `Init::fixed_vector` checks length and every entry except the
    // self-edge.
    //
    // Given
    // -----
    // - node = 1 with a 0 self-edge entry.
    //
    // Expect
    // ------
    // - Accepted; a wrong length or a saturated off-diagonal entry is
    //   rejected with its index.
    fn init_fixed_vector_ignores_self_edge() {
        assert!(Init::fixed_vector(array![0.2, 0.0, 0.4], 1, 3).is_ok());
        assert_eq!(
            Init::fixed_vector(array![0.2, 0.4], 1, 3),
            Err(OptError::InitLengthMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(
            Init::fixed_vector(array![0.2, 0.0, 1.0], 1, 3),
            Err(OptError::InvalidInitWeight { index: 2, value: 1.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // `Init::column` zeroes the self-edge.
    fn init_column_zeroes_self_edge() {
        assert_eq!(Init::default().column(2, 3).unwrap(), array![0.5, 0.5, 0.0]);
        assert_eq!(
            Init::FixedVector(array![0.1, 0.2, 0.3]).column(0, 3).unwrap(),
            array![0.0, 0.2, 0.3]
        );
    }

    #[test]
    // Purpose
    // -------
    // A negative penalty is rejected and the default uses the convex
    // formulation without penalty.
    fn options_validate_penalty_and_default() {
        let err = EstimationOptions::new(
            Formulation::Convex,
            -1.0,
            Init::default(),
            MLEOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptError::InvalidPenalty { .. }));

        let opts = EstimationOptions::default();
        assert_eq!(opts.formulation, Formulation::Convex);
        assert_eq!(opts.penalty, 0.0);
        assert_eq!(opts.init, Init::Fixed(0.5));
    }
}
