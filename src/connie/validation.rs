//! Argument checks shared by the aggregate objectives.
//!
//! Each aggregate validates once up front, so the per-cascade kernels can
//! index the candidate column without further checks.
use ndarray::ArrayView1;

use crate::connie::errors::{ConnieError, ConnieResult};

/// `node` must index the node space.
pub fn validate_node(node: usize, n_nodes: usize) -> ConnieResult<()> {
    if node >= n_nodes {
        return Err(ConnieError::NodeOutOfRange { node, n_nodes });
    }
    Ok(())
}

/// The candidate column must have one entry per node.
pub fn validate_candidate(candidate: &ArrayView1<'_, f64>, n_nodes: usize) -> ConnieResult<()> {
    if candidate.len() != n_nodes {
        return Err(ConnieError::CandidateLengthMismatch {
            expected: n_nodes,
            actual: candidate.len(),
        });
    }
    Ok(())
}

/// Penalty weight must be finite and `≥ 0`.
pub fn validate_penalty(rho: f64) -> ConnieResult<()> {
    if !rho.is_finite() {
        return Err(ConnieError::InvalidPenalty { value: rho, reason: "must be finite" });
    }
    if rho < 0.0 {
        return Err(ConnieError::InvalidPenalty { value: rho, reason: "must be non-negative" });
    }
    Ok(())
}

/// Combined node/candidate check against a node space of size `n_nodes`.
pub fn validate_column(
    candidate: &ArrayView1<'_, f64>, node: usize, n_nodes: usize,
) -> ConnieResult<()> {
    validate_candidate(candidate, n_nodes)?;
    validate_node(node, n_nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Each check accepts the boundary of its valid range and rejects the
    // first invalid value.
    fn validators_accept_boundaries_and_reject_outside() {
        let col = array![0.0, 0.1, 0.2];

        assert!(validate_column(&col.view(), 2, 3).is_ok());
        assert_eq!(
            validate_column(&col.view(), 0, 4),
            Err(ConnieError::CandidateLengthMismatch { expected: 4, actual: 3 })
        );
        assert_eq!(validate_node(3, 3), Err(ConnieError::NodeOutOfRange { node: 3, n_nodes: 3 }));

        assert!(validate_penalty(0.0).is_ok());
        assert!(matches!(validate_penalty(-0.1), Err(ConnieError::InvalidPenalty { .. })));
        assert!(matches!(validate_penalty(f64::NAN), Err(ConnieError::InvalidPenalty { .. })));
    }
}
