//! Single diffusion cascade: one infection time per node.
//!
//! Purpose
//! -------
//! Represent one observed or simulated diffusion event as an immutable
//! record of per-node infection times plus the timing kernel used to weigh
//! infection delays. All ConNIe scoring functions read cascades through the
//! accessors defined here.
//!
//! Key behaviors
//! -------------
//! - [`Cascade::from_raw`] accepts the conventional raw encoding where
//!   `-1.0` ([`NEVER_INFECTED`]) marks a node that was never infected;
//!   [`Cascade::new`] accepts `Option<f64>` times directly.
//! - "Infected before" queries are false whenever either endpoint was never
//!   infected, so the sentinel never takes part in time ordering.
//!
//! Invariants & assumptions
//! ------------------------
//! - A cascade has at least one node and every recorded time is finite.
//! - No other consistency is enforced for injected data (negative times,
//!   several nodes at time 0, or no node at time 0 are all accepted).
//! - Only exactly `-1.0` is the sentinel. Any other negative raw time, such
//!   as `-2.0`, is a real infection time: the node counts as infected and
//!   precedes every node infected at a later time.
//! - Cascades are never mutated after construction.
//!
//! Conventions
//! -----------
//! - Node `k` is position `k` of the time vector (0-based).
//! - Out-of-range nodes are reported as neither infected nor never infected;
//!   the objective layer validates node indices before reading cascades.
use crate::cascades::{
    errors::{CascadeError, CascadeResult},
    kernel::ExponentialKernel,
};

/// Raw sentinel for "never infected".
pub const NEVER_INFECTED: f64 = -1.0;

/// Immutable infection-time record for one diffusion event.
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    times: Vec<Option<f64>>,
    kernel: ExponentialKernel,
}

impl Cascade {
    /// Build a cascade from per-node times, `None` meaning never infected.
    ///
    /// # Errors
    /// - `CascadeError::EmptyCascade` if `times` is empty.
    /// - `CascadeError::NonFiniteTime` for the first NaN/±inf time.
    pub fn new(times: Vec<Option<f64>>, kernel: ExponentialKernel) -> CascadeResult<Self> {
        if times.is_empty() {
            return Err(CascadeError::EmptyCascade);
        }
        for (node, time) in times.iter().enumerate() {
            if let Some(value) = *time {
                if !value.is_finite() {
                    return Err(CascadeError::NonFiniteTime { node, value });
                }
            }
        }
        Ok(Self { times, kernel })
    }

    /// Build a cascade from raw times where [`NEVER_INFECTED`] marks
    /// uninfected nodes.
    ///
    /// # Errors
    /// Same as [`Cascade::new`].
    ///
    /// # Example
    /// ```
    /// use rust_connie::cascades::{Cascade, ExponentialKernel};
    ///
    /// let c = Cascade::from_raw(&[0.0, -1.0, 0.6115], ExponentialKernel::default())?;
    /// assert!(c.is_never_infected(1));
    /// assert!(c.is_infected_before(0, 2));
    /// # Ok::<(), rust_connie::cascades::CascadeError>(())
    /// ```
    pub fn from_raw(raw: &[f64], kernel: ExponentialKernel) -> CascadeResult<Self> {
        let times =
            raw.iter().map(|&t| if t == NEVER_INFECTED { None } else { Some(t) }).collect();
        Self::new(times, kernel)
    }

    /// Number of nodes covered by the cascade.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false`; construction rejects empty cascades.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Infection time of `node`, or `None` if never infected or out of range.
    #[inline]
    pub fn time(&self, node: usize) -> Option<f64> {
        self.times.get(node).copied().flatten()
    }

    pub fn times(&self) -> &[Option<f64>] {
        &self.times
    }

    pub fn kernel(&self) -> &ExponentialKernel {
        &self.kernel
    }

    #[inline]
    pub fn is_infected(&self, node: usize) -> bool {
        self.time(node).is_some()
    }

    #[inline]
    pub fn is_never_infected(&self, node: usize) -> bool {
        matches!(self.times.get(node), Some(None))
    }

    /// `true` iff both nodes were infected and `a` strictly before `b`.
    #[inline]
    pub fn is_infected_before(&self, a: usize, b: usize) -> bool {
        match (self.time(a), self.time(b)) {
            (Some(t_a), Some(t_b)) => t_a < t_b,
            _ => false,
        }
    }

    /// `(node, time)` for every infected node, in node order.
    pub fn infected_nodes(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.times.iter().enumerate().filter_map(|(node, t)| t.map(|t| (node, t)))
    }

    /// `(j, t_j)` for every node infected strictly before `node`.
    ///
    /// Empty when `node` itself was never infected.
    pub fn predecessors(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let t_node = self.time(node);
        self.infected_nodes().filter(move |&(_, t_j)| t_node.is_some_and(|t_i| t_j < t_i))
    }

    pub fn infection_count(&self) -> usize {
        self.times.iter().filter(|t| t.is_some()).count()
    }

    /// Kernel weight of `j` at `t_j` as a cause of `i` at `t_i`.
    #[inline]
    pub fn weight(&self, t_i: f64, t_j: f64) -> f64 {
        self.kernel.weight(t_i, t_j)
    }

    /// Raw encoding with [`NEVER_INFECTED`] for uninfected nodes.
    pub fn to_raw(&self) -> Vec<f64> {
        self.times.iter().map(|t| t.unwrap_or(NEVER_INFECTED)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction rules of `Cascade::new` / `Cascade::from_raw`.
    // - Sentinel handling in infected / never-infected / infected-before.
    // - Predecessor enumeration and the raw encoding.
    // -------------------------------------------------------------------------

    fn cascade(raw: &[f64]) -> Cascade {
        Cascade::from_raw(raw, ExponentialKernel::default()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Empty and non-finite inputs are rejected; the first bad node is named.
    fn construction_rejects_empty_and_non_finite_times() {
        let kernel = ExponentialKernel::default();

        assert_eq!(Cascade::from_raw(&[], kernel), Err(CascadeError::EmptyCascade));
        match Cascade::from_raw(&[0.0, f64::NAN, f64::INFINITY], kernel) {
            Err(CascadeError::NonFiniteTime { node, .. }) => assert_eq!(node, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Infection status follows the sentinel exactly.
    //
    // Given
    // -----
    // - [-1, -1, 0, -1] and [0, 3.5866, -1, -1].
    //
    // Expect
    // ------
    // - Only the non-sentinel positions are infected; the rest are never
    //   infected; out-of-range nodes are neither.
    fn infection_status_follows_sentinel() {
        let d0 = cascade(&[-1.0, -1.0, 0.0, -1.0]);
        let d2 = cascade(&[0.0, 3.5866, -1.0, -1.0]);

        assert_eq!((0..4).map(|k| d0.is_infected(k)).collect::<Vec<_>>(), [false, false, true, false]);
        assert_eq!(
            (0..4).map(|k| d2.is_never_infected(k)).collect::<Vec<_>>(),
            [false, false, true, true]
        );
        assert!(!d0.is_infected(9) && !d0.is_never_infected(9));
        assert_eq!(d2.infection_count(), 2);
    }

    #[test]
    // Purpose
    // -------
    // `is_infected_before` is false whenever either side carries the sentinel
    // and strict otherwise.
    fn infected_before_ignores_sentinel_and_ties() {
        let c = cascade(&[1.3690, -1.0, 0.0, 1.1501, 0.0]);

        assert!(c.is_infected_before(2, 0));
        assert!(c.is_infected_before(3, 0));
        assert!(!c.is_infected_before(0, 3));
        assert!(!c.is_infected_before(1, 0));
        assert!(!c.is_infected_before(0, 1));
        assert!(!c.is_infected_before(2, 4));
    }

    #[test]
    // Purpose
    // -------
    // Predecessors are exactly the strictly earlier infected nodes.
    fn predecessors_are_strictly_earlier_infections() {
        let c = cascade(&[1.7403, 0.8380, 0.3760, 0.0]);

        let preds: Vec<usize> = c.predecessors(0).map(|(j, _)| j).collect();
        assert_eq!(preds, vec![1, 2, 3]);
        assert_eq!(c.predecessors(3).count(), 0);

        let never = cascade(&[-1.0, 0.0]);
        assert_eq!(never.predecessors(0).count(), 0);
    }

    #[test]
    // Purpose
    // -------
    // The raw encoding restores the sentinel and the weight delegates to the
    // kernel.
    fn raw_encoding_and_weight() {
        let raw = [1.6617, 0.1125, 0.1946, 0.0, -1.0];
        let c = cascade(&raw);

        assert_eq!(c.to_raw(), raw.to_vec());
        assert_eq!(c.len(), 5);
        assert_relative_eq!(c.weight(1.6617, 0.0), (-1.6617_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Only the exact sentinel means "never infected"; other negative raw
    // times are kept as infection times.
    //
    // Given
    // -----
    // - Raw row [-2.0, 0.0, -1.0].
    //
    // Expect
    // ------
    // - Node 0 infected at −2 and before node 1; node 2 never infected.
    fn negative_times_other_than_sentinel_are_infections() {
        let c = cascade(&[-2.0, 0.0, -1.0]);

        assert!(c.is_infected(0));
        assert!(!c.is_never_infected(0));
        assert_eq!(c.time(0), Some(-2.0));
        assert!(c.is_infected_before(0, 1));
        assert!(c.is_never_infected(2));
        assert_eq!(c.to_raw(), vec![-2.0, 0.0, -1.0]);
    }
}
