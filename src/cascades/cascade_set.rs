//! Ordered, read-only collection of cascades over one node space.
//!
//! Purpose
//! -------
//! Hold the observed cascades handed to the ConNIe objectives and provide
//! the two filtered views they aggregate over: cascades where a node was
//! infected and cascades where it never was.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one cascade; all cascades have the same length `n_nodes` and
//!   the same kernel rate. These are checked once in [`CascadeSet::new`].
//! - The collection is immutable, so the views are plain filtered iterators
//!   that can be cloned and restarted freely and are safe to share across
//!   threads.
//!
//! Conventions
//! -----------
//! - Views preserve the original set order.
//! - Indices returned by the `*_indices` views are positions in the set.
use std::ops::Index;

use crate::cascades::{
    cascade::Cascade,
    errors::{CascadeError, CascadeResult},
    kernel::ExponentialKernel,
};

/// Validated collection of cascades sharing a node space and a kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeSet {
    cascades: Vec<Cascade>,
    n_nodes: usize,
}

impl CascadeSet {
    /// Wrap `cascades` after checking they describe one node space.
    ///
    /// # Errors
    /// - `CascadeError::EmptyCascadeSet` if `cascades` is empty.
    /// - `CascadeError::CascadeLengthMismatch` for the first cascade whose
    ///   length differs from the first cascade.
    /// - `CascadeError::KernelRateMismatch` for the first cascade whose
    ///   kernel rate differs from the first cascade.
    pub fn new(cascades: Vec<Cascade>) -> CascadeResult<Self> {
        let first = cascades.first().ok_or(CascadeError::EmptyCascadeSet)?;
        let n_nodes = first.len();
        let rate = first.kernel().rate();
        for (index, cascade) in cascades.iter().enumerate().skip(1) {
            if cascade.len() != n_nodes {
                return Err(CascadeError::CascadeLengthMismatch {
                    index,
                    expected: n_nodes,
                    actual: cascade.len(),
                });
            }
            if cascade.kernel().rate() != rate {
                return Err(CascadeError::KernelRateMismatch {
                    index,
                    expected: rate,
                    actual: cascade.kernel().rate(),
                });
            }
        }
        Ok(Self { cascades, n_nodes })
    }

    /// Build a set from raw rows (see [`Cascade::from_raw`]) sharing `kernel`.
    ///
    /// # Errors
    /// Any error from [`Cascade::from_raw`] or [`CascadeSet::new`].
    pub fn from_raw<R: AsRef<[f64]>>(rows: &[R], kernel: ExponentialKernel) -> CascadeResult<Self> {
        let cascades = rows
            .iter()
            .map(|row| Cascade::from_raw(row.as_ref(), kernel))
            .collect::<CascadeResult<Vec<_>>>()?;
        Self::new(cascades)
    }

    pub fn len(&self) -> usize {
        self.cascades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cascades.is_empty()
    }

    /// Size of the shared node space.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Kernel shared by every cascade.
    pub fn kernel(&self) -> &ExponentialKernel {
        self.cascades[0].kernel()
    }

    pub fn get(&self, index: usize) -> Option<&Cascade> {
        self.cascades.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cascade> {
        self.cascades.iter()
    }

    pub fn cascades(&self) -> &[Cascade] {
        &self.cascades
    }

    /// Cascades in which `node` was infected, in set order.
    pub fn where_infected(&self, node: usize) -> impl Iterator<Item = &Cascade> + Clone + '_ {
        self.cascades.iter().filter(move |c| c.is_infected(node))
    }

    /// Cascades in which `node` was never infected, in set order.
    pub fn where_never_infected(&self, node: usize) -> impl Iterator<Item = &Cascade> + Clone + '_ {
        self.cascades.iter().filter(move |c| c.is_never_infected(node))
    }

    /// Set positions of [`CascadeSet::where_infected`].
    pub fn where_infected_indices(&self, node: usize) -> impl Iterator<Item = usize> + Clone + '_ {
        self.cascades.iter().enumerate().filter(move |(_, c)| c.is_infected(node)).map(|(k, _)| k)
    }

    /// Set positions of [`CascadeSet::where_never_infected`].
    pub fn where_never_infected_indices(
        &self, node: usize,
    ) -> impl Iterator<Item = usize> + Clone + '_ {
        self.cascades
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.is_never_infected(node))
            .map(|(k, _)| k)
    }

    /// Raw rows with the never-infected sentinel, in set order.
    pub fn to_raw(&self) -> Vec<Vec<f64>> {
        self.cascades.iter().map(Cascade::to_raw).collect()
    }
}

impl Index<usize> for CascadeSet {
    type Output = Cascade;

    fn index(&self, index: usize) -> &Cascade {
        &self.cascades[index]
    }
}

impl<'a> IntoIterator for &'a CascadeSet {
    type Item = &'a Cascade;
    type IntoIter = std::slice::Iter<'a, Cascade>;

    fn into_iter(self) -> Self::IntoIter {
        self.cascades.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shape and kernel consistency checks in `CascadeSet::new`.
    // - Membership, order, and restartability of the filtered views on the
    //   seven-cascade reference set.
    // -------------------------------------------------------------------------

    fn reference_rows() -> Vec<Vec<f64>> {
        vec![
            vec![-1.0, -1.0, 0.0, -1.0],
            vec![0.0, -1.0, -1.0, -1.0],
            vec![0.0, 3.5866, -1.0, -1.0],
            vec![-1.0, -1.0, 0.6115, 0.0],
            vec![1.7403, 0.8380, 0.3760, 0.0],
            vec![1.3690, -1.0, 0.0, 1.1501],
            vec![1.6617, 0.1125, 0.1946, 0.0],
        ]
    }

    fn reference_set() -> CascadeSet {
        CascadeSet::from_raw(&reference_rows(), ExponentialKernel::default()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Empty sets, ragged sets, and mixed kernels are rejected with the index
    // of the first offending cascade.
    fn new_rejects_inconsistent_sets() {
        let kernel = ExponentialKernel::default();
        let other = ExponentialKernel::new(2.0).unwrap();

        assert_eq!(CascadeSet::new(vec![]), Err(CascadeError::EmptyCascadeSet));
        assert_eq!(
            CascadeSet::from_raw(&[vec![0.0, -1.0], vec![0.0]], kernel),
            Err(CascadeError::CascadeLengthMismatch { index: 1, expected: 2, actual: 1 })
        );

        let mixed = vec![
            Cascade::from_raw(&[0.0, 1.0], kernel).unwrap(),
            Cascade::from_raw(&[1.0, 0.0], other).unwrap(),
        ];
        assert_eq!(
            CascadeSet::new(mixed),
            Err(CascadeError::KernelRateMismatch { index: 1, expected: 1.0, actual: 2.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // The infected view keeps exactly the cascades where the node has a time,
    // in set order.
    //
    // Given
    // -----
    // - The seven-cascade reference set.
    //
    // Expect
    // ------
    // - node 0 → {1,2,4,5,6}, node 1 → {2,4,6}, node 2 → {0,3,4,5,6},
    //   node 3 → {3,4,5,6}.
    fn where_infected_matches_reference_membership() {
        let set = reference_set();
        let expected: [&[usize]; 4] = [&[1, 2, 4, 5, 6], &[2, 4, 6], &[0, 3, 4, 5, 6], &[3, 4, 5, 6]];

        for (node, want) in expected.iter().enumerate() {
            let got: Vec<usize> = set.where_infected_indices(node).collect();
            assert_eq!(got, want.to_vec(), "node {node}");

            let by_ref: Vec<&Cascade> = set.where_infected(node).collect();
            let want_ref: Vec<&Cascade> = want.iter().map(|&k| &set[k]).collect();
            assert_eq!(by_ref, want_ref);
        }
    }

    #[test]
    // Purpose
    // -------
    // The never-infected view keeps exactly the sentinel cascades.
    //
    // Expect
    // ------
    // - node 0 → {0,3}, node 1 → {0,1,3,5}, node 2 → {1,2}, node 3 → {0,1,2}.
    fn where_never_infected_matches_reference_membership() {
        let set = reference_set();
        let expected: [&[usize]; 4] = [&[0, 3], &[0, 1, 3, 5], &[1, 2], &[0, 1, 2]];

        for (node, want) in expected.iter().enumerate() {
            let got: Vec<usize> = set.where_never_infected_indices(node).collect();
            assert_eq!(got, want.to_vec(), "node {node}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Views can be cloned and iterated again with the same result.
    fn views_are_restartable() {
        let set = reference_set();
        let view = set.where_infected(1);

        let first: Vec<&Cascade> = view.clone().collect();
        let second: Vec<&Cascade> = view.collect();

        assert_eq!(first, second);
        assert_eq!(set.where_never_infected(1).count() + set.where_infected(1).count(), set.len());
    }

    #[test]
    // Purpose
    // -------
    // Basic accessors agree with the input rows.
    fn accessors_reflect_input() {
        let set = reference_set();

        assert_eq!(set.len(), 7);
        assert_eq!(set.n_nodes(), 4);
        assert_eq!(set.to_raw(), reference_rows());
        assert_eq!((&set).into_iter().count(), 7);
        assert!(set.get(7).is_none());
    }
}
