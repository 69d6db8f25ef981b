//! Diffusion simulator: synthetic cascades from a ground-truth matrix.
//!
//! Purpose
//! -------
//! Generate cascades by propagating an infection from one seed node through
//! an [`AdjacencyMatrix`], drawing infection delays from the kernel's
//! Exponential(λ) law. Used to build synthetic data sets with a known answer
//! for the estimators.
//!
//! Key behaviors
//! -------------
//! - A frontier queue starts with the seed at time 0 and a susceptible queue
//!   holds every other node. Each infector popped from the frontier gives
//!   every node still susceptible one Bernoulli trial with success
//!   probability `A[infector][node]`.
//! - On success the node gets `time(infector) + delay` and joins the back of
//!   the frontier; on failure it goes to the back of the susceptible queue and
//!   is tried again by later infectors.
//! - Nodes never leaving the susceptible queue stay never infected.
//!
//! Invariants & assumptions
//! ------------------------
//! - Exactly one node sits at time 0 and every other infected node is
//!   strictly later than its infector (delays are positive almost surely).
//! - The random source is always injected; [`DiffusionSimulator::simulate_set`]
//!   derives one `ChaCha20Rng` stream per cascade so results do not depend on
//!   the number of worker threads.
//!
//! Conventions
//! -----------
//! - Each trial consumes exactly one uniform `[0, 1)` draw, and each success
//!   one Exponential(λ) draw, in queue order.
use std::collections::VecDeque;

use rand::{Rng, SeedableRng, distributions::Standard};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use crate::cascades::{
    adjacency::AdjacencyMatrix,
    cascade::Cascade,
    cascade_set::CascadeSet,
    errors::{CascadeError, CascadeResult},
    kernel::ExponentialKernel,
};

/// Golden-ratio increment used to spread per-cascade seeds.
const STREAM_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Propagates infections through a fixed adjacency matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionSimulator {
    matrix: AdjacencyMatrix,
    kernel: ExponentialKernel,
}

impl DiffusionSimulator {
    pub fn new(matrix: AdjacencyMatrix, kernel: ExponentialKernel) -> Self {
        Self { matrix, kernel }
    }

    pub fn matrix(&self) -> &AdjacencyMatrix {
        &self.matrix
    }

    pub fn kernel(&self) -> &ExponentialKernel {
        &self.kernel
    }

    pub fn n_nodes(&self) -> usize {
        self.matrix.n_nodes()
    }

    /// Simulate one cascade.
    ///
    /// `seed` fixes the node infected at time 0; with `None` it is drawn
    /// uniformly from all nodes.
    ///
    /// # Errors
    /// - `CascadeError::SeedOutOfRange` if `seed` is not a node.
    pub fn simulate<R: Rng + ?Sized>(
        &self, rng: &mut R, seed: Option<usize>,
    ) -> CascadeResult<Cascade> {
        let n_nodes = self.n_nodes();
        let seed = match seed {
            Some(seed) if seed >= n_nodes => {
                return Err(CascadeError::SeedOutOfRange { seed, n_nodes });
            }
            Some(seed) => seed,
            None => rng.gen_range(0..n_nodes),
        };

        let mut times: Vec<Option<f64>> = vec![None; n_nodes];
        times[seed] = Some(0.0);
        let mut frontier = VecDeque::from([(seed, 0.0)]);
        let mut susceptible: VecDeque<usize> = (0..n_nodes).filter(|&k| k != seed).collect();

        while let Some((infector, parent_time)) = frontier.pop_front() {
            for _ in 0..susceptible.len() {
                let Some(node) = susceptible.pop_front() else { break };
                let u: f64 = rng.sample(Standard);
                if u < self.matrix.weight(infector, node) {
                    let time = parent_time + self.kernel.sample(rng);
                    times[node] = Some(time);
                    frontier.push_back((node, time));
                } else {
                    susceptible.push_back(node);
                }
            }
        }

        Cascade::new(times, self.kernel)
    }

    /// Simulate `count` independent cascades with random seed nodes.
    ///
    /// Cascade `k` is driven by `ChaCha20Rng` seeded with
    /// `base_seed + k · STREAM_STRIDE` (wrapping), and cascades are generated
    /// in parallel; the output order is `k = 0..count`.
    ///
    /// # Errors
    /// - `CascadeError::EmptyCascadeSet` if `count == 0`.
    pub fn simulate_set(&self, count: usize, base_seed: u64) -> CascadeResult<CascadeSet> {
        if count == 0 {
            return Err(CascadeError::EmptyCascadeSet);
        }
        let cascades = (0..count)
            .into_par_iter()
            .map(|k| {
                let mut rng = ChaCha20Rng::seed_from_u64(stream_seed(base_seed, k as u64));
                self.simulate(&mut rng, None)
            })
            .collect::<CascadeResult<Vec<_>>>()?;
        CascadeSet::new(cascades)
    }
}

fn stream_seed(base_seed: u64, stream: u64) -> u64 {
    base_seed.wrapping_add(stream.wrapping_mul(STREAM_STRIDE))
}
