//! cascades — cascade data model, timing kernel, and diffusion simulator.
//!
//! Purpose
//! -------
//! Provide the input side of ConNIe network inference: validated records of
//! per-node infection times ([`Cascade`]), ordered collections of them with
//! the filtered views the objectives aggregate over ([`CascadeSet`]), the
//! exponential timing kernel, and a simulator that produces synthetic
//! cascades from a known [`AdjacencyMatrix`].
//!
//! Key behaviors
//! -------------
//! - Validate raw inputs once at construction; everything downstream reads
//!   immutable, consistent data.
//! - Encode "never infected" as `None` internally and `-1.0` at the raw
//!   boundary ([`NEVER_INFECTED`]).
//! - Generate cascades with an injected random source, single-threaded
//!   ([`DiffusionSimulator::simulate`]) or in parallel with one
//!   deterministic stream per cascade ([`DiffusionSimulator::simulate_set`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All cascades in a set share one node space and one kernel rate.
//! - Adjacency entries are finite probabilities in `[0, 1]`; the diagonal is
//!   never read.
//!
//! Downstream usage
//! ----------------
//! - `connie` scores candidate columns against a [`CascadeSet`].
//! - `estimation` optimizes those scores, one column per node.
//!
//! Testing notes
//! -------------
//! - Unit tests next to each type cover validation, the filtered views on a
//!   seven-cascade reference set, and structural invariants of simulated
//!   cascades. Statistical checks over large samples live in `tests/`.

pub mod adjacency;
pub mod cascade;
pub mod cascade_set;
pub mod errors;
pub mod kernel;
pub mod simulation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::adjacency::AdjacencyMatrix;
pub use self::cascade::{Cascade, NEVER_INFECTED};
pub use self::cascade_set::CascadeSet;
pub use self::errors::{CascadeError, CascadeResult};
pub use self::kernel::{DEFAULT_KERNEL_RATE, ExponentialKernel};
pub use self::simulation::DiffusionSimulator;
