//! estimation — recover the network from cascades.
//!
//! Purpose
//! -------
//! Turn the ConNIe objectives into estimators. Each column of the network
//! (the incoming weights of one node) is an independent bounded problem;
//! this module casts it as an unconstrained [`LogLikelihood`] problem and
//! hands it to the L-BFGS driver in [`crate::optimization`].
//!
//! Key behaviors
//! -------------
//! - [`EstimationOptions`] selects the [`Formulation`], penalty weight,
//!   starting column ([`Init`]) and optimizer settings.
//! - [`ColumnModel`] maps `θ ∈ ℝ^{n−1}` to weights in `[0, 1]` through a
//!   clamped logistic and exposes `−objective` as the log-likelihood.
//! - [`estimate_column`] solves one column; [`estimate_network`] solves all
//!   of them in parallel and assembles the `n × n` matrix.
//!
//! Conventions
//! -----------
//! - Matrix layout matches [`AdjacencyMatrix`](crate::cascades::AdjacencyMatrix):
//!   `weights[[j, i]]` is the probability that `j` infects `i`.
//!
//! [`LogLikelihood`]: crate::optimization::loglik_optimizer::LogLikelihood

pub mod column;
pub mod estimator;
pub mod options;

pub use self::column::ColumnModel;
pub use self::estimator::{ColumnEstimate, NetworkEstimate, estimate_column, estimate_network};
pub use self::options::{EstimationOptions, Formulation, Init};
