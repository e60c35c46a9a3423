use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::{
    models::reaction::transesterification::core::KineticsError,
    support::units::VolumetricMolarRate,
};

/// Errors that can occur while solving for a step equilibrium.
#[derive(Debug, Error)]
pub enum EquilibriumError {
    /// The cell state could not be evaluated.
    #[error("kinetics evaluation failed")]
    Kinetics(#[from] KineticsError),

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The requested reaction is not in the mechanism.
    #[error("unknown reaction index {index}: mechanism has {count} reactions")]
    UnknownReaction { index: usize, count: usize },

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Smallest net rate magnitude encountered during iteration.
        residual: VolumetricMolarRate,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}
