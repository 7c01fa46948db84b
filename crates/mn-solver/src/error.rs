//! Error types for solver operations.

use mn_graph::GraphError;
use thiserror::Error;

/// Errors that can occur while assembling or solving a network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// An equation could not be written as `A x = b`.
    #[error("Equation of {coordinate} is not linear in the coordinates: {what}")]
    NonLinearEquation { coordinate: String, what: String },

    /// No unique response: the determinant vanishes identically, or at the
    /// numeric point requested.
    #[error("Singular {size}x{size} system: the network has no unique response")]
    SingularSystem { size: usize },

    #[error("Solve failed: {what}")]
    Solve { what: String },

    #[error("Invalid frequency sweep: {what}")]
    InvalidSweep { what: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;
