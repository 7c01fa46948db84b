//! Error types for symbolic operations.

use thiserror::Error;

/// Result type for symbolic operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;

/// Errors that can occur while manipulating polynomials and expressions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlgebraError {
    #[error("Division by zero: {what}")]
    DivisionByZero { what: &'static str },

    #[error("Inexact polynomial division (remainder norm {remainder:e})")]
    InexactDivision { remainder: f64 },

    #[error("Expression is not affine in the coordinates: {what}")]
    NotAffine { what: String },

    #[error("Unbound symbol '{name}' in a coefficient position")]
    UnboundSymbol { name: String },
}
