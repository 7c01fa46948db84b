//! Symbolic algebra in the Laplace variable `s`.
//!
//! This crate provides the small amount of computer algebra the network
//! solver needs: real-coefficient polynomials in `s`, reduced rational
//! functions built from them, and an expression tree over `s`, the
//! coordinate unknowns and free parameters. Expressions that are affine in
//! the coordinates can be flattened into a [`LinearForm`] whose
//! coefficients are polynomials in `s`.

pub mod error;
pub mod expr;
pub mod linear;
pub mod poly;
pub mod rational;

pub use error::{AlgebraError, AlgebraResult};
pub use expr::{Expr, Symbol};
pub use linear::LinearForm;
pub use nalgebra::Complex;
pub use poly::Polynomial;
pub use rational::RationalFunction;
