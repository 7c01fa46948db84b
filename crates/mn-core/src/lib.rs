//! mn-core: stable foundation for mechnet.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for coordinates and elements)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
