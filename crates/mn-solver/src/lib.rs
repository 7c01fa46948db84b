//! Laplace-domain solver for lumped mechanical networks.
//!
//! The pipeline runs one equation of motion per coordinate
//! ([`NodeEquation`]), extracts the polynomial coefficient matrix
//! ([`LinearSystemBuilder`]) and solves it exactly over rational functions
//! of `s` ([`TransferSolver`]). [`Network`] ties the steps together.
//!
//! # Example
//!
//! ```
//! use mn_algebra::Expr;
//! use mn_graph::Topology;
//!
//! let mut topology = Topology::new();
//! topology.insert("k1", 0, 10.0, ["x1", "x2"]);
//! let network = mn_solver::build(&topology, [("m1", 1.0), ("m2", 1.0)], Expr::param("F")).unwrap();
//!
//! let tf = network.transfer().unwrap();
//! assert_eq!(tf.to_string(), "10 / (s^2 + 10)");
//! ```

pub mod equation;
pub mod error;
pub mod network;
pub mod sweep;
pub mod system;
pub mod transfer;

pub use equation::NodeEquation;
pub use error::{SolverError, SolverResult};
pub use network::{Network, build};
pub use sweep::{FrequencySweep, SweepParams, SweepPoint, SweepSpacing, generate_frequencies};
pub use system::{LinearSystem, LinearSystemBuilder};
pub use transfer::{SolveConfig, TransferSolver};
