//! mn-graph: topology layer for mechnet.
//!
//! Provides:
//! - Element descriptors (spring, damper, inerter)
//! - Coordinate derivation and canonical ordering
//! - Incidence index over the undirected element graph
//! - Incremental network builder with validation
//!
//! # Example
//!
//! ```
//! use mn_graph::{ElementKind, NetworkBuilder};
//!
//! let mut builder = NetworkBuilder::new();
//! let x1 = builder.add_mass(1.0);
//! let x2 = builder.add_mass(1.0);
//! builder.add_element("k1", ElementKind::Spring, 10.0, x1, x2);
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.coordinates().len(), 2);
//! assert_eq!(graph.incident(x1).len(), 1);
//! ```

pub mod builder;
pub mod coords;
pub mod element;
pub mod error;
pub mod graph;
pub mod topology;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::NetworkBuilder;
pub use coords::{CoordinateSpace, parse_coordinate_name, parse_mass_name};
pub use element::{Element, ElementKind};
pub use error::{GraphError, GraphResult};
pub use graph::MechGraph;
pub use topology::{Incidence, Topology, TopologyEntry, TopologyEntryDef, TopologyIndex};
