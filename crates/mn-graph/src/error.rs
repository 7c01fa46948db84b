//! Topology construction and validation errors.

use mn_core::{CoordId, ElemId, Real};
use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
///
/// Every variant names the coordinate or element at fault so that the input
/// can be fixed without re-deriving the network by hand.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// The coordinates referenced by the topology do not match the masses.
    #[error("Topology mismatch ({coordinates} coordinates, {masses} masses): {what}")]
    TopologyMismatch {
        coordinates: usize,
        masses: usize,
        what: String,
    },

    /// A coordinate name is not `x` followed by a positive integer.
    #[error("Malformed coordinate name '{name}' in element '{element}'")]
    MalformedCoordinate { name: String, element: String },

    /// A mass name carries no positive integer suffix.
    #[error("Malformed mass name '{name}' (expected a numeric suffix such as 'm1')")]
    MalformedMass { name: String },

    /// Element degree outside {0, 1, 2}.
    #[error("Element '{element}' has degree {degree} (expected 0, 1 or 2)")]
    InvalidDegree { element: String, degree: u8 },

    /// Element constants and masses must be finite and strictly positive.
    #[error("{what} must be finite and strictly positive, got {value}")]
    NonPositiveValue { what: String, value: Real },

    /// An element whose two ends are the same coordinate.
    #[error("Element '{element}' connects coordinate {coordinate} to itself")]
    SelfLoop { element: String, coordinate: String },

    /// An element does not list exactly two coordinates.
    #[error("Element '{element}' lists {count} coordinates (expected 2)")]
    InvalidArity { element: String, count: usize },

    /// Two elements or two masses with the same name.
    #[error("Duplicate name '{name}'")]
    DuplicateName { name: String },

    /// An element refers to a coordinate that was never declared.
    #[error("Element '{element}' refers to undeclared coordinate x{id}")]
    UnknownCoordinate { element: String, id: CoordId },

    /// Incidence lists disagree with the element table.
    #[error("Incidence of element {element} at coordinate x{coordinate} is inconsistent")]
    InconsistentAdjacency { element: ElemId, coordinate: CoordId },
}
