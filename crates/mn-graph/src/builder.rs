//! Incremental network builder.

use mn_core::{CoordId, ElemId, Real};

use crate::coords::CoordinateSpace;
use crate::element::{Element, ElementKind};
use crate::error::GraphResult;
use crate::graph::MechGraph;
use crate::topology::{TopologyEntry, TopologyIndex};
use crate::validate;

/// An element recorded by the builder but not yet validated.
#[derive(Debug, Clone)]
pub(crate) struct PendingElement {
    pub(crate) name: String,
    pub(crate) kind: ElementKind,
    pub(crate) value: Real,
    pub(crate) ends: [CoordId; 2],
}

/// A declared mass, paired with coordinate `x{position + 1}`.
#[derive(Debug, Clone)]
pub(crate) struct PendingMass {
    pub(crate) name: String,
    pub(crate) value: Real,
}

/// Builder for constructing a network incrementally.
///
/// Use `add_mass` and `add_element` to build up the network, then call
/// `build()` to validate and freeze it into an immutable `MechGraph`.
/// Unlike a topology description, the builder can declare a mass that no
/// element touches.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    masses: Vec<PendingMass>,
    elements: Vec<PendingElement>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mass named `m{n}` and return the coordinate of its displacement.
    pub fn add_mass(&mut self, value: Real) -> CoordId {
        let name = format!("m{}", self.masses.len() + 1);
        self.add_named_mass(name, value)
    }

    /// Add a mass with an explicit name.
    pub fn add_named_mass(&mut self, name: impl Into<String>, value: Real) -> CoordId {
        let id = CoordId::from_index(self.masses.len() as u32);
        self.masses.push(PendingMass {
            name: name.into(),
            value,
        });
        id
    }

    /// Add an element between two coordinates and return its ID.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        kind: ElementKind,
        value: Real,
        a: CoordId,
        b: CoordId,
    ) -> ElemId {
        let id = ElemId::from_index(self.elements.len() as u32);
        self.elements.push(PendingElement {
            name: name.into(),
            kind,
            value,
            ends: [a, b],
        });
        id
    }

    /// Number of masses declared so far.
    pub fn mass_count(&self) -> usize {
        self.masses.len()
    }

    /// Build and validate the network, returning an immutable `MechGraph`.
    pub fn build(self) -> GraphResult<MechGraph> {
        let coords = CoordinateSpace::with_len(self.masses.len() as u32);
        validate::validate_structure(&coords, &self.masses, &self.elements)?;

        let entries = self
            .elements
            .into_iter()
            .enumerate()
            .map(|(i, pending)| {
                Ok(TopologyEntry {
                    id: ElemId::from_index(i as u32),
                    element: Element::new(&pending.name, pending.kind, pending.value)?,
                    name: pending.name,
                    ends: pending.ends,
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;

        let index = TopologyIndex::build(coords.len(), &entries);
        validate::validate_adjacency(&coords, &entries, &index)?;

        Ok(MechGraph {
            coords,
            masses: self.masses.iter().map(|m| m.value).collect(),
            mass_names: self.masses.into_iter().map(|m| m.name).collect(),
            entries,
            index,
        })
    }
}
