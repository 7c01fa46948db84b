//! Validated, immutable network graph.

use std::collections::BTreeMap;

use mn_core::{CoordId, ElemId, Real};

use crate::builder::NetworkBuilder;
use crate::coords::{CoordinateSpace, parse_coordinate_name, parse_mass_name};
use crate::element::Element;
use crate::error::{GraphError, GraphResult};
use crate::topology::{Incidence, Topology, TopologyEntry, TopologyIndex};

/// The network graph: masses on coordinates `x1..xN` and the elements
/// joining them.
///
/// The graph stores:
/// - One mass per coordinate, indexed by `CoordId`.
/// - All elements in topology insertion order, indexed by `ElemId`.
/// - Compact incidence: for each coordinate, which elements touch it.
#[derive(Debug, Clone)]
pub struct MechGraph {
    pub(crate) coords: CoordinateSpace,
    pub(crate) masses: Vec<Real>,
    pub(crate) mass_names: Vec<String>,
    pub(crate) entries: Vec<TopologyEntry>,
    pub(crate) index: TopologyIndex,
}

impl MechGraph {
    /// Build a graph from a topology description and named masses.
    ///
    /// Masses are paired with coordinates by numeric suffix (`m3` sits on
    /// `x3`). Every coordinate named by the topology must have a mass and
    /// vice versa, so a mass no element touches cannot be expressed here;
    /// use [`NetworkBuilder`] for that.
    pub fn from_topology<I, S>(topology: &Topology, masses: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (S, Real)>,
        S: AsRef<str>,
    {
        // Order masses by label
        let mut by_label: BTreeMap<u32, (String, Real)> = BTreeMap::new();
        for (name, value) in masses {
            let name = name.as_ref();
            let label = parse_mass_name(name)?;
            if by_label.insert(label, (name.to_string(), value)).is_some() {
                return Err(GraphError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }

        let mut ends = Vec::with_capacity(topology.len());
        for def in topology.entries() {
            let [a, b] = def.coordinates.as_slice() else {
                return Err(GraphError::InvalidArity {
                    element: def.name.clone(),
                    count: def.coordinates.len(),
                });
            };
            let la = parse_coordinate_name(a, &def.name)?;
            let lb = parse_coordinate_name(b, &def.name)?;
            if la == lb {
                return Err(GraphError::SelfLoop {
                    element: def.name.clone(),
                    coordinate: a.clone(),
                });
            }
            ends.push((la, lb));
        }

        let coords = CoordinateSpace::derive(
            topology.entries().iter().flat_map(|def| {
                def.coordinates
                    .iter()
                    .map(move |c| (c.as_str(), def.name.as_str()))
            }),
            by_label.len(),
        )?;

        if let Some((&label, (name, _))) = by_label
            .iter()
            .enumerate()
            .find(|(i, (label, _))| **label as usize != i + 1)
            .map(|(_, kv)| kv)
        {
            return Err(GraphError::TopologyMismatch {
                coordinates: coords.len(),
                masses: by_label.len(),
                what: format!("mass '{name}' would sit on x{label}, which no element uses"),
            });
        }

        let mut builder = NetworkBuilder::new();
        for (name, value) in by_label.into_values() {
            builder.add_named_mass(name, value);
        }
        for (def, (la, lb)) in topology.entries().iter().zip(ends) {
            let element = Element::from_degree(&def.name, def.value, def.degree)?;
            builder.add_element(
                def.name.clone(),
                element.kind(),
                element.value(),
                CoordId::from_index(la - 1),
                CoordId::from_index(lb - 1),
            );
        }
        builder.build()
    }

    /// The coordinate space, in canonical order.
    pub fn coordinates(&self) -> &CoordinateSpace {
        &self.coords
    }

    /// Mass on coordinate `id`.
    ///
    /// # Panics
    /// If `id` is not a coordinate of this graph.
    pub fn mass(&self, id: CoordId) -> Real {
        self.masses[id.index() as usize]
    }

    pub fn mass_name(&self, id: CoordId) -> &str {
        &self.mass_names[id.index() as usize]
    }

    /// Masses in coordinate order.
    pub fn masses(&self) -> &[Real] {
        &self.masses
    }

    /// All elements in insertion order.
    pub fn entries(&self) -> &[TopologyEntry] {
        &self.entries
    }

    /// Get an element entry by ID (returns None if ID out of bounds).
    pub fn entry(&self, id: ElemId) -> Option<&TopologyEntry> {
        self.entries.get(id.index() as usize)
    }

    /// Incidences of a coordinate in insertion order.
    pub fn incident(&self, id: CoordId) -> &[Incidence] {
        self.index.incident(id)
    }

    /// Elements touching `id`, each with the opposite coordinate.
    pub fn incident_elements(
        &self,
        id: CoordId,
    ) -> impl ExactSizeIterator<Item = (&Element, CoordId)> + '_ {
        self.incident(id)
            .iter()
            .map(|inc| (&self.entries[inc.element.index() as usize].element, inc.other))
    }

    pub fn index(&self) -> &TopologyIndex {
        &self.index
    }
}
