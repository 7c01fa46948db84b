//! Topology description and incidence index.

use mn_core::{CoordId, ElemId, Real};

use crate::element::Element;

/// One named connection as supplied by the caller, before validation.
///
/// The two coordinate names form an unordered pair.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEntryDef {
    pub name: String,
    pub degree: u8,
    pub value: Real,
    pub coordinates: Vec<String>,
}

/// Ordered topology description: element name -> (degree, value, {a, b}).
///
/// Insertion order is kept; it fixes the order of incidence lists and so
/// the exact shape of the intermediate equations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    entries: Vec<TopologyEntryDef>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element connecting two coordinates, e.g.
    /// `insert("k1", 0, 10.0, ["x1", "x2"])`.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: impl Into<String>,
        degree: u8,
        value: Real,
        coordinates: [S; 2],
    ) -> &mut Self {
        self.entries.push(TopologyEntryDef {
            name: name.into(),
            degree,
            value,
            coordinates: coordinates.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn push(&mut self, entry: TopologyEntryDef) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[TopologyEntryDef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TopologyEntryDef> for Topology {
    fn from_iter<T: IntoIterator<Item = TopologyEntryDef>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A validated element together with the two coordinates it connects.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyEntry {
    pub id: ElemId,
    pub name: String,
    pub element: Element,
    /// The two ends, distinct.
    pub ends: [CoordId; 2],
}

impl TopologyEntry {
    /// The end opposite `coord`, or `None` if `coord` is not an end.
    pub fn other_end(&self, coord: CoordId) -> Option<CoordId> {
        match self.ends {
            [a, b] if a == coord => Some(b),
            [a, b] if b == coord => Some(a),
            _ => None,
        }
    }
}

/// One element incident to a coordinate, seen from that coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Incidence {
    pub element: ElemId,
    pub other: CoordId,
}

/// Compact adjacency of the undirected element graph.
///
/// Coordinate `i`'s incidences are `incidences[offsets[i]..offsets[i + 1]]`,
/// in topology insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyIndex {
    pub(crate) offsets: Vec<usize>,
    pub(crate) incidences: Vec<Incidence>,
}

impl TopologyIndex {
    /// Build the index by scanning every entry once and recording it at
    /// both of its ends.
    pub(crate) fn build(coordinate_count: usize, entries: &[TopologyEntry]) -> Self {
        let mut degree = vec![0usize; coordinate_count];
        for entry in entries {
            for end in entry.ends {
                degree[end.index() as usize] += 1;
            }
        }

        let mut offsets = Vec::with_capacity(coordinate_count + 1);
        offsets.push(0);
        for d in &degree {
            offsets.push(offsets[offsets.len() - 1] + d);
        }

        let placeholder = Incidence {
            element: ElemId::from_index(0),
            other: CoordId::from_index(0),
        };
        let mut incidences = vec![placeholder; offsets[coordinate_count]];
        let mut cursor = offsets[..coordinate_count].to_vec();
        for entry in entries {
            let [a, b] = entry.ends;
            for (here, there) in [(a, b), (b, a)] {
                let slot = &mut cursor[here.index() as usize];
                incidences[*slot] = Incidence {
                    element: entry.id,
                    other: there,
                };
                *slot += 1;
            }
        }

        Self {
            offsets,
            incidences,
        }
    }

    /// Incidences of `coord` in insertion order. Empty for an isolated
    /// coordinate or one outside the index.
    pub fn incident(&self, coord: CoordId) -> &[Incidence] {
        let idx = coord.index() as usize;
        if idx + 1 >= self.offsets.len() {
            return &[];
        }
        &self.incidences[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Number of coordinates covered.
    pub fn coordinate_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }
}
