//! Network validation logic.

use std::collections::HashSet;

use crate::builder::{PendingElement, PendingMass};
use crate::coords::CoordinateSpace;
use crate::error::{GraphError, GraphResult};
use crate::topology::{TopologyEntry, TopologyIndex};

/// Validate the network structure: names unique, masses positive, every
/// element connecting two distinct declared coordinates.
pub(crate) fn validate_structure(
    coords: &CoordinateSpace,
    masses: &[PendingMass],
    elements: &[PendingElement],
) -> GraphResult<()> {
    let mut mass_names = HashSet::new();
    for mass in masses {
        if !mass_names.insert(mass.name.as_str()) {
            return Err(GraphError::DuplicateName {
                name: mass.name.clone(),
            });
        }
        if !(mass.value.is_finite() && mass.value > 0.0) {
            return Err(GraphError::NonPositiveValue {
                what: format!("mass '{}'", mass.name),
                value: mass.value,
            });
        }
    }

    let mut element_names = HashSet::new();
    for element in elements {
        if !element_names.insert(element.name.as_str()) {
            return Err(GraphError::DuplicateName {
                name: element.name.clone(),
            });
        }

        // Both ends must be declared coordinates
        for &end in &element.ends {
            if !coords.contains(end) {
                return Err(GraphError::UnknownCoordinate {
                    element: element.name.clone(),
                    id: end,
                });
            }
        }

        // Ends must be distinct
        if element.ends[0] == element.ends[1] {
            return Err(GraphError::SelfLoop {
                element: element.name.clone(),
                coordinate: coords.name(element.ends[0]),
            });
        }
    }

    Ok(())
}

/// Validate the incidence index against the element table: every element
/// appears exactly once at each of its ends, seen with the opposite end.
pub(crate) fn validate_adjacency(
    coords: &CoordinateSpace,
    entries: &[TopologyEntry],
    index: &TopologyIndex,
) -> GraphResult<()> {
    if index.coordinate_count() != coords.len() {
        return Err(GraphError::TopologyMismatch {
            coordinates: index.coordinate_count(),
            masses: coords.len(),
            what: "incidence index does not cover every coordinate".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for coord in coords.ids() {
        for inc in index.incident(coord) {
            let entry = entries
                .get(inc.element.index() as usize)
                .filter(|e| e.id == inc.element)
                .ok_or(GraphError::InconsistentAdjacency {
                    element: inc.element,
                    coordinate: coord,
                })?;
            if entry.other_end(coord) != Some(inc.other) || !seen.insert((inc.element, coord)) {
                return Err(GraphError::InconsistentAdjacency {
                    element: inc.element,
                    coordinate: coord,
                });
            }
        }
    }

    // Every element should appear at both ends
    for entry in entries {
        for end in entry.ends {
            if !seen.contains(&(entry.id, end)) {
                return Err(GraphError::InconsistentAdjacency {
                    element: entry.id,
                    coordinate: end,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementKind};
    use crate::topology::Incidence;
    use mn_core::{CoordId, ElemId};

    fn spring(id: u32, a: u32, b: u32) -> TopologyEntry {
        TopologyEntry {
            id: ElemId::from_index(id),
            name: format!("k{id}"),
            element: Element::new("k", ElementKind::Spring, 1.0).unwrap(),
            ends: [CoordId::from_index(a), CoordId::from_index(b)],
        }
    }

    #[test]
    fn validate_empty_network() {
        let coords = CoordinateSpace::with_len(0);
        assert!(validate_structure(&coords, &[], &[]).is_ok());
        let index = TopologyIndex::build(0, &[]);
        assert!(validate_adjacency(&coords, &[], &index).is_ok());
    }

    #[test]
    fn duplicate_element_names_are_rejected() {
        let coords = CoordinateSpace::with_len(2);
        let masses = vec![
            PendingMass {
                name: "m1".into(),
                value: 1.0,
            },
            PendingMass {
                name: "m2".into(),
                value: 1.0,
            },
        ];
        let pending = |name: &str| PendingElement {
            name: name.into(),
            kind: ElementKind::Spring,
            value: 1.0,
            ends: [CoordId::from_index(0), CoordId::from_index(1)],
        };
        let result = validate_structure(&coords, &masses, &[pending("k"), pending("k")]);
        assert_eq!(
            result.unwrap_err(),
            GraphError::DuplicateName { name: "k".into() }
        );
    }

    #[test]
    fn tampered_index_is_detected() {
        let coords = CoordinateSpace::with_len(3);
        let entries = vec![spring(0, 0, 1)];
        let mut index = TopologyIndex::build(3, &entries);
        index.incidences[0] = Incidence {
            element: ElemId::from_index(0),
            other: CoordId::from_index(2),
        };
        let err = validate_adjacency(&coords, &entries, &index).unwrap_err();
        assert!(matches!(err, GraphError::InconsistentAdjacency { .. }));
        assert_eq!(
            err.to_string(),
            "Incidence of element 1 at coordinate x1 is inconsistent"
        );
    }

    #[test]
    fn built_index_is_consistent() {
        let coords = CoordinateSpace::with_len(3);
        let entries = vec![spring(0, 0, 1), spring(1, 1, 2), spring(2, 2, 0)];
        let index = TopologyIndex::build(3, &entries);
        assert!(validate_adjacency(&coords, &entries, &index).is_ok());
    }
}
