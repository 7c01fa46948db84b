//! Generalized coordinates and their canonical ordering.

use std::collections::BTreeSet;

use mn_core::CoordId;

use crate::error::{GraphError, GraphResult};

/// Parse a coordinate name of the form `x<n>` with `n >= 1` and no leading
/// zeros, returning `n`. `element` is only used for error context.
pub fn parse_coordinate_name(name: &str, element: &str) -> GraphResult<u32> {
    let malformed = || GraphError::MalformedCoordinate {
        name: name.to_string(),
        element: element.to_string(),
    };
    let digits = name.strip_prefix('x').ok_or_else(malformed)?;
    positive_decimal(digits).ok_or_else(malformed)
}

/// Parse the numeric suffix of a mass name such as `m3`, returning `3`.
/// The prefix may be any non-empty run of non-digit characters.
pub fn parse_mass_name(name: &str) -> GraphResult<u32> {
    let split = name
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .filter(|&i| i > 0);
    split
        .and_then(|i| positive_decimal(&name[i..]))
        .ok_or_else(|| GraphError::MalformedMass {
            name: name.to_string(),
        })
}

fn positive_decimal(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

/// The ordered set of coordinates `x1..xN`, one per mass.
///
/// Coordinates are dense: `x_i` has `CoordId::from_index(i - 1)`, which is
/// also its row and column in every matrix built downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSpace {
    len: u32,
}

impl CoordinateSpace {
    /// A space of `len` coordinates `x1..x{len}`.
    pub fn with_len(len: u32) -> Self {
        Self { len }
    }

    /// Derive the space from the coordinate names used by a topology.
    ///
    /// The union of names must contain exactly `mass_count` distinct
    /// coordinates, and they must be `x1..x{mass_count}`, so that every
    /// coordinate has a mass and every mass a coordinate.
    pub fn derive<'a, 'b, I>(names: I, mass_count: usize) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'b str)>,
    {
        let mut labels = BTreeSet::new();
        for (name, element) in names {
            labels.insert(parse_coordinate_name(name, element)?);
        }

        if labels.len() != mass_count {
            return Err(GraphError::TopologyMismatch {
                coordinates: labels.len(),
                masses: mass_count,
                what: "there should be one coordinate per mass".to_string(),
            });
        }

        // Sorted and distinct, so the last label is the maximum
        if let Some(&last) = labels.last() {
            if last as usize != mass_count {
                let missing = (1..=last).find(|n| !labels.contains(n)).unwrap_or(last);
                return Err(GraphError::TopologyMismatch {
                    coordinates: labels.len(),
                    masses: mass_count,
                    what: format!("coordinate x{last} has no mass while x{missing} is unused"),
                });
            }
        }

        Ok(Self::with_len(mass_count as u32))
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Coordinates in canonical order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = CoordId> + Clone {
        (0..self.len).map(CoordId::from_index)
    }

    pub fn contains(&self, id: CoordId) -> bool {
        id.index() < self.len
    }

    /// Look up a coordinate by name (`"x2"`).
    pub fn get(&self, name: &str) -> Option<CoordId> {
        let label = parse_coordinate_name(name, "").ok()?;
        CoordId::from_label(label).filter(|id| self.contains(*id))
    }

    /// Canonical name of a coordinate.
    pub fn name(&self, id: CoordId) -> String {
        format!("x{}", id.label())
    }

    /// The coordinate at which excitation is applied by convention.
    pub fn first(&self) -> Option<CoordId> {
        self.ids().next()
    }

    /// The highest-indexed coordinate, whose response is reported.
    pub fn last(&self) -> Option<CoordId> {
        self.len.checked_sub(1).map(CoordId::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_names() {
        assert_eq!(parse_coordinate_name("x1", "k").unwrap(), 1);
        assert_eq!(parse_coordinate_name("x12", "k").unwrap(), 12);
        for bad in ["x0", "x", "y1", "x01", "x-1", "x1a", "1", ""] {
            let err = parse_coordinate_name(bad, "k").unwrap_err();
            assert!(
                matches!(err, GraphError::MalformedCoordinate { .. }),
                "{bad} should be malformed"
            );
        }
    }

    #[test]
    fn mass_names() {
        assert_eq!(parse_mass_name("m1").unwrap(), 1);
        assert_eq!(parse_mass_name("mass10").unwrap(), 10);
        assert!(parse_mass_name("m").is_err());
        assert!(parse_mass_name("12").is_err());
        assert!(parse_mass_name("m0").is_err());
    }

    #[test]
    fn derive_orders_by_numeric_suffix() {
        let owned: Vec<String> = [10, 2, 1, 3, 4, 5, 6, 7, 8, 9]
            .iter()
            .map(|i| format!("x{i}"))
            .collect();
        let space = CoordinateSpace::derive(owned.iter().map(|n| (n.as_str(), "k")), 10).unwrap();
        let ids: Vec<_> = space.ids().collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(space.name(ids[1]), "x2");
        assert_eq!(space.name(ids[9]), "x10");
        assert_eq!(space.get("x10"), Some(ids[9]));
        assert_eq!(space.get("x11"), None);
    }

    #[test]
    fn derive_rejects_count_mismatch() {
        let err = CoordinateSpace::derive([("x1", "k1"), ("x2", "k1")], 3).unwrap_err();
        assert!(matches!(
            err,
            GraphError::TopologyMismatch {
                coordinates: 2,
                masses: 3,
                ..
            }
        ));
    }

    #[test]
    fn derive_rejects_gaps() {
        let err = CoordinateSpace::derive([("x1", "k1"), ("x3", "k1")], 2).unwrap_err();
        assert!(matches!(err, GraphError::TopologyMismatch { .. }));
        assert!(err.to_string().contains("x3"));
    }

    #[test]
    fn first_and_last() {
        let space = CoordinateSpace::with_len(3);
        assert_eq!(space.first().unwrap().label(), 1);
        assert_eq!(space.last().unwrap().label(), 3);
        assert!(CoordinateSpace::with_len(0).last().is_none());
    }
}
