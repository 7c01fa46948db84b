use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the network graph.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
/// - the stored value doubles as the 1-based label (`x1`, `x2`, ...)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        // index+1 must be nonzero
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    /// Create an Id from a 1-based label; `None` for label 0.
    pub fn from_label(label: u32) -> Option<Self> {
        NonZeroU32::new(label).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 1-based label.
    pub fn label(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

/// Displays the 1-based label, matching `x1`, `x2`, ... in messages.
impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type CoordId = Id;
pub type ElemId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.label(), i + 1);
        }
    }

    #[test]
    fn label_zero_is_rejected() {
        assert!(Id::from_label(0).is_none());
        assert_eq!(Id::from_label(3).unwrap().index(), 2);
    }

    #[test]
    fn display_uses_the_label() {
        let id = Id::from_index(0);
        assert_eq!(id.to_string(), "1");
        assert_eq!(format!("{id:?}"), "Id(0)");
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }
}
