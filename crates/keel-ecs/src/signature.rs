//! Per-entity component signatures.

use std::fmt;

/// Index of a registered component kind. One bit of a [`Signature`].
pub type ComponentKind = u32;

/// A fixed-width bitset recording which component kinds an entity has.
///
/// Bit *i* is set iff the component store for kind *i* currently holds data
/// for the entity. Supports up to [`Signature::MAX_KINDS`] kinds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u64);

impl Signature {
    /// Highest number of component kinds a signature can track.
    pub const MAX_KINDS: u32 = u64::BITS;

    /// The empty signature.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a signature from a list of kinds.
    #[must_use]
    pub fn from_kinds(kinds: &[ComponentKind]) -> Self {
        let mut signature = Self::empty();
        for &kind in kinds {
            signature.set(kind);
        }
        signature
    }

    /// Set the bit for a component kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not below [`Signature::MAX_KINDS`]. A silently
    /// ignored bit would corrupt query results.
    pub fn set(&mut self, kind: ComponentKind) {
        assert!(
            kind < Self::MAX_KINDS,
            "component kind {kind} exceeds signature width {}",
            Self::MAX_KINDS
        );
        self.0 |= 1 << kind;
    }

    /// Clear the bit for a component kind.
    pub fn clear(&mut self, kind: ComponentKind) {
        assert!(
            kind < Self::MAX_KINDS,
            "component kind {kind} exceeds signature width {}",
            Self::MAX_KINDS
        );
        self.0 &= !(1 << kind);
    }

    /// Whether the bit for a component kind is set.
    #[must_use]
    pub const fn contains(self, kind: ComponentKind) -> bool {
        kind < Self::MAX_KINDS && self.0 & (1 << kind) != 0
    }

    /// Whether every bit set in `mask` is also set here.
    #[must_use]
    pub const fn contains_all(self, mask: Self) -> bool {
        self.0 & mask.0 == mask.0
    }

    /// Whether no bits are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#b})", self.0)
    }
}
