//! Opaque typed resource handles.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// An opaque `u32` handle into a [`ResourceStore`](crate::ResourceStore).
///
/// The type parameter is a compile-time tag only: handles for different
/// resource types are distinct types, so a mesh handle cannot be passed
/// where a texture handle is expected. The core never interprets the
/// handle's contents.
pub struct ResourceHandle<T> {
    raw: u32,
    _tag: PhantomData<fn() -> T>,
}

// Manual impls: the derives would put unwanted bounds on T.
impl<T> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ResourceHandle<T> {}

impl<T> PartialEq for ResourceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for ResourceHandle<T> {}

impl<T> Hash for ResourceHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceHandle({})", self.raw)
    }
}

impl<T> ResourceHandle<T> {
    /// Wrap a raw handle value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _tag: PhantomData,
        }
    }

    /// The raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MeshTag;
    struct TextureTag;

    #[test]
    fn test_handle_wraps_raw_value() {
        let handle: ResourceHandle<MeshTag> = ResourceHandle::from_raw(42);
        assert_eq!(handle.raw(), 42);
    }

    #[test]
    fn test_differently_tagged_handles_keep_their_own_values() {
        let mesh: ResourceHandle<MeshTag> = ResourceHandle::from_raw(1);
        let texture: ResourceHandle<TextureTag> = ResourceHandle::from_raw(2);

        assert_eq!(mesh.raw(), 1);
        assert_eq!(texture.raw(), 2);
    }

    #[test]
    fn test_handles_are_comparable_within_a_tag() {
        let a: ResourceHandle<MeshTag> = ResourceHandle::from_raw(7);
        let b: ResourceHandle<MeshTag> = ResourceHandle::from_raw(7);
        let c: ResourceHandle<MeshTag> = ResourceHandle::from_raw(8);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
