//! `VertexKey` / `ElementKey`: strong, zero-cost handles for mesh entities
//!
//! Vertices and elements are addressed by caller-assigned integer keys rather
//! than references. Both keys wrap a non-zero integer so that 0 stays
//! available as the "unset" value, which the sibling codec relies on.
//!
//! `ElementKey` is 32 bits wide because it occupies the upper half of a packed
//! [`SiblingHalfFacet`](crate::topology::sibling::SiblingHalfFacet).

use crate::mesh_error::MeshError;
use std::{
    fmt,
    num::{NonZeroU32, NonZeroU64},
};

/// Key of a vertex in the [`VertexRegistry`](crate::topology::vertex::VertexRegistry).
///
/// # Memory layout
/// `repr(transparent)` over `NonZeroU64`, so `Option<VertexKey>` is also 8 bytes.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct VertexKey(NonZeroU64);

impl VertexKey {
    /// Creates a new `VertexKey` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidKey`] if `raw == 0`.
    ///
    /// ```rust
    /// # use mesh_ahf::topology::key::VertexKey;
    /// let v = VertexKey::new(7)?;
    /// assert_eq!(v.get(), 7);
    /// assert!(VertexKey::new(0).is_err());
    /// # Ok::<(), mesh_ahf::mesh_error::MeshError>(())
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshError> {
        NonZeroU64::new(raw)
            .map(VertexKey)
            .ok_or(MeshError::InvalidKey(raw))
    }

    /// Returns the raw key.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// Key of an element in a [`Mesh`](crate::topology::mesh::Mesh).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ElementKey(NonZeroU32);

impl ElementKey {
    /// Creates a new `ElementKey` from a raw `u32` value.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidKey`] if `raw == 0`.
    #[inline]
    pub fn new(raw: u32) -> Result<Self, MeshError> {
        NonZeroU32::new(raw)
            .map(ElementKey)
            .ok_or(MeshError::InvalidKey(u64::from(raw)))
    }

    /// Returns the raw key.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

// -----------------------------------------------------------------------------
// Formatting traits
// -----------------------------------------------------------------------------

impl fmt::Debug for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VertexKey").field(&self.get()).finish()
    }
}

impl fmt::Display for VertexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Debug for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementKey").field(&self.get()).finish()
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u64> for VertexKey {
    type Error = MeshError;
    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        VertexKey::new(raw)
    }
}

impl TryFrom<u32> for ElementKey {
    type Error = MeshError;
    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ElementKey::new(raw)
    }
}

// -----------------------------------------------------------------------------
// Testing and assertions
// -----------------------------------------------------------------------------



#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let v = VertexKey::new(123).unwrap();
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, "123");
        let back: VertexKey = serde_json::from_str(&s).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn json_rejects_zero() {
        assert!(serde_json::from_str::<ElementKey>("0").is_err());
    }

    #[test]
    fn bincode_roundtrip() {
        let e = ElementKey::new(456).unwrap();
        let bytes = bincode::serialize(&e).unwrap();
        let back: ElementKey = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, e);
    }
}
