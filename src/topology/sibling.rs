//! Packed sibling half-facet references.
//!
//! A reference to "half-facet `parent` of element `element`, slot `child`" is
//! stored in a single `u64`:
//!
//! ```text
//!  63            32 31          16 15           0
//! +----------------+--------------+--------------+
//! |   element key  |    parent    |    child     |
//! +----------------+--------------+--------------+
//! ```
//!
//! The raw value `0` is the *naked* sentinel. Element keys are non-zero, so a
//! packed reference can never collide with it.
//!
//! Inside an element's sibling slots, `child` is the 1-based slot of the
//! sibling's half-facet that points back at the owner (the mate slot). In a
//! vertex back-reference (`V2HF`) `child` is 0.

use std::fmt;

use crate::topology::key::ElementKey;

const ELEMENT_SHIFT: u32 = 32;
const PARENT_SHIFT: u32 = 16;
const FIELD_MASK: u64 = 0xFFFF;

/// A packed `(element, parent half-facet, child)` triple, or naked.
#[derive(
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(from = "u64", into = "u64")]
#[repr(transparent)]
pub struct SiblingHalfFacet(u64);

impl SiblingHalfFacet {
    /// The "no sibling" sentinel.
    pub const NAKED: SiblingHalfFacet = SiblingHalfFacet(0);

    #[inline]
    pub const fn pack(element: ElementKey, parent: u16, child: u16) -> Self {
        SiblingHalfFacet(
            ((element.get() as u64) << ELEMENT_SHIFT)
                | ((parent as u64) << PARENT_SHIFT)
                | child as u64,
        )
    }

    /// Splits the reference into its fields; `None` when naked.
    #[inline]
    pub fn unpack(self) -> Option<(ElementKey, u16, u16)> {
        let element = ElementKey::new((self.0 >> ELEMENT_SHIFT) as u32).ok()?;
        let parent = ((self.0 >> PARENT_SHIFT) & FIELD_MASK) as u16;
        let child = (self.0 & FIELD_MASK) as u16;
        Some((element, parent, child))
    }

    #[inline]
    pub const fn is_naked(self) -> bool {
        self.0 >> ELEMENT_SHIFT == 0
    }

    /// Element part of the reference.
    #[inline]
    pub fn element(self) -> Option<ElementKey> {
        self.unpack().map(|(e, _, _)| e)
    }

    /// Parent half-facet (1-based) of the referenced element.
    #[inline]
    pub fn half_facet(self) -> Option<usize> {
        self.unpack().map(|(_, p, _)| usize::from(p))
    }

    /// Child slot of the reference.
    #[inline]
    pub fn child(self) -> Option<usize> {
        self.unpack().map(|(_, _, c)| usize::from(c))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Reinterprets a raw packed value. Values with a zero element field
    /// decode as naked.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        if raw >> ELEMENT_SHIFT == 0 {
            SiblingHalfFacet::NAKED
        } else {
            SiblingHalfFacet(raw)
        }
    }
}

impl From<u64> for SiblingHalfFacet {
    fn from(raw: u64) -> Self {
        SiblingHalfFacet::from_raw(raw)
    }
}

impl From<SiblingHalfFacet> for u64 {
    fn from(s: SiblingHalfFacet) -> Self {
        s.0
    }
}

impl fmt::Debug for SiblingHalfFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unpack() {
            None => f.write_str("Naked"),
            Some((e, p, c)) => f
                .debug_struct("Sibling")
                .field("element", &e.get())
                .field("half_facet", &p)
                .field("child", &c)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(SiblingHalfFacet, u64);

    fn ek(raw: u32) -> ElementKey {
        ElementKey::new(raw).unwrap()
    }

    #[test]
    fn bit_layout() {
        let s = SiblingHalfFacet::pack(ek(0x0102_0304), 0x0506, 0x0708);
        assert_eq!(s.raw(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn round_trip_extremes() {
        for (e, p, c) in [
            (1, 1, 1),
            (1, u16::MAX, u16::MAX),
            (u32::MAX, 1, 1),
            (u32::MAX, u16::MAX, u16::MAX),
            (7, 3, 0),
        ] {
            let s = SiblingHalfFacet::pack(ek(e), p, c);
            assert!(!s.is_naked());
            assert_eq!(s.unpack(), Some((ek(e), p, c)));
        }
    }

    #[test]
    fn naked_sentinel() {
        assert!(SiblingHalfFacet::NAKED.is_naked());
        assert_eq!(SiblingHalfFacet::default(), SiblingHalfFacet::NAKED);
        assert_eq!(SiblingHalfFacet::NAKED.unpack(), None);
        assert_eq!(SiblingHalfFacet::from_raw(0xFFFF_FFFF), SiblingHalfFacet::NAKED);
        assert_eq!(format!("{:?}", SiblingHalfFacet::NAKED), "Naked");
    }

    #[test]
    fn accessors() {
        let s = SiblingHalfFacet::pack(ek(9), 4, 2);
        assert_eq!(s.element(), Some(ek(9)));
        assert_eq!(s.half_facet(), Some(4));
        assert_eq!(s.child(), Some(2));
        assert_eq!(SiblingHalfFacet::from_raw(s.raw()), s);
    }

    #[test]
    fn serde_json_round_trip() {
        let s = SiblingHalfFacet::pack(ek(3), 2, 1);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, s.raw().to_string());
        let back: SiblingHalfFacet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn deserialized_zero_element_is_naked() {
        // element field 0, parent 1, child 1
        let s: SiblingHalfFacet = serde_json::from_str("65537").unwrap();
        assert!(s.is_naked());
        assert_eq!(s.unpack(), None);
        assert_eq!(s, SiblingHalfFacet::NAKED);
    }
}
