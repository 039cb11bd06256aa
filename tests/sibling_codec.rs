use mesh_ahf::topology::{ElementKey, SiblingHalfFacet};
use proptest::prelude::*;

proptest! {
    #[test]
    fn pack_unpack_round_trips(
        element in 1u32..=u32::MAX,
        parent in any::<u16>(),
        child in any::<u16>(),
    ) {
        let key = ElementKey::new(element).unwrap();
        let packed = SiblingHalfFacet::pack(key, parent, child);
        prop_assert!(!packed.is_naked());
        prop_assert_ne!(packed.raw(), 0);
        prop_assert_eq!(packed.unpack(), Some((key, parent, child)));
        prop_assert_eq!(SiblingHalfFacet::from_raw(packed.raw()), packed);
        prop_assert_eq!(packed.raw() >> 32, u64::from(element));
    }

    #[test]
    fn zero_element_field_decodes_naked(low in any::<u32>()) {
        let s = SiblingHalfFacet::from_raw(u64::from(low));
        prop_assert!(s.is_naked());
        prop_assert_eq!(s.unpack(), None);
    }
}

#[test]
fn naked_is_zero() {
    assert_eq!(SiblingHalfFacet::NAKED.raw(), 0);
    assert_eq!(SiblingHalfFacet::default(), SiblingHalfFacet::NAKED);
    assert_eq!(SiblingHalfFacet::NAKED.element(), None);
}
