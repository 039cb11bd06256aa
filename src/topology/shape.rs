//! Element shape catalog.
//!
//! Static lookup tables mapping a 1-based local half-facet index to the
//! ordered local node indices that compose it. Each high-order facet lists its
//! corners first, in the same winding as the linear facet, followed by its
//! edge nodes, so the principal-only view is always a prefix of the full view.
//!
//! Facet winding follows the gmsh reference elements: 3-D faces are listed
//! with outward normals, 2-D edges follow the element boundary. Two
//! consistently oriented neighbours therefore see a shared facet with the
//! same vertex set in reversed order.

use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;

type Table = &'static [&'static [usize]];

const BAR: Table = &[&[0], &[1]];

const TRIANGLE: Table = &[&[0, 1], &[1, 2], &[2, 0]];
const TRIANGLE6: Table = &[&[0, 1, 3], &[1, 2, 4], &[2, 0, 5]];
const TRIANGLE9: Table = &[&[0, 1, 3, 4], &[1, 2, 5, 6], &[2, 0, 7, 8]];
const TRIANGLE12: Table = &[&[0, 1, 3, 4, 5], &[1, 2, 6, 7, 8], &[2, 0, 9, 10, 11]];
const TRIANGLE15: Table = &[
    &[0, 1, 3, 4, 5, 6],
    &[1, 2, 7, 8, 9, 10],
    &[2, 0, 11, 12, 13, 14],
];

const QUADRANGLE: Table = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const QUADRANGLE8: Table = &[&[0, 1, 4], &[1, 2, 5], &[2, 3, 6], &[3, 0, 7]];

const TETRAHEDRON: Table = &[&[0, 2, 1], &[0, 1, 3], &[0, 3, 2], &[3, 1, 2]];
const TETRAHEDRON10: Table = &[
    &[0, 2, 1, 6, 5, 4],
    &[0, 1, 3, 4, 9, 7],
    &[0, 3, 2, 7, 8, 6],
    &[3, 1, 2, 9, 5, 8],
];

const HEXAHEDRON: Table = &[
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[0, 4, 7, 3],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[4, 5, 6, 7],
];
const HEXAHEDRON20: Table = &[
    &[0, 3, 2, 1, 9, 13, 11, 8],
    &[0, 1, 5, 4, 8, 12, 16, 10],
    &[0, 4, 7, 3, 10, 17, 15, 9],
    &[1, 2, 6, 5, 11, 14, 18, 12],
    &[2, 3, 7, 6, 13, 15, 19, 14],
    &[4, 5, 6, 7, 16, 18, 19, 17],
];

const PRISM: Table = &[
    &[0, 2, 1],
    &[3, 4, 5],
    &[0, 1, 4, 3],
    &[0, 3, 5, 2],
    &[1, 2, 5, 4],
];
const PRISM15: Table = &[
    &[0, 2, 1, 7, 9, 6],
    &[3, 4, 5, 12, 14, 13],
    &[0, 1, 4, 3, 6, 10, 12, 8],
    &[0, 3, 5, 2, 8, 13, 11, 7],
    &[1, 2, 5, 4, 9, 11, 14, 10],
];

// Quadrilateral base first, then the four triangular sides.
const PYRAMID: Table = &[&[0, 3, 2, 1], &[0, 1, 4], &[1, 2, 4], &[2, 3, 4], &[3, 0, 4]];
const PYRAMID13: Table = &[
    &[0, 3, 2, 1, 6, 10, 8, 5],
    &[0, 1, 4, 5, 9, 7],
    &[1, 2, 4, 8, 11, 9],
    &[2, 3, 4, 10, 12, 11],
    &[3, 0, 4, 6, 7, 12],
];

/// Full-node table of an element type.
pub fn half_facet_table(element_type: ElementType) -> Table {
    use ElementType::*;
    match element_type {
        Bar | Bar3 | Bar4 | Bar5 | Bar6 => BAR,
        Triangle => TRIANGLE,
        Triangle6 => TRIANGLE6,
        Triangle9 => TRIANGLE9,
        Triangle12 => TRIANGLE12,
        Triangle15 => TRIANGLE15,
        Quadrangle => QUADRANGLE,
        Quadrangle8 => QUADRANGLE8,
        Tetrahedron => TETRAHEDRON,
        Tetrahedron10 => TETRAHEDRON10,
        Hexahedron => HEXAHEDRON,
        Hexahedron20 => HEXAHEDRON20,
        Prism => PRISM,
        Prism15 => PRISM15,
        Pyramid => PYRAMID,
        Pyramid13 => PYRAMID13,
    }
}

/// Local node indices of half-facet `index` (1-based), including high-order nodes.
///
/// # Errors
/// [`MeshError::IndexOutOfRange`] if `index` is 0 or exceeds the type's
/// half-facet count.
pub fn half_facet(element_type: ElementType, index: usize) -> Result<&'static [usize], MeshError> {
    lookup(half_facet_table(element_type), index)
}

/// Local node indices of half-facet `index` (1-based), corners only.
///
/// Geometric consumers that draw or export linear geometry from high-order
/// elements use this view.
pub fn principal_half_facet(
    element_type: ElementType,
    index: usize,
) -> Result<&'static [usize], MeshError> {
    lookup(half_facet_table(element_type.linear()), index)
}

fn lookup(table: Table, index: usize) -> Result<&'static [usize], MeshError> {
    index
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .copied()
        .ok_or(MeshError::IndexOutOfRange {
            what: "half-facet",
            index,
            len: table.len(),
        })
}

/// Node permutation that reverses an element's orientation while keeping the
/// corners-first layout. `flipped[i] = original[perm[i]]`; every permutation is
/// its own inverse.
///
/// Bars and polygons reverse their corner order. Solids mirror across a plane
/// through node 0 (tetrahedra, prisms and pyramids swap corners, hexahedra
/// reverse both quadrilateral caps); edge nodes follow their edges.
pub fn flip_permutation(element_type: ElementType) -> &'static [usize] {
    use ElementType::*;
    match element_type {
        Bar => &[1, 0],
        Bar3 => &[1, 0, 2],
        Bar4 => &[1, 0, 3, 2],
        Bar5 => &[1, 0, 4, 3, 2],
        Bar6 => &[1, 0, 5, 4, 3, 2],
        Triangle => &[2, 1, 0],
        Triangle6 => &[2, 1, 0, 4, 3, 5],
        Triangle9 => &[2, 1, 0, 6, 5, 4, 3, 8, 7],
        Triangle12 => &[2, 1, 0, 8, 7, 6, 5, 4, 3, 11, 10, 9],
        Triangle15 => &[2, 1, 0, 10, 9, 8, 7, 6, 5, 4, 3, 14, 13, 12, 11],
        Quadrangle => &[3, 2, 1, 0],
        Quadrangle8 => &[3, 2, 1, 0, 6, 5, 4, 7],
        Tetrahedron => &[0, 2, 1, 3],
        Tetrahedron10 => &[0, 2, 1, 3, 6, 5, 4, 7, 9, 8],
        Hexahedron => &[0, 3, 2, 1, 4, 7, 6, 5],
        Hexahedron20 => &[
            0, 3, 2, 1, 4, 7, 6, 5, 9, 8, 10, 13, 15, 11, 14, 12, 17, 16, 19, 18,
        ],
        Prism => &[0, 2, 1, 3, 5, 4],
        Prism15 => &[0, 2, 1, 3, 5, 4, 7, 6, 8, 9, 11, 10, 13, 12, 14],
        Pyramid => &[0, 3, 2, 1, 4],
        Pyramid13 => &[0, 3, 2, 1, 4, 6, 5, 7, 10, 12, 8, 11, 9],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sorted(v: &[usize]) -> Vec<usize> {
        let mut v = v.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn tables_match_counts() {
        for t in ElementType::ALL {
            let table = half_facet_table(t);
            assert_eq!(table.len(), t.half_facets_count(), "{t:?}");
            for facet in table {
                assert!(facet.iter().all(|&i| i < t.vertex_count()), "{t:?}");
            }
            assert_eq!(flip_permutation(t).len(), t.vertex_count(), "{t:?}");
        }
    }

    #[test]
    fn index_zero_and_overflow_fail() {
        assert!(half_facet(ElementType::Tetrahedron, 0).is_err());
        assert!(half_facet(ElementType::Tetrahedron, 5).is_err());
        assert!(principal_half_facet(ElementType::Hexahedron20, 7).is_err());
        assert_eq!(half_facet(ElementType::Tetrahedron, 4).unwrap(), &[3, 1, 2]);
    }

    #[test]
    fn principal_view_is_prefix_of_full_view() {
        for t in ElementType::ALL {
            for i in 1..=t.half_facets_count() {
                let full = half_facet(t, i).unwrap();
                let principal = principal_half_facet(t, i).unwrap();
                assert_eq!(&full[..principal.len()], principal, "{t:?} facet {i}");
                assert!(principal.iter().all(|&n| n < t.principal_count()));
                assert!(full[principal.len()..].iter().all(|&n| n >= t.principal_count()));
            }
        }
    }

    #[test]
    fn pyramid_facet_cardinalities() {
        let counts: Vec<usize> = (1..=5)
            .map(|i| principal_half_facet(ElementType::Pyramid13, i).unwrap().len())
            .collect();
        assert_eq!(counts, vec![4, 3, 3, 3, 3]);
    }

    #[test]
    fn every_high_order_node_belongs_to_a_facet() {
        for t in ElementType::ALL.into_iter().filter(|t| t.dimension() > 1) {
            let covered: BTreeSet<usize> = half_facet_table(t)
                .iter()
                .flat_map(|f| f.iter().copied())
                .collect();
            assert_eq!(covered.len(), t.vertex_count(), "{t:?}");
        }
    }

    #[test]
    fn flip_is_an_involution() {
        for t in ElementType::ALL {
            let p = flip_permutation(t);
            for i in 0..p.len() {
                assert_eq!(p[p[i]], i, "{t:?} node {i}");
            }
            assert!(p[..t.principal_count()].iter().all(|&n| n < t.principal_count()));
        }
    }

    #[test]
    fn flip_preserves_facet_vertex_sets() {
        for t in ElementType::ALL {
            let p = flip_permutation(t);
            let original: BTreeSet<Vec<usize>> =
                half_facet_table(t).iter().map(|f| sorted(f)).collect();
            let flipped: BTreeSet<Vec<usize>> = half_facet_table(t)
                .iter()
                .map(|f| sorted(&f.iter().map(|&i| p[i]).collect::<Vec<_>>()))
                .collect();
            assert_eq!(original, flipped, "{t:?}");
        }
    }
}
