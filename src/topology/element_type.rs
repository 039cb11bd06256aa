//! Element type taxonomy.
//!
//! Discriminants are the gmsh element-type codes, so a mesh exchanged with an
//! external meshing kernel keeps bit-compatible type tags. Node ordering of
//! every type follows the gmsh convention: corner ("principal") nodes first,
//! then edge nodes in edge order, then face nodes.

use crate::mesh_error::MeshError;

/// Supported element shapes, linear and high-order.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(i32)]
pub enum ElementType {
    /// 2-node line.
    Bar = 1,
    /// 3-node triangle.
    Triangle = 2,
    /// 4-node quadrangle.
    Quadrangle = 3,
    /// 4-node tetrahedron.
    Tetrahedron = 4,
    /// 8-node hexahedron.
    Hexahedron = 5,
    /// 6-node prism (wedge).
    Prism = 6,
    /// 5-node pyramid.
    Pyramid = 7,
    /// 3-node second order line.
    Bar3 = 8,
    /// 6-node second order triangle.
    Triangle6 = 9,
    /// 10-node second order tetrahedron.
    Tetrahedron10 = 11,
    /// 8-node second order (serendipity) quadrangle.
    Quadrangle8 = 16,
    /// 20-node second order hexahedron.
    Hexahedron20 = 17,
    /// 15-node second order prism.
    Prism15 = 18,
    /// 13-node second order pyramid.
    Pyramid13 = 19,
    /// 9-node third order incomplete triangle.
    Triangle9 = 20,
    /// 12-node fourth order incomplete triangle.
    Triangle12 = 22,
    /// 15-node fifth order incomplete triangle.
    Triangle15 = 24,
    /// 4-node third order line.
    Bar4 = 26,
    /// 5-node fourth order line.
    Bar5 = 27,
    /// 6-node fifth order line.
    Bar6 = 28,
}

impl ElementType {
    /// Every type in the catalog, ordered by code.
    pub const ALL: [ElementType; 20] = [
        ElementType::Bar,
        ElementType::Triangle,
        ElementType::Quadrangle,
        ElementType::Tetrahedron,
        ElementType::Hexahedron,
        ElementType::Prism,
        ElementType::Pyramid,
        ElementType::Bar3,
        ElementType::Triangle6,
        ElementType::Tetrahedron10,
        ElementType::Quadrangle8,
        ElementType::Hexahedron20,
        ElementType::Prism15,
        ElementType::Pyramid13,
        ElementType::Triangle9,
        ElementType::Triangle12,
        ElementType::Triangle15,
        ElementType::Bar4,
        ElementType::Bar5,
        ElementType::Bar6,
    ];

    /// Looks up a type by its external (gmsh) code.
    pub fn from_code(code: i32) -> Result<Self, MeshError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(MeshError::UnsupportedElementType(code))
    }

    /// External (gmsh) type code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Topological dimension of the element.
    pub const fn dimension(self) -> usize {
        use ElementType::*;
        match self {
            Bar | Bar3 | Bar4 | Bar5 | Bar6 => 1,
            Triangle | Triangle6 | Triangle9 | Triangle12 | Triangle15 | Quadrangle
            | Quadrangle8 => 2,
            Tetrahedron | Tetrahedron10 | Hexahedron | Hexahedron20 | Prism | Prism15
            | Pyramid | Pyramid13 => 3,
        }
    }

    /// Total number of nodes, corners and high-order nodes together.
    pub const fn vertex_count(self) -> usize {
        use ElementType::*;
        match self {
            Bar => 2,
            Bar3 => 3,
            Bar4 => 4,
            Bar5 => 5,
            Bar6 => 6,
            Triangle => 3,
            Triangle6 => 6,
            Triangle9 => 9,
            Triangle12 => 12,
            Triangle15 => 15,
            Quadrangle => 4,
            Quadrangle8 => 8,
            Tetrahedron => 4,
            Tetrahedron10 => 10,
            Hexahedron => 8,
            Hexahedron20 => 20,
            Prism => 6,
            Prism15 => 15,
            Pyramid => 5,
            Pyramid13 => 13,
        }
    }

    /// Number of corner nodes; they occupy indices `0..principal_count()`.
    #[inline]
    pub const fn principal_count(self) -> usize {
        self.linear().vertex_count()
    }

    /// Number of half-facets (edges of a 2-D element, faces of a 3-D one).
    pub const fn half_facets_count(self) -> usize {
        use ElementType::*;
        match self.linear() {
            Bar => 2,
            Triangle => 3,
            Quadrangle | Tetrahedron => 4,
            Prism | Pyramid => 5,
            Hexahedron => 6,
            _ => 0,
        }
    }

    /// Polynomial order of the geometric interpolation.
    pub const fn order(self) -> usize {
        use ElementType::*;
        match self {
            Bar | Triangle | Quadrangle | Tetrahedron | Hexahedron | Prism | Pyramid => 1,
            Bar3 | Triangle6 | Quadrangle8 | Tetrahedron10 | Hexahedron20 | Prism15
            | Pyramid13 => 2,
            Bar4 | Triangle9 => 3,
            Bar5 | Triangle12 => 4,
            Bar6 | Triangle15 => 5,
        }
    }

    #[inline]
    pub const fn is_high_order(self) -> bool {
        self.order() > 1
    }

    /// The first-order type built from the same corner nodes.
    pub const fn linear(self) -> ElementType {
        use ElementType::*;
        match self {
            Bar | Bar3 | Bar4 | Bar5 | Bar6 => Bar,
            Triangle | Triangle6 | Triangle9 | Triangle12 | Triangle15 => Triangle,
            Quadrangle | Quadrangle8 => Quadrangle,
            Tetrahedron | Tetrahedron10 => Tetrahedron,
            Hexahedron | Hexahedron20 => Hexahedron,
            Prism | Prism15 => Prism,
            Pyramid | Pyramid13 => Pyramid,
        }
    }

    /// Element type of half-facet `index` (1-based) once extracted as an
    /// element of its own. Half-facets of bars are single vertices and have no
    /// element type.
    pub fn half_facet_type(self, index: usize) -> Result<Option<ElementType>, MeshError> {
        use ElementType::*;
        let count = self.half_facets_count();
        if index == 0 || index > count {
            return Err(MeshError::IndexOutOfRange {
                what: "half-facet",
                index,
                len: count,
            });
        }
        let corners = crate::topology::shape::principal_half_facet(self, index)?.len();
        let facet = match (self.dimension(), corners, self.order()) {
            (1, _, _) => return Ok(None),
            (2, _, 1) => Bar,
            (2, _, 2) => Bar3,
            (2, _, 3) => Bar4,
            (2, _, 4) => Bar5,
            (2, _, _) => Bar6,
            (_, 3, 1) => Triangle,
            (_, 3, _) => Triangle6,
            (_, _, 1) => Quadrangle,
            (_, _, _) => Quadrangle8,
        };
        Ok(Some(facet))
    }
}

impl TryFrom<i32> for ElementType {
    type Error = MeshError;
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        ElementType::from_code(code)
    }
}
