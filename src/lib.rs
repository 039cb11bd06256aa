#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-ahf
//!
//! mesh-ahf builds and queries the array-based half-facet (AHF) topology of
//! unstructured finite-element meshes. Given vertices and element
//! connectivity in gmsh node order, it records for every element facet which
//! other elements share it (its *siblings*), including non-manifold fans,
//! and for every vertex one incident element per dimension.
//!
//! ## Features
//! - Linear and high-order bars, triangles, quadrangles, tetrahedra,
//!   hexahedra, prisms and pyramids, identified by their gmsh codes
//! - Packed 64-bit sibling references with mate slots for fan navigation
//! - Deterministic batch builder, optionally parallel (`rayon` feature)
//! - Traversal, boundary extraction, orientation repair and CSR dual graphs
//! - ASCII gmsh v2.2 reader and writer
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-ahf = "0.3"
//! # Optional features:
//! # features = ["rayon", "strict-invariants"]
//! ```
//!
//! ```
//! use mesh_ahf::prelude::*;
//!
//! let mut mesh = Mesh::new();
//! for (k, p) in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
//!     .into_iter()
//!     .enumerate()
//! {
//!     mesh.add_vertex(Vertex::from_raw(k as u64 + 1, p)?)?;
//! }
//! mesh.add_element_code(1, 2, &[1, 2, 3])?;
//! mesh.add_element_code(2, 2, &[1, 3, 4])?;
//! mesh.build_topology()?;
//!
//! let t1 = ElementKey::new(1)?;
//! assert_eq!(mesh.siblings(t1, 3)?, vec![(ElementKey::new(2)?, 1)]);
//! # Ok::<(), MeshError>(())
//! ```
//!
//! ## Determinism
//!
//! Elements are stored in key order and facet groups keep their members in
//! element-key then half-facet order, so building the same input twice yields
//! identical sibling tables, with or without `rayon`.

pub mod algs;
pub mod debug_invariants;
pub mod io;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::build::{BuildOptions, BuildReport};
    pub use crate::algs::traversal::{ElementTraversal, connected_components};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::gmsh::{GmshReadOptions, GmshReader, GmshWriter};
    pub use crate::io::{MeshReader, MeshWriter};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::validation::NonManifoldHandling;
    pub use crate::topology::{
        Element, ElementInput, ElementKey, ElementType, Mesh, SiblingHalfFacet, Vertex,
        VertexKey,
    };
}
