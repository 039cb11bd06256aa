//! Top-level module for mesh topology abstractions.
//!
//! This module provides the array-based half-facet data model:
//! - Vertex and element keys, and the vertex registry
//! - The element type taxonomy and its shape catalog
//! - The packed sibling codec
//! - Element records and the `Mesh` aggregate
//! - Validation of built adjacency
//!
//! Most users assemble a [`Mesh`], call [`Mesh::build_topology`], and query
//! elements through it.

pub mod element;
pub mod element_type;
pub mod key;
pub mod mesh;
pub mod shape;
pub mod sibling;
pub mod validation;
pub mod vertex;

pub use element::Element;
pub use element_type::ElementType;
pub use key::{ElementKey, VertexKey};
pub use mesh::{ElementInput, Mesh};
pub use sibling::SiblingHalfFacet;
pub use vertex::{Vertex, VertexRegistry};
