//! Mesh I/O helpers.
//!
//! Readers produce an assembled (unbuilt) [`Mesh`]; writers serialize the
//! vertices and element connectivity of one. Adjacency is never persisted,
//! call [`Mesh::build_topology`] after reading.

pub mod gmsh;

use std::io::{Read, Write};

use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;

/// Trait for mesh readers.
pub trait MeshReader {
    /// Parse a mesh from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshError>;
}

/// Trait for mesh writers.
pub trait MeshWriter {
    /// Write vertices and elements of `mesh`.
    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), MeshError>;
}
