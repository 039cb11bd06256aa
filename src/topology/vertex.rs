//! Vertex records and the vertex registry.
//!
//! A vertex carries its position, optional parametric and texture
//! coordinates, and one back-reference per topological dimension (`V2HF`)
//! that lets a query re-enter the adjacency graph from a vertex.

use std::collections::BTreeMap;

use crate::mesh_error::MeshError;
use crate::topology::key::{ElementKey, VertexKey};
use crate::topology::sibling::SiblingHalfFacet;

/// Number of `V2HF` slots: one per topological dimension 0..=3.
pub const V2HF_SLOTS: usize = 4;

/// A mesh vertex.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    key: VertexKey,
    pub position: [f64; 3],
    /// Parametric `(u, v, w)` coordinates on the generating geometry, if any.
    pub parametric: Option<[f64; 3]>,
    pub texture: Option<[f64; 2]>,
    v2hf: [SiblingHalfFacet; V2HF_SLOTS],
}

impl Vertex {
    pub fn new(key: VertexKey, position: [f64; 3]) -> Self {
        Self {
            key,
            position,
            parametric: None,
            texture: None,
            v2hf: [SiblingHalfFacet::NAKED; V2HF_SLOTS],
        }
    }

    /// Convenience constructor from a raw key.
    pub fn from_raw(key: u64, position: [f64; 3]) -> Result<Self, MeshError> {
        Ok(Self::new(VertexKey::new(key)?, position))
    }

    pub fn with_parametric(mut self, uvw: [f64; 3]) -> Self {
        self.parametric = Some(uvw);
        self
    }

    pub fn with_texture(mut self, uv: [f64; 2]) -> Self {
        self.texture = Some(uv);
        self
    }

    #[inline]
    pub fn key(&self) -> VertexKey {
        self.key
    }

    /// Packed back-reference for dimension `dim`, naked when no incident
    /// element of that dimension was seen by the last build.
    pub fn v2hf(&self, dim: usize) -> Result<SiblingHalfFacet, MeshError> {
        self.v2hf
            .get(dim)
            .copied()
            .ok_or(MeshError::IndexOutOfRange {
                what: "dimension",
                index: dim,
                len: V2HF_SLOTS - 1,
            })
    }

    /// Unpacked back-reference: `(element, half-facet)` for dimension `dim`.
    pub fn incident_half_facet(&self, dim: usize) -> Option<(ElementKey, usize)> {
        let (element, half_facet, _) = self.v2hf.get(dim)?.unpack()?;
        Some((element, usize::from(half_facet)))
    }

    pub(crate) fn set_v2hf(&mut self, dim: usize, value: SiblingHalfFacet) {
        if let Some(slot) = self.v2hf.get_mut(dim) {
            *slot = value;
        }
    }

    pub(crate) fn clear_v2hf(&mut self) {
        self.v2hf = [SiblingHalfFacet::NAKED; V2HF_SLOTS];
    }
}

/// Key-ordered store of vertices. Duplicate keys are rejected on insertion.
#[derive(Clone, Debug, Default)]
pub struct VertexRegistry {
    vertices: BTreeMap<VertexKey, Vertex>,
}

impl VertexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex.
    ///
    /// # Errors
    /// [`MeshError::DuplicateVertexKey`] if the key is already present.
    pub fn insert(&mut self, vertex: Vertex) -> Result<(), MeshError> {
        let key = vertex.key();
        if self.vertices.contains_key(&key) {
            return Err(MeshError::DuplicateVertexKey(key));
        }
        self.vertices.insert(key, vertex);
        Ok(())
    }

    pub fn get(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.vertices.get_mut(&key)
    }

    pub fn contains(&self, key: VertexKey) -> bool {
        self.vertices.contains_key(&key)
    }

    pub(crate) fn remove(&mut self, key: VertexKey) -> Option<Vertex> {
        self.vertices.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys().copied()
    }

    pub(crate) fn clear_back_references(&mut self) {
        for v in self.vertices.values_mut() {
            v.clear_v2hf();
        }
    }
}
