//! The mesh aggregate: vertex registry plus element container.
//!
//! A `Mesh` has two phases. While it is being assembled, elements and
//! vertices may be added, removed or flipped; every such change drops the
//! adjacency. [`Mesh::build_topology`] then populates sibling slots and vertex
//! back-references, after which the mesh is queried read-only (apart from
//! visited flags, which traversals use as scratch space).

use std::collections::BTreeMap;

use crate::algs::build::{BuildOptions, BuildReport, build_topology};
use crate::mesh_error::MeshError;
use crate::topology::element::Element;
use crate::topology::element_type::ElementType;
use crate::topology::key::{ElementKey, VertexKey};
use crate::topology::vertex::{Vertex, VertexRegistry};

/// Raw element connectivity as delivered by an external producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementInput {
    pub key: u32,
    /// External (gmsh) element type code.
    pub type_code: i32,
    pub vertices: Vec<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: VertexRegistry,
    elements: BTreeMap<ElementKey, Element>,
    built: bool,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a mesh from raw vertex and element lists. Topology is not
    /// built.
    pub fn from_connectivity<V, E>(vertices: V, elements: E) -> Result<Self, MeshError>
    where
        V: IntoIterator<Item = Vertex>,
        E: IntoIterator<Item = ElementInput>,
    {
        let mut mesh = Mesh::new();
        for v in vertices {
            mesh.add_vertex(v)?;
        }
        for e in elements {
            mesh.add_element_code(e.key, e.type_code, &e.vertices)?;
        }
        Ok(mesh)
    }

    // --- assembly ----------------------------------------------------------

    /// Registers a vertex. Rejects duplicate keys.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), MeshError> {
        self.vertices.insert(vertex)
    }

    /// Registers an element. Every vertex key must already be registered.
    pub fn add_element(
        &mut self,
        key: ElementKey,
        element_type: ElementType,
        vertices: Vec<VertexKey>,
    ) -> Result<(), MeshError> {
        if self.elements.contains_key(&key) {
            return Err(MeshError::DuplicateElementKey(key));
        }
        if let Some(&vertex) = vertices.iter().find(|v| !self.vertices.contains(**v)) {
            return Err(MeshError::UnknownVertex {
                element: key,
                vertex,
            });
        }
        let element = Element::new(key, element_type, vertices)?;
        self.invalidate_topology();
        self.elements.insert(key, element);
        Ok(())
    }

    /// Registers an element from raw key, type code and vertex keys.
    pub fn add_element_code(
        &mut self,
        key: u32,
        type_code: i32,
        vertices: &[u64],
    ) -> Result<(), MeshError> {
        let key = ElementKey::new(key)?;
        let element_type = ElementType::from_code(type_code)?;
        let vertices = vertices
            .iter()
            .map(|&v| VertexKey::new(v))
            .collect::<Result<Vec<_>, _>>()?;
        self.add_element(key, element_type, vertices)
    }

    /// Removes an element and drops the adjacency.
    pub fn remove_element(&mut self, key: ElementKey) -> Result<Element, MeshError> {
        let element = self
            .elements
            .remove(&key)
            .ok_or(MeshError::UnknownElement(key))?;
        self.invalidate_topology();
        Ok(element.clean_copy())
    }

    /// Removes a vertex that no element references.
    pub fn remove_vertex(&mut self, key: VertexKey) -> Result<Vertex, MeshError> {
        if let Some(element) = self.elements.values().find(|e| e.vertices().contains(&key)) {
            return Err(MeshError::VertexInUse {
                vertex: key,
                element: element.key(),
            });
        }
        let mut vertex = self.vertices.remove(key).ok_or(MeshError::MissingVertex(key))?;
        vertex.clear_v2hf();
        Ok(vertex)
    }

    /// Reverses the orientation of one element and drops the adjacency.
    pub fn flip_element(&mut self, key: ElementKey) -> Result<(), MeshError> {
        self.elements
            .get_mut(&key)
            .ok_or(MeshError::UnknownElement(key))?
            .flip();
        self.invalidate_topology();
        Ok(())
    }

    /// Drops every vertex and element.
    pub fn clear(&mut self) {
        self.vertices = VertexRegistry::new();
        self.elements.clear();
        self.built = false;
    }

    /// Same vertices and elements without any topological data.
    pub fn clean_copy(&self) -> Mesh {
        let mut vertices = self.vertices.clone();
        vertices.clear_back_references();
        Mesh {
            vertices,
            elements: self
                .elements
                .iter()
                .map(|(&k, e)| (k, e.clean_copy()))
                .collect(),
            built: false,
        }
    }

    /// Mutable access to vertex attributes. Back-references stay builder-owned.
    pub fn vertex_mut(&mut self, key: VertexKey) -> Option<&mut Vertex> {
        self.vertices.get_mut(key)
    }

    // --- build -------------------------------------------------------------

    /// Builds adjacency with default options.
    pub fn build_topology(&mut self) -> Result<BuildReport, MeshError> {
        build_topology(self, &BuildOptions::default())
    }

    pub fn build_topology_with(
        &mut self,
        options: &BuildOptions,
    ) -> Result<BuildReport, MeshError> {
        build_topology(self, options)
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    pub(crate) fn set_built(&mut self, built: bool) {
        self.built = built;
    }

    /// Drops sibling/visited data and vertex back-references.
    pub(crate) fn invalidate_topology(&mut self) {
        for e in self.elements.values_mut() {
            e.clear();
        }
        self.vertices.clear_back_references();
        self.built = false;
    }

    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&mut VertexRegistry, &mut BTreeMap<ElementKey, Element>) {
        (&mut self.vertices, &mut self.elements)
    }

    pub(crate) fn require_built(&self) -> Result<(), MeshError> {
        if self.built {
            Ok(())
        } else {
            Err(MeshError::TopologyNotBuilt)
        }
    }

    // --- read access -------------------------------------------------------

    pub fn vertices(&self) -> &VertexRegistry {
        &self.vertices
    }

    pub fn vertex(&self, key: VertexKey) -> Option<&Vertex> {
        self.vertices.get(key)
    }

    pub fn element(&self, key: ElementKey) -> Option<&Element> {
        self.elements.get(&key)
    }

    /// Element or [`MeshError::UnknownElement`].
    pub fn try_element(&self, key: ElementKey) -> Result<&Element, MeshError> {
        self.elements.get(&key).ok_or(MeshError::UnknownElement(key))
    }

    /// Elements in ascending key order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn element_keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.elements.keys().copied()
    }

    pub fn elements_of_dimension(&self, dim: usize) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |e| e.dimension() == dim)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Highest element dimension present, 0 for an empty mesh.
    pub fn top_dimension(&self) -> usize {
        self.elements.values().map(Element::dimension).max().unwrap_or(0)
    }

    // --- topology queries -------------------------------------------------

    /// First half-facet of `element` containing every key in `keys`; `None`
    /// for an empty `keys`.
    pub fn half_facet_containing_vertices(
        &self,
        element: ElementKey,
        keys: &[VertexKey],
    ) -> Result<Option<usize>, MeshError> {
        Ok(self.try_element(element)?.half_facet_containing_vertices(keys))
    }

    /// Elements directly adjacent to `element` through any half-facet.
    pub fn unique_sibling_elements(
        &self,
        element: ElementKey,
    ) -> Result<Vec<ElementKey>, MeshError> {
        Ok(self.try_element(element)?.unique_sibling_elements())
    }

    /// `(element, half-facet)` pairs sharing half-facet `half_facet` of `element`.
    pub fn siblings(
        &self,
        element: ElementKey,
        half_facet: usize,
    ) -> Result<Vec<(ElementKey, usize)>, MeshError> {
        Ok(self
            .try_element(element)?
            .siblings(half_facet)?
            .into_iter()
            .map(|(e, f, _)| (e, f))
            .collect())
    }

    /// All naked half-facets, in element-key then half-facet order.
    pub fn naked_half_facets(&self) -> Vec<(ElementKey, usize)> {
        self.elements
            .values()
            .flat_map(|e| {
                (1..=e.half_facets_count())
                    .filter(move |&i| e.is_naked_sibling_half_facet(i).unwrap_or(false))
                    .map(move |i| (e.key(), i))
            })
            .collect()
    }

    /// `V2HF` entry of `vertex` for dimension `dim`.
    pub fn incident_half_facet(
        &self,
        vertex: VertexKey,
        dim: usize,
    ) -> Result<Option<(ElementKey, usize)>, MeshError> {
        let v = self
            .vertices
            .get(vertex)
            .ok_or(MeshError::MissingVertex(vertex))?;
        v.v2hf(dim)?;
        Ok(v.incident_half_facet(dim))
    }

    /// Some `dim`-dimensional element using `vertex`, if any.
    pub fn incident_element(
        &self,
        vertex: VertexKey,
        dim: usize,
    ) -> Result<Option<ElementKey>, MeshError> {
        Ok(self.incident_half_facet(vertex, dim)?.map(|(e, _)| e))
    }

    // --- visited flags -----------------------------------------------------

    pub fn is_visited(&self, element: ElementKey) -> Result<bool, MeshError> {
        Ok(self.try_element(element)?.is_visited())
    }

    pub fn is_half_facet_visited(
        &self,
        element: ElementKey,
        half_facet: usize,
    ) -> Result<bool, MeshError> {
        self.try_element(element)?.is_half_facet_visited(half_facet)
    }

    /// Flags every half-facet of `element` visited.
    pub fn visit(&mut self, element: ElementKey) -> Result<(), MeshError> {
        self.element_flags(element)?.visit();
        Ok(())
    }

    pub fn visit_half_facet(
        &mut self,
        element: ElementKey,
        half_facet: usize,
    ) -> Result<(), MeshError> {
        self.element_flags(element)?.visit_half_facet(half_facet)
    }

    pub fn clear_half_facet_visited(
        &mut self,
        element: ElementKey,
        half_facet: usize,
    ) -> Result<(), MeshError> {
        self.element_flags(element)?.clear_half_facet_visited(half_facet)
    }

    pub fn clear_visited(&mut self, element: ElementKey) -> Result<(), MeshError> {
        self.element_flags(element)?.clear_visited();
        Ok(())
    }

    pub fn clear_all_visited(&mut self) {
        for e in self.elements.values_mut() {
            e.clear_visited();
        }
    }

    fn element_flags(&mut self, key: ElementKey) -> Result<&mut Element, MeshError> {
        self.elements
            .get_mut(&key)
            .ok_or(MeshError::UnknownElement(key))
    }
}
