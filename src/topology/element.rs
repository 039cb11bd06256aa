//! Element records: vertex keys plus per-half-facet sibling slots and
//! visited flags.
//!
//! All half-facet and slot indices are 1-based. Index 0 or an index past the
//! end is reported as [`MeshError::IndexOutOfRange`]; nothing is clamped.
//!
//! Sibling slots are written only by the topology builder. Visited flags are
//! scratch state for traversals run between builds.

use itertools::Itertools;

use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use crate::topology::key::{ElementKey, VertexKey};
use crate::topology::shape;
use crate::topology::sibling::SiblingHalfFacet;

/// One mesh element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    key: ElementKey,
    element_type: ElementType,
    vertices: Vec<VertexKey>,
    siblings: Vec<Vec<SiblingHalfFacet>>,
    visited: Vec<bool>,
}

impl Element {
    /// Creates an element with naked half-facets.
    ///
    /// # Errors
    /// * [`MeshError::VertexCountMismatch`] if `vertices` does not have
    ///   exactly `element_type.vertex_count()` entries.
    /// * [`MeshError::RepeatedVertex`] if a vertex key appears twice.
    pub fn new(
        key: ElementKey,
        element_type: ElementType,
        vertices: Vec<VertexKey>,
    ) -> Result<Self, MeshError> {
        let expected = element_type.vertex_count();
        if vertices.len() != expected {
            return Err(MeshError::VertexCountMismatch {
                element: key,
                expected,
                found: vertices.len(),
            });
        }
        if let Some(&vertex) = vertices.iter().duplicates().next() {
            return Err(MeshError::RepeatedVertex {
                element: key,
                vertex,
            });
        }
        let n = element_type.half_facets_count();
        Ok(Self {
            key,
            element_type,
            vertices,
            siblings: vec![vec![SiblingHalfFacet::NAKED]; n],
            visited: vec![false; n],
        })
    }

    #[inline]
    pub fn key(&self) -> ElementKey {
        self.key
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.element_type.dimension()
    }

    /// Ordered vertex keys (corners first).
    #[inline]
    pub fn vertices(&self) -> &[VertexKey] {
        &self.vertices
    }

    /// Corner vertex keys only.
    #[inline]
    pub fn principal_vertices(&self) -> &[VertexKey] {
        &self.vertices[..self.element_type.principal_count()]
    }

    #[inline]
    pub fn vertices_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn half_facets_count(&self) -> usize {
        self.siblings.len()
    }

    fn slot(&self, index: usize) -> Result<usize, MeshError> {
        if index == 0 || index > self.siblings.len() {
            return Err(MeshError::IndexOutOfRange {
                what: "half-facet",
                index,
                len: self.siblings.len(),
            });
        }
        Ok(index - 1)
    }

    fn keys_of(&self, local: &[usize]) -> Vec<VertexKey> {
        local.iter().map(|&i| self.vertices[i]).collect()
    }

    /// Vertex keys of half-facet `index`, including high-order nodes.
    pub fn first_level_half_facet(&self, index: usize) -> Result<Vec<VertexKey>, MeshError> {
        Ok(self.keys_of(shape::half_facet(self.element_type, index)?))
    }

    /// Vertex keys of half-facet `index`, corners only.
    pub fn principal_half_facet(&self, index: usize) -> Result<Vec<VertexKey>, MeshError> {
        Ok(self.keys_of(shape::principal_half_facet(
            self.element_type,
            index,
        )?))
    }

    /// Number of edges of polygonal half-facet `parent`. Half-facets with fewer
    /// than three corners (edges of 2-D elements, ends of bars) have none.
    pub fn second_level_count(&self, parent: usize) -> Result<usize, MeshError> {
        let corners = shape::principal_half_facet(self.element_type, parent)?.len();
        Ok(if corners >= 3 { corners } else { 0 })
    }

    /// Edge `child` of polygonal half-facet `parent`, pairing consecutive
    /// corners with wraparound.
    pub fn second_level_half_facet(
        &self,
        parent: usize,
        child: usize,
    ) -> Result<[VertexKey; 2], MeshError> {
        let corners = self.principal_half_facet(parent)?;
        let n = self.second_level_count(parent)?;
        if child == 0 || child > n {
            return Err(MeshError::IndexOutOfRange {
                what: "second-level half-facet",
                index: child,
                len: n,
            });
        }
        Ok([corners[child - 1], corners[child % n]])
    }

    /// Number of sibling slots held by half-facet `index` (at least one).
    pub fn sibling_slots_count(&self, index: usize) -> Result<usize, MeshError> {
        Ok(self.siblings[self.slot(index)?].len())
    }

    /// All sibling slots of half-facet `index`.
    pub fn sibling_half_facets(&self, index: usize) -> Result<&[SiblingHalfFacet], MeshError> {
        Ok(&self.siblings[self.slot(index)?])
    }

    /// Sibling slot `child` of half-facet `parent`.
    pub fn sibling_half_facet(
        &self,
        parent: usize,
        child: usize,
    ) -> Result<SiblingHalfFacet, MeshError> {
        let slots = self.sibling_half_facets(parent)?;
        child
            .checked_sub(1)
            .and_then(|c| slots.get(c))
            .copied()
            .ok_or(MeshError::IndexOutOfRange {
                what: "sibling slot",
                index: child,
                len: slots.len(),
            })
    }

    pub(crate) fn set_sibling_half_facet(
        &mut self,
        parent: usize,
        child: usize,
        value: SiblingHalfFacet,
    ) -> Result<(), MeshError> {
        let p = self.slot(parent)?;
        let slots = &mut self.siblings[p];
        let len = slots.len();
        let slot = child
            .checked_sub(1)
            .and_then(|c| slots.get_mut(c))
            .ok_or(MeshError::IndexOutOfRange {
                what: "sibling slot",
                index: child,
                len,
            })?;
        *slot = value;
        Ok(())
    }

    /// Resizes half-facet `parent` to `count` naked slots (minimum one).
    pub(crate) fn reset_sibling_slots(
        &mut self,
        parent: usize,
        count: usize,
    ) -> Result<(), MeshError> {
        let p = self.slot(parent)?;
        self.siblings[p] = vec![SiblingHalfFacet::NAKED; count.max(1)];
        Ok(())
    }

    /// True when half-facet `index` has no sibling.
    pub fn is_naked_sibling_half_facet(&self, index: usize) -> Result<bool, MeshError> {
        Ok(self
            .sibling_half_facets(index)?
            .iter()
            .all(|s| s.is_naked()))
    }

    /// True when at least one half-facet is naked.
    pub fn is_naked(&self) -> bool {
        self.siblings
            .iter()
            .any(|slots| slots.iter().all(|s| s.is_naked()))
    }

    /// Unpacked siblings of half-facet `index`: `(element, half-facet, mate slot)`.
    pub fn siblings(&self, index: usize) -> Result<Vec<(ElementKey, usize, usize)>, MeshError> {
        Ok(self
            .sibling_half_facets(index)?
            .iter()
            .filter_map(|s| s.unpack())
            .map(|(e, p, c)| (e, usize::from(p), usize::from(c)))
            .collect())
    }

    /// Keys of all elements reachable through any sibling slot, ascending and
    /// without repetition.
    pub fn unique_sibling_elements(&self) -> Vec<ElementKey> {
        self.siblings
            .iter()
            .flatten()
            .filter_map(|s| s.element())
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// First half-facet (1-based) whose full vertex set contains every key in
    /// `keys`, or `None`. An empty `keys` matches nothing.
    pub fn half_facet_containing_vertices(&self, keys: &[VertexKey]) -> Option<usize> {
        if keys.is_empty() {
            return None;
        }
        (1..=self.half_facets_count()).find(|&i| {
            shape::half_facet(self.element_type, i)
                .map(|local| {
                    keys.iter()
                        .all(|k| local.iter().any(|&n| self.vertices[n] == *k))
                })
                .unwrap_or(false)
        })
    }

    // --- visited flags ---------------------------------------------------

    pub fn is_half_facet_visited(&self, index: usize) -> Result<bool, MeshError> {
        Ok(self.visited[self.slot(index)?])
    }

    pub fn visit_half_facet(&mut self, index: usize) -> Result<(), MeshError> {
        let i = self.slot(index)?;
        self.visited[i] = true;
        Ok(())
    }

    pub fn clear_half_facet_visited(&mut self, index: usize) -> Result<(), MeshError> {
        let i = self.slot(index)?;
        self.visited[i] = false;
        Ok(())
    }

    /// True when every half-facet is flagged visited.
    pub fn is_visited(&self) -> bool {
        self.visited.iter().all(|&v| v)
    }

    /// Flags every half-facet visited.
    pub fn visit(&mut self) {
        self.visited.fill(true);
    }

    pub fn clear_visited(&mut self) {
        self.visited.fill(false);
    }

    // --- mutators ----------------------------------------------------------

    /// Reverses the element's orientation. Topological data is dropped since
    /// half-facet numbering changes with the node order.
    pub fn flip(&mut self) {
        let perm = shape::flip_permutation(self.element_type);
        self.vertices = perm.iter().map(|&i| self.vertices[i]).collect();
        self.clear();
    }

    /// Drops sibling and visited data; vertices and key are kept.
    pub fn clear(&mut self) {
        for slots in &mut self.siblings {
            slots.clear();
            slots.push(SiblingHalfFacet::NAKED);
        }
        self.visited.fill(false);
    }

    /// Same key, type and vertices, with empty topological data.
    pub fn clean_copy(&self) -> Element {
        let n = self.half_facets_count();
        Element {
            key: self.key,
            element_type: self.element_type,
            vertices: self.vertices.clone(),
            siblings: vec![vec![SiblingHalfFacet::NAKED]; n],
            visited: vec![false; n],
        }
    }
}
