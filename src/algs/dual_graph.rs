//! Build a CSR (compressed-sparse-row) *dual graph* of a built mesh.
//
// Each top-dimensional element is a graph vertex; an undirected edge joins
// two elements that are siblings across at least one half-facet.
//
// Returned in ParMETIS-ready CSR triples:
//
// * `xadj[i] .. xadj[i+1]`   = neighbour list of element *i*
// * `adjncy`                 = concatenated neighbour indices, ascending
// * `vwgt[i]`                = vertex weight, always 1
//
// The graph is symmetric and free of self loops. Non-manifold fans add an
// edge between every pair of fan members.

use hashbrown::HashMap;

use crate::mesh_error::MeshError;
use crate::topology::key::ElementKey;
use crate::topology::mesh::Mesh;

/// CSR triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualGraph {
    pub xadj: Vec<usize>,
    pub adjncy: Vec<usize>,
    pub vwgt: Vec<i32>, // ParMETIS expects i32
}

impl DualGraph {
    pub fn vertex_count(&self) -> usize {
        self.xadj.len().saturating_sub(1)
    }

    /// Neighbour indices of CSR vertex `i`, or `None` past the last vertex.
    pub fn neighbours(&self, i: usize) -> Option<&[usize]> {
        let start = *self.xadj.get(i)?;
        let end = *self.xadj.get(i.checked_add(1)?)?;
        self.adjncy.get(start..end)
    }
}

/// Dual graph over the mesh's top-dimensional elements, in key order.
///
/// Also returns the CSR vertex → element key mapping.
pub fn build_dual(mesh: &Mesh) -> Result<(DualGraph, Vec<ElementKey>), MeshError> {
    let dim = mesh.top_dimension();
    let cells: Vec<ElementKey> = mesh
        .elements_of_dimension(dim)
        .map(|e| e.key())
        .collect();
    build_dual_with_order(mesh, cells)
}

/// Same as [`build_dual`] but CSR vertex ids follow the order of `cells`.
///
/// Siblings outside `cells` are ignored.
pub fn build_dual_with_order(
    mesh: &Mesh,
    cells: impl IntoIterator<Item = ElementKey>,
) -> Result<(DualGraph, Vec<ElementKey>), MeshError> {
    mesh.require_built()?;
    let cells: Vec<ElementKey> = cells.into_iter().collect();
    let idx_of: HashMap<ElementKey, usize> =
        cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();

    let mut xadj = Vec::with_capacity(cells.len() + 1);
    let mut adjncy = Vec::new();
    xadj.push(0);
    for &c in &cells {
        let mut nbrs: Vec<usize> = mesh
            .try_element(c)?
            .unique_sibling_elements()
            .into_iter()
            .filter_map(|q| idx_of.get(&q).copied())
            .collect();
        nbrs.sort_unstable();
        adjncy.extend(nbrs);
        xadj.push(adjncy.len());
    }
    let vwgt = vec![1; cells.len()];
    Ok((DualGraph { xadj, adjncy, vwgt }, cells))
}
