//! Boundary bridging.
//!
//! A naked half-facet lies on the mesh boundary. These helpers list naked
//! facets, lift them into a standalone lower-dimensional mesh, and chain the
//! naked edges of surface meshes into polylines.

use hashbrown::HashMap;
use itertools::Itertools;

use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use crate::topology::key::{ElementKey, VertexKey};
use crate::topology::mesh::Mesh;
use crate::topology::vertex::Vertex;

/// One naked half-facet and the element it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NakedFacet {
    pub element: ElementKey,
    pub half_facet: usize,
    /// Facet type when extracted; `None` for the end points of bars.
    pub facet_type: Option<ElementType>,
    /// Full (high-order) vertex keys in the element's winding.
    pub vertices: Vec<VertexKey>,
}

/// Naked half-facets of a built mesh, in element-key then half-facet order.
pub fn naked_facets(mesh: &Mesh) -> Result<Vec<NakedFacet>, MeshError> {
    mesh.require_built()?;
    let mut out = Vec::new();
    for (element, half_facet) in mesh.naked_half_facets() {
        let e = mesh.try_element(element)?;
        out.push(NakedFacet {
            element,
            half_facet,
            facet_type: e.element_type().half_facet_type(half_facet)?,
            vertices: e.first_level_half_facet(half_facet)?,
        });
    }
    Ok(out)
}

/// Builds a new mesh with one element per naked facet.
///
/// Element keys run from 1 in naked-facet order; only vertices touched by a
/// boundary element are copied. End points of bars have no element type and
/// are left out. The returned mesh is not built.
pub fn extract_boundary(mesh: &Mesh) -> Result<Mesh, MeshError> {
    let facets = naked_facets(mesh)?;
    let mut boundary = Mesh::new();

    for key in facets
        .iter()
        .filter(|f| f.facet_type.is_some())
        .flat_map(|f| f.vertices.iter().copied())
        .sorted_unstable()
        .dedup()
    {
        let v = mesh.vertex(key).ok_or(MeshError::MissingVertex(key))?;
        let mut copy = Vertex::new(key, v.position);
        copy.parametric = v.parametric;
        copy.texture = v.texture;
        boundary.add_vertex(copy)?;
    }

    let mut next = 1u32;
    for f in &facets {
        let Some(t) = f.facet_type else {
            continue;
        };
        boundary.add_element(ElementKey::new(next)?, t, f.vertices.clone())?;
        next += 1;
    }
    log::debug!(
        "extracted boundary: {} elements, {} vertices",
        boundary.element_count(),
        boundary.vertex_count()
    );
    Ok(boundary)
}

/// Chains the naked edges of 2-D elements into polylines of corner keys.
///
/// A closed loop repeats its first vertex at the end. Edges are followed in
/// element-key order; where more than two naked edges meet, the lowest
/// unvisited one continues the chain. Visited flags are cleared before and
/// after.
pub fn naked_boundary_loops(mesh: &mut Mesh) -> Result<Vec<Vec<VertexKey>>, MeshError> {
    mesh.require_built()?;
    mesh.clear_all_visited();

    let mut edges: Vec<(ElementKey, usize, [VertexKey; 2])> = Vec::new();
    for (element, half_facet) in mesh.naked_half_facets() {
        let e = mesh.try_element(element)?;
        if e.dimension() != 2 {
            continue;
        }
        let corners = e.principal_half_facet(half_facet)?;
        edges.push((element, half_facet, [corners[0], corners[1]]));
    }
    let mut at: HashMap<VertexKey, Vec<usize>> = HashMap::new();
    for (i, (_, _, [a, b])) in edges.iter().enumerate() {
        at.entry(*a).or_default().push(i);
        at.entry(*b).or_default().push(i);
    }

    let mut loops = Vec::new();
    for start in 0..edges.len() {
        let (e0, f0, [a, b]) = edges[start];
        if mesh.is_half_facet_visited(e0, f0)? {
            continue;
        }
        mesh.visit_half_facet(e0, f0)?;
        let mut chain = vec![a, b];
        extend_chain(mesh, &edges, &at, &mut chain)?;
        if chain.first() != chain.last() {
            chain.reverse();
            extend_chain(mesh, &edges, &at, &mut chain)?;
        }
        loops.push(chain);
    }
    mesh.clear_all_visited();
    Ok(loops)
}

fn extend_chain(
    mesh: &mut Mesh,
    edges: &[(ElementKey, usize, [VertexKey; 2])],
    at: &HashMap<VertexKey, Vec<usize>>,
    chain: &mut Vec<VertexKey>,
) -> Result<(), MeshError> {
    loop {
        let Some(&tail) = chain.last() else {
            return Ok(());
        };
        if chain.len() > 2 && chain.first() == Some(&tail) {
            return Ok(());
        }
        let mut next = None;
        for &i in at.get(&tail).map(Vec::as_slice).unwrap_or_default() {
            let (e, f, _) = edges[i];
            if !mesh.is_half_facet_visited(e, f)? {
                next = Some(i);
                break;
            }
        }
        let Some(i) = next else {
            return Ok(());
        };
        let (e, f, [a, b]) = edges[i];
        mesh.visit_half_facet(e, f)?;
        chain.push(if a == tail { b } else { a });
    }
}
