//! Orientation checks and repair.
//!
//! Two elements sharing a manifold half-facet are consistently oriented when
//! they traverse the facet in opposite directions: the corner list of one is
//! a cyclic rotation of the reversed corner list of the other. For bars the
//! shared facet is a single end point, and consistency means one bar ends
//! where the other starts.
//!
//! [`orient_consistently`] walks each connected component breadth-first and
//! assigns every element a flip parity relative to the component seed. An
//! edge whose parity cannot be satisfied is a conflict; non-orientable
//! surfaces such as a Möbius strip always have at least one.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::mesh_error::MeshError;
use crate::topology::element::Element;
use crate::topology::key::ElementKey;
use crate::topology::mesh::Mesh;

/// Outcome of [`orient_consistently`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrientationReport {
    /// Elements whose orientation was reversed, ascending.
    pub flipped: Vec<ElementKey>,
    /// Manifold facets whose neighbours still disagree.
    pub conflicts: usize,
}

/// Whether `a` and `b` traverse their shared half-facets `fa`/`fb` in opposite
/// directions.
pub fn shares_opposite_orientation(
    a: &Element,
    fa: usize,
    b: &Element,
    fb: usize,
) -> Result<bool, MeshError> {
    let pa = a.principal_half_facet(fa)?;
    let pb = b.principal_half_facet(fb)?;
    if pa.len() != pb.len() {
        return Ok(false);
    }
    if pa.len() == 1 {
        return Ok(pa == pb && fa != fb);
    }
    let reversed: Vec<_> = pb.iter().rev().copied().collect();
    let n = pa.len();
    // an edge reversed is also a rotation of itself
    if n == 2 {
        return Ok(pa == reversed);
    }
    Ok((0..n).any(|shift| (0..n).all(|i| pa[i] == reversed[(i + shift) % n])))
}

/// The unique sibling of a manifold half-facet.
fn manifold_sibling(e: &Element, f: usize) -> Result<Option<(ElementKey, usize)>, MeshError> {
    match e.sibling_half_facets(f)? {
        [single] => Ok(single
            .unpack()
            .map(|(q, g, _)| (q, usize::from(g)))),
        _ => Ok(None),
    }
}

/// Manifold facets whose two elements agree in direction, listed once as
/// `(lower key, its facet, higher key, its facet)`.
pub fn inconsistent_pairs(
    mesh: &Mesh,
) -> Result<Vec<(ElementKey, usize, ElementKey, usize)>, MeshError> {
    mesh.require_built()?;
    let mut out = Vec::new();
    for e in mesh.elements() {
        for f in 1..=e.half_facets_count() {
            let Some((q, g)) = manifold_sibling(e, f)? else {
                continue;
            };
            if q <= e.key() {
                continue;
            }
            if !shares_opposite_orientation(e, f, mesh.try_element(q)?, g)? {
                out.push((e.key(), f, q, g));
            }
        }
    }
    Ok(out)
}

/// Flips elements so each connected component agrees with its lowest-keyed
/// element, then rebuilds the adjacency with default options.
///
/// Non-manifold facets neither propagate orientation nor count as conflicts.
pub fn orient_consistently(mesh: &mut Mesh) -> Result<OrientationReport, MeshError> {
    mesh.require_built()?;

    let mut parity: HashMap<ElementKey, bool> = HashMap::with_capacity(mesh.element_count());
    let mut conflicts = 0;
    let keys: Vec<ElementKey> = mesh.element_keys().collect();
    for seed in keys {
        if parity.contains_key(&seed) {
            continue;
        }
        parity.insert(seed, false);
        let mut queue = VecDeque::from([seed]);
        while let Some(p) = queue.pop_front() {
            let e = mesh.try_element(p)?;
            let flip_p = parity.get(&p).copied().unwrap_or(false);
            for f in 1..=e.half_facets_count() {
                let Some((q, g)) = manifold_sibling(e, f)? else {
                    continue;
                };
                let agrees = shares_opposite_orientation(e, f, mesh.try_element(q)?, g)?;
                match parity.get(&q) {
                    None => {
                        parity.insert(q, flip_p ^ !agrees);
                        queue.push_back(q);
                    }
                    Some(&flip_q) => {
                        if agrees == (flip_p ^ flip_q) && p < q {
                            conflicts += 1;
                        }
                    }
                }
            }
        }
    }

    let mut flipped: Vec<ElementKey> = parity
        .into_iter()
        .filter_map(|(k, flip)| flip.then_some(k))
        .collect();
    flipped.sort_unstable();
    if !flipped.is_empty() {
        for &k in &flipped {
            mesh.flip_element(k)?;
        }
        mesh.build_topology()?;
    }
    if conflicts > 0 {
        log::warn!("orientation: {conflicts} facet(s) could not be made consistent");
    }
    Ok(OrientationReport { flipped, conflicts })
}
