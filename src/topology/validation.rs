//! Topology validation helpers.
//!
//! [`validate_mesh_topology`] re-derives what the builder promises and
//! reports the first broken invariant:
//!
//! * every sibling reference resolves to an existing element and half-facet;
//! * siblings have the same vertex set and the same dimension;
//! * the mate slot of a sibling points back at the referring half-facet;
//! * a naked half-facet holds exactly one (naked) slot;
//! * `V2HF[d]` of every vertex used by a `d`-dimensional element is set and
//!   resolves to an element of dimension `d` containing the vertex.

use std::collections::BTreeSet;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshError;
use crate::topology::element::Element;
use crate::topology::key::ElementKey;
use crate::topology::mesh::Mesh;
use crate::topology::sibling::SiblingHalfFacet;
use crate::topology::vertex::V2HF_SLOTS;

/// Behavior for facets shared by more than two elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonManifoldHandling {
    /// Link every member of the fan to every other member.
    #[default]
    Ignore,
    /// Link the fan and log a warning.
    Warn,
    /// Abort the build.
    Error,
}

fn violation(msg: String) -> MeshError {
    MeshError::InvariantViolation(msg)
}

fn sorted_facet(e: &Element, half_facet: usize) -> Result<Vec<u64>, MeshError> {
    let mut keys: Vec<u64> = e
        .first_level_half_facet(half_facet)?
        .into_iter()
        .map(|k| k.get())
        .collect();
    keys.sort_unstable();
    Ok(keys)
}

/// Checks sibling and back-reference consistency of a built mesh.
pub fn validate_mesh_topology(mesh: &Mesh) -> Result<(), MeshError> {
    mesh.require_built()?;

    for e in mesh.elements() {
        for f in 1..=e.half_facets_count() {
            let slots = e.sibling_half_facets(f)?;
            if slots.iter().any(|s| s.is_naked()) && slots.len() != 1 {
                return Err(violation(format!(
                    "element {} half-facet {f}: naked slot among {} siblings",
                    e.key(),
                    slots.len()
                )));
            }
            let own = sorted_facet(e, f)?;
            for (c, slot) in slots.iter().enumerate() {
                let Some((other, g, mate)) = slot.unpack() else {
                    continue;
                };
                validate_sibling(
                    mesh,
                    e,
                    f,
                    c + 1,
                    &own,
                    other,
                    usize::from(g),
                    usize::from(mate),
                )?;
            }
        }
    }

    for v in mesh.vertices().iter() {
        let used: BTreeSet<usize> = mesh
            .elements()
            .filter(|e| e.vertices().contains(&v.key()))
            .map(Element::dimension)
            .collect();
        for d in 0..V2HF_SLOTS {
            match v.incident_half_facet(d) {
                None if used.contains(&d) => {
                    return Err(violation(format!(
                        "vertex {} has no back-reference for dimension {d}",
                        v.key()
                    )));
                }
                None => {}
                Some((element, half_facet)) => {
                    let e = mesh.try_element(element)?;
                    if e.dimension() != d || !e.vertices().contains(&v.key()) {
                        return Err(violation(format!(
                            "vertex {} back-reference {d} points at element {element} \
                             which does not contain it",
                            v.key()
                        )));
                    }
                    if half_facet > 0 && !e.first_level_half_facet(half_facet)?.contains(&v.key()) {
                        return Err(violation(format!(
                            "vertex {} back-reference {d} names half-facet {half_facet} \
                             of element {element} which does not contain it",
                            v.key()
                        )));
                    }
                }
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn validate_sibling(
    mesh: &Mesh,
    e: &Element,
    f: usize,
    child: usize,
    own: &[u64],
    other: ElementKey,
    g: usize,
    mate: usize,
) -> Result<(), MeshError> {
    if other == e.key() {
        return Err(violation(format!(
            "element {} half-facet {f} is its own sibling",
            e.key()
        )));
    }
    let sib = mesh.element(other).ok_or_else(|| {
        violation(format!(
            "element {} half-facet {f} references missing element {other}",
            e.key()
        ))
    })?;
    if sib.dimension() != e.dimension() || sorted_facet(sib, g)? != own {
        return Err(violation(format!(
            "element {} half-facet {f} and element {other} half-facet {g} differ",
            e.key()
        )));
    }
    let back = sib.sibling_half_facet(g, mate)?;
    let expected = SiblingHalfFacet::pack(e.key(), f as u16, child as u16);
    if back != expected {
        return Err(violation(format!(
            "element {other} half-facet {g} slot {mate} does not point back \
             at element {} half-facet {f}",
            e.key()
        )));
    }
    Ok(())
}

/// Half-facets shared by more than two elements: `(element, half-facet, incident count)`.
pub fn non_manifold_half_facets(mesh: &Mesh) -> Vec<(ElementKey, usize, usize)> {
    mesh.elements()
        .flat_map(|e| {
            (1..=e.half_facets_count()).filter_map(move |f| {
                let n = e.sibling_slots_count(f).ok()?;
                (n > 1).then_some((e.key(), f, n + 1))
            })
        })
        .collect()
}

impl DebugInvariants for Mesh {
    fn debug_assert_invariants(&self) {
        if self.is_built() {
            crate::debug_invariants!(validate_mesh_topology(self), "mesh topology");
        }
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        validate_mesh_topology(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::vertex::Vertex;

    fn tetra_pair() -> Mesh {
        let mut mesh = Mesh::new();
        for k in 1..=5u64 {
            mesh.add_vertex(Vertex::from_raw(k, [k as f64, 0.0, 0.0]).unwrap())
                .unwrap();
        }
        mesh.add_element_code(1, 4, &[1, 2, 3, 4]).unwrap();
        mesh.add_element_code(2, 4, &[1, 3, 2, 5]).unwrap();
        mesh
    }

    #[test]
    fn unbuilt_mesh_is_reported() {
        let mesh = tetra_pair();
        assert_eq!(validate_mesh_topology(&mesh), Err(MeshError::TopologyNotBuilt));
    }

    #[test]
    fn built_mesh_validates() {
        let mut mesh = tetra_pair();
        mesh.build_topology().unwrap();
        validate_mesh_topology(&mesh).unwrap();
        mesh.validate_invariants().unwrap();
        mesh.debug_assert_invariants();
        assert!(non_manifold_half_facets(&mesh).is_empty());
    }

    #[test]
    fn tampered_sibling_is_detected() {
        let mut mesh = tetra_pair();
        mesh.build_topology().unwrap();
        let (_, elements) = mesh.parts_mut();
        let e = elements.get_mut(&ElementKey::new(1).unwrap()).unwrap();
        e.set_sibling_half_facet(1, 1, SiblingHalfFacet::pack(ElementKey::new(2).unwrap(), 2, 1))
            .unwrap();
        assert!(matches!(
            validate_mesh_topology(&mesh),
            Err(MeshError::InvariantViolation(_))
        ));
    }
}
