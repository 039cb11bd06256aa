//! Array-based half-facet topology builder.
//!
//! The build is a batch pass over the whole mesh:
//!
//! 1. every half-facet gets a *signature*: the element dimension plus the
//!    sorted vertex keys of its full (high-order) node set, so two elements
//!    sharing a facet hash identically whatever their winding;
//! 2. `(element, half-facet)` pairs are grouped by signature;
//! 3. a group of one is naked;
//! 4. a group of `n >= 2` gives each member `n - 1` sibling slots, one per
//!    other member in group order. Each slot also records the *mate slot*,
//!    the slot of the sibling that points back, so non-manifold fans stay
//!    navigable in both directions;
//! 5. each vertex records one incident `(element, half-facet)` per dimension.
//!
//! Groups keep members in element-key, then half-facet order, so repeated
//! builds of identical input produce identical tables. Any failure leaves the
//! mesh with no adjacency at all.

use std::time::Instant;

use hashbrown::HashMap;

use crate::mesh_error::MeshError;
use crate::topology::element::Element;
use crate::topology::key::{ElementKey, VertexKey};
use crate::topology::mesh::Mesh;
use crate::topology::sibling::SiblingHalfFacet;
use crate::topology::validation::{NonManifoldHandling, validate_mesh_topology};

/// Options for [`build_topology`].
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// How to treat facets shared by more than two elements.
    pub non_manifold: NonManifoldHandling,
    /// Compute signatures in parallel (requires the `rayon` feature; ignored
    /// otherwise).
    pub parallel: bool,
    /// Run the invariant checker on the finished adjacency.
    pub validate: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Ignore,
            parallel: false,
            validate: cfg!(feature = "strict-invariants"),
        }
    }
}

impl BuildOptions {
    /// Reject non-manifold facets and validate the result.
    pub fn strict() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Error,
            parallel: false,
            validate: true,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub elements: usize,
    pub half_facets: usize,
    /// Half-facets without sibling.
    pub naked: usize,
    /// Facets shared by exactly two elements.
    pub manifold_facets: usize,
    /// Facets shared by three or more elements.
    pub non_manifold_facets: usize,
}

/// `(dimension, sorted full vertex keys)` of one half-facet.
type Signature = (usize, Vec<VertexKey>);

struct ElementSignatures {
    key: ElementKey,
    dimension: usize,
    facets: Vec<Vec<VertexKey>>,
}

/// Populates sibling slots and vertex back-references of `mesh`.
///
/// # Errors
/// * [`MeshError::DegenerateFacetGroup`] when two half-facets of one element
///   have the same vertex set.
/// * [`MeshError::NonManifoldFacet`] for fans under
///   [`NonManifoldHandling::Error`].
/// * [`MeshError::TooManySiblings`] when a fan exceeds the 16-bit slot index.
/// * [`MeshError::InvariantViolation`] when `options.validate` is set and the
///   result fails validation.
pub fn build_topology(mesh: &mut Mesh, options: &BuildOptions) -> Result<BuildReport, MeshError> {
    let started = Instant::now();
    mesh.invalidate_topology();

    let signatures = compute_signatures(mesh, options.parallel)?;
    let groups = group_half_facets(&signatures)?;

    let mut report = BuildReport {
        elements: signatures.len(),
        half_facets: signatures.iter().map(|s| s.facets.len()).sum(),
        ..BuildReport::default()
    };
    let plan = plan_siblings(&groups, options.non_manifold, &mut report)?;

    let (vertices, elements) = mesh.parts_mut();
    for (element, half_facet, slots) in plan {
        let e = elements
            .get_mut(&element)
            .ok_or(MeshError::UnknownElement(element))?;
        e.reset_sibling_slots(half_facet, slots.len())?;
        for (i, s) in slots.into_iter().enumerate() {
            e.set_sibling_half_facet(half_facet, i + 1, s)?;
        }
    }

    for e in elements.values() {
        for &v in e.vertices() {
            let vertex = vertices
                .get_mut(v)
                .ok_or(MeshError::UnknownVertex {
                    element: e.key(),
                    vertex: v,
                })?;
            let current = vertex.v2hf(e.dimension())?;
            let on_facet = current.half_facet().is_some_and(|f| f > 0);
            if current.is_naked() || !on_facet {
                let half_facet = e.half_facet_containing_vertices(&[v]).unwrap_or(0);
                if current.is_naked() || half_facet > 0 {
                    vertex.set_v2hf(e.dimension(), back_reference(e, half_facet)?);
                }
            }
        }
    }
    mesh.set_built(true);

    if options.validate {
        if let Err(err) = validate_mesh_topology(mesh) {
            mesh.invalidate_topology();
            return Err(err);
        }
    }

    log::debug!(
        "built topology: {} elements, {} half-facets, {} naked, {} manifold, \
         {} non-manifold in {:?}",
        report.elements,
        report.half_facets,
        report.naked,
        report.manifold_facets,
        report.non_manifold_facets,
        started.elapsed()
    );
    Ok(report)
}

fn back_reference(e: &Element, half_facet: usize) -> Result<SiblingHalfFacet, MeshError> {
    Ok(SiblingHalfFacet::pack(
        e.key(),
        slot_index(e.key(), half_facet, half_facet)?,
        0,
    ))
}

fn slot_index(element: ElementKey, half_facet: usize, value: usize) -> Result<u16, MeshError> {
    u16::try_from(value).map_err(|_| MeshError::TooManySiblings {
        element,
        half_facet,
        count: value,
    })
}

fn element_signatures(e: &Element) -> Result<ElementSignatures, MeshError> {
    let facets = (1..=e.half_facets_count())
        .map(|i| {
            let mut keys = e.first_level_half_facet(i)?;
            keys.sort_unstable();
            Ok(keys)
        })
        .collect::<Result<Vec<_>, MeshError>>()?;
    Ok(ElementSignatures {
        key: e.key(),
        dimension: e.dimension(),
        facets,
    })
}

#[cfg(feature = "rayon")]
fn compute_signatures(mesh: &Mesh, parallel: bool) -> Result<Vec<ElementSignatures>, MeshError> {
    use rayon::prelude::*;
    if parallel {
        let elements: Vec<&Element> = mesh.elements().collect();
        return elements
            .par_iter()
            .map(|e| element_signatures(e))
            .collect();
    }
    mesh.elements().map(element_signatures).collect()
}

#[cfg(not(feature = "rayon"))]
fn compute_signatures(mesh: &Mesh, _parallel: bool) -> Result<Vec<ElementSignatures>, MeshError> {
    mesh.elements().map(element_signatures).collect()
}

/// Groups half-facets by signature, preserving first-seen group order.
fn group_half_facets(
    signatures: &[ElementSignatures],
) -> Result<Vec<Vec<(ElementKey, usize)>>, MeshError> {
    let mut index: HashMap<Signature, usize> = HashMap::new();
    let mut groups: Vec<Vec<(ElementKey, usize)>> = Vec::new();

    for sig in signatures {
        for (i, facet) in sig.facets.iter().enumerate() {
            let half_facet = i + 1;
            let g = *index
                .entry((sig.dimension, facet.clone()))
                .or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
            let group = &mut groups[g];
            if let Some(&(last, duplicate_of)) = group.last() {
                if last == sig.key {
                    return Err(MeshError::DegenerateFacetGroup {
                        element: sig.key,
                        half_facet,
                        duplicate_of,
                    });
                }
            }
            group.push((sig.key, half_facet));
        }
    }
    Ok(groups)
}

type SiblingPlan = Vec<(ElementKey, usize, Vec<SiblingHalfFacet>)>;

fn plan_siblings(
    groups: &[Vec<(ElementKey, usize)>],
    non_manifold: NonManifoldHandling,
    report: &mut BuildReport,
) -> Result<SiblingPlan, MeshError> {
    let mut plan = Vec::new();
    for group in groups {
        let n = group.len();
        match n {
            1 => {
                report.naked += 1;
                continue;
            }
            2 => report.manifold_facets += 1,
            _ => {
                let (element, half_facet) = group[0];
                match non_manifold {
                    NonManifoldHandling::Error => {
                        return Err(MeshError::NonManifoldFacet {
                            element,
                            half_facet,
                            incident: n,
                        });
                    }
                    NonManifoldHandling::Warn => {
                        log::warn!(
                            "non-manifold facet: element={element} \
                             half_facet={half_facet} incident_elements={n}"
                        );
                    }
                    NonManifoldHandling::Ignore => {}
                }
                report.non_manifold_facets += 1;
            }
        }

        for (a, &(ea, fa)) in group.iter().enumerate() {
            if n - 1 > usize::from(u16::MAX) {
                return Err(MeshError::TooManySiblings {
                    element: ea,
                    half_facet: fa,
                    count: n - 1,
                });
            }
            let mut slots = Vec::with_capacity(n - 1);
            for (b, &(eb, fb)) in group.iter().enumerate() {
                if a == b {
                    continue;
                }
                // position of `a` among `b`'s siblings (group order without `b`)
                let mate = if a < b { a + 1 } else { a };
                slots.push(SiblingHalfFacet::pack(
                    eb,
                    slot_index(eb, fb, fb)?,
                    slot_index(eb, fb, mate)?,
                ));
            }
            plan.push((ea, fa, slots));
        }
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::element_type::ElementType;
    use crate::topology::vertex::Vertex;

    fn vk(raw: u64) -> VertexKey {
        VertexKey::new(raw).unwrap()
    }

    fn ek(raw: u32) -> ElementKey {
        ElementKey::new(raw).unwrap()
    }

    fn mesh_with_vertices(n: u64) -> Mesh {
        let mut mesh = Mesh::new();
        for k in 1..=n {
            mesh.add_vertex(Vertex::new(vk(k), [k as f64, 0.0, 0.0]))
                .unwrap();
        }
        mesh
    }

    #[test]
    fn bars_share_end_vertices() {
        let mut mesh = mesh_with_vertices(3);
        mesh.add_element_code(1, 1, &[1, 2]).unwrap();
        mesh.add_element_code(2, 1, &[2, 3]).unwrap();
        let report = mesh.build_topology().unwrap();
        assert_eq!(report.manifold_facets, 1);
        assert_eq!(report.naked, 2);
        let bar1 = mesh.element(ek(1)).unwrap();
        assert_eq!(
            bar1.sibling_half_facet(2, 1).unwrap(),
            SiblingHalfFacet::pack(ek(2), 1, 1)
        );
        assert!(bar1.is_naked_sibling_half_facet(1).unwrap());
    }

    #[test]
    fn repeated_vertex_never_reaches_the_build() {
        let mut mesh = mesh_with_vertices(4);
        mesh.add_element_code(1, 2, &[1, 2, 3]).unwrap();
        mesh.build_topology().unwrap();
        let err = mesh.add_element_code(4, 3, &[1, 2, 3, 1]).unwrap_err();
        assert_eq!(
            err,
            MeshError::RepeatedVertex {
                element: ek(4),
                vertex: vk(1)
            }
        );
        assert_eq!(mesh.element_count(), 1);
        assert!(mesh.is_built());
    }

    #[test]
    fn colliding_facets_of_one_element_are_degenerate() {
        let signatures = [
            ElementSignatures {
                key: ek(1),
                dimension: 2,
                facets: vec![vec![vk(1), vk(2)], vec![vk(2), vk(3)], vec![vk(1), vk(3)]],
            },
            ElementSignatures {
                key: ek(5),
                dimension: 2,
                facets: vec![vec![vk(2), vk(4)], vec![vk(2), vk(4)], vec![vk(2), vk(2)]],
            },
        ];
        let err = group_half_facets(&signatures).unwrap_err();
        assert_eq!(
            err,
            MeshError::DegenerateFacetGroup {
                element: ek(5),
                half_facet: 2,
                duplicate_of: 1
            }
        );
    }

    #[test]
    fn strict_build_rejects_fans() {
        let mut mesh = mesh_with_vertices(5);
        mesh.add_element_code(1, 2, &[1, 2, 3]).unwrap();
        mesh.add_element_code(2, 2, &[2, 1, 4]).unwrap();
        mesh.add_element_code(3, 2, &[1, 2, 5]).unwrap();
        let err = mesh.build_topology_with(&BuildOptions::strict()).unwrap_err();
        assert_eq!(
            err,
            MeshError::NonManifoldFacet {
                element: ek(1),
                half_facet: 1,
                incident: 3
            }
        );
        assert!(!mesh.is_built());

        let report = mesh.build_topology().unwrap();
        assert_eq!(report.non_manifold_facets, 1);
    }

    #[test]
    fn mixed_dimensions_do_not_link() {
        // a bar lying on the edge of a triangle keeps its own adjacency
        let mut mesh = mesh_with_vertices(3);
        mesh.add_element_code(1, 2, &[1, 2, 3]).unwrap();
        mesh.add_element_code(2, 1, &[1, 2]).unwrap();
        let report = mesh.build_topology().unwrap();
        assert_eq!(report.naked, 5);
        assert_eq!(mesh.naked_half_facets().len(), 5);
        assert_eq!(mesh.incident_half_facet(vk(1), 1).unwrap(), Some((ek(2), 1)));
        assert_eq!(mesh.incident_half_facet(vk(1), 2).unwrap(), Some((ek(1), 1)));
    }

    #[test]
    fn high_order_bar_interior_node_is_referenced() {
        let mut mesh = mesh_with_vertices(3);
        mesh.add_element_code(1, 8, &[1, 2, 3]).unwrap();
        mesh.build_topology().unwrap();
        assert_eq!(mesh.incident_half_facet(vk(3), 1).unwrap(), Some((ek(1), 0)));
        assert_eq!(mesh.incident_half_facet(vk(2), 1).unwrap(), Some((ek(1), 2)));
        assert_eq!(
            mesh.element(ek(1)).unwrap().element_type(),
            ElementType::Bar3
        );
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_signatures_match_serial() {
        let mut mesh = mesh_with_vertices(5);
        mesh.add_element_code(1, 2, &[1, 2, 3]).unwrap();
        mesh.add_element_code(2, 2, &[3, 2, 4]).unwrap();
        mesh.add_element_code(3, 2, &[3, 4, 5]).unwrap();
        let serial = mesh.build_topology().unwrap();
        let snapshot: Vec<_> = mesh.elements().cloned().collect();
        let parallel = mesh
            .build_topology_with(&BuildOptions::default().parallel(true))
            .unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(snapshot, mesh.elements().cloned().collect::<Vec<_>>());
    }
}
