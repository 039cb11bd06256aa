#![allow(dead_code)]
use mesh_ahf::topology::{ElementKey, Mesh, Vertex, VertexKey};

pub fn vk(u: u64) -> VertexKey {
    VertexKey::new(u).unwrap()
}

pub fn ek(u: u32) -> ElementKey {
    ElementKey::new(u).unwrap()
}

/// Mesh with vertices `1..=n` on the x axis and the given `(key, gmsh code, vertices)`.
pub fn mesh_from(n: u64, elements: &[(u32, i32, &[u64])]) -> Mesh {
    let mut mesh = Mesh::new();
    for k in 1..=n {
        mesh.add_vertex(Vertex::from_raw(k, [k as f64, 0.0, 0.0]).unwrap())
            .unwrap();
    }
    for &(key, code, verts) in elements {
        mesh.add_element_code(key, code, verts).unwrap();
    }
    mesh
}

/// Structured `nx * ny * nz` grid of linear hexahedra in gmsh node order.
pub fn hex_grid(nx: u64, ny: u64, nz: u64) -> Mesh {
    let id = |i: u64, j: u64, k: u64| 1 + i + (nx + 1) * (j + (ny + 1) * k);
    let mut mesh = Mesh::new();
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.add_vertex(
                    Vertex::from_raw(id(i, j, k), [i as f64, j as f64, k as f64]).unwrap(),
                )
                .unwrap();
            }
        }
    }
    let mut key = 1u32;
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let nodes = [
                    id(i, j, k),
                    id(i + 1, j, k),
                    id(i + 1, j + 1, k),
                    id(i, j + 1, k),
                    id(i, j, k + 1),
                    id(i + 1, j, k + 1),
                    id(i + 1, j + 1, k + 1),
                    id(i, j + 1, k + 1),
                ];
                mesh.add_element_code(key, 5, &nodes).unwrap();
                key += 1;
            }
        }
    }
    mesh
}

/// Vertex-key sets of every half-facet of `element`, each sorted.
pub fn facet_signatures(mesh: &Mesh, element: ElementKey) -> Vec<Vec<VertexKey>> {
    let e = mesh.element(element).unwrap();
    let mut out: Vec<Vec<VertexKey>> = (1..=e.half_facets_count())
        .map(|f| {
            let mut keys = e.first_level_half_facet(f).unwrap();
            keys.sort_unstable();
            keys
        })
        .collect();
    out.sort();
    out
}
