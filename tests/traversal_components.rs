mod util;

use mesh_ahf::algs::traversal::{ElementTraversal, connected_components};
use util::{ek, hex_grid, mesh_from};

#[test]
fn bfs_over_a_row_of_hexahedra() {
    let mut row = hex_grid(4, 1, 1);
    row.build_topology().unwrap();
    let order = ElementTraversal::new(&mut row)
        .seeds([ek(3)])
        .bfs()
        .run()
        .unwrap();
    assert_eq!(order, vec![ek(3), ek(2), ek(4), ek(1)]);
    row.clear_all_visited();

    let dfs = ElementTraversal::new(&mut row)
        .seeds([ek(1)])
        .dfs()
        .max_depth(Some(1))
        .run()
        .unwrap();
    assert_eq!(dfs, vec![ek(1), ek(2)]);
}

#[test]
fn flood_fill_resumes_from_visited_flags() {
    let mut row = hex_grid(3, 1, 1);
    row.build_topology().unwrap();
    row.visit(ek(2)).unwrap();
    // element 2 blocks the walk
    let order = ElementTraversal::new(&mut row).seeds([ek(1)]).run().unwrap();
    assert_eq!(order, vec![ek(1)]);
    assert!(row.is_visited(ek(2)).unwrap());
    assert!(!row.is_visited(ek(3)).unwrap());
}

#[test]
fn disjoint_tetrahedra_form_components() {
    let mut mesh = mesh_from(
        9,
        &[
            (1, 4, &[1, 2, 3, 4]),
            (2, 4, &[6, 7, 8, 9]),
            (3, 4, &[1, 3, 2, 5]),
        ],
    );
    mesh.build_topology().unwrap();
    let comps = connected_components(&mut mesh).unwrap();
    assert_eq!(comps, vec![vec![ek(1), ek(3)], vec![ek(2)]]);
}
