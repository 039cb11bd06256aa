//! Algorithms over a [`Mesh`](crate::topology::Mesh): the topology builder
//! and the queries that run on built adjacency.

pub mod boundary;
pub mod build;
pub mod dual_graph;
pub mod orientation;
pub mod traversal;

pub use boundary::{NakedFacet, extract_boundary, naked_boundary_loops, naked_facets};
pub use build::{BuildOptions, BuildReport, build_topology};
pub use dual_graph::{DualGraph, build_dual};
pub use orientation::{OrientationReport, inconsistent_pairs, orient_consistently};
pub use traversal::{ElementTraversal, connected_components};
