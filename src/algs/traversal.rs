//! DFS/BFS walks over element adjacency, driven by the visited flags.
//!
//! A walk marks every element it reaches as visited (all half-facets
//! flagged) and never enters an element that is already flagged. Flags are
//! not cleared by [`ElementTraversal::run`], so several walks can share one
//! flood fill; call [`Mesh::clear_all_visited`] to start over.

use std::collections::VecDeque;

use crate::mesh_error::MeshError;
use crate::topology::key::ElementKey;
use crate::topology::mesh::Mesh;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    DFS,
    BFS,
}

pub struct ElementTraversal<'a> {
    mesh: &'a mut Mesh,
    seeds: Vec<ElementKey>,
    strat: Strategy,
    max_depth: Option<u32>,
    dimension: Option<usize>,
    manifold_only: bool,
}

impl<'a> ElementTraversal<'a> {
    pub fn new(mesh: &'a mut Mesh) -> Self {
        Self {
            mesh,
            seeds: Vec::new(),
            strat: Strategy::BFS,
            max_depth: None,
            dimension: None,
            manifold_only: false,
        }
    }
    pub fn seeds<I: IntoIterator<Item = ElementKey>>(mut self, it: I) -> Self {
        self.seeds = it.into_iter().collect();
        self
    }
    pub fn dfs(mut self) -> Self {
        self.strat = Strategy::DFS;
        self
    }
    pub fn bfs(mut self) -> Self {
        self.strat = Strategy::BFS;
        self
    }
    pub fn max_depth(mut self, d: Option<u32>) -> Self {
        self.max_depth = d;
        self
    }
    /// Only enter elements of this dimension; seeds of other dimensions are skipped.
    pub fn dimension(mut self, dim: Option<usize>) -> Self {
        self.dimension = dim;
        self
    }
    /// Do not cross half-facets shared by more than two elements.
    pub fn manifold_only(mut self, yes: bool) -> Self {
        self.manifold_only = yes;
        self
    }

    /// Runs the walk and returns elements in discovery order.
    pub fn run(self) -> Result<Vec<ElementKey>, MeshError> {
        let ElementTraversal {
            mesh,
            seeds,
            strat,
            max_depth,
            dimension,
            manifold_only,
        } = self;
        mesh.require_built()?;

        let mut out = Vec::new();
        let mut frontier: VecDeque<(ElementKey, u32)> = VecDeque::new();
        let admits = |mesh: &Mesh, k: ElementKey| -> Result<bool, MeshError> {
            let e = mesh.try_element(k)?;
            Ok(!e.is_visited() && dimension.is_none_or(|d| e.dimension() == d))
        };
        for s in seeds {
            if admits(mesh, s)? {
                mesh.visit(s)?;
                out.push(s);
                frontier.push_back((s, 0));
            }
        }

        loop {
            let next = match strat {
                Strategy::DFS => frontier.pop_back(),
                Strategy::BFS => frontier.pop_front(),
            };
            let Some((p, d)) = next else { break };
            if max_depth.is_some_and(|md| d >= md) {
                continue;
            }
            for q in neighbors(mesh, p, manifold_only)? {
                if admits(mesh, q)? {
                    mesh.visit(q)?;
                    out.push(q);
                    frontier.push_back((q, d + 1));
                }
            }
        }
        Ok(out)
    }
}

fn neighbors(
    mesh: &Mesh,
    p: ElementKey,
    manifold_only: bool,
) -> Result<Vec<ElementKey>, MeshError> {
    let e = mesh.try_element(p)?;
    if !manifold_only {
        return Ok(e.unique_sibling_elements());
    }
    let mut out = Vec::new();
    for f in 1..=e.half_facets_count() {
        let slots = e.sibling_half_facets(f)?;
        if let [single] = slots {
            if let Some(q) = single.element() {
                out.push(q);
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// Groups elements into connected components through shared half-facets.
///
/// Components are listed by their smallest element key; members appear in
/// breadth-first order from that key. Visited flags are cleared before and
/// after.
pub fn connected_components(mesh: &mut Mesh) -> Result<Vec<Vec<ElementKey>>, MeshError> {
    mesh.require_built()?;
    mesh.clear_all_visited();
    let keys: Vec<ElementKey> = mesh.element_keys().collect();
    let mut components = Vec::new();
    for k in keys {
        if mesh.is_visited(k)? {
            continue;
        }
        components.push(ElementTraversal::new(mesh).seeds([k]).bfs().run()?);
    }
    mesh.clear_all_visited();
    Ok(components)
}
