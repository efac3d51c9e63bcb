//! Rooted trees and ancestor queries over them.

mod lca;
pub use self::lca::*;

use crate::error::Error;
use crate::graph::VertexId;
use std::collections::VecDeque;

/// A rooted tree over densely-numbered vertices.
///
/// Oriented tree edges are `(parent, child)` pairs; the orientation matters
/// to induced-capacity bookkeeping and to [`Lca`] prefix sums.
#[derive(Debug)]
pub struct Tree {
    root: VertexId,
    parent: Vec<Option<VertexId>>,
    children: Vec<Vec<VertexId>>,
    depth: Vec<usize>,
    bfs_order: Vec<VertexId>,
}

impl Tree {
    /// Builds a tree from a total parent map.
    ///
    /// `parent[root]` must be `None` and every vertex must be reachable from
    /// `root` by following children; otherwise the map does not describe a
    /// rooted tree and construction fails.
    pub fn from_parent_map(
        root: VertexId,
        parent: Vec<Option<VertexId>>,
    ) -> Result<Self, Error> {
        let n = parent.len();
        if root.to_raw() >= n || parent[root.to_raw()].is_some() {
            return Err(Error::InvalidRoot(root));
        }

        let mut children = vec![Vec::new(); n];
        for (i, p) in parent.iter().enumerate() {
            if let Some(p) = p {
                if p.to_raw() >= n {
                    return Err(Error::DisconnectedTree(vec![VertexId::new(i)]));
                }
                children[p.to_raw()].push(VertexId::new(i));
            }
        }

        let mut depth = vec![0usize; n];
        let mut visited = vec![false; n];
        let mut bfs_order = Vec::with_capacity(n);
        let mut queue = VecDeque::new();
        queue.push_back(root);
        visited[root.to_raw()] = true;
        while let Some(u) = queue.pop_front() {
            bfs_order.push(u);
            for &c in &children[u.to_raw()] {
                depth[c.to_raw()] = depth[u.to_raw()] + 1;
                visited[c.to_raw()] = true;
                queue.push_back(c);
            }
        }
        if bfs_order.len() != n {
            let missing = (0..n)
                .filter(|&i| !visited[i])
                .map(VertexId::new)
                .collect();
            return Err(Error::DisconnectedTree(missing));
        }

        Ok(Self {
            root,
            parent,
            children,
            depth,
            bfs_order,
        })
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn vertex_size(&self) -> usize {
        self.parent.len()
    }

    pub fn nodes(&self) -> Box<dyn Iterator<Item = VertexId> + '_> {
        Box::new((0..self.parent.len()).map(VertexId::new))
    }

    pub fn parent(&self, v: VertexId) -> Option<VertexId> {
        self.parent[v.to_raw()]
    }

    pub fn children(&self, v: VertexId) -> &[VertexId] {
        &self.children[v.to_raw()]
    }

    pub fn depth(&self, v: VertexId) -> usize {
        self.depth[v.to_raw()]
    }

    /// Vertices in breadth-first order; every vertex appears after its parent.
    pub fn bfs_order(&self) -> &[VertexId] {
        &self.bfs_order
    }

    /// Oriented edges `(parent, child)` in BFS order of the child.
    pub fn edges(&self) -> Box<dyn Iterator<Item = (VertexId, VertexId)> + '_> {
        let it = self
            .bfs_order
            .iter()
            .filter_map(move |&v| self.parent[v.to_raw()].map(|p| (p, v)));
        Box::new(it)
    }

    /// Vertices with children before parents.
    pub fn postorder(&self) -> Vec<VertexId> {
        let mut order = Vec::with_capacity(self.parent.len());
        let mut stack = vec![(self.root, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                order.push(v);
            } else {
                stack.push((v, true));
                for &c in &self.children[v.to_raw()] {
                    stack.push((c, false));
                }
            }
        }
        order
    }

    /// All vertices in the subtree rooted at `v`, including `v` itself.
    pub fn subtree_nodes(&self, v: VertexId) -> Vec<VertexId> {
        let mut out = Vec::new();
        let mut stack = vec![v];
        while let Some(u) = stack.pop() {
            out.push(u);
            stack.extend(self.children[u.to_raw()].iter().copied());
        }
        out
    }
}
