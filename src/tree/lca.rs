use super::Tree;
use crate::error::Error;
use crate::graph::VertexId;

/// Binary-lifting ancestor table with path-sum queries.
///
/// The ancestor structure is fixed at construction; only the oriented edge
/// weighting and its prefix sums change afterwards, so re-weighting a tree
/// costs a single pass over the BFS order and never touches `up`.
pub struct Lca<'t> {
    tree: &'t Tree,
    max_log: usize,
    up: Vec<Vec<Option<VertexId>>>,
    edge_weights: Vec<f64>,
    prefix: Vec<f64>,
}

fn ceil_log2(x: usize) -> usize {
    (usize::BITS - (x - 1).leading_zeros()) as usize
}

impl<'t> Lca<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        let n = tree.vertex_size();
        let max_log = ceil_log2(n.max(2));

        let mut up: Vec<Vec<Option<VertexId>>> = Vec::with_capacity(max_log + 1);
        up.push((0..n).map(|i| tree.parent(VertexId::new(i))).collect());
        for k in 1..=max_log {
            let prev = &up[k - 1];
            let row = (0..n)
                .map(|i| prev[i].and_then(|mid| prev[mid.to_raw()]))
                .collect();
            up.push(row);
        }

        Self {
            tree,
            max_log,
            up,
            edge_weights: vec![0.0; n],
            prefix: vec![0.0; n],
        }
    }

    /// Replaces the oriented edge weighting and recomputes all prefix sums.
    ///
    /// `weights[c]` is the weight of the tree edge `(parent(c), c)`; the root
    /// slot is ignored. Each non-root vertex has exactly one parent edge, so
    /// a by-child vector is the whole oriented edge map.
    pub fn set_edge_weights(&mut self, weights: &[f64]) -> Result<(), Error> {
        self.edge_weights.copy_from_slice(weights);
        let root = self.tree.root();
        self.prefix[root.to_raw()] = 0.0;
        for &v in self.tree.bfs_order() {
            if v == root {
                continue;
            }
            let p = self.tree.parent(v).ok_or(Error::MissingParent(v))?;
            self.prefix[v.to_raw()] = self.prefix[p.to_raw()] + self.edge_weights[v.to_raw()];
        }
        Ok(())
    }

    /// Sum of edge weights along the root-to-`v` path.
    pub fn prefix(&self, v: VertexId) -> f64 {
        self.prefix[v.to_raw()]
    }

    /// Lowest common ancestor of `u` and `v`.
    pub fn lca(&self, u: VertexId, v: VertexId) -> VertexId {
        let (mut u, v) = if self.tree.depth(u) < self.tree.depth(v) {
            (v, u)
        } else {
            (u, v)
        };

        let diff = self.tree.depth(u) - self.tree.depth(v);
        for k in 0..=self.max_log {
            if diff & (1 << k) != 0 {
                u = self.up[k][u.to_raw()].unwrap();
            }
        }
        if u == v {
            return u;
        }

        let mut v = v;
        for k in (0..=self.max_log).rev() {
            if self.up[k][u.to_raw()] != self.up[k][v.to_raw()] {
                // At equal depths the two ancestors are None together, so a
                // mismatch means both are real vertices.
                u = self.up[k][u.to_raw()].unwrap();
                v = self.up[k][v.to_raw()].unwrap();
            }
        }
        self.tree.parent(u).unwrap()
    }

    /// Path length between `u` and `v` under the current edge weighting.
    pub fn dist(&self, u: VertexId, v: VertexId) -> f64 {
        let a = self.lca(u, v);
        self.prefix[u.to_raw()] + self.prefix[v.to_raw()] - 2.0 * self.prefix[a.to_raw()]
    }
}
