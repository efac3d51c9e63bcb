use crate::error::Error;
use crate::graph::*;
use ahash::RandomState;
use bimap::BiHashMap;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::BTreeMap;

/// An immutable undirected graph with symmetric positive capacities.
///
/// Vertex labels are interned to dense [`VertexId`]s in ascending label
/// order and edges are numbered in ascending [`EdgeKey`] order, so every
/// per-vertex or per-edge `Vec` in the crate iterates deterministically.
#[derive(Debug)]
pub struct CapacityGraph {
    inner: UnGraph<(), EdgeId, usize>,
    labels: BiHashMap<VertexId, String, RandomState, RandomState>,
    edges: Vec<Edge>,
}

impl CapacityGraph {
    /// Build a graph from raw `(u, v, capacity)` records.
    ///
    /// Duplicate records on the same unordered pair are merged by summing
    /// their capacities. Self-loops and non-positive merged capacities are
    /// rejected.
    pub fn from_edge_list(
        raw: impl IntoIterator<Item = (String, String, f64)>,
    ) -> Result<Self, Error> {
        let mut merged: BTreeMap<(String, String), f64> = BTreeMap::new();
        for (u, v, w) in raw {
            if u == v {
                return Err(Error::SelfLoopEdge(u));
            }
            let key = if u <= v { (u, v) } else { (v, u) };
            *merged.entry(key).or_insert(0.0) += w;
        }

        let mut inner = UnGraph::<(), EdgeId, usize>::with_capacity(0, merged.len());
        let mut labels = BiHashMap::with_hashers(RandomState::new(), RandomState::new());
        {
            let label_set: std::collections::BTreeSet<&String> =
                merged.keys().flat_map(|(u, v)| [u, v]).collect();
            for label in label_set {
                let nidx = inner.add_node(());
                labels.insert(VertexId::new(nidx.index()), label.clone());
            }
        }

        // BTreeMap order over label pairs equals EdgeKey order over the
        // interned ids, so `edges` comes out sorted by canonical key.
        let mut edges = Vec::with_capacity(merged.len());
        for ((lu, lv), w) in merged {
            if w <= 0.0 {
                return Err(Error::NonPositiveCapacity { u: lu, v: lv });
            }
            let u = *labels.get_by_right(&lu).unwrap();
            let v = *labels.get_by_right(&lv).unwrap();
            let id = EdgeId::new(edges.len());
            inner.add_edge(
                NodeIndex::new(u.to_raw()),
                NodeIndex::new(v.to_raw()),
                id,
            );
            edges.push(Edge {
                id,
                key: EdgeKey::new(u, v),
                capacity: w,
            });
        }
        Ok(Self {
            inner,
            labels,
            edges,
        })
    }

    pub fn vertex_size(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_size(&self) -> usize {
        self.edges.len()
    }

    pub fn iter_vertices(&self) -> Box<dyn Iterator<Item = VertexId> + '_> {
        let it = self.inner.node_indices().map(|x| VertexId::new(x.index()));
        Box::new(it)
    }

    pub fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge> + '_> {
        Box::new(self.edges.iter().copied())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks an edge up by its canonical key.
    pub fn find_edge(&self, key: EdgeKey) -> Option<Edge> {
        self.edges
            .binary_search_by_key(&key, |e| e.key)
            .ok()
            .map(|i| self.edges[i])
    }

    pub fn capacity(&self, e: EdgeId) -> f64 {
        self.edges[e.to_raw()].capacity
    }

    /// The label behind an interned vertex id.
    pub fn label(&self, v: VertexId) -> &str {
        self.labels.get_by_left(&v).unwrap()
    }

    pub fn vertex_by_label(&self, label: &str) -> Option<VertexId> {
        self.labels.get_by_right(label).copied()
    }

    /// Iteration over `(neighbor, edge id)` pairs incident to `v`.
    pub fn neighbors(&self, v: VertexId) -> Box<dyn Iterator<Item = (VertexId, EdgeId)> + '_> {
        use petgraph::visit::EdgeRef;
        let n = NodeIndex::new(v.to_raw());
        let it = self.inner.edges(n).map(move |e| {
            let other = if e.source() == n {
                e.target()
            } else {
                e.source()
            };
            (VertexId::new(other.index()), *e.weight())
        });
        Box::new(it)
    }

    /// Verifies the graph forms a single connected component.
    pub fn ensure_connected(&self) -> Result<(), Error> {
        if self.vertex_size() == 0 {
            return Ok(());
        }
        let root = VertexId::new(0);
        let mut seen = vec![false; self.vertex_size()];
        let mut stack = vec![root];
        seen[root.to_raw()] = true;
        while let Some(u) = stack.pop() {
            for (w, _) in self.neighbors(u) {
                if !seen[w.to_raw()] {
                    seen[w.to_raw()] = true;
                    stack.push(w);
                }
            }
        }
        match seen.iter().position(|reached| !reached) {
            None => Ok(()),
            Some(i) => Err(Error::UnreachableRoot {
                root: self.label(root).to_string(),
                unreached: self.label(VertexId::new(i)).to_string(),
            }),
        }
    }
}
