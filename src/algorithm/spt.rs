use crate::error::Error;
use crate::graph::{CapacityGraph, VertexId};
use crate::tree::Tree;
use ahash::RandomState;
use keyed_priority_queue::KeyedPriorityQueue;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Computes a shortest-path tree from `root` under caller-supplied edge
/// lengths (indexed by edge id).
///
/// Ties are resolved reproducibly: vertices with equal distance settle in
/// ascending label order, and among equal-distance predecessors the smallest
/// label wins. Vertices the search never reaches are attached directly to
/// the root; downstream consumers rely on that fallback for graphs that
/// slipped past connectivity validation.
pub fn shortest_path_tree(
    graph: &CapacityGraph,
    lengths: &[f64],
    root: VertexId,
) -> Result<Tree, Error> {
    let n = graph.vertex_size();
    let mut parent: Vec<Option<VertexId>> = vec![None; n];

    let mut queue: KeyedPriorityQueue<
        VertexId,
        Reverse<(OrderedFloat<f64>, VertexId)>,
        RandomState,
    > = KeyedPriorityQueue::with_capacity_and_hasher(n, RandomState::new());
    for v in graph.iter_vertices() {
        queue.push(v, Reverse((OrderedFloat(f64::INFINITY), v)));
    }
    queue
        .set_priority(&root, Reverse((OrderedFloat(0.0), root)))
        .unwrap();

    while let Some((u, Reverse((OrderedFloat(du), _)))) = queue.pop() {
        if du.is_infinite() {
            if u != root {
                parent[u.to_raw()] = Some(root);
            }
            continue;
        }
        for (w, e) in graph.neighbors(u) {
            let nd = du + lengths[e.to_raw()];
            if let Some(&Reverse((dw, _))) = queue.get_priority(&w) {
                let dw = dw.into_inner();
                if nd < dw {
                    parent[w.to_raw()] = Some(u);
                    queue
                        .set_priority(&w, Reverse((OrderedFloat(nd), w)))
                        .unwrap();
                } else if nd == dw && matches!(parent[w.to_raw()], Some(p) if u < p) {
                    parent[w.to_raw()] = Some(u);
                }
            }
        }
    }

    Tree::from_parent_map(root, parent)
}
