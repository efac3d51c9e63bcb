use crate::graph::{CapacityGraph, VertexId};
use crate::tree::Tree;

/// A candidate bottleneck: the cut a single tree edge induces between the
/// subtree under `edge.1` and the rest of the graph.
#[derive(Debug, Clone)]
pub struct TreeCut {
    /// Oriented tree edge `(parent, child)` that induces the cut.
    pub edge: (VertexId, VertexId),
    /// Exact total capacity of graph edges crossing the cut.
    pub capacity: f64,
    /// Vertices on the subtree side.
    pub nodes: Vec<VertexId>,
}

/// Exact capacity of the cut between marked and unmarked vertices.
pub fn cut_capacity(graph: &CapacityGraph, in_cut: &[bool]) -> f64 {
    graph
        .iter_edges()
        .filter(|e| in_cut[e.key.small().to_raw()] != in_cut[e.key.large().to_raw()])
        .map(|e| e.capacity)
        .sum()
}

/// Enumerates the cut induced by every tree edge, sorted by capacity
/// ascending; `top_k` truncates after sorting.
pub fn extract_tree_cuts(
    graph: &CapacityGraph,
    tree: &Tree,
    top_k: Option<usize>,
) -> Vec<TreeCut> {
    let mut cuts = Vec::new();
    let mut mask = vec![false; tree.vertex_size()];
    for (p, c) in tree.edges() {
        let nodes = tree.subtree_nodes(c);
        for &v in &nodes {
            mask[v.to_raw()] = true;
        }
        let capacity = cut_capacity(graph, &mask);
        for &v in &nodes {
            mask[v.to_raw()] = false;
        }
        cuts.push(TreeCut {
            edge: (p, c),
            capacity,
            nodes,
        });
    }
    cuts.sort_by(|a, b| a.capacity.total_cmp(&b.capacity));
    if let Some(k) = top_k {
        cuts.truncate(k);
    }
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{shortest_path_tree, tree_capacities};
    use crate::graph::ConnectedEdgeList;
    use crate::tree::Lca;
    use quickcheck_macros::quickcheck;

    fn graph(edges: &[(&str, &str, f64)]) -> CapacityGraph {
        CapacityGraph::from_edge_list(
            edges
                .iter()
                .map(|(u, v, w)| (u.to_string(), v.to_string(), *w)),
        )
        .unwrap()
    }

    #[test]
    fn cuts_come_out_sorted_and_exact() {
        // A dumbbell: two triangles joined by one thin edge.
        let g = graph(&[
            ("a1", "a2", 2.0),
            ("a2", "a3", 2.0),
            ("a1", "a3", 2.0),
            ("a3", "b1", 0.5),
            ("b1", "b2", 2.0),
            ("b2", "b3", 2.0),
            ("b1", "b3", 2.0),
        ]);
        let root = g.vertex_by_label("a1").unwrap();
        let tree = shortest_path_tree(&g, &vec![1.0; g.edge_size()], root).unwrap();
        let cuts = extract_tree_cuts(&g, &tree, None);
        for pair in cuts.windows(2) {
            assert!(pair[0].capacity <= pair[1].capacity);
        }
        // The thin bridge is the smallest cut and splits off the b-triangle.
        assert_eq!(cuts[0].capacity, 0.5);
        let mut side: Vec<&str> = cuts[0].nodes.iter().map(|&v| g.label(v)).collect();
        side.sort();
        assert_eq!(side, vec!["b1", "b2", "b3"]);
    }

    #[test]
    fn top_k_truncates_after_sorting() {
        let g = graph(&[("a", "b", 3.0), ("b", "c", 1.0), ("a", "c", 1.0)]);
        let root = g.vertex_by_label("a").unwrap();
        let tree = shortest_path_tree(&g, &vec![1.0; g.edge_size()], root).unwrap();
        let cuts = extract_tree_cuts(&g, &tree, Some(1));
        assert_eq!(cuts.len(), 1);
        let all = extract_tree_cuts(&g, &tree, None);
        assert_eq!(cuts[0].capacity, all[0].capacity);
    }

    #[quickcheck]
    fn cut_capacity_matches_induced_capacity(list: ConnectedEdgeList) {
        // The exact cut under a tree edge and the LCA-trick induced capacity
        // are the same number.
        let g = list.build();
        let root = crate::graph::VertexId::new(0);
        let tree = shortest_path_tree(&g, &vec![1.0; g.edge_size()], root).unwrap();
        let lca = Lca::new(&tree);
        let c_t = tree_capacities(&g, &tree, &lca);
        for cut in extract_tree_cuts(&g, &tree, None) {
            let (_, child) = cut.edge;
            assert!((cut.capacity - c_t[child.to_raw()]).abs() < 1e-9);
        }
    }
}
