use crate::error::Error;
use crate::graph::CapacityGraph;
use crate::tree::{Lca, Tree};

/// Induced capacity of every tree edge when each graph edge routes its
/// capacity along its unique tree path.
///
/// Returned by child vertex: `c_t[c]` is the load on the oriented tree edge
/// `(parent(c), c)`; the root slot stays zero. Runs one LCA query per graph
/// edge plus a reverse-BFS subtree-sum pass, so the whole thing is
/// `O((|V| + |E|) log |V|)`.
pub fn tree_capacities(graph: &CapacityGraph, tree: &Tree, lca: &Lca) -> Vec<f64> {
    let n = tree.vertex_size();
    let mut add = vec![0.0; n];
    for e in graph.iter_edges() {
        let (u, v) = (e.key.small(), e.key.large());
        let a = lca.lca(u, v);
        add[u.to_raw()] += e.capacity;
        add[v.to_raw()] += e.capacity;
        add[a.to_raw()] -= 2.0 * e.capacity;
    }

    let mut c_t = vec![0.0; n];
    for &v in tree.bfs_order().iter().rev() {
        if let Some(p) = tree.parent(v) {
            c_t[v.to_raw()] = add[v.to_raw()];
            add[p.to_raw()] += add[v.to_raw()];
        }
    }
    c_t
}

/// Congestion of every graph edge under tree routing: the weighted tree
/// distance between its endpoints (weights = induced capacities) divided by
/// its own capacity.
///
/// Re-weights `lca` with `c_t` as a side effect. A non-positive capacity
/// that escaped load-time validation reports `+inf` instead of failing.
pub fn edge_congestion(
    graph: &CapacityGraph,
    lca: &mut Lca,
    c_t: &[f64],
) -> Result<Vec<f64>, Error> {
    lca.set_edge_weights(c_t)?;
    let mut cong = Vec::with_capacity(graph.edge_size());
    for e in graph.iter_edges() {
        if e.capacity <= 0.0 {
            cong.push(f64::INFINITY);
        } else {
            cong.push(lca.dist(e.key.small(), e.key.large()) / e.capacity);
        }
    }
    Ok(cong)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::shortest_path_tree;
    use crate::graph::{ConnectedEdgeList, EdgeKey, VertexId};
    use quickcheck_macros::quickcheck;

    fn graph(edges: &[(&str, &str, f64)]) -> CapacityGraph {
        CapacityGraph::from_edge_list(
            edges
                .iter()
                .map(|(u, v, w)| (u.to_string(), v.to_string(), *w)),
        )
        .unwrap()
    }

    fn unit_spt(g: &CapacityGraph, root: &str) -> Tree {
        let root = g.vertex_by_label(root).unwrap();
        shortest_path_tree(g, &vec![1.0; g.edge_size()], root).unwrap()
    }

    fn cong_of(g: &CapacityGraph, tree: &Tree) -> (Vec<f64>, Vec<f64>) {
        let mut lca = Lca::new(tree);
        let c_t = tree_capacities(g, tree, &lca);
        let cong = edge_congestion(g, &mut lca, &c_t).unwrap();
        (c_t, cong)
    }

    #[test]
    fn triangle_path_tree() {
        let g = graph(&[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 1.0)]);
        let a = g.vertex_by_label("A").unwrap();
        let b = g.vertex_by_label("B").unwrap();
        let c = g.vertex_by_label("C").unwrap();
        // Path tree A - B - C rooted at A.
        let tree = Tree::from_parent_map(a, vec![None, Some(a), Some(b)]).unwrap();
        let (c_t, cong) = cong_of(&g, &tree);
        assert_eq!(c_t[b.to_raw()], 2.0);
        assert_eq!(c_t[c.to_raw()], 2.0);
        let cong_key = |u, v| cong[g.find_edge(EdgeKey::new(u, v)).unwrap().id.to_raw()];
        assert_eq!(cong_key(a, b), 2.0);
        assert_eq!(cong_key(b, c), 2.0);
        assert_eq!(cong_key(a, c), 4.0);
    }

    #[test]
    fn star_routes_everything_locally() {
        let g = graph(&[("H", "X", 1.0), ("H", "Y", 1.0), ("H", "Z", 1.0)]);
        let tree = unit_spt(&g, "H");
        let (c_t, cong) = cong_of(&g, &tree);
        let h = g.vertex_by_label("H").unwrap();
        for v in g.iter_vertices() {
            if v != h {
                assert_eq!(c_t[v.to_raw()], 1.0);
            }
        }
        assert!(cong.iter().all(|&c| c == 1.0));
    }

    #[test]
    fn square_tree_capacities() {
        let g = graph(&[
            ("A", "B", 1.0),
            ("B", "C", 1.0),
            ("C", "D", 1.0),
            ("D", "A", 1.0),
        ]);
        let tree = unit_spt(&g, "A");
        let b = g.vertex_by_label("B").unwrap();
        let c = g.vertex_by_label("C").unwrap();
        let d = g.vertex_by_label("D").unwrap();
        // SPT from A is {A-B, A-D, B-C}: c hangs off the smaller of its two
        // equal-distance predecessors.
        assert_eq!(tree.parent(c), Some(b));
        let (c_t, _) = cong_of(&g, &tree);
        // Cut {B, C}: edges A-B and C-D cross.
        assert_eq!(c_t[b.to_raw()], 2.0);
        // Cut {D}: edges A-D and C-D cross.
        assert_eq!(c_t[d.to_raw()], 2.0);
        // Cut {C}: edges B-C and C-D cross.
        assert_eq!(c_t[c.to_raw()], 2.0);
    }

    #[quickcheck]
    fn capacities_match_direct_cut_enumeration(list: ConnectedEdgeList) {
        let g = list.build();
        let tree = unit_spt(&g, g.label(VertexId::new(0)));
        let lca = Lca::new(&tree);
        let c_t = tree_capacities(&g, &tree, &lca);
        for (_, child) in tree.edges() {
            let mut in_cut = vec![false; g.vertex_size()];
            for v in tree.subtree_nodes(child) {
                in_cut[v.to_raw()] = true;
            }
            let crossing: f64 = g
                .iter_edges()
                .filter(|e| in_cut[e.key.small().to_raw()] != in_cut[e.key.large().to_raw()])
                .map(|e| e.capacity)
                .sum();
            let got = c_t[child.to_raw()];
            assert!(got >= 0.0, "negative induced capacity {got}");
            assert!(
                (got - crossing).abs() < 1e-9,
                "induced capacity {got} != crossing sum {crossing}"
            );
        }
    }

    #[quickcheck]
    fn congestion_is_non_negative_and_tree_edges_match(list: ConnectedEdgeList) {
        let g = list.build();
        let tree = unit_spt(&g, g.label(VertexId::new(0)));
        let (c_t, cong) = cong_of(&g, &tree);
        assert!(cong.iter().all(|&c| c >= 0.0));
        // An edge that is itself a tree edge routes only through itself.
        for (p, c) in tree.edges() {
            if let Some(e) = g.find_edge(EdgeKey::new(p, c)) {
                let expect = c_t[c.to_raw()] / e.capacity;
                assert!((cong[e.id.to_raw()] - expect).abs() < 1e-9);
            }
        }
    }
}
