//! Serialized mixture and report records.
//!
//! Everything here speaks string labels; interned ids stop at this boundary.

use crate::algorithm::{
    edge_congestion, extract_tree_cuts, tree_capacities, MixtureEntry, TreeCut,
};
use crate::error::Error;
use crate::graph::CapacityGraph;
use crate::tree::{Lca, Tree};
use serde::{Deserialize, Serialize};
use std::path::Path;

const TOP_K_EDGES: usize = 10;
const TOP_K_CUTS: usize = 10;
const MAX_CUT_NODES: usize = 30;

/// One tree of a stored mixture: root label, oriented `(parent, child)`
/// edges, raw sample count, and normalized probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRecord {
    pub root: String,
    pub edges: Vec<(String, String)>,
    pub count: u64,
    pub prob: f64,
}

/// Contents of `mixture.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MixtureFile {
    pub graph: String,
    pub iters: usize,
    pub candidates: usize,
    pub seed: u64,
    pub alpha: f64,
    pub trees: Vec<TreeRecord>,
}

#[derive(Debug, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    pub iters: usize,
    pub candidates: usize,
    pub seed: u64,
    pub alpha: f64,
}

#[derive(Debug, Serialize)]
pub struct MixtureSummary {
    pub unique_trees: usize,
    pub total_samples: u64,
    pub trees: Vec<TreeRecord>,
}

#[derive(Debug, Serialize)]
pub struct CriticalEdge {
    pub edge: (String, String),
    pub capacity: f64,
    pub expected_congestion: f64,
}

#[derive(Debug, Serialize)]
pub struct CutRecord {
    pub edge: (String, String),
    pub capacity: f64,
    pub nodes: Vec<String>,
    pub truncated: bool,
}

/// Contents of `report.json`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub graph: GraphSummary,
    pub parameters: Parameters,
    pub mixture: MixtureSummary,
    pub critical_edges: Vec<CriticalEdge>,
    pub bottleneck_cuts: Vec<CutRecord>,
}

fn tree_record(graph: &CapacityGraph, tree: &Tree, count: u64, total: u64) -> TreeRecord {
    TreeRecord {
        root: graph.label(tree.root()).to_string(),
        edges: tree
            .edges()
            .map(|(p, c)| (graph.label(p).to_string(), graph.label(c).to_string()))
            .collect(),
        count,
        prob: if total > 0 {
            count as f64 / total as f64
        } else {
            0.0
        },
    }
}

/// Converts a fitted mixture into serializable records.
pub fn mixture_records(
    graph: &CapacityGraph,
    mixture: &[MixtureEntry],
    total_samples: u64,
) -> Vec<TreeRecord> {
    mixture
        .iter()
        .map(|entry| tree_record(graph, &entry.tree, entry.count, total_samples))
        .collect()
}

/// Reads a stored `mixture.json`.
pub fn read_mixture(path: &Path) -> Result<MixtureFile, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Rebuilds a [`Tree`] from a stored record.
///
/// Vertices the record does not mention hang directly off the root, matching
/// the oracle's fallback for unreached vertices, so mixtures written against
/// the same graph always round-trip.
pub fn record_to_tree(graph: &CapacityGraph, record: &TreeRecord) -> Result<Tree, Error> {
    let root = graph
        .vertex_by_label(&record.root)
        .ok_or_else(|| Error::UnknownLabel(record.root.clone()))?;
    let mut parent = vec![Some(root); graph.vertex_size()];
    parent[root.to_raw()] = None;
    for (u, v) in &record.edges {
        let pu = graph
            .vertex_by_label(u)
            .ok_or_else(|| Error::UnknownLabel(u.clone()))?;
        let pv = graph
            .vertex_by_label(v)
            .ok_or_else(|| Error::UnknownLabel(v.clone()))?;
        parent[pv.to_raw()] = Some(pu);
    }
    Tree::from_parent_map(root, parent)
}

/// Recomputes expected congestion from stored records, weighting each tree
/// by its share of the total samples.
pub fn recompute_expected(
    graph: &CapacityGraph,
    records: &[TreeRecord],
) -> Result<Vec<f64>, Error> {
    let mut expected = vec![0.0; graph.edge_size()];
    let total: u64 = records.iter().map(|r| r.count).sum();
    if total == 0 {
        return Ok(expected);
    }
    for record in records {
        let tree = record_to_tree(graph, record)?;
        let mut lca = Lca::new(&tree);
        let c_t = tree_capacities(graph, &tree, &lca);
        let cong = edge_congestion(graph, &mut lca, &c_t)?;
        let weight = record.count as f64 / total as f64;
        for (ec, c) in expected.iter_mut().zip(&cong) {
            *ec += weight * c;
        }
    }
    Ok(expected)
}

/// Extracts the tree-induced cuts of every mixture tree.
pub fn mixture_cuts(
    graph: &CapacityGraph,
    records: &[TreeRecord],
) -> Result<Vec<TreeCut>, Error> {
    let mut cuts = Vec::new();
    for record in records {
        let tree = record_to_tree(graph, record)?;
        cuts.extend(extract_tree_cuts(graph, &tree, None));
    }
    Ok(cuts)
}

/// Top edges by expected congestion, descending.
pub fn critical_edges(graph: &CapacityGraph, expected: &[f64]) -> Vec<CriticalEdge> {
    let mut records: Vec<CriticalEdge> = graph
        .iter_edges()
        .map(|e| CriticalEdge {
            edge: (
                graph.label(e.key.small()).to_string(),
                graph.label(e.key.large()).to_string(),
            ),
            capacity: e.capacity,
            expected_congestion: expected[e.id.to_raw()],
        })
        .collect();
    // Stable sort: ties fall back to canonical edge order.
    records.sort_by(|a, b| b.expected_congestion.total_cmp(&a.expected_congestion));
    records.truncate(TOP_K_EDGES);
    records
}

/// Builds the full report from a mixture, its expected congestion, and the
/// cuts its trees induce.
pub fn assemble_report(
    graph: &CapacityGraph,
    parameters: Parameters,
    trees: Vec<TreeRecord>,
    expected: &[f64],
    cuts: &[TreeCut],
) -> Report {
    let mut ordered: Vec<&TreeCut> = cuts.iter().collect();
    ordered.sort_by(|a, b| a.capacity.total_cmp(&b.capacity));
    let bottleneck_cuts = ordered
        .into_iter()
        .take(TOP_K_CUTS)
        .map(|cut| CutRecord {
            edge: (
                graph.label(cut.edge.0).to_string(),
                graph.label(cut.edge.1).to_string(),
            ),
            capacity: cut.capacity,
            nodes: cut
                .nodes
                .iter()
                .take(MAX_CUT_NODES)
                .map(|&v| graph.label(v).to_string())
                .collect(),
            truncated: cut.nodes.len() > MAX_CUT_NODES,
        })
        .collect();

    Report {
        graph: GraphSummary {
            nodes: graph.vertex_size(),
            edges: graph.edge_size(),
        },
        parameters,
        mixture: MixtureSummary {
            unique_trees: trees.len(),
            total_samples: trees.iter().map(|t| t.count).sum(),
            trees,
        },
        critical_edges: critical_edges(graph, expected),
        bottleneck_cuts,
    }
}
