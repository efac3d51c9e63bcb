use crate::algorithm::{edge_congestion, shortest_path_tree, tree_capacities};
use crate::error::Error;
use crate::graph::{CapacityGraph, EdgeKey, VertexId};
use crate::tree::{Lca, Tree};
use ahash::RandomState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tracing::{debug, info};

/// Weight updates clamp the exponent so runaway congestion cannot push the
/// multiplicative weights into overflow or underflow.
const MAX_EXPONENT: f64 = 50.0;

/// Knobs of the multiplicative-weights loop.
#[derive(Debug, Clone)]
pub struct MwuParams {
    /// Number of iterations; each contributes one tree sample.
    pub iters: usize,
    /// Candidate roots evaluated per iteration. Must be at least 1.
    pub candidates: usize,
    /// Learning rate of the weight update.
    pub eta: f64,
    /// Seed for candidate-root sampling.
    pub seed: u64,
}

impl Default for MwuParams {
    fn default() -> Self {
        Self {
            iters: 80,
            candidates: 8,
            eta: 0.6,
            seed: 0,
        }
    }
}

/// One unique tree of the fitted mixture.
pub struct MixtureEntry {
    pub tree: Tree,
    /// How many iterations selected a tree with this edge set.
    pub count: u64,
}

/// Result of [`fit`]: the tree mixture, the per-edge expected congestion
/// (indexed by edge id, averaged over iterations), and the congestion scale
/// the run targeted.
pub struct MwuOutcome {
    pub mixture: Vec<MixtureEntry>,
    pub expected_congestion: Vec<f64>,
    pub alpha: f64,
}

/// Congestion scale the update drives trees toward: `10 * log2(n + 1)`.
pub fn congestion_scale(n: usize) -> f64 {
    10.0 * (n as f64 + 1.0).log2()
}

/// Runs the multiplicative-weights loop.
///
/// Each iteration normalizes the edge weights into a distribution, derives
/// Dijkstra lengths `p(e) / capacity(e)`, evaluates `candidates` candidate
/// roots, keeps the tree with the smallest expected congestion under the
/// current distribution (first encountered wins ties), then reweights every
/// edge by `exp(eta * (cong/alpha - 1))`.
///
/// Roots are sampled uniformly: without replacement (one RNG draw per
/// candidate, partial Fisher-Yates) when `candidates <= |V|`, with
/// replacement otherwise. Given identical graph, parameters, and seed the
/// whole run reproduces exactly.
pub fn fit(graph: &CapacityGraph, params: &MwuParams) -> Result<MwuOutcome, Error> {
    assert!(params.candidates > 0, "candidates must be at least 1");
    let n = graph.vertex_size();
    let m = graph.edge_size();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let alpha = congestion_scale(n);
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut weights = vec![1.0f64; m];
    let mut expected = vec![0.0f64; m];
    let mut slots: HashMap<Vec<EdgeKey>, usize, RandomState> =
        HashMap::with_hasher(RandomState::new());
    let mut mixture: Vec<MixtureEntry> = Vec::new();
    let mut scratch: Vec<VertexId> = graph.iter_vertices().collect();

    info!(
        nodes = n,
        edges = m,
        alpha,
        iters = params.iters,
        candidates = params.candidates,
        seed = params.seed,
        "fitting tree mixture"
    );

    for it in 0..params.iters {
        let total: f64 = weights.iter().sum();
        let probs: Vec<f64> = weights.iter().map(|w| w / total).collect();
        let lengths: Vec<f64> = graph
            .iter_edges()
            .map(|e| probs[e.id.to_raw()] / e.capacity)
            .collect();

        let mut best: Option<(f64, Tree, Vec<f64>)> = None;
        for j in 0..params.candidates {
            let root = if params.candidates <= n {
                let pick = rng.gen_range(j..n);
                scratch.swap(j, pick);
                scratch[j]
            } else {
                scratch[rng.gen_range(0..n)]
            };
            let tree = shortest_path_tree(graph, &lengths, root)?;
            let mut lca = Lca::new(&tree);
            let c_t = tree_capacities(graph, &tree, &lca);
            let cong = edge_congestion(graph, &mut lca, &c_t)?;
            let obj: f64 = probs.iter().zip(&cong).map(|(p, c)| p * c).sum();
            debug!(iter = it, candidate = j, root = %graph.label(root), obj, "candidate scored");
            if best.as_ref().map_or(true, |(b, _, _)| obj < *b) {
                best = Some((obj, tree, cong));
            }
        }
        let (obj, tree, cong) = best.unwrap();

        for (w, c) in weights.iter_mut().zip(&cong) {
            let exponent =
                (params.eta * (c / alpha - 1.0)).clamp(-MAX_EXPONENT, MAX_EXPONENT);
            *w *= exponent.exp();
        }
        for (ec, c) in expected.iter_mut().zip(&cong) {
            *ec += c / params.iters as f64;
        }

        let mut sig: Vec<EdgeKey> = tree.edges().map(|(p, c)| EdgeKey::new(p, c)).collect();
        sig.sort();
        match slots.get(&sig) {
            Some(&slot) => mixture[slot].count += 1,
            None => {
                slots.insert(sig, mixture.len());
                mixture.push(MixtureEntry { tree, count: 1 });
            }
        }
        debug!(iter = it, obj, unique_trees = mixture.len(), "iteration finished");
    }

    // Stable sort: equal counts keep first-seen order, which pins the
    // serialized mixture byte-for-byte across runs.
    mixture.sort_by(|a, b| b.count.cmp(&a.count));
    info!(unique_trees = mixture.len(), "mixture fitted");

    Ok(MwuOutcome {
        mixture,
        expected_congestion: expected,
        alpha,
    })
}
