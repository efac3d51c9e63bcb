//! Discovers structural weak points in capacitated undirected networks.
//!
//! The crate fits a probability distribution over spanning trees that
//! approximately minimizes worst-case edge congestion when flows are routed
//! through a randomly sampled tree. A multiplicative-weights loop reweights
//! edges and asks a shortest-path-tree oracle for candidate trees; a
//! binary-lifting LCA with path sums prices every graph edge against each
//! candidate in `O((|V| + |E|) log |V|)`. The fitted mixture yields a
//! per-edge expected-congestion score and candidate bottleneck cuts.

pub mod algorithm;
pub mod error;
pub mod graph;
pub mod io;
pub mod report;
pub mod tree;
