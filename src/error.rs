use crate::graph::VertexId;

/// Errors surfaced by graph loading and the congestion pipeline.
///
/// All of these are fatal to the operation that raised them; nothing in the
/// crate retries internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An edge-list line did not have exactly three tokens or carried a
    /// capacity that is not a finite non-negative decimal.
    #[error("malformed edge line: {0:?}")]
    MalformedEdgeLine(String),

    /// Both endpoints of an input edge were the same vertex.
    #[error("self-loop edge on vertex {0:?}")]
    SelfLoopEdge(String),

    /// The merged capacity of an edge came out non-positive.
    #[error("non-positive capacity on edge {u:?} -- {v:?}")]
    NonPositiveCapacity { u: String, v: String },

    /// A parent map did not reach every vertex it covers.
    #[error("parent map does not form a connected tree; unreached: {0:?}")]
    DisconnectedTree(Vec<VertexId>),

    /// The designated root is out of range or has a parent.
    #[error("invalid tree root {0:?}")]
    InvalidRoot(VertexId),

    /// A non-root vertex without a parent turned up during prefix-sum
    /// recomputation.
    #[error("vertex {0:?} has no parent")]
    MissingParent(VertexId),

    /// The graph is not a single connected component.
    #[error("vertex {unreached:?} is unreachable from {root:?}; the graph must be connected")]
    UnreachableRoot { root: String, unreached: String },

    /// A stored mixture referenced a vertex label the graph does not have.
    #[error("unknown vertex label {0:?}")]
    UnknownLabel(String),

    /// The edge list produced a graph with no vertices.
    #[error("the graph has no vertices")]
    EmptyGraph,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
