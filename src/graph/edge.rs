use super::VertexId;

/// ID for edges, which are essentially `usize`.
///
/// Edges are numbered in ascending [`EdgeKey`] order, so iterating a
/// per-edge `Vec` by `EdgeId` visits edges in canonical key order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn new(x: usize) -> Self {
        Self(x)
    }

    pub fn to_raw(&self) -> usize {
        self.0
    }
}

/// Canonical key of an unordered edge: endpoints stored (min, max).
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(VertexId, VertexId);

impl EdgeKey {
    pub fn new(u: VertexId, v: VertexId) -> Self {
        if u <= v {
            Self(u, v)
        } else {
            Self(v, u)
        }
    }

    pub fn small(&self) -> VertexId {
        self.0
    }

    pub fn large(&self) -> VertexId {
        self.1
    }
}

/// Information about a capacitated edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub key: EdgeKey,
    pub capacity: f64,
}
