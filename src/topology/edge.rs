use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the morphology graph.
    pub struct EdgeId;
}

/// Data associated with a graph edge.
///
/// Edges are undirected for connectivity purposes; `start` and `end` only
/// record the order in which the endpoints were given.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// Subset the edge is assigned to.
    pub subset: usize,
}

impl EdgeData {
    /// Creates a new edge between two vertices.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, subset: usize) -> Self {
        Self { start, end, subset }
    }

    /// Returns `true` if both endpoints are the same vertex.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}
