use crate::error::TopologyError;
use crate::math::Point3;
use crate::topology::{MorphologyGraph, VertexId};

/// Finds the vertex of a subset nearest to a query point.
pub struct ClosestVertexInSubset {
    subset: usize,
    point: Point3,
}

impl ClosestVertexInSubset {
    /// Creates a new `ClosestVertexInSubset` query.
    #[must_use]
    pub fn new(subset: usize, point: Point3) -> Self {
        Self { subset, point }
    }

    /// Executes the query. Ties resolve to the earliest-created vertex.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownSubset`] if the subset has no vertices.
    pub fn execute(&self, graph: &MorphologyGraph) -> Result<VertexId, TopologyError> {
        let mut best: Option<(VertexId, f64)> = None;
        for (id, v) in graph.vertices_in_subset(self.subset) {
            let d = (v.point - self.point).norm_squared();
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
            .ok_or(TopologyError::UnknownSubset(self.subset))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn picks_nearest_in_subset_only() {
        let mut graph = MorphologyGraph::new();
        graph.add_vertex(Point3::new(0.0, 0.0, 0.0), 1.0, 1);
        let near = graph.add_vertex(Point3::new(4.0, 0.0, 0.0), 1.0, 1);
        graph.add_vertex(Point3::new(5.0, 0.0, 0.0), 1.0, 2);

        let found = ClosestVertexInSubset::new(1, Point3::new(5.0, 0.0, 0.0))
            .execute(&graph)
            .unwrap();
        assert_eq!(found, near);
    }

    #[test]
    fn empty_subset_is_an_error() {
        let graph = MorphologyGraph::new();
        let err = ClosestVertexInSubset::new(3, Point3::origin())
            .execute(&graph)
            .unwrap_err();
        assert!(matches!(err, TopologyError::UnknownSubset(3)));
    }
}
