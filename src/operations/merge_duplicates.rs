use std::collections::{HashMap, HashSet};

use crate::math::{Point3, DEFAULT_DEDUP_THRESHOLD};
use crate::topology::{MorphologyGraph, VertexId};

type CellKey = (i64, i64, i64);

/// Outcome of a [`MergeDuplicateVertices`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Vertices folded into an earlier vertex at (nearly) the same position.
    pub merged_vertices: usize,
    /// Edges dropped because they collapsed to a point or duplicated another edge.
    pub removed_edges: usize,
}

/// Merges vertices whose positions lie within a distance threshold.
///
/// Vertices are visited in creation order; each one is folded into the
/// earliest surviving vertex within `threshold`, keeping that vertex's
/// diameter and subset. Edges are redirected onto survivors, and edges that
/// become zero-length or repeat an existing vertex pair are removed.
///
/// Survivors are pairwise farther apart than `threshold`, so running the
/// pass again changes nothing.
pub struct MergeDuplicateVertices {
    threshold: f64,
}

impl MergeDuplicateVertices {
    /// Creates a new merge pass with the given distance threshold.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.max(0.0),
        }
    }

    /// Executes the merge on `graph`.
    pub fn execute(&self, graph: &mut MorphologyGraph) -> MergeReport {
        let samples: Vec<(VertexId, Point3)> =
            graph.vertices().map(|(id, v)| (id, v.point)).collect();

        let threshold_sq = self.threshold * self.threshold;
        let mut grid: HashMap<CellKey, Vec<(usize, VertexId, Point3)>> = HashMap::new();
        let mut replacement: HashMap<VertexId, VertexId> = HashMap::new();

        for (rank, &(id, point)) in samples.iter().enumerate() {
            let key = self.cell_of(&point);
            let survivor = neighbor_cells(key)
                .filter_map(|cell| grid.get(&cell))
                .flatten()
                .filter(|(_, _, p)| (*p - point).norm_squared() <= threshold_sq)
                .min_by_key(|(r, _, _)| *r)
                .map(|&(_, sid, _)| sid);

            match survivor {
                Some(sid) => {
                    replacement.insert(id, sid);
                }
                None => grid.entry(key).or_default().push((rank, id, point)),
            }
        }

        let mut seen: HashSet<(VertexId, VertexId)> = HashSet::new();
        let mut removed_edges = 0;
        graph.retain_edges(|_, edge| {
            edge.start = replacement.get(&edge.start).copied().unwrap_or(edge.start);
            edge.end = replacement.get(&edge.end).copied().unwrap_or(edge.end);
            let pair = if edge.start <= edge.end {
                (edge.start, edge.end)
            } else {
                (edge.end, edge.start)
            };
            let keep = !edge.is_degenerate() && seen.insert(pair);
            if !keep {
                removed_edges += 1;
            }
            keep
        });

        graph.retain_vertices(|id, _| !replacement.contains_key(&id));

        MergeReport {
            merged_vertices: replacement.len(),
            removed_edges,
        }
    }

    /// Quantizes a point onto a grid whose cells are `threshold` wide.
    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, p: &Point3) -> CellKey {
        let size = if self.threshold > 0.0 {
            self.threshold
        } else {
            f64::MIN_POSITIVE
        };
        (
            (p.x / size).floor() as i64,
            (p.y / size).floor() as i64,
            (p.z / size).floor() as i64,
        )
    }
}

impl Default for MergeDuplicateVertices {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_THRESHOLD)
    }
}

/// The 27 cells surrounding (and including) `key`.
fn neighbor_cells(key: CellKey) -> impl Iterator<Item = CellKey> {
    (-1..=1).flat_map(move |dx: i64| {
        (-1..=1).flat_map(move |dy: i64| {
            (-1..=1).map(move |dz: i64| {
                (
                    key.0.saturating_add(dx),
                    key.1.saturating_add(dy),
                    key.2.saturating_add(dz),
                )
            })
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(graph: &MorphologyGraph) -> (Vec<(Point3, usize)>, Vec<(Point3, Point3, usize)>) {
        let vertices = graph.vertices().map(|(_, v)| (v.point, v.subset)).collect();
        let edges = graph
            .edges()
            .map(|(_, e)| {
                (
                    graph.vertex(e.start).unwrap().point,
                    graph.vertex(e.end).unwrap().point,
                    e.subset,
                )
            })
            .collect();
        (vertices, edges)
    }

    /// Two segments sharing a point, built with one vertex pair per segment.
    fn split_polyline() -> MorphologyGraph {
        let mut graph = MorphologyGraph::new();
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        for w in pts.windows(2) {
            let a = graph.add_vertex(w[0], 1.0, 1);
            let b = graph.add_vertex(w[1], 1.0, 1);
            graph.add_edge(a, b, 1).unwrap();
        }
        graph
    }

    #[test]
    fn shared_endpoints_are_merged() {
        let mut graph = split_polyline();
        let report = MergeDuplicateVertices::default().execute(&mut graph);

        assert_eq!(report.merged_vertices, 1);
        assert_eq!(report.removed_edges, 0);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut graph = split_polyline();
        MergeDuplicateVertices::default().execute(&mut graph);
        let once = snapshot(&graph);

        let report = MergeDuplicateVertices::default().execute(&mut graph);
        assert_eq!(report, MergeReport::default());
        assert_eq!(snapshot(&graph), once);
    }

    #[test]
    fn collapsed_and_parallel_edges_are_removed() {
        let mut graph = MorphologyGraph::new();
        let a = graph.add_vertex(Point3::new(0.0, 0.0, 0.0), 1.0, 1);
        let b = graph.add_vertex(Point3::new(0.0, 0.0, 1e-9), 1.0, 1);
        let c = graph.add_vertex(Point3::new(5.0, 0.0, 0.0), 1.0, 1);
        let d = graph.add_vertex(Point3::new(5.0, 0.0, 0.0), 1.0, 2);
        graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(a, c, 1).unwrap();
        graph.add_edge(d, b, 2).unwrap();

        let report = MergeDuplicateVertices::default().execute(&mut graph);
        assert_eq!(report.merged_vertices, 2);
        assert_eq!(report.removed_edges, 2);
        assert_eq!(graph.edge_count(), 1);
        let (_, edge) = graph.edges().next().unwrap();
        assert_eq!((edge.start, edge.end, edge.subset), (a, c, 1));
    }

    #[test]
    fn earliest_vertex_survives_with_its_attributes() {
        let mut graph = MorphologyGraph::new();
        let first = graph.add_vertex(Point3::new(2.0, 2.0, 2.0), 7.0, 3);
        graph.add_vertex(Point3::new(2.0, 2.0, 2.0 + 5e-7), 1.0, 4);

        MergeDuplicateVertices::default().execute(&mut graph);
        let survivors: Vec<_> = graph.vertices().collect();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].0, first);
        assert!((survivors[0].1.diameter - 7.0).abs() < f64::EPSILON);
        assert_eq!(survivors[0].1.subset, 3);
    }

    #[test]
    fn points_beyond_threshold_stay_apart() {
        let mut graph = MorphologyGraph::new();
        graph.add_vertex(Point3::new(0.0, 0.0, 0.0), 1.0, 1);
        graph.add_vertex(Point3::new(2e-6, 0.0, 0.0), 1.0, 1);

        MergeDuplicateVertices::default().execute(&mut graph);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn zero_threshold_merges_exact_copies_only() {
        let mut graph = MorphologyGraph::new();
        graph.add_vertex(Point3::new(1.0, 2.0, 3.0), 1.0, 1);
        graph.add_vertex(Point3::new(1.0, 2.0, 3.0), 1.0, 1);
        graph.add_vertex(Point3::new(1.0, 2.0, 3.0 + 1e-12), 1.0, 1);

        MergeDuplicateVertices::new(0.0).execute(&mut graph);
        assert_eq!(graph.vertex_count(), 2);
    }
}
