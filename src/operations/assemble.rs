use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::config::{ConversionConfig, NameStyle};
use crate::error::Result;
use crate::geometry::{ColorResolver, Rgba, SamplePoint};
use crate::morphology::{Contour, Tree};
use crate::operations::{ClosestVertexInSubset, MergeDuplicateVertices, MergeReport};
use crate::topology::{MorphologyGraph, SubsetAllocator, SubsetInfo, VertexId};

/// Name of the contour that outlines the soma.
pub const SOMA_CONTOUR_NAME: &str = "Cell Body";

/// Turns contours and trees into a subset-annotated vertex/edge graph.
///
/// Contours must be added before trees: tree subsets are numbered after the
/// contour subsets, and soma attachment looks up tree subsets by offset from
/// the end of the numbering.
#[derive(Debug)]
pub struct GraphAssembler {
    config: ConversionConfig,
    colors: ColorResolver,
    graph: MorphologyGraph,
    allocator: SubsetAllocator,
    soma: Option<usize>,
}

impl GraphAssembler {
    /// Creates an assembler with an empty graph.
    #[must_use]
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            colors: ColorResolver::new(config.default_color),
            config,
            graph: MorphologyGraph::new(),
            allocator: SubsetAllocator::new(),
            soma: None,
        }
    }

    /// Discards everything accumulated so far.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.allocator = SubsetAllocator::new();
        self.soma = None;
    }

    /// Returns the graph built so far.
    #[must_use]
    pub fn graph(&self) -> &MorphologyGraph {
        &self.graph
    }

    /// Consumes the assembler, returning the finished graph.
    #[must_use]
    pub fn into_graph(self) -> MorphologyGraph {
        self.graph
    }

    /// Returns the subset holding the soma contour, if one was added.
    #[must_use]
    pub fn soma_subset(&self) -> Option<usize> {
        self.soma
    }

    /// Returns the subset index counter.
    #[must_use]
    pub fn allocator(&self) -> &SubsetAllocator {
        &self.allocator
    }

    /// Adds one subset per contour, then merges duplicate vertices and drops
    /// empty subsets.
    ///
    /// A closed contour of `n` points yields `n - 1` segments, an open one
    /// `n - 2`; each segment gets its own vertex pair, which the merge pass
    /// folds together.
    ///
    /// # Errors
    ///
    /// Returns an error if a contour color is malformed. Colors are checked
    /// before anything is added, so the graph is unchanged on error.
    pub fn add_contours(&mut self, contours: &[Contour]) -> Result<()> {
        let colors = self.resolve_colors(contours.iter().map(|c| c.color.as_str()))?;

        let mut indices = Vec::with_capacity(contours.len());
        for (ordinal, (contour, color)) in contours.iter().zip(colors).enumerate() {
            let index = self.allocator.next();
            indices.push(index);
            if contour.name == SOMA_CONTOUR_NAME {
                self.soma = Some(index);
            }

            let name = self.contour_name(ordinal + 1, contour);
            debug!(index, %name, "contour subset");
            self.graph
                .subsets_mut()
                .insert(index, SubsetInfo::new(name, color));

            let segments = if contour.closed {
                contour.points.len().saturating_sub(1)
            } else {
                contour.points.len().saturating_sub(2)
            };
            for pair in contour.points.windows(2).take(segments) {
                let a = self.add_sample(pair[0], index);
                let b = self.add_sample(pair[1], index);
                self.graph.add_edge(a, b, index)?;
            }
        }

        let report = self.merge();
        self.drop_edgeless_subsets(&indices)?;
        self.compact();
        info!(
            contours = contours.len(),
            subsets = self.graph.subsets().len(),
            merged = report.merged_vertices,
            soma = ?self.soma,
            "contours assembled"
        );
        Ok(())
    }

    /// Adds one subset per tree, merges duplicates, drops empty subsets and,
    /// if a soma contour was added, connects every tree root to the soma.
    ///
    /// # Errors
    ///
    /// Returns an error if a tree color is malformed. Colors are checked
    /// before anything is added, so the graph is unchanged on error.
    pub fn add_trees(&mut self, trees: &[Tree]) -> Result<()> {
        let colors = self.resolve_colors(trees.iter().map(|t| t.color.as_str()))?;

        let mut indices = Vec::with_capacity(trees.len());
        for (ordinal, (tree, color)) in trees.iter().zip(colors).enumerate() {
            let index = self.allocator.next();
            for &point in &tree.points {
                self.add_sample(point, index);
            }
            let name = self.tree_name(ordinal + 1, tree);
            debug!(index, %name, points = tree.points.len(), "tree subset");
            self.graph
                .subsets_mut()
                .insert(index, SubsetInfo::new(name, color));
            indices.push(index);
        }

        // Connectivity gets its own vertices; the merge folds them onto the
        // point vertices above.
        for (tree, &index) in trees.iter().zip(&indices) {
            for edge in &tree.edges {
                let a = self.add_sample(edge.from, index);
                let b = self.add_sample(edge.to, index);
                self.graph.add_edge(a, b, index)?;
            }
        }

        let report = self.settle();
        info!(
            trees = trees.len(),
            subsets = self.graph.subsets().len(),
            merged = report.merged_vertices,
            "trees assembled"
        );

        if self.soma.is_some() {
            self.attach_to_soma(trees)?;
        }
        Ok(())
    }

    /// Connects the first edge start of every tree to the nearest soma vertex.
    ///
    /// The connecting edge of the `i`-th tree (1-based) goes to subset
    /// `next - tree_count - 1 + i`, where `next` is the first unused subset
    /// index; with contiguous numbering that is the tree's own subset.
    fn attach_to_soma(&mut self, trees: &[Tree]) -> Result<()> {
        let Some(soma) = self.soma else {
            return Ok(());
        };
        let next = self.allocator.peek();

        for (i, tree) in trees.iter().enumerate() {
            let tree_index = i + 1;
            let Some(root) = tree.root() else {
                warn!(tree_index, "tree has no edges; not attached to soma");
                continue;
            };
            let Some(subset) = (next + tree_index)
                .checked_sub(trees.len() + 1)
                .filter(|&s| s > 0)
            else {
                warn!(tree_index, "no subset left for soma connection");
                continue;
            };

            let root = root.scaled(self.config.scaling);
            let closest = match ClosestVertexInSubset::new(soma, root.position)
                .execute(&self.graph)
            {
                Ok(v) => v,
                Err(err) => {
                    warn!(tree_index, "{err}; not attached to soma");
                    continue;
                }
            };
            let vertex = self.graph.add_vertex(root.position, root.diameter, subset);
            self.graph.add_edge(vertex, closest, subset)?;
            debug!(tree_index, subset, "attached tree to soma");
        }

        let report = self.settle();
        info!(
            trees = trees.len(),
            merged = report.merged_vertices,
            "soma attached"
        );
        Ok(())
    }

    /// Merges duplicate vertices and compacts the subset numbering.
    fn settle(&mut self) -> MergeReport {
        let report = self.merge();
        self.compact();
        report
    }

    fn merge(&mut self) -> MergeReport {
        MergeDuplicateVertices::new(self.config.dedup_threshold).execute(&mut self.graph)
    }

    fn compact(&mut self) {
        let mapping = self.allocator.compact(&mut self.graph);
        self.soma = self.soma.and_then(|s| mapping.get(&s).copied());
    }

    /// Empties every subset in `indices` that lost all its edges.
    ///
    /// Vertices no edge uses are removed. A vertex that another subset's edge
    /// still uses moves to that edge's subset.
    fn drop_edgeless_subsets(&mut self, indices: &[usize]) -> Result<()> {
        let edgeless: HashSet<usize> = indices
            .iter()
            .copied()
            .filter(|&i| self.graph.edges_in_subset(i).next().is_none())
            .collect();
        if edgeless.is_empty() {
            return Ok(());
        }

        let mut used: HashMap<VertexId, usize> = HashMap::new();
        for (_, edge) in self.graph.edges() {
            used.entry(edge.start).or_insert(edge.subset);
            used.entry(edge.end).or_insert(edge.subset);
        }
        let adopted: Vec<(VertexId, usize)> = self
            .graph
            .vertices()
            .filter(|(_, v)| edgeless.contains(&v.subset))
            .filter_map(|(id, _)| used.get(&id).map(|&subset| (id, subset)))
            .collect();
        for (id, subset) in adopted {
            self.graph.vertex_mut(id)?.subset = subset;
        }
        self.graph
            .retain_vertices(|id, v| !edgeless.contains(&v.subset) || used.contains_key(&id));

        debug!(subsets = ?edgeless, "dropped contours without edges");
        Ok(())
    }

    fn add_sample(&mut self, sample: SamplePoint, subset: usize) -> VertexId {
        let sample = sample.scaled(self.config.scaling);
        self.graph.add_vertex(sample.position, sample.diameter, subset)
    }

    fn resolve_colors<'a>(&self, raw: impl Iterator<Item = &'a str>) -> Result<Vec<Rgba>> {
        raw.map(|c| self.colors.resolve(c).map_err(Into::into))
            .collect()
    }

    fn contour_name(&self, ordinal: usize, contour: &Contour) -> String {
        let sep = &self.config.separator;
        match self.config.name_style {
            NameStyle::Verbose => format!(
                "Contour{sep}{ordinal}:{sep}'{}'{sep}(Closed:{sep}'{}')",
                contour.name, contour.closed
            ),
            NameStyle::Slug => format!(
                "Contour_{ordinal}_{}_{}",
                strip_whitespace(&contour.name),
                contour.closed
            ),
        }
    }

    fn tree_name(&self, ordinal: usize, tree: &Tree) -> String {
        let sep = &self.config.separator;
        match self.config.name_style {
            NameStyle::Verbose => format!(
                "Tree{sep}{ordinal}:{sep}'{}'{sep}(Leaf:{sep}'{}')",
                tree.kind, tree.leaf
            ),
            NameStyle::Slug => format!(
                "Tree_{ordinal}_{}_{}",
                strip_whitespace(&tree.kind),
                tree.leaf
            ),
        }
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::NlgraphError;
    use crate::math::Point3;
    use crate::morphology::TreeEdge;

    fn unscaled() -> ConversionConfig {
        ConversionConfig::default().with_scaling(1.0)
    }

    fn sample(x: f64, y: f64) -> SamplePoint {
        SamplePoint::new(x, y, 0.0, 1.0)
    }

    fn contour(name: &str, closed: bool, points: &[(f64, f64)]) -> Contour {
        Contour {
            name: name.into(),
            color: "#0000FF".into(),
            closed,
            points: points.iter().map(|&(x, y)| sample(x, y)).collect(),
        }
    }

    fn polyline_tree(kind: &str, points: &[(f64, f64)]) -> Tree {
        let points: Vec<SamplePoint> = points.iter().map(|&(x, y)| sample(x, y)).collect();
        let edges = points.windows(2).map(|w| TreeEdge::new(w[0], w[1])).collect();
        Tree {
            kind: kind.into(),
            leaf: "EndPoint".into(),
            color: "#FF8000".into(),
            points,
            edges,
        }
    }

    fn square() -> Contour {
        contour(
            SOMA_CONTOUR_NAME,
            true,
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        )
    }

    fn has_edge(graph: &MorphologyGraph, a: Point3, b: Point3) -> bool {
        graph.edges().any(|(_, e)| {
            let s = graph.vertex(e.start).unwrap().point;
            let t = graph.vertex(e.end).unwrap().point;
            (s == a && t == b) || (s == b && t == a)
        })
    }

    #[test]
    fn open_contour_skips_last_segment() {
        let mut asm = GraphAssembler::new(unscaled());
        let pts = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)];
        asm.add_contours(&[contour("Outline", false, &pts)]).unwrap();

        let graph = asm.graph();
        assert_eq!(graph.edge_count(), pts.len() - 2);
        assert_eq!(graph.vertex_count(), pts.len() - 1);
        assert!(!has_edge(graph, Point3::new(4.0, 0.0, 0.0), Point3::origin()));
        assert!(!has_edge(
            graph,
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0)
        ));
    }

    #[test]
    fn closed_contour_connects_consecutive_points() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[square()]).unwrap();

        let graph = asm.graph();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(asm.soma_subset(), Some(1));
    }

    #[test]
    fn empty_contour_subsets_are_dropped() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[
            contour("A", true, &[(0.0, 0.0), (1.0, 0.0)]),
            contour("B", true, &[(5.0, 5.0)]),
            contour("C", false, &[(7.0, 0.0), (8.0, 0.0)]),
            contour("D Outline", false, &[(0.0, 3.0), (1.0, 3.0), (2.0, 3.0)]),
        ])
        .unwrap();

        let graph = asm.graph();
        let names: Vec<(usize, &str)> = graph
            .subsets()
            .iter()
            .map(|(&i, s)| (i, s.name.as_str()))
            .collect();
        assert_eq!(
            names,
            vec![(1, "Contour_1_A_true"), (2, "Contour_4_DOutline_false")]
        );
        for index in 1..=2 {
            assert!(graph.vertices_in_subset(index).count() > 0);
            assert!(graph.edges_in_subset(index).count() > 0);
        }
        assert_eq!(asm.allocator().peek(), 3);
    }

    #[test]
    fn collapsed_contour_segment_drops_its_subset() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[
            contour("Dot", true, &[(1.0, 1.0), (1.0, 1.0)]),
            contour("Line", true, &[(0.0, 0.0), (2.0, 0.0)]),
        ])
        .unwrap();

        let graph = asm.graph();
        let names: Vec<&str> = graph.subsets().iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, vec!["Contour_2_Line_true"]);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.vertices().all(|(_, v)| v.subset == 1));
    }

    #[test]
    fn collapsed_contour_vertex_shared_with_another_contour_moves_over() {
        let mut asm = GraphAssembler::new(unscaled());
        // The dot's vertex is created first, so it survives the merge and
        // carries the line's endpoint.
        asm.add_contours(&[
            contour("Dot", true, &[(1.0, 1.0), (1.0, 1.0)]),
            contour("Line", true, &[(0.0, 0.0), (1.0, 1.0)]),
        ])
        .unwrap();

        let graph = asm.graph();
        let names: Vec<&str> = graph.subsets().iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, vec!["Contour_2_Line_true"]);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.vertices_in_subset(1).count(), 2);
        assert_eq!(graph.edges_in_subset(1).count(), 1);
    }

    #[test]
    fn collapsed_soma_is_forgotten() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[contour(SOMA_CONTOUR_NAME, true, &[(3.0, 3.0), (3.0, 3.0)])])
            .unwrap();
        assert!(asm.graph().subsets().is_empty());
        assert_eq!(asm.graph().vertex_count(), 0);
        assert_eq!(asm.soma_subset(), None);
    }

    #[test]
    fn unbranched_tree_without_soma() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[]).unwrap();
        asm.add_trees(&[polyline_tree("axon", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])])
            .unwrap();

        let graph = asm.graph();
        assert_eq!(graph.subsets().len(), 1);
        let info = graph.subsets().get(1).unwrap();
        assert_eq!(info.name, "Tree_1_axon_EndPoint");
        assert_eq!(info.color, Rgba::new(1.0, 128.0 / 255.0, 0.0, 1.0));
        assert_eq!(graph.edges_in_subset(1).count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn tree_root_attaches_to_nearest_soma_corner() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[square()]).unwrap();
        asm.add_trees(&[polyline_tree(
            "Dendrite",
            &[(12.0, 12.0), (20.0, 20.0), (30.0, 30.0)],
        )])
        .unwrap();

        let graph = asm.graph();
        let total = asm.allocator().peek();
        let expected_subset = total - 1 - 1 + 1;
        assert_eq!(expected_subset, 2);

        let corner = Point3::new(10.0, 10.0, 0.0);
        let root = Point3::new(12.0, 12.0, 0.0);
        let attach: Vec<_> = graph
            .edges()
            .filter(|(_, e)| {
                let s = graph.vertex(e.start).unwrap().point;
                let t = graph.vertex(e.end).unwrap().point;
                (s == root && t == corner) || (s == corner && t == root)
            })
            .collect();
        assert_eq!(attach.len(), 1);
        assert_eq!(attach[0].1.subset, expected_subset);

        // 4 soma corners + 3 tree points; the attachment vertex merged into the root.
        assert_eq!(graph.vertex_count(), 7);
        assert_eq!(graph.edge_count(), 3 + 2 + 1);
        assert_eq!(graph.subsets().len(), 2);
    }

    #[test]
    fn soma_index_follows_compaction() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[contour("Empty", true, &[]), square()])
            .unwrap();
        assert_eq!(asm.soma_subset(), Some(1));

        asm.add_trees(&[
            polyline_tree("Axon", &[(-3.0, -1.0), (-9.0, -9.0)]),
            polyline_tree("Apical", &[(11.0, 1.0), (19.0, 1.0)]),
        ])
        .unwrap();

        let graph = asm.graph();
        assert!(has_edge(graph, Point3::new(-3.0, -1.0, 0.0), Point3::origin()));
        assert!(has_edge(
            graph,
            Point3::new(11.0, 1.0, 0.0),
            Point3::new(10.0, 0.0, 0.0)
        ));
        assert_eq!(graph.edges_in_subset(2).count(), 2);
        assert_eq!(graph.edges_in_subset(3).count(), 2);
    }

    #[test]
    fn tree_subsets_follow_contour_subsets() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[contour("Outline", true, &[(50.0, 0.0), (60.0, 0.0)])])
            .unwrap();
        asm.add_trees(&[
            polyline_tree("Axon", &[(0.0, 0.0), (1.0, 0.0)]),
            polyline_tree("Dendrite", &[(0.0, 5.0), (1.0, 5.0)]),
        ])
        .unwrap();

        let names: Vec<String> = asm
            .graph()
            .subsets()
            .iter()
            .map(|(_, s)| s.name.clone())
            .collect();
        assert_eq!(
            names,
            vec!["Contour_1_Outline_true", "Tree_1_Axon_EndPoint", "Tree_2_Dendrite_EndPoint"]
        );
        assert_eq!(asm.soma_subset(), None);
    }

    #[test]
    fn verbose_names_use_separator() {
        let config = unscaled()
            .with_name_style(NameStyle::Verbose)
            .with_separator(" ");
        let mut asm = GraphAssembler::new(config);
        asm.add_contours(&[square()]).unwrap();
        asm.add_trees(&[polyline_tree("Apical Dendrite", &[(20.0, 0.0), (30.0, 0.0)])])
            .unwrap();

        let graph = asm.graph();
        assert_eq!(
            graph.subsets().get(1).unwrap().name,
            "Contour 1: 'Cell Body' (Closed: 'true')"
        );
        assert_eq!(
            graph.subsets().get(2).unwrap().name,
            "Tree 1: 'Apical Dendrite' (Leaf: 'EndPoint')"
        );
    }

    #[test]
    fn scaling_applies_to_positions_and_diameters() {
        let mut asm = GraphAssembler::new(ConversionConfig::default());
        asm.add_trees(&[polyline_tree("Axon", &[(0.0, 0.0), (10.0, 0.0)])])
            .unwrap();

        let far = asm
            .graph()
            .vertices()
            .map(|(_, v)| v)
            .find(|v| v.point.x > 0.0)
            .unwrap();
        assert!((far.point.x - 1e-5).abs() < 1e-15);
        assert!((far.diameter - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn bad_color_leaves_graph_untouched() {
        let mut asm = GraphAssembler::new(unscaled());
        let mut bad = square();
        bad.color = "#GG0000".into();

        let err = asm.add_contours(&[bad]).unwrap_err();
        assert!(matches!(err, NlgraphError::Color(_)));
        assert_eq!(asm.graph().vertex_count(), 0);
        assert!(asm.graph().subsets().is_empty());
        assert_eq!(asm.soma_subset(), None);
    }

    #[test]
    fn assembled_graph_is_merge_stable() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[square()]).unwrap();
        asm.add_trees(&[polyline_tree("Axon", &[(12.0, 0.0), (20.0, 0.0)])])
            .unwrap();

        let mut graph = asm.into_graph();
        let report = MergeDuplicateVertices::default().execute(&mut graph);
        assert_eq!(report, MergeReport::default());
    }

    #[test]
    fn reset_starts_numbering_over() {
        let mut asm = GraphAssembler::new(unscaled());
        asm.add_contours(&[square()]).unwrap();
        asm.reset();

        assert_eq!(asm.graph().vertex_count(), 0);
        assert_eq!(asm.soma_subset(), None);
        assert_eq!(asm.allocator().peek(), 1);

        asm.add_trees(&[polyline_tree("Axon", &[(0.0, 0.0), (1.0, 0.0)])])
            .unwrap();
        assert_eq!(asm.graph().subsets().len(), 1);
        assert_eq!(asm.graph().edges_in_subset(1).count(), 1);
    }
}
