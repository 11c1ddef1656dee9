use tracing::{debug, warn};

use crate::document::{expect_root, required_attribute, ElementNode};
use crate::error::AttributeError;
use crate::geometry::SamplePoint;

use super::read_points;

/// A connection between two samples of a tree, before any vertex exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEdge {
    pub from: SamplePoint,
    pub to: SamplePoint,
}

impl TreeEdge {
    /// Creates a new tree edge.
    #[must_use]
    pub fn new(from: SamplePoint, to: SamplePoint) -> Self {
        Self { from, to }
    }
}

/// A traced neurite: a root polyline plus every nested branch, flattened.
///
/// `points` holds every sample in visitation order. Because branches hang off
/// earlier samples, consecutive points are not necessarily adjacent; the
/// connectivity lives in `edges`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// The tree's `type` attribute (e.g. `Axon`, `Dendrite`).
    pub kind: String,
    /// The tree's `leaf` attribute.
    pub leaf: String,
    /// Raw, unparsed color attribute.
    pub color: String,
    /// Every sample of the tree, in visitation order.
    pub points: Vec<SamplePoint>,
    /// Every connection of the tree, in visitation order.
    pub edges: Vec<TreeEdge>,
}

impl Tree {
    /// Returns the start of the first edge, where the tree meets the soma.
    #[must_use]
    pub fn root(&self) -> Option<SamplePoint> {
        self.edges.first().map(|e| e.from)
    }

    /// Appends `samples` as a polyline, linking its first sample to `anchor`.
    fn push_polyline(&mut self, anchor: Option<SamplePoint>, samples: &[SamplePoint]) {
        if let (Some(anchor), Some(&first)) = (anchor, samples.first()) {
            self.edges.push(TreeEdge::new(anchor, first));
        }
        self.edges
            .extend(samples.windows(2).map(|w| TreeEdge::new(w[0], w[1])));
        self.points.extend_from_slice(samples);
    }
}

/// Reads every `<tree>` child of the document root, following `<branch>`
/// nesting to any depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    /// Creates a new `TreeBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the trees of the document in document order.
    ///
    /// A missing or non-`<mbf>` root is logged and yields no trees.
    ///
    /// # Errors
    ///
    /// Returns an error if a tree lacks `type`, `leaf` or `color`, or if any
    /// point of the tree or its branches lacks a numeric `x`, `y`, `z` or `d`.
    pub fn build<N: ElementNode>(&self, root: Option<N>) -> Result<Vec<Tree>, AttributeError> {
        let root = match expect_root(root) {
            Ok(root) => root,
            Err(err) => {
                warn!("{err}; no trees read");
                return Ok(Vec::new());
            }
        };

        root.children_tagged("tree").iter().map(build_tree).collect()
    }
}

fn build_tree<N: ElementNode>(node: &N) -> Result<Tree, AttributeError> {
    let samples = read_points(node)?;
    let mut tree = Tree {
        kind: required_attribute(node, "type")?.to_owned(),
        leaf: required_attribute(node, "leaf")?.to_owned(),
        color: required_attribute(node, "color")?.to_owned(),
        points: Vec::with_capacity(samples.len()),
        edges: Vec::new(),
    };
    tree.push_polyline(None, &samples);

    let branches = node.children_tagged("branch");
    if branches.is_empty() {
        debug!(kind = %tree.kind, "tree has no branches");
    }
    process_branches(&mut tree, branches, samples.last().copied())?;

    debug!(
        kind = %tree.kind,
        points = tree.points.len(),
        edges = tree.edges.len(),
        "read tree"
    );
    Ok(tree)
}

/// Walks `branches` depth-first in document order.
///
/// Each branch links its first sample to the anchor it hangs off; its own
/// sub-branches hang off its last sample, or off the inherited anchor when
/// the branch has no samples. An explicit stack keeps arbitrarily deep
/// nesting off the call stack.
fn process_branches<N: ElementNode>(
    tree: &mut Tree,
    branches: Vec<N>,
    anchor: Option<SamplePoint>,
) -> Result<(), AttributeError> {
    let mut pending: Vec<(N, Option<SamplePoint>)> =
        branches.into_iter().rev().map(|b| (b, anchor)).collect();

    while let Some((branch, anchor)) = pending.pop() {
        let local = read_points(&branch)?;
        tree.push_polyline(anchor, &local);

        let next_anchor = local.last().copied().or(anchor);
        pending.extend(
            branch
                .children_tagged("branch")
                .into_iter()
                .rev()
                .map(|b| (b, next_anchor)),
        );
    }
    Ok(())
}
