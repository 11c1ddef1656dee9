use std::collections::{BTreeSet, HashMap};

use crate::topology::MorphologyGraph;

/// Drops subsets that no vertex or edge is assigned to and renumbers the
/// remaining ones to `1..=n`, preserving their relative order.
#[derive(Default)]
pub struct EraseEmptySubsets;

impl EraseEmptySubsets {
    /// Creates a new `EraseEmptySubsets` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation, returning the old-to-new index mapping of the
    /// surviving subsets.
    pub fn execute(&self, graph: &mut MorphologyGraph) -> HashMap<usize, usize> {
        let used: BTreeSet<usize> = graph
            .vertices()
            .map(|(_, v)| v.subset)
            .chain(graph.edges().map(|(_, e)| e.subset))
            .collect();

        let mapping: HashMap<usize, usize> = used
            .iter()
            .enumerate()
            .map(|(i, &old)| (old, i + 1))
            .collect();

        graph.reassign_subsets(|s| mapping.get(&s).copied().unwrap_or(s));
        graph.subsets_mut().remap(&mapping);
        mapping
    }
}
