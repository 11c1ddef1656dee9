use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};

use crate::geometry::Rgba;
use crate::operations::EraseEmptySubsets;

use super::MorphologyGraph;

/// Display metadata of one subset.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetInfo {
    /// Human-readable subset name.
    pub name: String,
    /// Display color.
    pub color: Rgba,
}

impl SubsetInfo {
    /// Creates subset metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Mapping from 1-based subset index to its metadata.
#[derive(Debug, Clone, Default)]
pub struct SubsetTable {
    entries: BTreeMap<usize, SubsetInfo>,
}

impl SubsetTable {
    /// Sets the metadata of `index`, replacing any previous entry.
    pub fn insert(&mut self, index: usize, info: SubsetInfo) {
        self.entries.insert(index, info);
    }

    /// Returns the metadata of `index`, if registered.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SubsetInfo> {
        self.entries.get(&index)
    }

    /// Number of registered subsets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no subset is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates subsets in ascending index order.
    pub fn iter(&self) -> btree_map::Iter<'_, usize, SubsetInfo> {
        self.entries.iter()
    }

    /// Rebuilds the table under new indices; entries missing from `mapping` are dropped.
    pub(crate) fn remap(&mut self, mapping: &HashMap<usize, usize>) {
        let old = std::mem::take(&mut self.entries);
        for (index, info) in old {
            if let Some(&new_index) = mapping.get(&index) {
                self.entries.insert(new_index, info);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a SubsetTable {
    type Item = (&'a usize, &'a SubsetInfo);
    type IntoIter = btree_map::Iter<'a, usize, SubsetInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Hands out subset indices from a single counter shared by every pass of a
/// conversion.
///
/// Indices start at 1. After [`compact`](Self::compact) the counter resumes
/// right after the last surviving subset, so numbering stays contiguous.
#[derive(Debug, Clone)]
pub struct SubsetAllocator {
    next: usize,
}

impl SubsetAllocator {
    /// Creates an allocator whose first index is 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns a fresh index and advances the counter.
    pub fn next(&mut self) -> usize {
        let index = self.next;
        self.next += 1;
        index
    }

    /// Returns the index the next call to [`next`](Self::next) would hand out.
    #[must_use]
    pub fn peek(&self) -> usize {
        self.next
    }

    /// Makes `count` the number of indices already handed out.
    pub fn reset_to(&mut self, count: usize) {
        self.next = count + 1;
    }

    /// Removes empty subsets from `graph`, renumbers the survivors to `1..=n`
    /// and resumes counting at `n + 1`.
    ///
    /// Returns the old-to-new index mapping of the surviving subsets.
    pub fn compact(&mut self, graph: &mut MorphologyGraph) -> HashMap<usize, usize> {
        let mapping = EraseEmptySubsets::new().execute(graph);
        self.reset_to(mapping.len());
        mapping
    }
}

impl Default for SubsetAllocator {
    fn default() -> Self {
        Self::new()
    }
}
