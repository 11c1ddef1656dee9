mod assemble;
mod closest_vertex;
mod erase_empty_subsets;
mod merge_duplicates;

pub use assemble::{GraphAssembler, SOMA_CONTOUR_NAME};
pub use closest_vertex::ClosestVertexInSubset;
pub use erase_empty_subsets::EraseEmptySubsets;
pub use merge_duplicates::{MergeDuplicateVertices, MergeReport};
