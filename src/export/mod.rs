mod obj;
mod ugx;

pub use obj::ObjExporter;
pub use ugx::UgxExporter;

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::topology::{MorphologyGraph, VertexId};

/// Serializes a [`MorphologyGraph`] to one file format.
pub trait MeshExporter {
    /// File extension, without the leading dot.
    fn extension(&self) -> &'static str;

    /// Writes `graph` to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, graph: &MorphologyGraph, out: &mut dyn Write) -> Result<(), ExportError>;

    /// Returns `input` with its extension replaced by this format's.
    fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(self.extension())
    }

    /// Writes `graph` to the file at `path`, replacing it if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    fn export(&self, graph: &MorphologyGraph, path: &Path) -> Result<(), ExportError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(graph, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// 0-based position of every vertex in creation order.
fn vertex_positions(graph: &MorphologyGraph) -> HashMap<VertexId, usize> {
    graph
        .vertices()
        .enumerate()
        .map(|(i, (id, _))| (id, i))
        .collect()
}

/// Every subset that is registered or has members, ascending.
fn subset_indices(graph: &MorphologyGraph) -> BTreeSet<usize> {
    graph
        .subsets()
        .iter()
        .map(|(&i, _)| i)
        .chain(graph.vertices().map(|(_, v)| v.subset))
        .chain(graph.edges().map(|(_, e)| e.subset))
        .collect()
}

fn subset_name(graph: &MorphologyGraph, index: usize) -> String {
    graph
        .subsets()
        .get(index)
        .map_or_else(|| format!("subset_{index}"), |s| s.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_replaces_extension() {
        let path = ObjExporter.output_path(Path::new("data/cell.v2.xml"));
        assert_eq!(path, PathBuf::from("data/cell.v2.obj"));
        let path = UgxExporter.output_path(Path::new("cell"));
        assert_eq!(path, PathBuf::from("cell.ugx"));
    }
}
