use std::io::Write;

use crate::error::ExportError;
use crate::topology::MorphologyGraph;

use super::{subset_indices, subset_name, vertex_positions, MeshExporter};

/// Wavefront OBJ writer: vertices plus one line-element group per subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjExporter;

impl MeshExporter for ObjExporter {
    fn extension(&self) -> &'static str {
        "obj"
    }

    fn write(&self, graph: &MorphologyGraph, out: &mut dyn Write) -> Result<(), ExportError> {
        let positions = vertex_positions(graph);

        for (_, v) in graph.vertices() {
            writeln!(out, "v {} {} {}", v.point.x, v.point.y, v.point.z)?;
        }

        for index in subset_indices(graph) {
            writeln!(out, "g {}", subset_name(graph, index))?;
            for (_, e) in graph.edges_in_subset(index) {
                if let (Some(a), Some(b)) = (positions.get(&e.start), positions.get(&e.end)) {
                    writeln!(out, "l {} {}", a + 1, b + 1)?;
                }
            }
        }
        Ok(())
    }
}
