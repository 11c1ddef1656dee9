use std::io::Write;

use crate::error::ExportError;
use crate::topology::MorphologyGraph;

use super::{subset_indices, subset_name, vertex_positions, MeshExporter};

/// UG4 grid (`.ugx`) writer: vertices, edges, a `diameter` vertex attachment
/// and a subset handler with names and colors.
///
/// Subsets are written in ascending index order; the file numbers them by
/// position starting at 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct UgxExporter;

impl MeshExporter for UgxExporter {
    fn extension(&self) -> &'static str {
        "ugx"
    }

    fn write(&self, graph: &MorphologyGraph, out: &mut dyn Write) -> Result<(), ExportError> {
        let positions = vertex_positions(graph);
        let edge_positions: Vec<(usize, usize, usize)> = graph
            .edges()
            .filter_map(|(_, e)| {
                Some((*positions.get(&e.start)?, *positions.get(&e.end)?, e.subset))
            })
            .collect();

        writeln!(out, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(out, r#"<grid name="defGrid">"#)?;

        write!(out, r#"<vertices coords="3">"#)?;
        write_joined(
            out,
            graph
                .vertices()
                .flat_map(|(_, v)| [v.point.x, v.point.y, v.point.z]),
        )?;
        writeln!(out, "</vertices>")?;

        write!(out, "<edges>")?;
        write_joined(out, edge_positions.iter().flat_map(|&(a, b, _)| [a, b]))?;
        writeln!(out, "</edges>")?;

        write!(
            out,
            r#"<vertex_attachment name="diameter" type="double" passOn="0" global="1">"#
        )?;
        write_joined(out, graph.vertices().map(|(_, v)| v.diameter))?;
        writeln!(out, "</vertex_attachment>")?;

        writeln!(out, r#"<subset_handler name="defSH">"#)?;
        for index in subset_indices(graph) {
            let color = graph.subsets().get(index).map(|s| s.color).unwrap_or_default();
            writeln!(
                out,
                r#"<subset name="{}" color="{} {} {} {}" state="0">"#,
                escape_attribute(&subset_name(graph, index)),
                color.r,
                color.g,
                color.b,
                color.a
            )?;

            write!(out, "<vertices>")?;
            write_joined(
                out,
                graph
                    .vertices()
                    .enumerate()
                    .filter(|(_, (_, v))| v.subset == index)
                    .map(|(i, _)| i),
            )?;
            writeln!(out, "</vertices>")?;

            write!(out, "<edges>")?;
            write_joined(
                out,
                edge_positions
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.2 == index)
                    .map(|(i, _)| i),
            )?;
            writeln!(out, "</edges>")?;
            writeln!(out, "</subset>")?;
        }
        writeln!(out, "</subset_handler>")?;
        writeln!(out, "</grid>")?;
        Ok(())
    }
}

fn write_joined<T: std::fmt::Display>(
    out: &mut dyn Write,
    items: impl Iterator<Item = T>,
) -> std::io::Result<()> {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        write!(out, "{item}")?;
    }
    Ok(())
}

fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
