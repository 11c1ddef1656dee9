use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ConversionConfig;
use crate::document::ElementNode;
use crate::error::{DocumentError, Result};
use crate::export::{MeshExporter, ObjExporter, UgxExporter};
use crate::morphology::{ContourBuilder, TreeBuilder};
use crate::operations::GraphAssembler;
use crate::topology::MorphologyGraph;

/// A converted morphology file.
#[derive(Debug)]
pub struct Conversion {
    /// The assembled graph.
    pub graph: MorphologyGraph,
    /// Files written by the enabled exporters, in write order.
    pub written: Vec<PathBuf>,
}

/// Runs the full Neurolucida-to-graph pipeline.
///
/// Each call starts from an empty graph, so one converter can process any
/// number of documents.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConversionConfig,
}

impl Converter {
    /// Creates a converter with the given settings.
    #[must_use]
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Converts a parsed document.
    ///
    /// The contour stage and the tree stage fail independently: a stage that
    /// hits a missing attribute or bad color is logged and contributes
    /// nothing, and the next stage still runs.
    pub fn convert_document<N: ElementNode>(&self, root: Option<N>) -> MorphologyGraph {
        let mut assembler = GraphAssembler::new(self.config.clone());

        match ContourBuilder::new().build(root) {
            Ok(contours) => {
                if let Err(err) = assembler.add_contours(&contours) {
                    warn!("{err}; contours skipped");
                }
            }
            Err(err) => warn!("{err}; contours skipped"),
        }

        match TreeBuilder::new().build(root) {
            Ok(trees) => {
                if let Err(err) = assembler.add_trees(&trees) {
                    warn!("{err}; trees skipped");
                }
            }
            Err(err) => warn!("{err}; trees skipped"),
        }

        assembler.into_graph()
    }

    /// Parses and converts an XML document.
    ///
    /// # Errors
    ///
    /// Returns an error if `xml` is not well-formed.
    pub fn convert_str(&self, xml: &str) -> Result<MorphologyGraph> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, options)
            .map_err(DocumentError::from)?;
        Ok(self.convert_document(Some(doc.root_element())))
    }

    /// Converts the file at `path` and writes the enabled output formats next
    /// to it.
    ///
    /// Returns `Ok(None)` without writing anything if the file cannot be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not well-formed XML or an output file
    /// cannot be written.
    pub fn convert_file(&self, path: &Path) -> Result<Option<Conversion>> {
        let xml = match fs::read_to_string(path) {
            Ok(xml) => xml,
            Err(err) => {
                warn!(path = %path.display(), "{err}; nothing converted");
                return Ok(None);
            }
        };
        info!("{}", self.config);

        let graph = self.convert_str(&xml)?;
        info!(
            path = %path.display(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            subsets = graph.subsets().len(),
            "converted"
        );

        let mut written = Vec::new();
        for exporter in self.exporters() {
            let out = exporter.output_path(path);
            exporter.export(&graph, &out)?;
            info!(path = %out.display(), "wrote mesh");
            written.push(out);
        }
        Ok(Some(Conversion { graph, written }))
    }

    /// The exporters enabled by the configuration, OBJ first.
    #[must_use]
    pub fn exporters(&self) -> Vec<Box<dyn MeshExporter>> {
        let mut exporters: Vec<Box<dyn MeshExporter>> = Vec::new();
        if self.config.export_obj {
            exporters.push(Box::new(ObjExporter));
        }
        if self.config.export_ugx {
            exporters.push(Box::new(UgxExporter));
        }
        exporters
    }
}
