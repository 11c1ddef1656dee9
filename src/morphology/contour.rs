use tracing::{debug, warn};

use crate::document::{expect_root, required_attribute, ElementNode};
use crate::error::AttributeError;
use crate::geometry::SamplePoint;

use super::read_points;

/// A traced outline, such as the cell body boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Contour name as given in the document.
    pub name: String,
    /// Raw, unparsed color attribute.
    pub color: String,
    /// Whether the outline is closed.
    pub closed: bool,
    /// Ordered outline samples.
    pub points: Vec<SamplePoint>,
}

/// Reads every `<contour>` child of the document root.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContourBuilder;

impl ContourBuilder {
    /// Creates a new `ContourBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the contours of the document in document order.
    ///
    /// A missing or non-`<mbf>` root is logged and yields no contours.
    ///
    /// # Errors
    ///
    /// Returns an error if a contour lacks `name`, `closed` or `color`, or if
    /// one of its points lacks a numeric `x`, `y`, `z` or `d`.
    pub fn build<N: ElementNode>(&self, root: Option<N>) -> Result<Vec<Contour>, AttributeError> {
        let root = match expect_root(root) {
            Ok(root) => root,
            Err(err) => {
                warn!("{err}; no contours read");
                return Ok(Vec::new());
            }
        };

        root.children_tagged("contour")
            .iter()
            .map(build_contour)
            .collect()
    }
}

fn build_contour<N: ElementNode>(node: &N) -> Result<Contour, AttributeError> {
    let name = required_attribute(node, "name")?.to_owned();
    // Anything but the literal "false" counts as closed.
    let closed = required_attribute(node, "closed")? != "false";
    let color = required_attribute(node, "color")?.to_owned();
    let points = read_points(node)?;
    debug!(%name, closed, points = points.len(), "read contour");

    Ok(Contour {
        name,
        color,
        closed,
        points,
    })
}
