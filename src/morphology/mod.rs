mod contour;
mod tree;

pub use contour::{Contour, ContourBuilder};
pub use tree::{Tree, TreeBuilder, TreeEdge};

use crate::document::{required_f64, ElementNode};
use crate::error::AttributeError;
use crate::geometry::SamplePoint;

/// Reads the direct `<point>` children of `node`, in document order.
fn read_points<N: ElementNode>(node: &N) -> Result<Vec<SamplePoint>, AttributeError> {
    node.children_tagged("point")
        .iter()
        .map(read_point)
        .collect()
}

fn read_point<N: ElementNode>(node: &N) -> Result<SamplePoint, AttributeError> {
    let point = SamplePoint::new(
        required_f64(node, "x")?,
        required_f64(node, "y")?,
        required_f64(node, "z")?,
        required_f64(node, "d")?,
    );
    tracing::trace!(
        x = point.position.x,
        y = point.position.y,
        z = point.position.z,
        d = point.diameter,
        "read point"
    );
    Ok(point)
}
