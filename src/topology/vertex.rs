use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the morphology graph.
    pub struct VertexId;
}

/// Data associated with a graph vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Diameter attachment of the vertex.
    pub diameter: f64,
    /// Subset the vertex is assigned to.
    pub subset: usize,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point3, diameter: f64, subset: usize) -> Self {
        Self {
            point,
            diameter,
            subset,
        }
    }
}
