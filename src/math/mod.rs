/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Default distance below which two vertices are considered the same point.
pub const DEFAULT_DEDUP_THRESHOLD: f64 = 1e-6;

/// Default factor applied to all coordinates and diameters (micrometer to meter).
pub const DEFAULT_SCALING: f64 = 1e-6;
