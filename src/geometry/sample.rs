use crate::math::Point3;

/// A traced morphology sample: a 3D position with the neurite diameter there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Position of the sample.
    pub position: Point3,
    /// Diameter of the traced structure at this sample.
    pub diameter: f64,
}

impl SamplePoint {
    /// Creates a new sample point.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, diameter: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            diameter,
        }
    }

    /// Returns the sample with position and diameter multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            position: Point3::from(self.position.coords * factor),
            diameter: self.diameter * factor,
        }
    }
}
