mod color;
mod sample;

pub use color::{ColorResolver, Rgba, STANDARD_PALETTE};
pub use sample::SamplePoint;
