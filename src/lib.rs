//! Conversion of Neurolucida XML neuron morphologies into vertex/edge graphs.
//!
//! Contours (such as the cell body outline) and branching trees are read
//! from an `<mbf>` document, turned into vertices carrying position and
//! diameter, connected by edges, and partitioned into named, colored
//! subsets: one per contour, one per tree. Tree roots are attached to the
//! nearest vertex of the `Cell Body` contour when there is one.
//!
//! ```no_run
//! use nlgraph::{ConversionConfig, Converter};
//!
//! let converter = Converter::new(ConversionConfig::default().with_exports(true, true));
//! if let Some(conversion) = converter.convert_file("cell.xml".as_ref())? {
//!     println!("{} subsets", conversion.graph.subsets().len());
//! }
//! # Ok::<(), nlgraph::NlgraphError>(())
//! ```

pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod export;
pub mod geometry;
pub mod math;
pub mod morphology;
pub mod operations;
pub mod topology;

pub use config::{ConversionConfig, NameStyle};
pub use convert::{Conversion, Converter};
pub use error::{NlgraphError, Result};
pub use topology::MorphologyGraph;
