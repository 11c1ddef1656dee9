use std::fmt;

use crate::geometry::Rgba;
use crate::math::{DEFAULT_DEDUP_THRESHOLD, DEFAULT_SCALING};

/// How subset names are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameStyle {
    /// `Contour<sep>1:<sep>'Cell Body'<sep>(Closed:<sep>'true')`.
    Verbose,
    /// `Contour_1_CellBody_true`, safe for downstream tools that split on spaces.
    #[default]
    Slug,
}

/// Settings for one morphology conversion.
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Factor applied to every coordinate and diameter.
    pub scaling: f64,
    /// Inserted between the parts of verbose subset names.
    pub separator: String,
    /// Subset naming style.
    pub name_style: NameStyle,
    /// Vertices closer than this are merged.
    pub dedup_threshold: f64,
    /// Subset color used when an element has no `#RRGGBB` color.
    pub default_color: Rgba,
    /// Write a Wavefront OBJ file next to the input.
    pub export_obj: bool,
    /// Write a UGX grid file next to the input.
    pub export_ugx: bool,
}

impl ConversionConfig {
    #[must_use]
    pub fn with_scaling(mut self, scaling: f64) -> Self {
        self.scaling = scaling;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    #[must_use]
    pub fn with_name_style(mut self, name_style: NameStyle) -> Self {
        self.name_style = name_style;
        self
    }

    #[must_use]
    pub fn with_dedup_threshold(mut self, threshold: f64) -> Self {
        self.dedup_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_exports(mut self, obj: bool, ugx: bool) -> Self {
        self.export_obj = obj;
        self.export_ugx = ugx;
        self
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            scaling: DEFAULT_SCALING,
            separator: String::new(),
            name_style: NameStyle::default(),
            dedup_threshold: DEFAULT_DEDUP_THRESHOLD,
            default_color: Rgba::default(),
            export_obj: false,
            export_ugx: true,
        }
    }
}

impl fmt::Display for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Neurolucida conversion settings:")?;
        writeln!(f, "\tScaling: '{}'", self.scaling)?;
        writeln!(f, "\tSeparator: '{}'", self.separator)?;
        writeln!(f, "\tName style: '{:?}'", self.name_style)?;
        writeln!(f, "\tDedup threshold: '{}'", self.dedup_threshold)?;
        write!(
            f,
            "\tExports: obj={}, ugx={}",
            self.export_obj, self.export_ugx
        )
    }
}
