use thiserror::Error;

/// Top-level error type for the morphology converter.
#[derive(Debug, Error)]
pub enum NlgraphError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the structure of the morphology document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("document has no root element")]
    MissingRoot,

    #[error("root element is <{found}>, expected <mbf>")]
    WrongRoot { found: String },
}

/// Errors raised when a required attribute is absent or unusable.
#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("<{element}> is missing required attribute `{attribute}`")]
    Missing {
        element: String,
        attribute: &'static str,
    },

    #[error("<{element}> attribute `{attribute}` = {value:?} is not a number")]
    InvalidNumber {
        element: String,
        attribute: &'static str,
        value: String,
    },
}

/// Errors raised while decoding a `#RRGGBB` color string.
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("color {raw:?} contains non-hex digits")]
    InvalidHex { raw: String },

    #[error("color {raw:?} is too short for three channels")]
    Truncated { raw: String },
}

/// Errors related to graph bookkeeping.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("subset {0} is not registered")]
    UnknownSubset(usize),
}

/// Errors raised by mesh exporters.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write mesh: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`NlgraphError`].
pub type Result<T> = std::result::Result<T, NlgraphError>;
