//! Error types for the regrid workspace.

use thiserror::Error;

/// Errors that can occur while resolving coordinates, cropping or resampling.
#[derive(Error, Debug)]
pub enum RegridError {
    /// A named coordinate variable is missing from the dataset.
    #[error("missing coordinate: {0}")]
    MissingCoordinate(String),

    /// The dimensions selected for an operation are not present.
    #[error("dimensions `{wanted}` not present in field (found: {present})")]
    MissingDimension { wanted: String, present: String },

    /// The dataset carries neither lat/lon coordinates nor projection metadata.
    #[error("no projection information found in dataset")]
    NoProjectionInformation,

    /// The CF grid mapping names a projection this library does not know.
    #[error("unsupported grid mapping: {0}")]
    UnsupportedGridMapping(String),

    /// Malformed or inconsistent dataset metadata.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// The target domain does not overlap the input data.
    #[error("domain bounds {requested} are outside of the input data extent {grid}")]
    DomainBoundsOutsideOfInput { requested: String, grid: String },

    /// The dataset's longitude convention cannot express the requested box.
    #[error("unsupported longitude convention: {0}")]
    UnsupportedLongitudeConvention(String),

    /// The regridding engine failed or rejected the request.
    #[error("regridding engine error: {0}")]
    EngineError(String),

    /// Array shape inconsistent with the declared dimensions.
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl RegridError {
    /// Create a MissingCoordinate error.
    pub fn missing_coordinate(name: impl Into<String>) -> Self {
        Self::MissingCoordinate(name.into())
    }

    /// Create an InvalidMetadata error.
    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Create a DomainBoundsOutsideOfInput error.
    pub fn outside_input(requested: impl Into<String>, grid: impl Into<String>) -> Self {
        Self::DomainBoundsOutsideOfInput {
            requested: requested.into(),
            grid: grid.into(),
        }
    }

    /// Create an EngineError.
    pub fn engine_error(msg: impl Into<String>) -> Self {
        Self::EngineError(msg.into())
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<serde_json::Error> for RegridError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidMetadata(err.to_string())
    }
}

/// Result type for regrid operations.
pub type Result<T> = std::result::Result<T, RegridError>;
