//! Error types used by the crate.

use terrella_types::{Unprojectable, ValidationError};
use thiserror::Error;

use crate::handler::GeometryType;

/// Failure to build a geography from a geometry event stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    /// A geometry type that the active constructor cannot build.
    #[error("unexpected geometry type: {0:?}")]
    UnexpectedGeometry(GeometryType),

    /// A ring was sent to a constructor that does not build polygons.
    #[error("unexpected ring in {0} input")]
    UnexpectedRing(&'static str),

    /// A loop of a polygon failed validation.
    #[error("Loop {index} is not valid: {reason}")]
    InvalidLoop {
        /// Ordinal of the loop within the polygon being built.
        index: usize,
        /// Validation diagnostic.
        reason: ValidationError,
    },

    /// The assembled polygon failed validation.
    #[error("polygon is not valid: {0}")]
    InvalidPolygon(ValidationError),

    /// The event stream is not well nested.
    #[error("malformed event stream: {0}")]
    MalformedStream(&'static str),

    /// A coordinate could not be converted to a point on the sphere.
    #[error(transparent)]
    Unprojectable(#[from] Unprojectable),
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Boundary model code outside of `{0, 1, 2}`.
    #[error("invalid value for {field}: {value} (expected 0, 1 or 2)")]
    InvalidModel {
        /// Name of the option.
        field: &'static str,
        /// Offending value.
        value: i64,
    },

    /// Snap level outside of the supported range.
    #[error("invalid snap level: {0} (expected 0 to 30)")]
    InvalidSnapLevel(i64),

    /// Bounding box tessellation detail below one.
    #[error("invalid detail: {0} (expected at least 1)")]
    InvalidDetail(i64),

    /// Tessellation tolerance that is not a positive number.
    #[error("invalid tessellation tolerance: {0}")]
    InvalidTolerance(f64),
}

/// An operation that is not supported for the given geography.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperationError {
    /// The operation requires a different kind of geography.
    #[error("{operation} is not supported for {kind} geography")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
        /// Kind of the geography the operation was called for.
        kind: &'static str,
    },

    /// The operation requires a single geometry, but the geography contains several.
    #[error("{operation} requires a single {kind}, found {count}")]
    NotSingle {
        /// Name of the operation.
        operation: &'static str,
        /// Expected kind of the geometry.
        kind: &'static str,
        /// Number of geometries found.
        count: usize,
    },
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum TerrellaError {
    /// Building a feature failed.
    #[error("{}{source}", .feature.map(|f| format!("feature {f}: ")).unwrap_or_default())]
    Construction {
        /// Index of the feature in the input, if known.
        feature: Option<usize>,
        /// What went wrong.
        source: ConstructionError,
    },
    /// Invalid configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Unsupported operation.
    #[error(transparent)]
    Operation(#[from] OperationError),
    /// Error reported by the source or sink of the events.
    #[error("source error: {0}")]
    Source(String),
    /// The operation was interrupted through a cancellation token.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<ConstructionError> for TerrellaError {
    fn from(source: ConstructionError) -> Self {
        Self::Construction {
            feature: None,
            source,
        }
    }
}

impl From<geozero::error::GeozeroError> for TerrellaError {
    fn from(value: geozero::error::GeozeroError) -> Self {
        Self::Source(value.to_string())
    }
}
