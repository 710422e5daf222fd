//! Error types
//!
//! Degenerate geometry is reported, never turned into NaN.

use thiserror::Error;

/// Errors raised by the geometry core and the triangle compositor
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// Zero-length segment or zero vector passed where a direction is required
    #[error("degenerate geometry: {0} has no direction")]
    DegenerateGeometry(&'static str),
    /// Non-positive (or non-finite) size, width or height
    #[error("invalid dimension: {name} must be positive, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

impl GeometryError {
    /// Check a dimension is a positive finite number
    pub fn check_dimension(name: &'static str, value: f64) -> Result<f64, GeometryError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(GeometryError::InvalidDimension { name, value })
        }
    }
}

/// Errors loading, saving or validating sketch settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not access settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(#[from] GeometryError),
}

/// Errors decoding a newline-delimited serial frame
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("field `{field}` is not a number: {text:?}")]
    NotANumber { field: &'static str, text: String },
    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Errors from a serial transport
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerialError {
    #[error("serial port is not open")]
    NotOpen,
    #[error("serial transport failed: {0}")]
    Transport(String),
}
