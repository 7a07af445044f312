//! Error types for filter operations.

use thiserror::Error;

/// Error type for filter operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Image is too small for the operation, or its shape is inconsistent.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value (even kernel size, non-positive sigma, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other computation fault.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl From<radfx_core::Error> for OpsError {
    fn from(err: radfx_core::Error) -> Self {
        match err {
            radfx_core::Error::InvalidDimensions(msg) => OpsError::InvalidDimensions(msg),
            other => OpsError::InvalidDimensions(other.to_string()),
        }
    }
}

/// Result type for filter operations.
pub type OpsResult<T> = Result<T, OpsError>;
