//! Error types for configuration loading and batch execution.
//!
//! Per-filter failures are not errors at this level; they are recorded on
//! the [`FilterResult`](crate::FilterResult) of the offending filter. An
//! [`EngineError`] means the whole call could not proceed.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that abort a configuration load or a whole batch.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Source image is unusable (non-finite samples, too large).
    #[error("invalid source image: {0}")]
    InvalidSource(String),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Config file not found.
    #[error("config file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// I/O error reading config files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
