//! Error types for radfx-core operations.
//!
//! # Usage
//!
//! ```rust
//! use radfx_core::{Error, GrayImage, Result};
//!
//! fn build(rows: Vec<Vec<f64>>) -> Result<GrayImage> {
//!     GrayImage::from_rows(&rows)
//! }
//!
//! let err = build(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions(_)));
//! ```
//!
//! # Used By
//!
//! - [`crate::image::GrayImage`] - Construction and shape checks
//! - `radfx-ops` - Wrapped into `OpsError`
//! - `radfx-cli` - PNG decoding into a [`GrayImage`](crate::GrayImage)

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or inspecting an image buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Image shape is invalid.
    ///
    /// Returned for zero-sized images and for row sets whose rows differ
    /// in length.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Pixel buffer length does not match `width * height`.
    #[error("data length mismatch: expected {expected} samples, got {actual}")]
    DataLength {
        /// Expected number of samples
        expected: usize,
        /// Actual number of samples
        actual: usize,
    },
}
