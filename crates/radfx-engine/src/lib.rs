//! # radfx-engine
//!
//! Filter registry and batch executor.
//!
//! A [`FilterConfig`] is loaded once (from YAML or defaults) and turned into
//! an immutable [`FilterRegistry`] that maps every filter name and alias to
//! its fixed configuration. A [`FilterExecutor`] shares that registry and
//! applies any requested subset of filters to one image, collecting a
//! per-filter image or failure plus timings into an [`ExecutionBatch`].
//!
//! ```text
//! caller -> FilterExecutor -> FilterSpec::run -> radfx-ops -> GrayImage
//!                  |
//!                  +-> ExecutionBatch (ordered FilterResults)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use radfx_core::GrayImage;
//! use radfx_engine::{ExecutionMode, FilterConfig, FilterExecutor, FilterRegistry};
//!
//! let registry = Arc::new(FilterRegistry::from_config(&FilterConfig::default()).unwrap());
//! let executor = FilterExecutor::new(registry).with_mode(ExecutionMode::Sequential);
//!
//! let img = GrayImage::from_fn(32, 32, |x, y| ((x * 8) ^ (y * 8)) as f64 % 256.0).unwrap();
//! let batch = executor.apply(&img, &["canny", "otsu"]).unwrap();
//! assert!(batch.all_ok());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod executor;
pub mod registry;

pub use config::FilterConfig;
pub use error::{EngineError, EngineResult};
pub use executor::{
    ExecutionBatch, ExecutionMode, FailureKind, FilterExecutor, FilterFailure, FilterResult,
};
pub use registry::{FilterInfo, FilterKind, FilterParams, FilterRegistry, FilterSpec, OutputType};
