//! # radfx-core
//!
//! Core types for radiograph filtering.
//!
//! This crate provides the foundational types used throughout radfx:
//!
//! - [`GrayImage`] - Row-major single-channel `f64` image buffer
//! - [`DISPLAY_MIN`], [`DISPLAY_MAX`] - 8-bit display range
//! - [`Error`], [`Result`] - Shape and construction errors
//!
//! ## Crate Structure
//!
//! ```text
//! radfx-core (this crate)
//!    ^
//!    |
//!    +-- radfx-ops (array primitives, filters)
//!    +-- radfx-engine (registry, executor)
//!    +-- radfx-cli (PNG decode, batch output)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{GrayImage, DISPLAY_MAX, DISPLAY_MIN};
