//! # radfx-ops
//!
//! Array primitives and image filters for grayscale radiographs.
//!
//! Every filter takes a [`GrayImage`](radfx_core::GrayImage) by reference and
//! returns a newly allocated image of the same dimensions. Nothing here
//! calls into a vision library; the filters are built from the padding and
//! convolution primitives in [`array`].
//!
//! # Modules
//!
//! - [`array`] - Padding, kernels, 2D convolution
//! - [`range`] - Min-max normalization, display clamping
//! - [`sobel`] - Gradient-magnitude edges
//! - [`gaussian`] - Gaussian blur
//! - [`median`] - Median noise filter
//! - [`histogram`] - Histograms and equalization
//! - [`fourier`] - Magnitude spectrum view
//! - [`dct`] - DCT coefficient view
//! - [`otsu`] - Otsu thresholding
//! - [`canny`] - Canny edge detector
//!
//! # Example
//!
//! ```rust
//! use radfx_core::GrayImage;
//! use radfx_ops::{canny, otsu, sobel};
//!
//! let img = GrayImage::from_fn(32, 32, |x, y| ((x + y) * 4) as f64).unwrap();
//!
//! let edges = sobel::sobel(&img).unwrap();
//! let mask = otsu::otsu(&img);
//! let thin = canny::canny(&img, &canny::CannyParams::default()).unwrap();
//! assert_eq!(edges.dims(), mask.dims());
//! assert_eq!(thin.dims(), img.dims());
//! ```
//!
//! # Features
//!
//! - `parallel` (default): row-parallel convolution and median via rayon.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod array;
pub mod canny;
pub mod dct;
pub mod fourier;
pub mod gaussian;
pub mod histogram;
pub mod median;
pub mod otsu;
pub mod parallel;
pub mod range;
pub mod sobel;

pub use array::{Kernel, PadMode};
pub use error::{OpsError, OpsResult};
