//! Gaussian blur.
//!
//! The default 5×5, σ = 1.4 kernel is built once per process and shared.
//!
//! # Example
//!
//! ```rust
//! use radfx_core::GrayImage;
//! use radfx_ops::gaussian::{gaussian_blur, DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA};
//!
//! let img = GrayImage::from_fn(16, 16, |x, y| ((x * 7 + y * 3) % 256) as f64).unwrap();
//! let blurred = gaussian_blur(&img, DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA).unwrap();
//! assert_eq!(blurred.dims(), img.dims());
//! ```

use std::sync::OnceLock;

use radfx_core::GrayImage;
use tracing::trace;

use crate::array::{convolve2d, Kernel};
use crate::range::clip_to_display;
use crate::{OpsError, OpsResult};

/// Standard deviation used by the blur and by Canny's smoothing stage.
pub const DEFAULT_SIGMA: f64 = 1.4;

/// Side length of the default kernel.
pub const DEFAULT_KERNEL_SIZE: usize = 5;

static DEFAULT_KERNEL: OnceLock<Kernel> = OnceLock::new();

/// The 5×5, σ = 1.4 kernel, computed on first use.
pub fn default_kernel() -> &'static Kernel {
    DEFAULT_KERNEL
        .get_or_init(|| Kernel::gaussian_unchecked(DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA))
}

/// Builds the kernel for `(size, sigma)`, reusing the cached default.
pub fn kernel_for(size: usize, sigma: f64) -> OpsResult<Kernel> {
    if size == DEFAULT_KERNEL_SIZE && sigma == DEFAULT_SIGMA {
        return Ok(default_kernel().clone());
    }
    Kernel::gaussian(size, sigma)
}

/// Convolves with `kernel` without clamping.
///
/// This is the smoothing stage Canny uses.
pub fn smooth(image: &GrayImage, kernel: &Kernel) -> OpsResult<GrayImage> {
    convolve2d(image, kernel)
}

/// Blurs with a prebuilt kernel and clips to the display range.
///
/// Samples keep their fractional part, so a constant image comes back
/// as the same constant.
pub fn blur_with_kernel(image: &GrayImage, kernel: &Kernel) -> OpsResult<GrayImage> {
    trace!(
        width = image.width(),
        height = image.height(),
        kernel_size = kernel.size(),
        "gaussian::blur_with_kernel"
    );
    Ok(clip_to_display(&smooth(image, kernel)?))
}

/// Gaussian blur with a `size`×`size` kernel of standard deviation `sigma`.
///
/// Even sizes and non-positive sigmas are rejected with
/// [`OpsError::InvalidParameter`].
pub fn gaussian_blur(image: &GrayImage, size: usize, sigma: f64) -> OpsResult<GrayImage> {
    if size % 2 == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "gaussian kernel size must be odd, got {}",
            size
        )));
    }
    let kernel = kernel_for(size, sigma)?;
    blur_with_kernel(image, &kernel)
}
