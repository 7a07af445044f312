//! Sobel gradient-magnitude edge detector.

use radfx_core::GrayImage;
use tracing::trace;

use crate::array::{convolve2d, Kernel};
use crate::range::clamp_to_display;
use crate::OpsResult;

/// Horizontal and vertical derivatives of an image plus their magnitude.
#[derive(Debug, Clone)]
pub struct Gradients {
    /// Horizontal derivative (positive where intensity increases to the right).
    pub gx: GrayImage,
    /// Vertical derivative (positive where intensity increases downwards).
    pub gy: GrayImage,
    /// `sqrt(gx² + gy²)`, unclamped.
    pub magnitude: GrayImage,
}

/// Computes Sobel derivatives of `image`.
///
/// Fails with `InvalidDimensions` if the image is smaller than 3×3.
pub fn gradients(image: &GrayImage) -> OpsResult<Gradients> {
    trace!(width = image.width(), height = image.height(), "sobel::gradients");

    let gx = convolve2d(image, &Kernel::sobel_x())?;
    let gy = convolve2d(image, &Kernel::sobel_y())?;

    let mag: Vec<f64> = gx
        .data()
        .iter()
        .zip(gy.data())
        .map(|(&x, &y)| x.hypot(y))
        .collect();
    let magnitude = GrayImage::from_vec(image.width(), image.height(), mag)?;

    Ok(Gradients { gx, gy, magnitude })
}

/// Sobel edge map clamped to the display range.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::sobel::sobel;
///
/// let flat = GrayImage::filled(8, 8, 90.0).unwrap();
/// let edges = sobel(&flat).unwrap();
/// assert!(edges.data().iter().all(|&v| v == 0.0));
/// ```
pub fn sobel(image: &GrayImage) -> OpsResult<GrayImage> {
    let g = gradients(image)?;
    Ok(clamp_to_display(&g.magnitude))
}
