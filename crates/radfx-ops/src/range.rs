//! Value range mapping: min-max normalization and display clamping.

use radfx_core::{GrayImage, DISPLAY_MAX, DISPLAY_MIN};
use tracing::trace;

use crate::{OpsError, OpsResult};

/// Linearly rescales `image` so its minimum maps to `lo` and maximum to `hi`.
///
/// A constant image has no range to stretch and maps every pixel to `lo`.
/// Non-finite samples are not treated as degenerate: they stay non-finite
/// in the output.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::range::normalize_to_range;
///
/// let img = GrayImage::from_vec(3, 1, vec![10.0, 20.0, 30.0]).unwrap();
/// let out = normalize_to_range(&img, 0.0, 255.0);
/// assert_eq!(out.data(), &[0.0, 127.5, 255.0]);
/// ```
pub fn normalize_to_range(image: &GrayImage, lo: f64, hi: f64) -> GrayImage {
    let (min, max) = image.min_max();
    trace!(min, max, lo, hi, "normalize_to_range");

    let span = max - min;
    if span == 0.0 {
        return image.map(|_| lo);
    }
    if span.is_infinite() && min.is_finite() && max.is_finite() {
        // max - min overflowed; work in half units.
        let scale = (hi - lo) / (max / 2.0 - min / 2.0);
        return image.map(|v| lo + (v / 2.0 - min / 2.0) * scale);
    }
    let scale = (hi - lo) / span;
    image.map(|v| lo + (v - min) * scale)
}

/// Clips samples to the display range and rounds to whole intensities.
pub fn clamp_to_display(image: &GrayImage) -> GrayImage {
    image.map(|v| v.clamp(DISPLAY_MIN, DISPLAY_MAX).round())
}

/// Clips samples to the display range, keeping fractional values.
pub fn clip_to_display(image: &GrayImage) -> GrayImage {
    image.map(|v| v.clamp(DISPLAY_MIN, DISPLAY_MAX))
}

/// `ln(1 + x)` on every sample, stretched to the display range.
///
/// Shared tail of the spectrum views. A magnitude that overflowed to
/// infinity or NaN is an [`OpsError::Unexpected`].
pub(crate) fn log_to_display(magnitude: &GrayImage) -> OpsResult<GrayImage> {
    if !magnitude.is_finite() {
        return Err(OpsError::Unexpected(
            "spectrum magnitude overflowed to a non-finite value".into(),
        ));
    }
    let compressed = magnitude.map(f64::ln_1p);
    Ok(clamp_to_display(&normalize_to_range(&compressed, DISPLAY_MIN, DISPLAY_MAX)))
}
