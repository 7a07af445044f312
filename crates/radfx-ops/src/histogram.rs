//! 256-bin histograms and histogram equalization.
//!
//! Equalization remaps every intensity through the normalized cumulative
//! distribution:
//!
//! ```text
//! lut[v] = floor((cdf[v] - cdf_min) / (N - cdf_min) * 255)
//! ```
//!
//! where `cdf_min` is the first non-zero CDF entry and `N` the pixel count.

use radfx_core::GrayImage;
use tracing::{debug, trace};

/// Number of intensity bins.
pub const BINS: usize = 256;

/// Rounds and clamps a sample to an 8-bit bin index.
#[inline]
pub fn quantize(v: f64) -> usize {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, (BINS - 1) as f64) as usize
}

/// Counts quantized intensities.
pub fn histogram(image: &GrayImage) -> [u64; BINS] {
    let mut hist = [0u64; BINS];
    for &v in image.data() {
        hist[quantize(v)] += 1;
    }
    hist
}

/// Builds the equalization lookup table from a histogram.
///
/// A histogram with a single occupied bin has no spread to redistribute;
/// every entry is 0 in that case.
pub fn equalization_lut(hist: &[u64; BINS]) -> [u8; BINS] {
    let total: u64 = hist.iter().sum();
    let mut cdf = [0u64; BINS];
    let mut acc = 0u64;
    for (c, &h) in cdf.iter_mut().zip(hist) {
        acc += h;
        *c = acc;
    }

    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let mut lut = [0u8; BINS];
    let denom = total.saturating_sub(cdf_min);
    if denom == 0 {
        debug!(total, "single-intensity histogram, equalizing to 0");
        return lut;
    }

    // Integer division is the exact floor of the ratio.
    for (l, &c) in lut.iter_mut().zip(&cdf) {
        let scaled = c.saturating_sub(cdf_min) * 255 / denom;
        *l = scaled.min(255) as u8;
    }
    lut
}

/// Histogram-equalizes `image`.
///
/// Samples are quantized to 0..=255 first. The mapping is monotonically
/// non-decreasing in input intensity.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::histogram::equalize;
///
/// let img = GrayImage::from_vec(4, 1, vec![100.0, 101.0, 102.0, 103.0]).unwrap();
/// let out = equalize(&img);
/// assert_eq!(out.data(), &[0.0, 85.0, 170.0, 255.0]);
/// ```
pub fn equalize(image: &GrayImage) -> GrayImage {
    trace!(width = image.width(), height = image.height(), "equalize");
    let lut = equalization_lut(&histogram(image));
    image.map(|v| lut[quantize(v)] as f64)
}
