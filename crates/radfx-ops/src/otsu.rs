//! Otsu global thresholding.
//!
//! Picks the threshold `t` maximizing the between-class variance
//! `ω0·ω1·(μ0 − μ1)²`, where class 0 is every intensity `≤ t` and class 1
//! every intensity `> t`. Ties resolve to the smallest `t`.

use radfx_core::{GrayImage, DISPLAY_MAX, DISPLAY_MIN};
use tracing::{debug, trace};

use crate::histogram::{histogram, quantize, BINS};

/// Otsu threshold of a 256-bin histogram.
///
/// When no split separates two non-empty classes with positive variance
/// (the histogram has a single occupied bin, or is empty), the largest
/// occupied intensity is returned so that thresholding yields an
/// all-background image.
pub fn threshold_from_histogram(hist: &[u64; BINS]) -> u8 {
    let total: u64 = hist.iter().sum();
    let weighted_total: u64 = hist.iter().enumerate().map(|(i, &h)| i as u64 * h).sum();

    let mut best_t: Option<usize> = None;
    let mut max_variance = 0.0f64;

    let mut count0 = 0u64;
    let mut sum0 = 0u64;
    for (t, &h) in hist.iter().enumerate() {
        count0 += h;
        sum0 += t as u64 * h;
        let count1 = total - count0;
        if count0 == 0 || count1 == 0 {
            continue;
        }

        let w0 = count0 as f64 / total as f64;
        let w1 = count1 as f64 / total as f64;
        let mu0 = sum0 as f64 / count0 as f64;
        let mu1 = (weighted_total - sum0) as f64 / count1 as f64;
        let variance = w0 * w1 * (mu0 - mu1).powi(2);

        if variance > max_variance {
            max_variance = variance;
            best_t = Some(t);
        }
    }

    match best_t {
        Some(t) => t as u8,
        None => {
            let top = hist.iter().rposition(|&h| h > 0).unwrap_or(0);
            debug!(threshold = top, "no class split, using top intensity");
            top as u8
        }
    }
}

/// Otsu threshold of `image` after quantizing to 0..=255.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    threshold_from_histogram(&histogram(image))
}

/// Binarizes `image` at its Otsu threshold: `≤ t` becomes 0, `> t` becomes 255.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::otsu::{otsu, otsu_threshold};
///
/// let img = GrayImage::from_vec(4, 1, vec![10.0, 12.0, 200.0, 202.0]).unwrap();
/// assert_eq!(otsu_threshold(&img), 12);
/// assert_eq!(otsu(&img).data(), &[0.0, 0.0, 255.0, 255.0]);
/// ```
pub fn otsu(image: &GrayImage) -> GrayImage {
    trace!(width = image.width(), height = image.height(), "otsu");
    let t = otsu_threshold(image) as usize;
    debug!(threshold = t, "otsu threshold");
    image.map(|v| if quantize(v) > t { DISPLAY_MAX } else { DISPLAY_MIN })
}
