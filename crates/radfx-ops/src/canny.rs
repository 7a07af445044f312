//! Canny edge detector.
//!
//! # Pipeline
//!
//! 1. Gaussian smoothing (unclamped)
//! 2. Sobel gradients, direction quantized to 0°, 45°, 90°, 135°
//! 3. Non-maximum suppression along the gradient direction
//! 4. Double threshold into strong and weak candidates
//! 5. Hysteresis: weak pixels 8-connected to a strong pixel are kept
//!
//! Output is binary: 255 on edges, 0 elsewhere.

use radfx_core::{GrayImage, DISPLAY_MAX};
use tracing::{debug, trace};

use crate::array::Kernel;
use crate::gaussian::{kernel_for, smooth, DEFAULT_KERNEL_SIZE, DEFAULT_SIGMA};
use crate::sobel::{gradients, Gradients};
use crate::{OpsError, OpsResult};

/// Default lower hysteresis threshold.
pub const DEFAULT_LOW_THRESHOLD: f64 = 100.0;
/// Default upper hysteresis threshold.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 200.0;

/// Canny configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CannyParams {
    /// Smoothing standard deviation.
    pub sigma: f64,
    /// Smoothing kernel side (odd).
    pub kernel_size: usize,
    /// Magnitudes in `[low, high)` are weak candidates.
    pub low_threshold: f64,
    /// Magnitudes `>= high` are strong edges.
    pub high_threshold: f64,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            kernel_size: DEFAULT_KERNEL_SIZE,
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl CannyParams {
    /// Checks the thresholds are ordered and non-negative.
    pub fn validate_thresholds(&self) -> OpsResult<()> {
        check_thresholds(self.low_threshold, self.high_threshold)
    }
}

fn check_thresholds(low: f64, high: f64) -> OpsResult<()> {
    if !(low >= 0.0 && high.is_finite()) {
        return Err(OpsError::InvalidParameter(format!(
            "thresholds must be finite and non-negative, got {}/{}",
            low, high
        )));
    }
    if low > high {
        return Err(OpsError::InvalidParameter(format!(
            "low threshold {} exceeds high threshold {}",
            low, high
        )));
    }
    Ok(())
}

/// Runs Canny with `params`, building the smoothing kernel on demand.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::canny::{canny, CannyParams};
///
/// let img = GrayImage::from_fn(32, 32, |x, _| if x < 16 { 0.0 } else { 255.0 }).unwrap();
/// let edges = canny(&img, &CannyParams::default()).unwrap();
/// assert!(edges.data().iter().all(|&v| v == 0.0 || v == 255.0));
/// assert!(edges.data().iter().any(|&v| v == 255.0));
/// ```
pub fn canny(image: &GrayImage, params: &CannyParams) -> OpsResult<GrayImage> {
    params.validate_thresholds()?;
    let kernel = kernel_for(params.kernel_size, params.sigma)?;
    canny_with_kernel(image, &kernel, params.low_threshold, params.high_threshold)
}

/// Runs Canny with a prebuilt smoothing kernel.
pub fn canny_with_kernel(
    image: &GrayImage,
    kernel: &Kernel,
    low: f64,
    high: f64,
) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    trace!(width, height, kernel_size = kernel.size(), low, high, "canny");
    check_thresholds(low, high)?;

    let smoothed = smooth(image, kernel)?;
    let grad = gradients(&smoothed)?;
    let thin = non_max_suppression(&grad);
    let edges = hysteresis(&thin, width, height, low, high);

    let count = edges.iter().filter(|&&e| e).count();
    debug!(edge_pixels = count, "canny edges");

    let data = edges
        .into_iter()
        .map(|e| if e { DISPLAY_MAX } else { 0.0 })
        .collect();
    Ok(GrayImage::from_vec(width, height, data)?)
}

/// Quantized gradient direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Diagonal45,
    Vertical,
    Diagonal135,
}

fn quantize_direction(gx: f64, gy: f64) -> Direction {
    let mut angle = gy.atan2(gx).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }
    if !(22.5..157.5).contains(&angle) {
        Direction::Horizontal
    } else if angle < 67.5 {
        Direction::Diagonal45
    } else if angle < 112.5 {
        Direction::Vertical
    } else {
        Direction::Diagonal135
    }
}

/// Keeps interior magnitudes that are not smaller than both neighbours
/// along the gradient. Border pixels are zero.
fn non_max_suppression(grad: &Gradients) -> Vec<f64> {
    let (width, height) = grad.magnitude.dims();
    let mag = grad.magnitude.data();
    let mut out = vec![0.0; width * height];
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let i = y * width + x;
            let m = mag[i];
            if m == 0.0 {
                continue;
            }
            // y grows downwards.
            let (a, b) = match quantize_direction(grad.gx.data()[i], grad.gy.data()[i]) {
                Direction::Horizontal => (i - 1, i + 1),
                Direction::Diagonal45 => (i - width - 1, i + width + 1),
                Direction::Vertical => (i - width, i + width),
                Direction::Diagonal135 => (i - width + 1, i + width - 1),
            };
            if m >= mag[a] && m >= mag[b] {
                out[i] = m;
            }
        }
    }
    out
}

/// Double threshold followed by transitive 8-connected hysteresis.
fn hysteresis(strength: &[f64], width: usize, height: usize, low: f64, high: f64) -> Vec<bool> {
    let mut edges = vec![false; strength.len()];
    let mut stack = Vec::new();

    for (i, &s) in strength.iter().enumerate() {
        if s >= high && s > 0.0 {
            edges[i] = true;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let (x, y) = (i % width, i / width);
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let j = ny * width + nx;
                if !edges[j] && strength[j] >= low && strength[j] > 0.0 {
                    edges[j] = true;
                    stack.push(j);
                }
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GrayImage {
        GrayImage::from_fn(32, 32, |x, y| {
            if (8..24).contains(&x) && (8..24).contains(&y) {
                200.0
            } else {
                0.0
            }
        })
        .unwrap()
    }

    #[test]
    fn test_output_is_binary() {
        let img = GrayImage::from_fn(40, 30, |x, y| ((x * 41 + y * 97) % 256) as f64).unwrap();
        let out = canny(&img, &CannyParams::default()).unwrap();
        assert_eq!(out.dims(), (40, 30));
        assert!(out.data().iter().all(|&v| v == 0.0 || v == 255.0));
    }

    #[test]
    fn test_square_edges_near_boundary() {
        let out = canny(&square(), &CannyParams::default()).unwrap();
        let mut count = 0;
        for y in 0..32 {
            for x in 0..32 {
                if out.get(x, y) == 255.0 {
                    count += 1;
                    let near_x = (5..=10).contains(&x) || (21..=26).contains(&x);
                    let near_y = (5..=10).contains(&y) || (21..=26).contains(&y);
                    assert!(near_x || near_y, "stray edge at ({x}, {y})");
                }
            }
        }
        assert!(count > 0);
        assert_eq!(out.get(16, 16), 0.0);
        assert_eq!(out.get(0, 0), 0.0);
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let img = GrayImage::filled(16, 16, 90.0).unwrap();
        let out = canny(&img, &CannyParams::default()).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_border_is_zero() {
        let img = GrayImage::from_fn(20, 20, |x, y| ((x ^ y) * 13 % 256) as f64).unwrap();
        let out = canny(&img, &CannyParams::default()).unwrap();
        for i in 0..20 {
            assert_eq!(out.get(i, 0), 0.0);
            assert_eq!(out.get(i, 19), 0.0);
            assert_eq!(out.get(0, i), 0.0);
            assert_eq!(out.get(19, i), 0.0);
        }
    }

    #[test]
    fn test_threshold_order_rejected() {
        let params = CannyParams {
            low_threshold: 250.0,
            high_threshold: 100.0,
            ..CannyParams::default()
        };
        assert!(matches!(
            canny(&square(), &params),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_too_small_for_kernel() {
        let img = GrayImage::new(4, 4).unwrap();
        assert!(matches!(
            canny(&img, &CannyParams::default()),
            Err(OpsError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_direction_quantization() {
        assert_eq!(quantize_direction(1.0, 0.0), Direction::Horizontal);
        assert_eq!(quantize_direction(-1.0, 0.0), Direction::Horizontal);
        assert_eq!(quantize_direction(1.0, 1.0), Direction::Diagonal45);
        assert_eq!(quantize_direction(-1.0, -1.0), Direction::Diagonal45);
        assert_eq!(quantize_direction(0.0, 1.0), Direction::Vertical);
        assert_eq!(quantize_direction(-1.0, 1.0), Direction::Diagonal135);
        assert_eq!(quantize_direction(1.0, -1.0), Direction::Diagonal135);
    }

    #[test]
    fn test_hysteresis_is_transitive() {
        // One strong pixel at the end of a long weak chain.
        let w = 12;
        let mut s = vec![0.0; w * 3];
        for x in 1..11 {
            s[w + x] = 150.0;
        }
        s[w + 1] = 250.0;
        // Isolated weak pixel, not connected.
        s[2 * w + 11] = 150.0;
        s[w + 10] = 0.0;

        let edges = hysteresis(&s, w, 3, 100.0, 200.0);
        for x in 1..10 {
            assert!(edges[w + x], "chain pixel {x} should be promoted");
        }
        assert!(!edges[2 * w + 11]);
        assert!(!edges[w + 10]);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let w = 4;
        let mut s = vec![0.0; 16];
        s[0] = 210.0;
        s[5] = 120.0;
        s[10] = 120.0;
        s[15] = 120.0;
        let edges = hysteresis(&s, w, 4, 100.0, 200.0);
        assert!(edges[0] && edges[5] && edges[10] && edges[15]);
        assert_eq!(edges.iter().filter(|&&e| e).count(), 4);
    }
}
