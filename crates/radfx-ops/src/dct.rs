//! Orthonormal 2D DCT-II visualization.
//!
//! Each 1D transform uses Makhoul's reordering: even samples ascending,
//! odd samples descending, one complex FFT of the same length, then a
//! quarter-sample twiddle. Scaling is orthonormal:
//!
//! ```text
//! C[k] = s(k) * Σ x[n] cos(π k (2n + 1) / 2N)
//! s(0) = sqrt(1/N), s(k) = sqrt(2/N) otherwise
//! ```

use std::f64::consts::PI;

use radfx_core::GrayImage;
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::trace;

use crate::parallel::transpose;
use crate::range::log_to_display;
use crate::OpsResult;

/// Applies the orthonormal DCT-II to every `len`-long line of `data` in place.
fn dct_lines(data: &mut [f64], len: usize, planner: &mut FftPlanner<f64>) {
    let fft = planner.plan_fft_forward(len);
    let n = len as f64;
    let twiddles: Vec<Complex<f64>> = (0..len)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            Complex::from_polar(scale, -PI * k as f64 / (2.0 * n))
        })
        .collect();

    let mut buf = vec![Complex::new(0.0, 0.0); len];
    for line in data.chunks_mut(len) {
        let half = len.div_ceil(2);
        for i in 0..half {
            buf[i] = Complex::new(line[2 * i], 0.0);
        }
        for i in 0..len / 2 {
            buf[len - 1 - i] = Complex::new(line[2 * i + 1], 0.0);
        }

        fft.process(&mut buf);

        for ((out, v), w) in line.iter_mut().zip(&buf).zip(&twiddles) {
            *out = (v * w).re;
        }
    }
}

/// Orthonormal 2D DCT-II, rows then columns.
pub fn dct2(image: &GrayImage) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    let mut planner = FftPlanner::new();

    let mut rows = image.data().to_vec();
    dct_lines(&mut rows, width, &mut planner);

    let mut cols = transpose(&rows, width, height);
    dct_lines(&mut cols, height, &mut planner);

    Ok(GrayImage::from_vec(width, height, transpose(&cols, height, width))?)
}

/// Direct O(N²) orthonormal DCT-II of one sequence.
pub fn dct_ii_direct(x: &[f64]) -> Vec<f64> {
    let n = x.len() as f64;
    (0..x.len())
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            let sum: f64 = x
                .iter()
                .enumerate()
                .map(|(i, &v)| v * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
                .sum();
            scale * sum
        })
        .collect()
}

/// Direct 2D DCT-II built from [`dct_ii_direct`].
pub fn dct2_direct(image: &GrayImage) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    let rows: Vec<f64> = image
        .data()
        .chunks(width)
        .flat_map(dct_ii_direct)
        .collect();
    let cols: Vec<f64> = transpose(&rows, width, height)
        .chunks(height)
        .flat_map(dct_ii_direct)
        .collect();
    Ok(GrayImage::from_vec(width, height, transpose(&cols, height, width))?)
}

/// Log-compressed, display-scaled DCT coefficient magnitudes.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::dct::dct_view;
///
/// let img = GrayImage::filled(8, 8, 100.0).unwrap();
/// let view = dct_view(&img).unwrap();
/// // All energy is in the DC coefficient.
/// assert_eq!(view.get(0, 0), 255.0);
/// assert_eq!(view.get(5, 3), 0.0);
/// ```
pub fn dct_view(image: &GrayImage) -> OpsResult<GrayImage> {
    trace!(width = image.width(), height = image.height(), "dct_view");
    let coeffs = dct2(image)?;
    log_to_display(&coeffs.map(f64::abs))
}
