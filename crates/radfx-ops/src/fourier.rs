//! Fourier magnitude spectrum visualization.
//!
//! The 2D DFT is computed as row FFTs followed by column FFTs. Columns are
//! handled by transposing, running row FFTs again and transposing back, so
//! every transform operates on contiguous memory.
//!
//! # Example
//!
//! ```rust
//! use radfx_core::GrayImage;
//! use radfx_ops::fourier::fourier_view;
//!
//! let img = GrayImage::from_fn(24, 16, |x, _| if x % 4 < 2 { 200.0 } else { 10.0 }).unwrap();
//! let spectrum = fourier_view(&img).unwrap();
//! assert_eq!(spectrum.dims(), (24, 16));
//! // Zero frequency sits at the centre and dominates.
//! assert_eq!(spectrum.get(12, 8), 255.0);
//! ```

use radfx_core::GrayImage;
use rustfft::{num_complex::Complex, FftPlanner};
use tracing::trace;

use crate::parallel::transpose;
use crate::range::log_to_display;
use crate::OpsResult;

/// Forward 2D DFT of `image` in row-major order.
pub fn fft2(image: &GrayImage) -> Vec<Complex<f64>> {
    let (width, height) = image.dims();
    let mut planner = FftPlanner::<f64>::new();

    let mut buf: Vec<Complex<f64>> = image
        .data()
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .collect();

    // Rows
    planner.plan_fft_forward(width).process(&mut buf);

    // Columns, as rows of the transpose
    let mut cols = transpose(&buf, width, height);
    planner.plan_fft_forward(height).process(&mut cols);

    transpose(&cols, height, width)
}

/// Moves the zero-frequency term from `(0, 0)` to `(width / 2, height / 2)`.
pub fn fftshift<T: Copy + Default>(data: &[T], width: usize, height: usize) -> Vec<T> {
    let mut out = vec![T::default(); data.len()];
    let (sx, sy) = (width / 2, height / 2);
    for y in 0..height {
        let dy = (y + sy) % height;
        for x in 0..width {
            out[dy * width + (x + sx) % width] = data[y * width + x];
        }
    }
    out
}

/// Centred magnitude `|F|` of the 2D DFT, without log compression.
pub fn magnitude_spectrum(image: &GrayImage) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    let spectrum = fftshift(&fft2(image), width, height);
    let mag = spectrum.iter().map(|c| c.norm()).collect();
    Ok(GrayImage::from_vec(width, height, mag)?)
}

/// Log-compressed, display-scaled magnitude spectrum.
///
/// Any image size is accepted; the output has the input's dimensions.
pub fn fourier_view(image: &GrayImage) -> OpsResult<GrayImage> {
    trace!(width = image.width(), height = image.height(), "fourier_view");
    log_to_display(&magnitude_spectrum(image)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fftshift_odd_and_even() {
        let odd: Vec<u8> = (0..5).collect();
        assert_eq!(fftshift(&odd, 5, 1), vec![3, 4, 0, 1, 2]);
        let even: Vec<u8> = (0..4).collect();
        assert_eq!(fftshift(&even, 1, 4), vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_fft2_dc_term() {
        let img = GrayImage::from_fn(6, 5, |x, y| (x + 2 * y) as f64).unwrap();
        let f = fft2(&img);
        let sum: f64 = img.data().iter().sum();
        assert_abs_diff_eq!(f[0].re, sum, epsilon = 1e-9);
        assert_abs_diff_eq!(f[0].im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fft2_single_frequency() {
        // cos(2πx·2/8) has energy only at u = ±2.
        let img = GrayImage::from_fn(8, 4, |x, _| {
            (2.0 * std::f64::consts::PI * 2.0 * x as f64 / 8.0).cos()
        })
        .unwrap();
        let f = fft2(&img);
        for (i, c) in f.iter().enumerate() {
            let (u, v) = (i % 8, i / 8);
            let expected = if v == 0 && (u == 2 || u == 6) { 16.0 } else { 0.0 };
            assert_abs_diff_eq!(c.norm(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_image_peak_at_centre() {
        let img = GrayImage::filled(7, 6, 128.0).unwrap();
        let out = fourier_view(&img).unwrap();
        assert_eq!(out.get(3, 3), 255.0);
        let others = out
            .data()
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 3 * 7 + 3)
            .all(|(_, &v)| v == 0.0);
        assert!(others);
    }

    #[test]
    fn test_zero_image_is_black() {
        let img = GrayImage::new(5, 5).unwrap();
        let out = fourier_view(&img).unwrap();
        assert!(out.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let img = GrayImage::from_fn(31, 17, |x, y| ((x * 13 + y * 7) % 251) as f64).unwrap();
        let a = fourier_view(&img).unwrap();
        let b = fourier_view(&img).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dims(), (31, 17));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let img = GrayImage::from_fn(8, 8, |x, y| if (x + y) % 2 == 0 { 1e308 } else { -1e308 })
            .unwrap();
        assert!(matches!(fourier_view(&img), Err(crate::OpsError::Unexpected(_))));
    }
}
