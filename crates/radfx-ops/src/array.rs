//! Array primitives: padding, kernels and 2D convolution.
//!
//! Every filter in this crate is built from these pieces.
//!
//! # Kernels
//!
//! - [`Kernel::new`] - Arbitrary odd-sized square kernel
//! - [`Kernel::gaussian`] - Normalized Gaussian
//! - [`Kernel::sobel_x`], [`Kernel::sobel_y`] - Sobel derivatives
//!
//! # Example
//!
//! ```rust
//! use radfx_core::GrayImage;
//! use radfx_ops::array::{convolve2d, Kernel};
//!
//! let img = GrayImage::filled(16, 16, 100.0).unwrap();
//! let kernel = Kernel::gaussian(5, 1.4).unwrap();
//! let blurred = convolve2d(&img, &kernel).unwrap();
//! assert_eq!(blurred.dims(), (16, 16));
//! ```

use radfx_core::GrayImage;
use tracing::trace;

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// How [`pad`] fills the border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadMode {
    /// Replicate the nearest edge sample.
    #[default]
    Edge,
    /// Fill with zeros.
    Zero,
}

/// Square convolution kernel with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f64>,
    size: usize,
}

impl Kernel {
    /// Creates a kernel from row-major weights.
    ///
    /// `size` must be odd and `data.len()` must equal `size * size`.
    pub fn new(data: Vec<f64>, size: usize) -> OpsResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "kernel size must be odd, got {}",
                size
            )));
        }
        if data.len() != size * size {
            return Err(OpsError::InvalidParameter(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                size,
                size
            )));
        }
        Ok(Self { data, size })
    }

    /// Creates a normalized Gaussian kernel.
    ///
    /// Weights are `exp(-(x² + y²) / (2σ²))` over offsets centred on the
    /// middle cell, divided by their sum.
    ///
    /// # Example
    ///
    /// ```rust
    /// use radfx_ops::array::Kernel;
    ///
    /// let k = Kernel::gaussian(5, 1.4).unwrap();
    /// assert_eq!(k.size(), 5);
    /// assert!((k.sum() - 1.0).abs() < 1e-9);
    /// ```
    pub fn gaussian(size: usize, sigma: f64) -> OpsResult<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "sigma must be positive, got {}",
                sigma
            )));
        }
        if size == 0 || size % 2 == 0 {
            return Err(OpsError::InvalidParameter(format!(
                "kernel size must be odd, got {}",
                size
            )));
        }

        Ok(Self::gaussian_unchecked(size, sigma))
    }

    /// Gaussian construction for arguments already known to be valid.
    pub(crate) fn gaussian_unchecked(size: usize, sigma: f64) -> Self {
        let half = (size / 2) as i64;
        let sigma2 = 2.0 * sigma * sigma;
        let mut data = Vec::with_capacity(size * size);
        for y in -half..=half {
            for x in -half..=half {
                let d = (x * x + y * y) as f64;
                data.push((-d / sigma2).exp());
            }
        }

        let sum: f64 = data.iter().sum();
        for w in &mut data {
            *w /= sum;
        }

        Self { data, size }
    }

    /// Horizontal Sobel derivative.
    #[rustfmt::skip]
    pub fn sobel_x() -> Self {
        Self {
            data: vec![
                -1.0, 0.0, 1.0,
                -2.0, 0.0, 2.0,
                -1.0, 0.0, 1.0,
            ],
            size: 3,
        }
    }

    /// Vertical Sobel derivative.
    #[rustfmt::skip]
    pub fn sobel_y() -> Self {
        Self {
            data: vec![
                -1.0, -2.0, -1.0,
                 0.0,  0.0,  0.0,
                 1.0,  2.0,  1.0,
            ],
            size: 3,
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Half the side length, rounded down.
    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Row-major weights.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Returns a copy of `image` enlarged by `margin` on every side.
///
/// Fails with [`OpsError::InvalidDimensions`] when `margin` is not smaller
/// than both image dimensions.
pub fn pad(image: &GrayImage, margin: usize, mode: PadMode) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    trace!(width, height, margin, ?mode, "pad");

    if margin >= width || margin >= height {
        return Err(OpsError::InvalidDimensions(format!(
            "margin {} too large for {}x{} image",
            margin, width, height
        )));
    }

    let pw = width + 2 * margin;
    let ph = height + 2 * margin;
    let src = image.data();
    let mut dst = vec![0.0; pw * ph];

    for_each_row(&mut dst, pw, |py, row| {
        let sy = py as isize - margin as isize;
        let row_inside = sy >= 0 && (sy as usize) < height;
        if mode == PadMode::Zero && !row_inside {
            return;
        }
        let sy = sy.clamp(0, height as isize - 1) as usize;
        let src_row = &src[sy * width..(sy + 1) * width];

        for (px, out) in row.iter_mut().enumerate() {
            let sx = px as isize - margin as isize;
            if sx >= 0 && (sx as usize) < width {
                *out = src_row[sx as usize];
            } else if mode == PadMode::Edge {
                *out = src_row[sx.clamp(0, width as isize - 1) as usize];
            }
        }
    });

    Ok(GrayImage::from_vec(pw, ph, dst)?)
}

/// 2D convolution in correlation form (kernel is not flipped).
///
/// The image is edge-padded by the kernel radius, so the output has the same
/// dimensions as the input. Output is unclamped.
///
/// Fails with [`OpsError::InvalidDimensions`] if the kernel is larger than
/// the image in either direction.
pub fn convolve2d(image: &GrayImage, kernel: &Kernel) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    let size = kernel.size();
    trace!(width, height, kernel_size = size, "convolve2d");

    if size > width || size > height {
        return Err(OpsError::InvalidDimensions(format!(
            "{}x{} kernel exceeds {}x{} image",
            size, size, width, height
        )));
    }

    let radius = kernel.radius();
    if radius == 0 {
        let w = kernel.data()[0];
        return Ok(image.map(|v| v * w));
    }

    let padded = pad(image, radius, PadMode::Edge)?;
    let pw = padded.width();
    let src = padded.data();
    let weights = kernel.data();
    let mut dst = vec![0.0; width * height];

    for_each_row(&mut dst, width, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for ky in 0..size {
                let base = (y + ky) * pw + x;
                let krow = &weights[ky * size..(ky + 1) * size];
                for (kx, &w) in krow.iter().enumerate() {
                    sum += src[base + kx] * w;
                }
            }
            *out = sum;
        }
    });

    Ok(GrayImage::from_vec(width, height, dst)?)
}
