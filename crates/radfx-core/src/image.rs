//! Single-channel image buffer.
//!
//! [`GrayImage`] is the only image type the filter engine works with.
//! Color-to-grayscale conversion happens before an image reaches this layer.
//!
//! # Memory Layout
//!
//! Samples are stored in **row-major** order, top-to-bottom, one `f64` per
//! pixel:
//!
//! ```text
//! Memory: [p(0,0) p(0,1) ... p(0,w-1)]  ← Row 0
//!         [p(1,0) p(1,1) ... p(1,w-1)]  ← Row 1
//!         ...
//! ```
//!
//! Display-ready images hold integer intensities in
//! [`DISPLAY_MIN`]..=[`DISPLAY_MAX`]; intermediate results (gradients,
//! spectra) may hold any finite value.
//!
//! # Usage
//!
//! ```rust
//! use radfx_core::GrayImage;
//!
//! let mut img = GrayImage::new(4, 3).unwrap();
//! img.set(2, 1, 200.0);
//! assert_eq!(img.get(2, 1), 200.0);
//! assert_eq!(img.dims(), (4, 3));
//! ```

use crate::{Error, Result};

/// Lowest display intensity.
pub const DISPLAY_MIN: f64 = 0.0;

/// Highest display intensity (8-bit white).
pub const DISPLAY_MAX: f64 = 255.0;

/// Owned grayscale image with `f64` samples.
///
/// Invariant: `width >= 1`, `height >= 1` and `data.len() == width * height`.
/// Every constructor enforces it, so filters never re-check buffer length.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl GrayImage {
    /// Creates a black image.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        check_dims(width, height)?;
        Ok(Self {
            data: vec![0.0; width * height],
            width,
            height,
        })
    }

    /// Creates an image filled with `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self> {
        check_dims(width, height)?;
        Ok(Self {
            data: vec![value; width * height],
            width,
            height,
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<f64>) -> Result<Self> {
        check_dims(width, height)?;
        if data.len() != width * height {
            return Err(Error::DataLength {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Creates an image from 8-bit samples.
    ///
    /// # Example
    ///
    /// ```rust
    /// use radfx_core::GrayImage;
    ///
    /// let img = GrayImage::from_u8(2, 1, &[0, 255]).unwrap();
    /// assert_eq!(img.data(), &[0.0, 255.0]);
    /// ```
    pub fn from_u8(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        Self::from_vec(width, height, data.iter().map(|&v| v as f64).collect())
    }

    /// Creates an image from a slice of rows.
    ///
    /// Fails with [`Error::InvalidDimensions`] if there are no rows, the
    /// rows are empty, or the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        check_dims(width, height)?;

        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::InvalidDimensions(format!(
                    "row {} has {} samples, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, width, height })
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F: FnMut(usize, usize) -> f64>(
        width: usize,
        height: usize,
        mut f: F,
    ) -> Result<Self> {
        check_dims(width, height)?;
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self { data, width, height })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; an image has at least one pixel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    /// Writes the sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.data[y * self.width + x] = value;
    }

    /// Row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Row-major sample buffer.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major sample buffer.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Applies `f` to every sample, producing a new image.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// True if no sample is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Converts to 8-bit samples, rounding and clamping to the display range.
    pub fn to_u8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| v.round().clamp(DISPLAY_MIN, DISPLAY_MAX) as u8)
            .collect()
    }
}

fn check_dims(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions(format!(
            "image must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    width
        .checked_mul(height)
        .ok_or_else(|| Error::InvalidDimensions("image dimensions overflow".into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_is_black() {
        let img = GrayImage::new(3, 2).unwrap();
        assert_eq!(img.dims(), (3, 2));
        assert!(img.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            GrayImage::new(0, 4),
            Err(Error::InvalidDimensions(_))
        ));
        assert!(matches!(
            GrayImage::from_vec(4, 0, vec![]),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let err = GrayImage::from_vec(2, 2, vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            Error::DataLength {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
        assert!(matches!(
            GrayImage::from_rows(&rows),
            Err(Error::InvalidDimensions(_))
        ));

        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(GrayImage::from_rows(&empty).is_err());
    }

    #[test]
    fn test_from_rows_layout() {
        let img = GrayImage::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(img.dims(), (2, 3));
        assert_eq!(img.get(1, 0), 2.0);
        assert_eq!(img.get(0, 2), 5.0);
        assert_eq!(img.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_from_fn_and_min_max() {
        let img = GrayImage::from_fn(4, 4, |x, y| (x + y * 4) as f64).unwrap();
        let (lo, hi) = img.min_max();
        assert_relative_eq!(lo, 0.0);
        assert_relative_eq!(hi, 15.0);
    }

    #[test]
    fn test_to_u8_rounds_and_clamps() {
        let img = GrayImage::from_vec(4, 1, vec![-3.0, 12.4, 12.6, 300.0]).unwrap();
        assert_eq!(img.to_u8(), vec![0, 12, 13, 255]);
    }

    #[test]
    fn test_is_finite() {
        let mut img = GrayImage::new(2, 2).unwrap();
        assert!(img.is_finite());
        img.set(1, 1, f64::NAN);
        assert!(!img.is_finite());
    }

    #[test]
    fn test_buffer_access() {
        let mut img = GrayImage::new(3, 2).unwrap();
        img.data_mut()[4] = 9.0;
        assert_eq!(img.get(1, 1), 9.0);
        assert_eq!(img.into_vec(), vec![0.0, 0.0, 0.0, 0.0, 9.0, 0.0]);
    }
}
