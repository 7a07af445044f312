//! Median (rank-order) noise filter.

use radfx_core::GrayImage;
use tracing::trace;

use crate::array::{pad, PadMode};
use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// Default window side.
pub const DEFAULT_WINDOW: usize = 5;

/// Replaces each pixel with the median of its `window`×`window`
/// neighbourhood, using edge replication at the borders.
///
/// Output values are always drawn from the input. `window` must be odd and
/// no larger than either image dimension.
///
/// # Example
///
/// ```rust
/// use radfx_core::GrayImage;
/// use radfx_ops::median::median_filter;
///
/// let mut img = GrayImage::filled(7, 7, 50.0).unwrap();
/// img.set(3, 3, 255.0); // salt
/// let out = median_filter(&img, 3).unwrap();
/// assert_eq!(out.get(3, 3), 50.0);
/// ```
pub fn median_filter(image: &GrayImage, window: usize) -> OpsResult<GrayImage> {
    let (width, height) = image.dims();
    trace!(width, height, window, "median_filter");

    if window == 0 || window % 2 == 0 {
        return Err(OpsError::InvalidParameter(format!(
            "median window must be odd, got {}",
            window
        )));
    }
    if window > width || window > height {
        return Err(OpsError::InvalidDimensions(format!(
            "{}x{} window exceeds {}x{} image",
            window, window, width, height
        )));
    }

    let radius = window / 2;
    let padded = pad(image, radius, PadMode::Edge)?;
    let pw = padded.width();
    let src = padded.data();
    let mid = window * window / 2;
    let mut dst = vec![0.0; width * height];

    for_each_row(&mut dst, width, |y, row| {
        let mut values = Vec::with_capacity(window * window);
        for (x, out) in row.iter_mut().enumerate() {
            values.clear();
            for ky in 0..window {
                let start = (y + ky) * pw + x;
                values.extend_from_slice(&src[start..start + window]);
            }
            let (_, median, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
            *out = *median;
        }
    });

    Ok(GrayImage::from_vec(width, height, dst)?)
}
