//! Row-parallel helpers shared by the filters.
//!
//! With the `parallel` feature (default) rows are distributed over the
//! global rayon pool; without it the same closures run sequentially. Each
//! output row is written by exactly one invocation and every pixel's
//! arithmetic is independent of scheduling, so results are bit-identical in
//! both modes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Fills `dst` row by row, calling `f(y, row)` for each `width`-long row.
pub fn for_each_row<F>(dst: &mut [f64], width: usize, f: F)
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| f(y, row));

    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

/// Transpose row-major data: rows become columns.
///
/// Input:  element at (x, y) is at index `y * width + x`
/// Output: element at (x, y) is at index `x * height + y`
pub fn transpose<T: Copy + Default>(src: &[T], width: usize, height: usize) -> Vec<T> {
    let mut dst = vec![T::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            dst[x * height + y] = src[y * width + x];
        }
    }
    dst
}
