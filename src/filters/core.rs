//! Core utilities shared by the transform stages.
//!
//! This module provides:
//! - The fixed Savitzky-Golay derivative kernel
//! - Edge-truncating (clamped) index mapping
//! - Rounding that matches the vote-coordinate convention
//! - Views over flat row-major buffers

use ndarray::ArrayView2;

use crate::error::{Error, Result};

/// Side length of the derivative kernel.
pub const KERNEL_SIZE: usize = 5;

/// Distance from the kernel centre to its edge.
pub const KERNEL_HALF: usize = KERNEL_SIZE / 2;

/// Least-squares third-order 2D Savitzky-Golay estimate of `d/dx`.
///
/// Rows are y offsets `-2..=2`, columns are x offsets `-2..=2`. The
/// `d/dy` kernel is the transpose. The coefficients are tabulated to four
/// decimals and every detection threshold downstream is calibrated to these
/// exact values.
pub const SAVGOL_DX: [[f64; KERNEL_SIZE]; KERNEL_SIZE] = [
    [0.0738, -0.1048, 0.0, 0.1048, -0.0738],
    [-0.0119, -0.1476, 0.0, 0.1476, 0.0119],
    [-0.0405, -0.1619, 0.0, 0.1619, 0.0405],
    [-0.0119, -0.1476, 0.0, 0.1476, 0.0119],
    [0.0738, -0.1048, 0.0, 0.1048, -0.0738],
];

/// Sum of the squared kernel coefficients, `Σ K²`.
///
/// Scales pixel noise into the standard deviation of one gradient
/// component.
pub fn kernel_sum_of_squares() -> f64 {
    SAVGOL_DX.iter().flatten().map(|k| k * k).sum()
}

/// Map a possibly out-of-range index onto `[0, len)` by replicating the
/// nearest edge sample.
///
/// `len` must be non-zero.
#[inline]
pub fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Round to the nearest integer, halves away from zero, and clamp onto
/// `[0, len)`.
#[inline]
pub fn round_clamped(v: f64, len: usize) -> usize {
    (v.round() as isize).clamp(0, len as isize - 1) as usize
}

/// View a flat row-major buffer of `width * height` samples as an image.
///
/// A product that overflows `usize` is reported as a size mismatch.
pub fn flat_image_view<T>(data: &[T], width: usize, height: usize) -> Result<ArrayView2<'_, T>> {
    let mismatch = |expected| Error::SizeMismatch {
        expected,
        actual: data.len(),
    };
    let expected = width.checked_mul(height).ok_or_else(|| mismatch(usize::MAX))?;
    if data.len() != expected {
        return Err(mismatch(expected));
    }
    ArrayView2::from_shape((height, width), data).map_err(|_| mismatch(expected))
}
