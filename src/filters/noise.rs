//! Robust pixel-noise estimation.
//!
//! The transform needs one scalar: the standard deviation of the additive
//! noise on each pixel. Any robust (outlier-resistant) scale estimator can
//! supply it through [`NoiseEstimator`]; the default is the median absolute
//! deviation.

use ndarray::ArrayView2;

/// Scale factor turning a MAD into a Gaussian-consistent standard deviation.
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// Source of the noise level when the caller does not supply one.
pub trait NoiseEstimator {
    /// Estimated standard deviation of the pixel noise in `image`.
    fn estimate(&self, image: ArrayView2<f64>) -> f64;
}

/// Median absolute deviation from the median, times [`MAD_TO_SIGMA`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianAbsoluteDeviation {
    pub scale: f64,
}

impl Default for MedianAbsoluteDeviation {
    fn default() -> Self {
        MedianAbsoluteDeviation { scale: MAD_TO_SIGMA }
    }
}

impl NoiseEstimator for MedianAbsoluteDeviation {
    fn estimate(&self, image: ArrayView2<f64>) -> f64 {
        let mut values: Vec<f64> = image.iter().copied().collect();
        if values.is_empty() {
            return 0.0;
        }

        let center = median_in_place(&mut values);
        for v in values.iter_mut() {
            *v = (*v - center).abs();
        }

        median_in_place(&mut values) * self.scale
    }
}

/// A fixed noise level, for callers that calibrated their sensor.
impl NoiseEstimator for f64 {
    fn estimate(&self, _image: ArrayView2<f64>) -> f64 {
        *self
    }
}

/// Median of `values`, averaging the two middle elements for even lengths.
///
/// Reorders `values`. Returns 0.0 for an empty slice.
pub fn median_in_place(values: &mut [f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return upper;
    }

    let below = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    0.5 * (below + upper)
}
