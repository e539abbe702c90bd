//! Noise-based confidence filtering of gradient pixels.
//!
//! Under i.i.d. additive pixel noise `sigma`, each gradient component has
//! standard deviation `sigma * sqrt(Σ K²)`. The magnitude is trusted only
//! where it exceeds [`CONFIDENCE_FACTOR`] times the propagated bound.

use ndarray::{Array2, Zip};

use crate::filters::core::kernel_sum_of_squares;
use crate::filters::gradient::GradientField;

/// Multiple of the uncertainty bound a magnitude must exceed.
pub const CONFIDENCE_FACTOR: f64 = 2.0;

/// Gradient magnitude `sqrt(dadx² + dady²)` per pixel.
pub fn gradient_magnitude(gradient: &GradientField) -> Array2<f64> {
    Zip::from(&gradient.dadx)
        .and(&gradient.dady)
        .map_collect(|&gx, &gy| (gx * gx + gy * gy).sqrt())
}

/// Uncertainty `δ = noise · sqrt(2 · Σ K²)` of the gradient magnitude.
pub fn uncertainty_bound(noise: f64) -> f64 {
    noise * (2.0 * kernel_sum_of_squares()).sqrt()
}

/// Whether a pixel with gradient magnitude `magnitude` may cast votes.
///
/// Zero and non-finite magnitudes never qualify, whatever the bound.
#[inline]
pub fn is_candidate(magnitude: f64, delta: f64) -> bool {
    magnitude.is_finite() && magnitude > 0.0 && magnitude > CONFIDENCE_FACTOR * delta
}
