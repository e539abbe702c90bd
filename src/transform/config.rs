//! Options recognised by the circle transform.

use crate::error::{Error, Result};
use crate::filters::field::Field;

/// Parameters of one transform call.
///
/// Every field is optional; the default runs on the full frame with the
/// noise level estimated from the image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformConfig {
    /// Standard deviation of the pixel noise. Overrides the estimator.
    pub noise: Option<f64>,
    /// Process only one field of an interlaced frame.
    pub deinterlace: Option<Field>,
    /// Upper bound on any vote half-range. Unbounded by default.
    pub max_range: Option<usize>,
}

impl TransformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = Some(noise);
        self
    }

    pub fn with_deinterlace(mut self, field: Field) -> Self {
        self.deinterlace = Some(field);
        self
    }

    /// Select the field from an integer flag, taken modulo 2.
    pub fn with_deinterlace_parity(self, parity: i64) -> Self {
        self.with_deinterlace(Field::from_parity(parity))
    }

    pub fn with_max_range(mut self, max_range: usize) -> Self {
        self.max_range = Some(max_range);
        self
    }

    /// Reject option values the transform cannot use.
    pub fn validate(&self) -> Result<()> {
        if let Some(noise) = self.noise {
            if !noise.is_finite() || noise < 0.0 {
                return Err(Error::InvalidNoise(noise));
            }
        }
        Ok(())
    }

    /// Vote half-range cap; `usize::MAX` when none was set.
    pub fn range_cap(&self) -> usize {
        self.max_range.unwrap_or(usize::MAX)
    }

    /// Cap used when the noise level is zero and every range is infinite:
    /// `max_range`, or `width + height` of the frame.
    pub fn zero_noise_range_cap(&self, height: usize, width: usize) -> usize {
        self.max_range.unwrap_or(height + width)
    }
}
