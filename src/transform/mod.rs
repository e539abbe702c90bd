//! Orientation-voting circle transform.
//!
//! Every pixel with a trustworthy intensity gradient votes for the cells on
//! the line through it along the gradient. Lines from the rim of a circular
//! feature cross at its centre, so local maxima of the vote accumulator mark
//! circle centres. No radius is assumed.
//!
//! ## Pipeline
//!
//! 1. **Field selection** - optionally keep one field of an interlaced frame
//! 2. **Gradient** - 5x5 Savitzky-Golay derivatives with edge truncation
//! 3. **Confidence** - keep pixels whose gradient magnitude exceeds twice
//!    the noise-propagated uncertainty
//! 4. **Voting** - each candidate votes along its gradient line out to a
//!    range limited by its angular uncertainty
//!
//! The accumulator always has the shape of the input frame.

pub mod config;
pub mod confidence;
pub mod vote;

use log::{debug, warn};
use ndarray::{Array2, ArrayView2, ArrayViewD, Ix2};

use crate::error::{Error, Result};
use crate::filters::field::select_field;
use crate::filters::gradient::estimate_gradient;
use crate::filters::noise::{MedianAbsoluteDeviation, NoiseEstimator};

pub use config::TransformConfig;
pub use confidence::{gradient_magnitude, uncertainty_bound, CONFIDENCE_FACTOR};
pub use vote::{cast_votes, collect_candidates, VoteCandidate};

/// Result of one transform call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    /// Vote counts, shaped like the input frame.
    pub accumulator: Array2<u32>,
    /// Mean vote half-range over all candidates; `None` without candidates.
    pub mean_range: Option<f64>,
    /// Largest vote half-range.
    pub range: usize,
    /// Number of pixels that cast votes.
    pub candidates: usize,
    /// Noise level the confidence filter used.
    pub noise: f64,
}

impl TransformOutput {
    /// Mean range, reported as 0.0 when nothing voted.
    pub fn mean_range_or_zero(&self) -> f64 {
        self.mean_range.unwrap_or(0.0)
    }
}

/// Run the transform, estimating noise with the median absolute deviation
/// unless `config.noise` is set.
///
/// # Arguments
/// * `image` - Single-channel image (height, width)
/// * `config` - Noise, deinterlacing and range options
///
/// # Returns
/// The vote accumulator and range statistics, or the usage error
pub fn circle_transform<T>(image: ArrayView2<T>, config: &TransformConfig) -> Result<TransformOutput>
where
    T: Copy + Into<f64>,
{
    circle_transform_with(image, config, &MedianAbsoluteDeviation::default())
}

/// Run the transform on an array whose rank is only known at runtime.
///
/// Anything but a 2-dimensional array is rejected with
/// [`Error::InvalidRank`].
pub fn circle_transform_dyn<T>(image: ArrayViewD<T>, config: &TransformConfig) -> Result<TransformOutput>
where
    T: Copy + Into<f64>,
{
    let ndim = image.ndim();
    let image = image
        .into_dimensionality::<Ix2>()
        .map_err(|_| Error::InvalidRank(ndim))?;
    circle_transform(image, config)
}

/// Run the transform with a caller-supplied noise estimator.
///
/// The estimator is consulted only when `config.noise` is `None`, and sees
/// the field-selected image.
pub fn circle_transform_with<T, E>(
    image: ArrayView2<T>,
    config: &TransformConfig,
    estimator: &E,
) -> Result<TransformOutput>
where
    T: Copy + Into<f64>,
    E: NoiseEstimator + ?Sized,
{
    config.validate()?;

    let (height, width) = image.dim();
    if height == 0 || width == 0 {
        return Err(Error::EmptyImage { height, width });
    }

    let frame = to_f64(image)?;
    let field = config.deinterlace;
    let source = select_field(frame.view(), field);
    debug!(
        "circle transform on {}x{} frame, field {:?} ({} rows)",
        width,
        height,
        field,
        source.nrows()
    );

    let noise = match config.noise {
        Some(noise) => noise,
        None => estimator.estimate(source),
    };

    let mut gradient = estimate_gradient(source);
    if field.is_some() {
        gradient = gradient.compensate_field_stride();
    }

    let magnitude = gradient_magnitude(&gradient);
    let delta = uncertainty_bound(noise);
    let cap = if delta > 0.0 {
        config.range_cap()
    } else {
        let cap = config.zero_noise_range_cap(height, width);
        warn!("noise level is zero; vote ranges are infinite and fall back to {}", cap);
        cap
    };

    let candidates = collect_candidates(&gradient, &magnitude, delta, field, cap);
    debug!(
        "noise {:.4}, bound {:.4}, {} candidates",
        noise,
        delta,
        candidates.len()
    );

    if candidates.is_empty() {
        return Ok(TransformOutput {
            accumulator: Array2::zeros((height, width)),
            mean_range: None,
            range: 0,
            candidates: 0,
            noise,
        });
    }

    let accumulator = cast_votes(&candidates, (height, width));
    let range = vote::global_range(&candidates);
    let mean_range = vote::mean_range(&candidates);
    debug!("range {}, mean range {:?}", range, mean_range);

    Ok(TransformOutput {
        accumulator,
        mean_range,
        range,
        candidates: candidates.len(),
        noise,
    })
}

/// Convert to `f64`, rejecting NaN and infinite pixels.
fn to_f64<T>(image: ArrayView2<T>) -> Result<Array2<f64>>
where
    T: Copy + Into<f64>,
{
    let frame = image.mapv(Into::into);
    if let Some(((y, x), _)) = frame.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::NonFinitePixel { x, y });
    }
    Ok(frame)
}
