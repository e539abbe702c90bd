//! Vote casting along gradient lines.
//!
//! Each candidate pixel votes for every cell on the line through it along
//! its gradient direction, out to a half-range set by how far the line can
//! be followed before its angular uncertainty amounts to a few pixels of
//! lateral error. Votes that fall off the frame are clamped onto the border
//! cells rather than dropped.
//!
//! ## Runs
//!
//! Both cell coordinates are monotone in the offset, so a candidate's votes
//! fall into contiguous runs on the same cell. Runs are found by galloping
//! and added in one step, which keeps long ranges cheap once the line has
//! left the frame and its votes pile up on a border cell.
//!
//! ## Parallelism
//!
//! Candidates are split across Rayon workers, each filling its own
//! accumulator; the partial accumulators are summed. Counts are integers,
//! so the result does not depend on how the work was split.

use ndarray::{Array2, Zip};
use rayon::prelude::*;

use crate::filters::core::round_clamped;
use crate::filters::field::Field;
use crate::filters::gradient::GradientField;

use super::confidence::is_candidate;

/// Shift from gradient sample position to the voting origin.
pub const PIXEL_CENTER_OFFSET: f64 = 1.0;

/// Largest representable half-range. The `2 * rng + 1` votes of one
/// candidate still fit a `u32` cell.
pub const MAX_VOTE_RANGE: usize = i32::MAX as usize;

/// Lower bound on candidates per Rayon task.
const MIN_CANDIDATES_PER_TASK: usize = 256;

/// A pixel that passed the confidence filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteCandidate {
    /// Origin in frame coordinates, pixel-centre convention.
    pub x: f64,
    pub y: f64,
    /// Unit gradient direction.
    pub cos_theta: f64,
    pub sin_theta: f64,
    /// Votes are cast for offsets `-rng..=rng` along the direction.
    pub rng: usize,
}

impl VoteCandidate {
    /// Accumulator cell `(x, y)` hit by offset `t`.
    #[inline]
    pub fn cell(&self, t: i64, width: usize, height: usize) -> (usize, usize) {
        let t = t as f64;
        (
            round_clamped(self.x + t * self.cos_theta, width),
            round_clamped(self.y + t * self.sin_theta, height),
        )
    }

    /// Add one vote per offset `-rng..=rng` to `accumulator`.
    ///
    /// Counts saturate at `u32::MAX`.
    pub fn cast(&self, accumulator: &mut Array2<u32>) {
        let (height, width) = accumulator.dim();
        let rng = self.rng.min(MAX_VOTE_RANGE) as i64;

        let mut t = -rng;
        while t <= rng {
            let current = self.cell(t, width, height);

            // Gallop to an offset past the run, then bisect back to its end
            let mut last = t;
            let mut step = 1i64;
            let mut next = loop {
                let ahead = last + step;
                if ahead > rng {
                    break rng + 1;
                }
                if self.cell(ahead, width, height) != current {
                    break ahead;
                }
                last = ahead;
                step *= 2;
            };
            while next - last > 1 {
                let mid = last + (next - last) / 2;
                if self.cell(mid, width, height) == current {
                    last = mid;
                } else {
                    next = mid;
                }
            }

            let votes = u32::try_from(last - t + 1).unwrap_or(u32::MAX);
            let (x, y) = current;
            accumulator[[y, x]] = accumulator[[y, x]].saturating_add(votes);
            t = last + 1;
        }
    }
}

/// Vote half-range `round(2 / tan((delta / magnitude) / 2))`, at most `cap`.
///
/// Pass `usize::MAX` for no cap. Ranges that are infinite (`delta == 0`)
/// or beyond [`MAX_VOTE_RANGE`] resolve to `cap.min(MAX_VOTE_RANGE)`.
pub fn vote_range(delta: f64, magnitude: f64, cap: usize) -> usize {
    let cap = cap.min(MAX_VOTE_RANGE);
    let r = 2.0 / (delta / magnitude / 2.0).tan();
    if !r.is_finite() || r >= cap as f64 {
        return cap;
    }
    (r.max(0.0).round() as usize).min(cap)
}

/// Turn every pixel that passes the confidence filter into a candidate.
///
/// # Arguments
/// * `gradient` - Gradient of the (possibly field-selected) image
/// * `magnitude` - Gradient magnitude, same shape
/// * `delta` - Uncertainty bound of the magnitude
/// * `field` - Field the gradient was computed on, to map rows back to the frame
/// * `cap` - Upper bound on each candidate's half-range, `usize::MAX` for none
///
/// # Returns
/// Candidates in row-major order
pub fn collect_candidates(
    gradient: &GradientField,
    magnitude: &Array2<f64>,
    delta: f64,
    field: Option<Field>,
    cap: usize,
) -> Vec<VoteCandidate> {
    magnitude
        .indexed_iter()
        .filter(|&(_, &g)| is_candidate(g, delta))
        .map(|((y, x), &g)| {
            let frame_y = field.map_or(y, |f| f.frame_row(y));
            VoteCandidate {
                x: x as f64 + PIXEL_CENTER_OFFSET,
                y: frame_y as f64 + PIXEL_CENTER_OFFSET,
                cos_theta: gradient.dadx[[y, x]] / g,
                sin_theta: gradient.dady[[y, x]] / g,
                rng: vote_range(delta, g, cap),
            }
        })
        .collect()
}

/// Largest half-range among `candidates`, 0 when there are none.
pub fn global_range(candidates: &[VoteCandidate]) -> usize {
    candidates.iter().map(|c| c.rng).max().unwrap_or(0)
}

/// Mean half-range, `None` when there are no candidates.
pub fn mean_range(candidates: &[VoteCandidate]) -> Option<f64> {
    if candidates.is_empty() {
        return None;
    }
    let total: f64 = candidates.iter().map(|c| c.rng as f64).sum();
    Some(total / candidates.len() as f64)
}

/// Accumulate the votes of all candidates into a (height, width) array.
pub fn cast_votes(candidates: &[VoteCandidate], shape: (usize, usize)) -> Array2<u32> {
    // One partial accumulator per worker, not per small batch
    let per_task = candidates.len() / rayon::current_num_threads().max(1);

    candidates
        .par_iter()
        .with_min_len(per_task.max(MIN_CANDIDATES_PER_TASK))
        .fold(
            || Array2::<u32>::zeros(shape),
            |mut acc, candidate| {
                candidate.cast(&mut acc);
                acc
            },
        )
        .reduce_with(|mut a, b| {
            Zip::from(&mut a).and(&b).for_each(|a, &b| *a = a.saturating_add(b));
            a
        })
        .unwrap_or_else(|| Array2::zeros(shape))
}
