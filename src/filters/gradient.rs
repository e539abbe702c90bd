//! Smoothed gradient estimation.
//!
//! Computes `(d/dx, d/dy)` at every pixel by correlating the image with the
//! 5x5 Savitzky-Golay derivative kernel and its transpose. Samples outside
//! the image replicate the nearest edge pixel.
//!
//! ## Performance
//!
//! The kernel is antisymmetric along the derivative axis, so each output is
//! a weighted sum of 10 mirrored differences instead of 25 products. This
//! also makes the gradient of a constant region exactly zero. Rows are
//! processed in parallel with Rayon.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use super::core::{clamp_index, KERNEL_HALF, SAVGOL_DX};

/// Per-pixel derivative estimates, same shape as the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    pub dadx: Array2<f64>,
    pub dady: Array2<f64>,
}

impl GradientField {
    /// `(height, width)` of both components.
    pub fn dim(&self) -> (usize, usize) {
        self.dadx.dim()
    }

    /// Halve `d/dy` to undo the doubled row stride of a single field.
    pub fn compensate_field_stride(self) -> Self {
        GradientField {
            dadx: self.dadx,
            dady: self.dady.mapv(|v| v * 0.5),
        }
    }
}

/// Estimate the gradient of `image`.
///
/// # Arguments
/// * `image` - Single-channel image (height, width)
///
/// # Returns
/// `dadx` and `dady` with the same shape as `image`
pub fn estimate_gradient(image: ArrayView2<f64>) -> GradientField {
    let (height, width) = image.dim();
    if height == 0 || width == 0 {
        return GradientField {
            dadx: Array2::zeros((height, width)),
            dady: Array2::zeros((height, width)),
        };
    }

    let mut dadx_flat = vec![0.0f64; height * width];
    let mut dady_flat = vec![0.0f64; height * width];

    dadx_flat
        .par_chunks_mut(width)
        .zip(dady_flat.par_chunks_mut(width))
        .enumerate()
        .for_each(|(y, (row_x, row_y))| {
            for x in 0..width {
                let mut gx = 0.0f64;
                let mut gy = 0.0f64;

                for (j, weights) in SAVGOL_DX.iter().enumerate() {
                    // Offset across the derivative axis
                    let across = j as isize - KERNEL_HALF as isize;
                    let sy = clamp_index(y as isize + across, height);
                    let sx = clamp_index(x as isize + across, width);

                    for i in 1..=KERNEL_HALF {
                        let k = weights[KERNEL_HALF + i];
                        let d = i as isize;

                        let right = clamp_index(x as isize + d, width);
                        let left = clamp_index(x as isize - d, width);
                        gx += k * (image[[sy, right]] - image[[sy, left]]);

                        let below = clamp_index(y as isize + d, height);
                        let above = clamp_index(y as isize - d, height);
                        gy += k * (image[[below, sx]] - image[[above, sx]]);
                    }
                }

                row_x[x] = gx;
                row_y[x] = gy;
            }
        });

    let dadx = Array2::from_shape_vec((height, width), dadx_flat)
        .expect("Shape mismatch in estimate_gradient dadx");
    let dady = Array2::from_shape_vec((height, width), dady_flat)
        .expect("Shape mismatch in estimate_gradient dady");

    GradientField { dadx, dady }
}
