//! WebAssembly exports for the circle transform.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images travel as flat row-major buffers of `width * height` samples;
//! the accumulator comes back in the same layout.

use wasm_bindgen::prelude::*;

use crate::error::Result;
use crate::filters::core::flat_image_view;
use crate::filters::field::Field;
use crate::transform::{circle_transform, TransformConfig};

/// Accumulator and mean vote range of one transform call.
#[wasm_bindgen]
pub struct CircleTransformResult {
    accumulator: Vec<u32>,
    mean_range: f64,
}

#[wasm_bindgen]
impl CircleTransformResult {
    /// Vote counts, row-major, `width * height` entries.
    #[wasm_bindgen(getter)]
    pub fn accumulator(&self) -> Vec<u32> {
        self.accumulator.clone()
    }

    /// Mean vote half-range; 0.0 when nothing voted.
    #[wasm_bindgen(getter)]
    pub fn mean_range(&self) -> f64 {
        self.mean_range
    }
}

fn transform_flat<T>(
    data: &[T],
    width: usize,
    height: usize,
    config: &TransformConfig,
) -> Result<CircleTransformResult>
where
    T: Copy + Into<f64>,
{
    let input = flat_image_view(data, width, height)?;
    let output = circle_transform(input, config)?;
    let mean_range = output.mean_range_or_zero();

    Ok(CircleTransformResult {
        accumulator: output.accumulator.into_raw_vec_and_offset().0,
        mean_range,
    })
}

fn config_from_args(noise: Option<f64>, deinterlace: Option<i32>) -> TransformConfig {
    TransformConfig {
        noise,
        deinterlace: deinterlace.map(|p| Field::from_parity(p as i64)),
        max_range: None,
    }
}

// ============================================================================
// Circle Transform - f32
// ============================================================================

/// Circle transform of a float image.
///
/// # Arguments
/// * `data` - Flat array of intensities (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `noise` - Pixel noise; estimated from the image when omitted
/// * `deinterlace` - Use only rows of this parity
#[wasm_bindgen]
pub fn circle_transform_wasm(
    data: &[f32],
    width: usize,
    height: usize,
    noise: Option<f64>,
    deinterlace: Option<i32>,
) -> std::result::Result<CircleTransformResult, JsValue> {
    let config = config_from_args(noise, deinterlace);
    transform_flat(data, width, height, &config).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// Circle Transform - u8
// ============================================================================

/// Circle transform of an 8-bit grayscale image.
#[wasm_bindgen]
pub fn circle_transform_u8_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    noise: Option<f64>,
    deinterlace: Option<i32>,
) -> std::result::Result<CircleTransformResult, JsValue> {
    let config = config_from_args(noise, deinterlace);
    transform_flat(data, width, height, &config).map_err(|e| JsValue::from_str(&e.to_string()))
}
