//! Circle Transform
//!
//! Radius-free detection of circular features, such as spherical particles
//! in microscopy images, by voting along intensity gradients. The output is
//! an accumulator image the size of the input whose local maxima mark
//! circle centres. Python bindings via PyO3 and WASM bindings for
//! JavaScript are available behind the `python` and `wasm` features.
//!
//! ## Image Format
//! Input is a single-channel 2D array shaped (height, width) and indexed
//! `[[y, x]]`. Any pixel type convertible to `f64` is accepted:
//! - `u8`, `u16`, `u32`: raw sensor counts
//! - `i8`, `i16`, `i32`: signed data such as background-subtracted frames
//! - `f32`, `f64`: calibrated intensities
//!
//! ## Example
//! ```
//! use circletransform::{circle_transform, TransformConfig};
//! use ndarray::Array2;
//!
//! let image = Array2::from_shape_fn((40, 48), |(y, x)| {
//!     let r = ((x as f64 - 20.0).powi(2) + (y as f64 - 18.0).powi(2)).sqrt();
//!     if r < 8.0 { 100.0 } else { 0.0 }
//! });
//! let config = TransformConfig::new().with_noise(5.0);
//! let output = circle_transform(image.view(), &config)?;
//! assert_eq!(output.accumulator.dim(), (40, 48));
//! # Ok::<(), circletransform::Error>(())
//! ```

pub mod error;
pub mod filters;
pub mod transform;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
pub use filters::field::Field;
pub use filters::noise::{MedianAbsoluteDeviation, NoiseEstimator};
pub use transform::{
    circle_transform, circle_transform_dyn, circle_transform_with, TransformConfig,
    TransformOutput,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArrayDyn};
    use pyo3::prelude::*;

    use crate::filters::field::Field;
    use crate::transform::{circle_transform_dyn, TransformConfig};

    fn config_from_args(
        noise: Option<f64>,
        deinterlace: Option<i64>,
        max_range: Option<usize>,
    ) -> TransformConfig {
        TransformConfig {
            noise,
            deinterlace: deinterlace.map(Field::from_parity),
            max_range,
        }
    }

    // ========================================================================
    // Circle Transform
    // ========================================================================

    /// Circle transform of a float64 image.
    ///
    /// # Arguments
    /// * `image` - 2D array (height, width)
    /// * `noise` - Pixel noise; estimated with the MAD when omitted
    /// * `deinterlace` - Use only rows of this parity (value mod 2)
    /// * `max_range` - Cap on the vote half-range (default: none)
    ///
    /// # Returns
    /// `(accumulator, mean_range)`; `mean_range` is 0.0 when nothing voted.
    /// Raises `ValueError` for non-2D input or invalid options.
    #[pyfunction]
    #[pyo3(name = "circletransform", signature = (image, noise=None, deinterlace=None, max_range=None))]
    pub fn circletransform_f64<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, f64>,
        noise: Option<f64>,
        deinterlace: Option<i64>,
        max_range: Option<usize>,
    ) -> PyResult<(Bound<'py, PyArray2<u32>>, f64)> {
        let config = config_from_args(noise, deinterlace, max_range);
        let input = image.as_array().to_owned();
        let output = py.allow_threads(move || circle_transform_dyn(input.view(), &config))?;
        let mean_range = output.mean_range_or_zero();
        Ok((output.accumulator.into_pyarray(py), mean_range))
    }

    /// Circle transform of a uint8 image.
    #[pyfunction]
    #[pyo3(signature = (image, noise=None, deinterlace=None, max_range=None))]
    pub fn circletransform_u8<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
        noise: Option<f64>,
        deinterlace: Option<i64>,
        max_range: Option<usize>,
    ) -> PyResult<(Bound<'py, PyArray2<u32>>, f64)> {
        let config = config_from_args(noise, deinterlace, max_range);
        let input = image.as_array().to_owned();
        let output = py.allow_threads(move || circle_transform_dyn(input.view(), &config))?;
        let mean_range = output.mean_range_or_zero();
        Ok((output.accumulator.into_pyarray(py), mean_range))
    }

    #[pymodule]
    pub fn circletransform(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(circletransform_f64, m)?)?;
        m.add_function(wrap_pyfunction!(circletransform_u8, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::circletransform;
