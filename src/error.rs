//! Error type shared by the transform and its bindings.

/// Usage errors reported by the circle transform.
///
/// A call either succeeds with a full accumulator or fails with exactly one
/// of these. Finding no candidate pixels is not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input array is not 2-dimensional.
    #[error("image must be 2-dimensional, got {0} dimensions")]
    InvalidRank(usize),

    /// The input array has no pixels.
    #[error("image is empty ({height}x{width})")]
    EmptyImage { height: usize, width: usize },

    /// The input contains NaN or an infinity.
    #[error("image contains a non-finite pixel at ({x}, {y})")]
    NonFinitePixel { x: usize, y: usize },

    /// The supplied noise level is negative or not finite.
    #[error("noise must be finite and non-negative, got {0}")]
    InvalidNoise(f64),

    /// A flat pixel buffer does not match the declared image shape.
    #[error("size mismatch: expected {expected} pixels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "python")]
impl From<Error> for pyo3::PyErr {
    fn from(err: Error) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
