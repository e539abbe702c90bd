//! Image-level stages of the circle transform.
//!
//! ## Image Format
//!
//! All stages work on single-channel `f64` images shaped (height, width)
//! and indexed `[[y, x]]`. Integer and `f32` inputs are converted once at
//! the transform entry point.
//!
//! ## Stages
//!
//! - **Field**: keep the even or odd rows of an interlaced frame
//! - **Gradient**: 5x5 Savitzky-Golay derivative pair with edge truncation
//! - **Noise**: robust pixel-noise estimation (median absolute deviation)

pub mod core;
pub mod field;
pub mod gradient;
pub mod noise;
