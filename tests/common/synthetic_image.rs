use ndarray::Array2;

/// Bright disk with a logistic rim on a flat background.
pub fn soft_disk(width: usize, height: usize, cx: f64, cy: f64, radius: f64, amplitude: f64) -> Array2<f64> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    Array2::from_shape_fn((height, width), |(y, x)| {
        let r = (x as f64 - cx).hypot(y as f64 - cy);
        amplitude / (1.0 + ((r - radius) / 1.0).exp())
    })
}

/// Columns left of `edge` are 0, the rest are `amplitude`.
pub fn vertical_step(width: usize, height: usize, edge: usize, amplitude: f64) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(_, x)| if x < edge { 0.0 } else { amplitude })
}

/// Single bright pixel on a zero background.
pub fn point(width: usize, height: usize, x: usize, y: usize, amplitude: f64) -> Array2<f64> {
    let mut img = Array2::zeros((height, width));
    img[[y, x]] = amplitude;
    img
}

/// Deterministic uniform texture in `[0, amplitude)` (MINSTD generator).
pub fn texture(width: usize, height: usize, amplitude: f64, seed: u64) -> Array2<f64> {
    let mut state = seed.wrapping_add(1);
    Array2::from_shape_fn((height, width), |_| {
        state = state.wrapping_mul(48271) % 2147483647;
        amplitude * state as f64 / 2147483647.0
    })
}
