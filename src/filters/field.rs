//! Interlaced field selection.
//!
//! Interlaced sensors deliver two fields per frame, one on the even rows and
//! one on the odd rows. Selecting a field keeps every second row, which
//! doubles the sampling stride along y.

use ndarray::{s, ArrayView2};

/// One of the two interlaced fields of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Field {
    /// Rows 0, 2, 4, ...
    Even,
    /// Rows 1, 3, 5, ...
    Odd,
}

impl Field {
    /// Field selected by an integer flag, taken modulo 2.
    pub fn from_parity(value: i64) -> Self {
        if value.rem_euclid(2) == 0 {
            Field::Even
        } else {
            Field::Odd
        }
    }

    /// First frame row belonging to this field.
    #[inline]
    pub fn offset(self) -> usize {
        match self {
            Field::Even => 0,
            Field::Odd => 1,
        }
    }

    /// Frame row of the `row`-th line of this field.
    #[inline]
    pub fn frame_row(self, row: usize) -> usize {
        2 * row + self.offset()
    }

    /// Number of frame rows that belong to this field.
    pub fn height(self, frame_height: usize) -> usize {
        (frame_height + 1 - self.offset()) / 2
    }
}

/// Keep the rows of one field, or the whole image when `field` is `None`.
///
/// The result is a strided view into `image`; no pixels are copied.
pub fn select_field(image: ArrayView2<'_, f64>, field: Option<Field>) -> ArrayView2<'_, f64> {
    match field {
        None => image,
        Some(f) if f.offset() >= image.nrows() => image.slice_move(s![..0, ..]),
        Some(f) => image.slice_move(s![f.offset()..;2, ..]),
    }
}
