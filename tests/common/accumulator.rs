use ndarray::ArrayView2;

/// Location `(x, y)` and count of the strongest accumulator cell.
///
/// Ties resolve to the first cell in row-major order.
pub fn strongest_cell(accumulator: ArrayView2<u32>) -> Option<((usize, usize), u32)> {
    accumulator
        .indexed_iter()
        .fold(None, |best: Option<((usize, usize), u32)>, ((y, x), &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some(((x, y), v)),
        })
}
