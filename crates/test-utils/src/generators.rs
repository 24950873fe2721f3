//! Generators for synthetic gridded test data.
//!
//! These generators create predictable, verifiable data patterns that can be
//! used across the test suite.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify that data survives slicing and resampling by
/// checking that grid[row][col] == col * 1000 + row.
///
/// # Example
///
/// ```
/// use test_utils::indexed_grid;
///
/// let grid = indexed_grid(10, 5);
/// assert_eq!(grid.len(), 50);  // 10 * 5
/// assert_eq!(grid[0], 0.0);    // col=0, row=0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0
/// assert_eq!(grid[10], 1.0);   // col=0, row=1
/// ```
pub fn indexed_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Evaluates the standard smooth test field `sin(lat) * cos(lon)` over the
/// outer product of two axes (degrees), row-major with `lats` as rows.
///
/// Smooth and non-linear, so resampled values can be compared against the
/// analytic field with a small tolerance.
pub fn wave_field(lats: &[f64], lons: &[f64]) -> Vec<f32> {
    let mut data = Vec::with_capacity(lats.len() * lons.len());
    for lat in lats {
        for lon in lons {
            data.push((lat.to_radians().sin() * lon.to_radians().cos()) as f32);
        }
    }
    data
}

/// Evaluates a plane `a*x + b*y` over two axes, row-major with `ys` as rows.
///
/// Bilinear interpolation on uniform axes reproduces a plane exactly, so
/// resampled values can be compared with equality-level tolerance.
pub fn plane_field(xs: &[f64], ys: &[f64], a: f64, b: f64) -> Vec<f32> {
    let mut data = Vec::with_capacity(xs.len() * ys.len());
    for y in ys {
        for x in xs {
            data.push((a * x + b * y) as f32);
        }
    }
    data
}

/// Evenly spaced values in `[start, stop)` with the given step, like
/// numpy's arange.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}
