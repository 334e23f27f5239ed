//! Provides [`GridRaster`], an in-memory raster of offsets.
use crate::internal::mul_add;

/// An immutable raster of `f32` values over a regular grid.
///
/// The values are stored row-major from the origin,
/// `values[row * width + column]` is the node at
/// (`min_x + column * dx`, `min_y + row * dy`).
///
/// # Example
///
/// ```
/// # use gridshift::raster::GridRaster;
/// let raster = GridRaster::try_new(0.0, 0.0, 1.0, 1.0, 2, 2, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
///
/// assert!(raster.covers(0.5, 0.5));
/// assert_eq!(raster.sample_bilinear(0.5, 0.5), 1.5);
/// assert_eq!(raster.sample_bilinear(1.0, 0.0), 1.0);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct GridRaster {
    min_x: f64,
    min_y: f64,
    dx: f64,
    dy: f64,
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl GridRaster {
    /// Makes a [`GridRaster`].
    ///
    /// Returns [`None`] when `values.len()` is not `width * height`,
    /// either dimension is zero, or a cell size is not positive.
    pub fn try_new(
        min_x: f64,
        min_y: f64,
        dx: f64,
        dy: f64,
        width: usize,
        height: usize,
        values: Vec<f32>,
    ) -> Option<Self> {
        if width == 0 || height == 0 || width.checked_mul(height)? != values.len() {
            return None;
        }
        if !(dx > 0.0 && dy > 0.0) {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            dx,
            dy,
            width,
            height,
            values,
        })
    }

    /// Returns the number of columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the largest x of the nodes.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.min_x + self.dx * (self.width - 1) as f64
    }

    /// Returns the largest y of the nodes.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.min_y + self.dy * (self.height - 1) as f64
    }

    /// Returns the node value, [`None`] if out of the raster.
    #[inline]
    pub fn get(&self, column: usize, row: usize) -> Option<f32> {
        if column < self.width && row < self.height {
            Some(self.values[row * self.width + column])
        } else {
            None
        }
    }

    /// Returns `true` if (`x`, `y`) is inside the node extent, edges included.
    #[inline]
    pub fn covers(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x() && self.min_y <= y && y <= self.max_y()
    }

    /// Returns the bilinear interpolation of the four nodes around (`x`, `y`).
    ///
    /// The caller must check [`GridRaster::covers`] first,
    /// a position outside is clamped to the nearest edge cell.
    /// On a node this returns the stored value exactly.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> f64 {
        let (column, next_column, fx) = locate((x - self.min_x) / self.dx, self.width);
        let (row, next_row, fy) = locate((y - self.min_y) / self.dy, self.height);

        let sw = self.values[row * self.width + column] as f64;
        let se = self.values[row * self.width + next_column] as f64;
        let nw = self.values[next_row * self.width + column] as f64;
        let ne = self.values[next_row * self.width + next_column] as f64;

        let (dfx, dfy) = (1. - fx, 1. - fy);

        let temp = sw * (dfx * dfy);
        let temp = mul_add!(se, fx * dfy, temp);
        let temp = mul_add!(nw, dfx * fy, temp);
        mul_add!(ne, fx * fy, temp)
    }
}

/// Returns the lower index, the upper index and the fraction between them.
#[inline]
fn locate(t: f64, len: usize) -> (usize, usize, f64) {
    let last = len - 1;
    if last == 0 {
        return (0, 0, 0.0);
    }
    let lower = if t.le(&0.0) {
        0
    } else {
        (t.floor() as usize).min(last - 1)
    };
    (lower, lower + 1, (t - lower as f64).clamp(0.0, 1.0))
}

#[cfg(test)]
mod test {
    use super::*;

    fn raster() -> GridRaster {
        // 3 x 2, f(x, y) = x + 10 y
        GridRaster::try_new(
            100.0,
            50.0,
            2.0,
            5.0,
            3,
            2,
            vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
        )
        .unwrap()
    }

    #[test]
    fn test_try_new() {
        assert!(GridRaster::try_new(0.0, 0.0, 1.0, 1.0, 2, 2, vec![0.0; 3]).is_none());
        assert!(GridRaster::try_new(0.0, 0.0, 1.0, 1.0, 0, 0, vec![]).is_none());
        assert!(GridRaster::try_new(0.0, 0.0, 0.0, 1.0, 1, 1, vec![0.0]).is_none());
        assert!(GridRaster::try_new(0.0, 0.0, 1.0, 1.0, 1, 1, vec![0.0]).is_some());
    }

    #[test]
    fn test_covers() {
        let raster = raster();
        assert_eq!(raster.max_x(), 104.0);
        assert_eq!(raster.max_y(), 55.0);
        assert!(raster.covers(100.0, 50.0));
        assert!(raster.covers(104.0, 55.0));
        assert!(!raster.covers(99.9, 52.0));
        assert!(!raster.covers(102.0, 55.1));
    }

    #[test]
    fn test_sample_on_node() {
        let raster = raster();
        for row in 0..2 {
            for column in 0..3 {
                let x = 100.0 + 2.0 * column as f64;
                let y = 50.0 + 5.0 * row as f64;
                assert_eq!(
                    raster.sample_bilinear(x, y),
                    raster.get(column, row).unwrap() as f64
                );
            }
        }
    }

    #[test]
    fn test_sample_between() {
        let raster = raster();
        assert_eq!(raster.sample_bilinear(101.0, 50.0), 0.5);
        assert_eq!(raster.sample_bilinear(100.0, 52.5), 5.0);
        assert_eq!(raster.sample_bilinear(103.0, 52.5), 6.5);
    }

    #[test]
    fn test_nan_propagates() {
        let raster =
            GridRaster::try_new(0.0, 0.0, 1.0, 1.0, 2, 2, vec![0.0, f32::NAN, 2.0, 3.0]).unwrap();
        assert!(raster.sample_bilinear(0.5, 0.5).is_nan());
    }

    #[test]
    fn test_single_node() {
        let raster = GridRaster::try_new(0.0, 0.0, 1.0, 1.0, 1, 1, vec![7.0]).unwrap();
        assert!(raster.covers(0.0, 0.0));
        assert_eq!(raster.sample_bilinear(0.0, 0.0), 7.0);
    }
}
