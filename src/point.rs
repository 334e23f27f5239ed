//! Provides [`OperationPoint`] and longitude normalization.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returns the longitude normalized into -180.0 < and <= 180.0.
///
/// # Example
///
/// ```
/// # use gridshift::point::normalize_longitude;
/// assert_eq!(normalize_longitude(240.0), -120.0);
/// assert_eq!(normalize_longitude(-180.0), 180.0);
/// assert_eq!(normalize_longitude(45.0), 45.0);
/// ```
#[inline]
pub fn normalize_longitude(t: f64) -> f64 {
    if t.is_nan() || t.gt(&-180.0) && t.le(&180.0) {
        t
    } else {
        match t % 360.0 {
            s if s.le(&-180.0) => s + 360.0,
            s if s.gt(&180.0) => s - 360.0,
            s => s,
        }
    }
}

/// Returns the longitude normalized into 0.0 <= and < 360.0.
///
/// # Example
///
/// ```
/// # use gridshift::point::to_positive_east;
/// assert_eq!(to_positive_east(-120.0), 240.0);
/// assert_eq!(to_positive_east(120.0), 120.0);
/// ```
#[inline]
pub fn to_positive_east(t: f64) -> f64 {
    if t.is_nan() || t.ge(&0.0) && t.lt(&360.0) {
        t
    } else {
        match t % 360.0 {
            s if s.lt(&0.0) => s + 360.0,
            s => s,
        }
    }
}

/// A mutable position which the operations read and overwrite.
///
/// `x` is the longitude \[deg\], `y` the latitude \[deg\]
/// and `z` the height \[m\].
///
/// # Example
///
/// ```
/// # use gridshift::OperationPoint;
/// let mut point = OperationPoint::new(-123.0, 49.0, 10.0);
/// assert_eq!(point.x, -123.0);
///
/// point.reset(1.0, 2.0, 3.0);
/// assert_eq!(point, OperationPoint::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, PartialEq, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperationPoint {
    /// The longitude \[deg\]
    pub x: f64,
    /// The latitude \[deg\]
    pub y: f64,
    /// The height \[m\]
    pub z: f64,
}

impl From<(f64, f64)> for OperationPoint {
    /// see [`OperationPoint::new()`], defaulting 0.0 for height
    fn from(rhs: (f64, f64)) -> Self {
        Self::new(rhs.0, rhs.1, 0.0)
    }
}

impl From<(f64, f64, f64)> for OperationPoint {
    /// see [`OperationPoint::new()`]
    fn from(rhs: (f64, f64, f64)) -> Self {
        Self::new(rhs.0, rhs.1, rhs.2)
    }
}

impl OperationPoint {
    /// Makes an [`OperationPoint`].
    ///
    /// This does not check the value range.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Overwrites all three components.
    #[inline]
    pub fn reset(&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Restores `self` to a previously taken copy.
    #[inline]
    pub(crate) fn restore(&mut self, saved: &Self) {
        self.reset(saved.x, saved.y, saved.z);
    }
}
