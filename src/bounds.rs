//! Provides [`Bounds`].
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned box, edges included.
///
/// The axis convention is the one of the owner,
/// arc-seconds with positive-west longitude for NTv2 sub-grids,
/// and degrees with 0 to 360 positive-east longitude for NADCON5 regions.
///
/// # Example
///
/// ```
/// # use gridshift::Bounds;
/// let bounds = Bounds::new(0.0, 0.0, 10.0, 5.0);
/// assert!(bounds.covers(10.0, 5.0));
/// assert!(!bounds.covers(10.1, 5.0));
/// assert!(bounds.contains(&Bounds::new(1.0, 1.0, 2.0, 2.0)));
/// ```
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    /// The west edge
    pub min_x: f64,
    /// The south edge
    pub min_y: f64,
    /// The east edge
    pub max_x: f64,
    /// The north edge
    pub max_y: f64,
}

impl Bounds {
    /// Makes a [`Bounds`].
    #[inline]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns `true` if (`x`, `y`) is inside `self`.
    #[inline]
    pub fn covers(&self, x: f64, y: f64) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Returns `true` if `other` is inside `self`.
    #[inline]
    pub fn contains(&self, other: &Bounds) -> bool {
        self.min_x <= other.min_x
            && other.max_x <= self.max_x
            && self.min_y <= other.min_y
            && other.max_y <= self.max_y
    }
}
