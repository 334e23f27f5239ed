//! Provides [`ShiftOperation`], the common surface of all shifts.
use crate::{OperationPoint, Result};

/// A datum shift applied in place.
///
/// Returns `Ok(true)` when `point` has been shifted and `Ok(false)`
/// when the point is not covered, in which case `point` is left as it was.
/// An [`Err`] means that reading the dataset failed,
/// `point` is left unchanged too.
pub trait ShiftOperation {
    /// Shifts `point` in place.
    fn shift(&self, point: &mut OperationPoint) -> Result<bool>;
}

impl<T> ShiftOperation for &T
where
    T: ShiftOperation + ?Sized,
{
    #[inline]
    fn shift(&self, point: &mut OperationPoint) -> Result<bool> {
        (**self).shift(point)
    }
}

impl<T> ShiftOperation for Box<T>
where
    T: ShiftOperation + ?Sized,
{
    #[inline]
    fn shift(&self, point: &mut OperationPoint) -> Result<bool> {
        (**self).shift(point)
    }
}

/// Applies each operation in order, restoring `point` if any of them fails.
///
/// # Example
///
/// ```
/// # use gridshift::{OperationPoint, Result, ShiftOperation};
/// # use gridshift::operation::shift_all;
/// struct East(f64);
///
/// impl ShiftOperation for East {
///     fn shift(&self, point: &mut OperationPoint) -> Result<bool> {
///         point.x += self.0;
///         Ok(true)
///     }
/// }
///
/// let mut point = OperationPoint::new(0.0, 0.0, 0.0);
/// assert!(shift_all(&[East(1.0), East(2.0)], &mut point)?);
/// assert_eq!(point.x, 3.0);
/// # Ok::<(), gridshift::Error>(())
/// ```
pub fn shift_all<T>(operations: &[T], point: &mut OperationPoint) -> Result<bool>
where
    T: ShiftOperation,
{
    let saved = *point;
    for operation in operations {
        match operation.shift(point) {
            Ok(true) => {}
            Ok(false) => {
                point.restore(&saved);
                return Ok(false);
            }
            Err(e) => {
                point.restore(&saved);
                return Err(e);
            }
        }
    }
    Ok(true)
}
