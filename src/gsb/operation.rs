use std::ops::Deref;

use crate::gsb::GridShiftFile;
use crate::{OperationPoint, Result, ShiftOperation};

const SECONDS_PER_DEGREE: f64 = 3600.0;

/// Iteration count of the inverse shift.
const ITERATION: usize = 4;

/// Returns (positive-west longitude, latitude) \[sec\] of `point`.
#[inline]
fn to_seconds(point: &OperationPoint) -> (f64, f64) {
    (-point.x * SECONDS_PER_DEGREE, point.y * SECONDS_PER_DEGREE)
}

#[inline]
fn set_seconds(point: &mut OperationPoint, lon: f64, lat: f64) {
    point.x = -lon / SECONDS_PER_DEGREE;
    point.y = lat / SECONDS_PER_DEGREE;
}

/// The shift from the source datum of an NTv2 file to its target datum.
///
/// `F` is anything dereferencing to a [`GridShiftFile`],
/// such as `&GridShiftFile` or `Arc<GridShiftFile>`.
#[derive(Debug, Clone)]
pub struct ForwardShift<F> {
    file: F,
}

impl<F> ForwardShift<F>
where
    F: Deref<Target = GridShiftFile>,
{
    /// Makes the shift of `file`.
    #[inline]
    pub fn new(file: F) -> Self {
        Self { file }
    }

    /// Returns the underlying file.
    #[inline]
    pub fn file(&self) -> &GridShiftFile {
        &self.file
    }
}

impl<F> ShiftOperation for ForwardShift<F>
where
    F: Deref<Target = GridShiftFile>,
{
    /// Adds the interpolated shift of the deepest covering sub-grid.
    ///
    /// Returns `Ok(false)`, leaving `point` unchanged, if no sub-grid covers it.
    fn shift(&self, point: &mut OperationPoint) -> Result<bool> {
        let (lon, lat) = to_seconds(point);

        let Some(grid) = self.file.find_grid(lon, lat) else {
            return Ok(false);
        };

        let (dlon, dlat) = grid.shift_at(lon, lat);
        if !(dlon.is_finite() && dlat.is_finite()) {
            return Ok(false);
        }

        set_seconds(point, lon + dlon, lat + dlat);
        Ok(true)
    }
}

/// The shift from the target datum of an NTv2 file back to its source datum.
///
/// The shifts are tabulated at source positions,
/// so this solves for the source position by fixed-point iteration,
/// starting from the target position.
/// It runs 4 passes and the result is an approximation,
/// within about 1e-6 \[sec\] on grids of realistic smoothness.
///
/// If the candidate leaves every sub-grid after the first pass,
/// the last estimate is taken as the result.
#[derive(Debug, Clone)]
pub struct InverseShift<F> {
    file: F,
}

impl<F> InverseShift<F>
where
    F: Deref<Target = GridShiftFile>,
{
    /// Makes the shift of `file`.
    #[inline]
    pub fn new(file: F) -> Self {
        Self { file }
    }

    /// Returns the underlying file.
    #[inline]
    pub fn file(&self) -> &GridShiftFile {
        &self.file
    }
}

impl<F> ShiftOperation for InverseShift<F>
where
    F: Deref<Target = GridShiftFile>,
{
    fn shift(&self, point: &mut OperationPoint) -> Result<bool> {
        let (lon, lat) = to_seconds(point);
        let (mut x, mut y) = (lon, lat);

        for i in 0..ITERATION {
            let shift = self
                .file
                .find_grid(x, y)
                .map(|grid| grid.shift_at(x, y))
                .filter(|(dlon, dlat)| dlon.is_finite() && dlat.is_finite());

            match shift {
                Some((dlon, dlat)) => {
                    x = lon - dlon;
                    y = lat - dlat;
                }
                None if i == 0 => return Ok(false),
                // keeps the estimate of the previous pass
                None => break,
            }
        }

        set_seconds(point, x, y);
        Ok(true)
    }
}
