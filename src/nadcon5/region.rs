use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nadcon5::{file_name, GridParameter, GridType, Nadcon5File, NADCON5_DATE};
use crate::point::to_positive_east;
use crate::{Bounds, OperationPoint};

const SECONDS_PER_DEGREE: f64 = 3600.0;

/// The configuration of a [`Region`].
///
/// `bounds` is degrees with 0 to 360 positive-east longitude,
/// `datums` is the chain from the oldest datum to the latest one.
///
/// # Example
///
/// ```
/// # use gridshift::Bounds;
/// # use gridshift::nadcon5::RegionDefinition;
/// let definition = RegionDefinition::new(
///     "conus",
///     "20160901",
///     Bounds::new(235.0, 24.0, 294.0, 50.0),
///     ["NAD27", "NAD83(1986)"],
/// );
/// assert_eq!(definition.datums.len(), 2);
/// ```
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionDefinition {
    /// The region key of the file names, e.g. `conus`
    pub name: String,
    /// The date key of the file names, e.g. `20160901`
    pub date: String,
    /// The extent
    pub bounds: Bounds,
    /// The datum chain
    pub datums: Vec<String>,
}

impl RegionDefinition {
    /// Makes a [`RegionDefinition`].
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        bounds: Bounds,
        datums: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            bounds,
            datums: datums.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the regions of the NADCON5.0 release.
    ///
    /// The islands in the Bering Sea come before `alaska`,
    /// whose box encloses them.
    pub fn nadcon5() -> Vec<Self> {
        let region = |name: &str, bounds: Bounds, datums: &[&str]| {
            Self::new(name, NADCON5_DATE, bounds, datums.iter().copied())
        };
        vec![
            region(
                "conus",
                Bounds::new(235.0, 24.0, 294.0, 50.0),
                &[
                    "NAD27",
                    "NAD83(1986)",
                    "NAD83(HARN)",
                    "NAD83(FBN)",
                    "NAD83(NSRS2007)",
                    "NAD83(2011)",
                ],
            ),
            region(
                "prvi",
                Bounds::new(292.0, 17.0, 296.0, 19.0),
                &[
                    "PR40",
                    "NAD83(1986)",
                    "NAD83(1993)",
                    "NAD83(1997)",
                    "NAD83(2002)",
                    "NAD83(NSRS2007)",
                    "NAD83(2011)",
                ],
            ),
            region(
                "hawaii",
                Bounds::new(199.0, 18.0, 206.0, 23.0),
                &["OHD", "NAD83(1986)", "NAD83(1993)", "NAD83(PA11)"],
            ),
            region(
                "as",
                Bounds::new(188.0, -15.0, 191.0, -13.0),
                &["AS62", "NAD83(1993)", "NAD83(2002)", "NAD83(PA11)"],
            ),
            region(
                "guamcnmi",
                Bounds::new(143.0, 12.0, 147.0, 22.0),
                &["GU63", "NAD83(1993)", "NAD83(2002)", "NAD83(MA11)"],
            ),
            region(
                "stgeorge",
                Bounds::new(190.2, 56.45, 190.8, 56.7),
                &["SG1897", "SG1952", "NAD83(1986)"],
            ),
            region(
                "stpaul",
                Bounds::new(189.4, 57.0, 190.1, 57.3),
                &["SP1897", "SP1952", "NAD83(1986)"],
            ),
            region(
                "stlawrence",
                Bounds::new(187.9, 62.8, 191.5, 64.0),
                &["SL1952", "NAD83(1986)"],
            ),
            region(
                "alaska",
                Bounds::new(172.0, 46.0, 232.0, 77.0),
                &[
                    "NAD27",
                    "NAD83(1986)",
                    "NAD83(1992)",
                    "NAD83(NSRS2007)",
                    "NAD83(2011)",
                ],
            ),
        ]
    }
}

/// A NADCON5 region, a box with a chain of datums.
#[derive(Debug)]
pub struct Region {
    index: usize,
    name: String,
    date: String,
    bounds: Bounds,
    datums: Vec<String>,
    grids: Vec<RegionDatumGridSet>,
}

impl Region {
    /// Makes a region whose files are in `directory`.
    pub(crate) fn new(index: usize, definition: RegionDefinition, directory: &Path) -> Self {
        let RegionDefinition {
            name,
            date,
            bounds,
            datums,
        } = definition;

        let grids = datums
            .windows(2)
            .map(|pair| {
                RegionDatumGridSet::new(directory, &name, &date, bounds, &pair[0], &pair[1])
            })
            .collect();

        Self {
            index,
            name,
            date,
            bounds,
            datums,
            grids,
        }
    }

    /// Returns the position in the owning [`RegionTable`](crate::nadcon5::RegionTable).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns the datum chain.
    #[inline]
    pub fn datums(&self) -> &[String] {
        &self.datums
    }

    /// Returns the grid sets, the `i`-th one goes from `datums[i]` to `datums[i + 1]`.
    #[inline]
    pub fn grids(&self) -> &[RegionDatumGridSet] {
        &self.grids
    }

    /// Returns the position of `datum` in the chain.
    #[inline]
    pub fn datum_index(&self, datum: &str) -> Option<usize> {
        self.datums.iter().position(|d| d == datum)
    }

    /// Returns `true` if (`lon`, `lat`) \[deg\] is inside `self`, `lon` is 0 to 360.
    #[inline]
    pub fn covers(&self, lon: f64, lat: f64) -> bool {
        self.bounds.covers(lon, lat)
    }

    /// Closes the files of all grid sets.
    pub fn close(&self) {
        for grids in &self.grids {
            grids.close();
        }
    }
}

/// The six files of a datum pair in a region.
#[derive(Debug)]
pub struct RegionDatumGridSet {
    bounds: Bounds,
    source: String,
    target: String,
    lon_shift: Nadcon5File,
    lat_shift: Nadcon5File,
    eht_shift: Nadcon5File,
    lon_accuracy: Nadcon5File,
    lat_accuracy: Nadcon5File,
    eht_accuracy: Nadcon5File,
}

impl RegionDatumGridSet {
    fn new(
        directory: &Path,
        region: &str,
        date: &str,
        bounds: Bounds,
        source: &str,
        target: &str,
    ) -> Self {
        let file = |parameter, grid_type| {
            Nadcon5File::new(directory.join(file_name(
                region, source, target, parameter, grid_type, date,
            )))
        };

        Self {
            bounds,
            source: source.to_string(),
            target: target.to_string(),
            lon_shift: file(GridParameter::Longitude, GridType::Shift),
            lat_shift: file(GridParameter::Latitude, GridType::Shift),
            eht_shift: file(GridParameter::EllipsoidHeight, GridType::Shift),
            lon_accuracy: file(GridParameter::Longitude, GridType::Accuracy),
            lat_accuracy: file(GridParameter::Latitude, GridType::Accuracy),
            eht_accuracy: file(GridParameter::EllipsoidHeight, GridType::Accuracy),
        }
    }

    /// Returns the source datum.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the target datum.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the file of `parameter` and `grid_type`.
    pub fn file(&self, parameter: GridParameter, grid_type: GridType) -> &Nadcon5File {
        match (parameter, grid_type) {
            (GridParameter::Longitude, GridType::Shift) => &self.lon_shift,
            (GridParameter::Latitude, GridType::Shift) => &self.lat_shift,
            (GridParameter::EllipsoidHeight, GridType::Shift) => &self.eht_shift,
            (GridParameter::Longitude, GridType::Accuracy) => &self.lon_accuracy,
            (GridParameter::Latitude, GridType::Accuracy) => &self.lat_accuracy,
            (GridParameter::EllipsoidHeight, GridType::Accuracy) => &self.eht_accuracy,
        }
    }

    /// Shifts `point` from the source datum to the target datum.
    ///
    /// `point.x` is taken to 0 to 360 positive-east.
    /// Returns `Ok(false)`, leaving `point` unchanged,
    /// if any shift is unavailable or the result leaves the region.
    #[inline]
    pub fn shift_forward(&self, point: &mut OperationPoint) -> Result<bool> {
        self.apply(point, 1.0)
    }

    /// Shifts `point` from the target datum to the source datum.
    ///
    /// The shifts are sampled at the target position, there is no iteration.
    #[inline]
    pub fn shift_inverse(&self, point: &mut OperationPoint) -> Result<bool> {
        self.apply(point, -1.0)
    }

    fn apply(&self, point: &mut OperationPoint, sign: f64) -> Result<bool> {
        let lon = to_positive_east(point.x);
        let lat = point.y;

        let dlon = self.lon_shift.sample_biquadratic(lon, lat)?;
        let dlat = self.lat_shift.sample_biquadratic(lon, lat)?;
        let deht = self.eht_shift.sample_biquadratic(lon, lat)?;
        if !(dlon.is_finite() && dlat.is_finite() && deht.is_finite()) {
            return Ok(false);
        }

        let x = lon + sign * dlon / SECONDS_PER_DEGREE;
        let y = lat + sign * dlat / SECONDS_PER_DEGREE;
        if !self.bounds.covers(x, y) {
            return Ok(false);
        }

        point.reset(x, y, point.z + sign * deht);
        Ok(true)
    }

    /// Returns the (longitude \[sec\], latitude \[sec\], height \[m\]) accuracy at `point`.
    ///
    /// A value is NaN where its file is unavailable.
    pub fn accuracy(&self, point: &OperationPoint) -> Result<(f64, f64, f64)> {
        let lon = to_positive_east(point.x);
        let lat = point.y;
        Ok((
            self.lon_accuracy.sample_biquadratic(lon, lat)?,
            self.lat_accuracy.sample_biquadratic(lon, lat)?,
            self.eht_accuracy.sample_biquadratic(lon, lat)?,
        ))
    }

    /// Closes the six files.
    pub fn close(&self) {
        self.lon_shift.close();
        self.lat_shift.close();
        self.eht_shift.close();
        self.lon_accuracy.close();
        self.lat_accuracy.close();
        self.eht_accuracy.close();
    }
}
