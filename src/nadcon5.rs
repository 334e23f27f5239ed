//! NADCON5 datum transformation.
//!
//! NADCON5 publishes one `.b` raster per region, datum pair, parameter
//! and grid type. Files are opened on first use and sampled by positioned
//! reads, see [`Nadcon5File`].
//!
//! A [`RegionTable`] holds the regions with their datum chains,
//! [`ChainedShift`] walks a chain from a source datum to a target datum.
//!
//! Coordinates are degrees, regions use the 0 to 360 positive-east longitude.
pub use file::{quadratic, Header, Nadcon5File};
pub use operation::ChainedShift;
pub use region::{Region, RegionDatumGridSet, RegionDefinition};
pub use table::RegionTable;

mod file;
mod operation;
mod region;
mod table;

#[cfg(test)]
pub(crate) mod fixture;

/// The date string of the NADCON5.0 release.
pub const NADCON5_DATE: &str = "20160901";

/// The quantity tabulated by a NADCON5 file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum GridParameter {
    /// Longitude \[sec\]
    Longitude,
    /// Latitude \[sec\]
    Latitude,
    /// Ellipsoid height \[m\]
    EllipsoidHeight,
}

impl GridParameter {
    /// Returns the key used in file names.
    ///
    /// # Example
    ///
    /// ```
    /// # use gridshift::nadcon5::GridParameter;
    /// assert_eq!(GridParameter::EllipsoidHeight.key(), "eht");
    /// ```
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Longitude => "lon",
            Self::Latitude => "lat",
            Self::EllipsoidHeight => "eht",
        }
    }
}

/// Whether a NADCON5 file holds shifts or their accuracy.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum GridType {
    /// Transformation, `trn`
    Shift,
    /// Error estimate, `err`
    Accuracy,
}

impl GridType {
    /// Returns the key used in file names.
    #[inline]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Shift => "trn",
            Self::Accuracy => "err",
        }
    }
}

/// Returns the file name key of a datum name.
///
/// # Example
///
/// ```
/// # use gridshift::nadcon5::datum_key;
/// assert_eq!(datum_key("NAD83(2011)"), "nad83_2011");
/// assert_eq!(datum_key("NAD83(NSRS2007)"), "nad83_2007");
/// assert_eq!(datum_key("NAD27"), "nad27");
/// ```
pub fn datum_key(name: &str) -> String {
    name.replace('(', "_")
        .replace(')', "")
        .replace("NSRS", "")
        .to_lowercase()
}

/// Regions published only for their historical datums,
/// the later realizations are in the `alaska` files.
const ALASKA_ISLANDS: [&str; 3] = ["stgeorge", "stpaul", "stlawrence"];

/// Returns the year a datum key ends with, `0` if it does not.
fn datum_year(key: &str) -> u32 {
    key.len()
        .checked_sub(4)
        .and_then(|i| key.get(i..))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

/// Returns the region key of the file name for a datum pair.
///
/// The islands of `stgeorge`, `stpaul`, and `stlawrence` fall back to
/// `alaska` when either datum is later than 1986.
pub(crate) fn region_key<'a>(region: &'a str, source_key: &str, target_key: &str) -> &'a str {
    if ALASKA_ISLANDS.contains(&region)
        && (datum_year(source_key) > 1986 || datum_year(target_key) > 1986)
    {
        "alaska"
    } else {
        region
    }
}

/// Returns the NADCON5 file name.
///
/// # Example
///
/// ```
/// # use gridshift::nadcon5::{file_name, GridParameter, GridType};
/// assert_eq!(
///     file_name("conus", "NAD27", "NAD83(1986)", GridParameter::Latitude, GridType::Shift, "20160901"),
///     "nadcon5.nad27.nad83_1986.conus.lat.trn.20160901.b"
/// );
/// ```
pub fn file_name(
    region: &str,
    source_datum: &str,
    target_datum: &str,
    parameter: GridParameter,
    grid_type: GridType,
    date: &str,
) -> String {
    let source = datum_key(source_datum);
    let target = datum_key(target_datum);
    format!(
        "nadcon5.{}.{}.{}.{}.{}.{}.b",
        source,
        target,
        region_key(region, &source, &target),
        parameter.key(),
        grid_type.key(),
        date
    )
}
