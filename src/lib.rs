//! # gridshift
//!
//! Datum transformation by grid-shift files,
//! the hierarchical NTv2 format [^1] and the NADCON5 rasters [^2].
//!
//! ```no_run
//! use std::error::Error;
//!
//! use gridshift::{GridShiftFile, OperationPoint, ShiftOperation};
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     // Reads an NTv2 file, e.g. NTv2_0.gsb
//!     let file = GridShiftFile::open("NTv2_0.gsb", false)?;
//!
//!     // Longitude and latitude in degree, height in metre
//!     let mut point = OperationPoint::new(-123.0, 49.0, 0.0);
//!
//!     // Shifts from the source datum to the target datum,
//!     // `false` if no sub-grid covers the point
//!     if file.forward_operation().shift(&mut point)? {
//!         println!("Forward: {point:?}");
//!     }
//!
//!     // and back
//!     file.inverse_operation().shift(&mut point)?;
//!     println!("Inverse: {point:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! Features:
//!
//! - NTv2 parser of both byte orders, with nested sub-grids
//! - Forward and (approximate, iterative) inverse NTv2 shift
//! - NADCON5 files read on demand, nothing is loaded in memory
//! - Chained NADCON5 shift through the intermediate datums,
//!   rolled back when any step is unavailable
//!
//! This package does not contain grid files, download them from the publishers.
//!
//! # Shift Operation
//!
//! Every operation implements [`ShiftOperation`], which shifts an [`OperationPoint`] in place.
//! It returns `Ok(false)` when the point is not covered,
//! and [`Err`] only when reading a file fails. In both cases the point is unchanged.
//!
//! ```
//! use gridshift::{OperationPoint, RegionTableBuilder, ShiftOperation};
//!
//! let table = RegionTableBuilder::new()
//!     .directory("/path/to/nadcon5")
//!     .nadcon5()
//!     .build();
//!
//! let op = table.chained_shift("NAD27", "NAD83(2011)");
//!
//! let mut point = OperationPoint::new(-100.0, 40.0, 0.0);
//! // the files are not installed
//! assert!(!op.shift(&mut point)?);
//! assert_eq!(point, OperationPoint::new(-100.0, 40.0, 0.0));
//! # Ok::<(), gridshift::Error>(())
//! ```
//!
//! # Serialization and Deserialization
//!
//! It supports (de)serialization by [`serde` crate](https://crates.io/crates/serde)
//! for [`RegionDefinition`](nadcon5::RegionDefinition), [`Bounds`],
//! [`OperationPoint`] and [`Ellipsoid`] only if the feature `serde` is enabled.
//!
//! [^1]: NTv2 Developer's Guide, Natural Resources Canada.
//!
//! [^2]: NADCON 5.0, U.S. National Geodetic Survey: <https://geodesy.noaa.gov/NADCON5/>.

#[doc(inline)]
pub use bounds::Bounds;
#[doc(inline)]
pub use builder::RegionTableBuilder;
#[doc(inline)]
pub use ellipsoid::Ellipsoid;
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use gsb::{GridShiftFile, SubGrid};
#[doc(inline)]
pub use operation::ShiftOperation;
#[doc(inline)]
pub use point::OperationPoint;
#[doc(inline)]
pub use raster::GridRaster;

pub mod bounds;
pub mod builder;
pub mod ellipsoid;
pub mod error;
pub mod gsb;
mod internal;
pub mod nadcon5;
pub mod operation;
pub mod point;
pub mod raster;
