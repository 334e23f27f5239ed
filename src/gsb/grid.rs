use std::io::Read;

use crate::error::{Error, ErrorKind, Result};
use crate::gsb::reader::RecordReader;
use crate::raster::GridRaster;
use crate::Bounds;

/// The `PARENT` value of a top-level sub-grid.
const NO_PARENT: &str = "NONE";

/// A sub-grid of an NTv2 file.
///
/// The coordinates are arc-seconds, and longitude is positive-west.
/// The shifts are arc-seconds, longitude positive-west as well.
///
/// The children are indexes into [`GridShiftFile::grids`](crate::gsb::GridShiftFile::grids).
#[derive(Debug, PartialEq, Clone)]
pub struct SubGrid {
    pub(crate) name: String,
    pub(crate) parent: Option<String>,
    pub(crate) created: String,
    pub(crate) updated: String,
    pub(crate) bounds: Bounds,
    pub(crate) lon_shift: GridRaster,
    pub(crate) lat_shift: GridRaster,
    pub(crate) lon_accuracy: Option<GridRaster>,
    pub(crate) lat_accuracy: Option<GridRaster>,
    pub(crate) children: Vec<usize>,
}

impl SubGrid {
    /// Reads a sub-grid header and its nodes.
    pub(crate) fn read<R>(reader: &mut RecordReader<R>, load_accuracy: bool) -> Result<Self>
    where
        R: Read,
    {
        let name = reader.record_string()?;
        let parent = reader.record_string()?;
        let created = reader.record_string()?;
        let updated = reader.record_string()?;
        let south = reader.record_double()?;
        let north = reader.record_double()?;
        let east = reader.record_double()?;
        let west = reader.record_double()?;
        let lat_inc = reader.record_double()?;
        let lon_inc = reader.record_double()?;
        let count = reader.record_int()?;

        let width = dimension(east, west, lon_inc);
        let height = dimension(south, north, lat_inc);
        let (width, height) = match (width, height) {
            (Some(width), Some(height)) => (width, height),
            _ => return Err(Error::new(ErrorKind::InvalidGridDimension { grid: name })),
        };
        let expected = width * height;
        let found = usize::try_from(count).unwrap_or(0);
        if found != expected {
            return Err(Error::new(ErrorKind::NodeCount {
                grid: name,
                expected,
                found,
            }));
        }

        // capacity is bounded until the nodes are actually read
        let capacity = expected.min(1 << 20);
        let mut lat_shift = Vec::with_capacity(capacity);
        let mut lon_shift = Vec::with_capacity(capacity);
        let (mut lat_accuracy, mut lon_accuracy) = if load_accuracy {
            (Vec::with_capacity(capacity), Vec::with_capacity(capacity))
        } else {
            (Vec::new(), Vec::new())
        };

        for _ in 0..expected {
            let [lat, lon, lat_acc, lon_acc] = reader.read_node()?;
            lat_shift.push(lat);
            lon_shift.push(lon);
            if load_accuracy {
                lat_accuracy.push(lat_acc);
                lon_accuracy.push(lon_acc);
            }
        }

        let raster = |values| {
            GridRaster::try_new(east, south, lon_inc, lat_inc, width, height, values)
                .ok_or_else(|| Error::new(ErrorKind::InvalidGridDimension { grid: name.clone() }))
        };

        let lon_shift = raster(lon_shift)?;
        let lat_shift = raster(lat_shift)?;
        let (lon_accuracy, lat_accuracy) = if load_accuracy {
            (Some(raster(lon_accuracy)?), Some(raster(lat_accuracy)?))
        } else {
            (None, None)
        };

        Ok(Self {
            parent: (!parent.eq_ignore_ascii_case(NO_PARENT) && !parent.is_empty())
                .then_some(parent),
            created,
            updated,
            bounds: Bounds::new(east, south, west, north),
            lon_shift,
            lat_shift,
            lon_accuracy,
            lat_accuracy,
            children: Vec::new(),
            name,
        })
    }

    /// Returns the name, `SUB_NAME`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent name, [`None`] for a top-level sub-grid.
    #[inline]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns `true` if the sub-grid is nested in another.
    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the creation date, `CREATED`.
    #[inline]
    pub fn created(&self) -> &str {
        &self.created
    }

    /// Returns the update date, `UPDATED`.
    #[inline]
    pub fn updated(&self) -> &str {
        &self.updated
    }

    /// Returns the extent, positive-west arc-seconds.
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns the indexes of the nested sub-grids.
    #[inline]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Returns the longitude shift \[sec\], positive-west.
    #[inline]
    pub fn lon_shift(&self) -> &GridRaster {
        &self.lon_shift
    }

    /// Returns the latitude shift \[sec\].
    #[inline]
    pub fn lat_shift(&self) -> &GridRaster {
        &self.lat_shift
    }

    /// Returns the longitude accuracy, loaded only on request.
    #[inline]
    pub fn lon_accuracy(&self) -> Option<&GridRaster> {
        self.lon_accuracy.as_ref()
    }

    /// Returns the latitude accuracy, loaded only on request.
    #[inline]
    pub fn lat_accuracy(&self) -> Option<&GridRaster> {
        self.lat_accuracy.as_ref()
    }

    /// Returns `true` if (`lon`, `lat`) \[sec\] is inside `self`.
    #[inline]
    pub fn covers(&self, lon: f64, lat: f64) -> bool {
        self.bounds.covers(lon, lat)
    }

    /// Returns the interpolated (longitude, latitude) shift \[sec\] at (`lon`, `lat`) \[sec\].
    #[inline]
    pub fn shift_at(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            self.lon_shift.sample_bilinear(lon, lat),
            self.lat_shift.sample_bilinear(lon, lat),
        )
    }

    /// Returns the interpolated (longitude, latitude) accuracy, if loaded.
    pub fn accuracy_at(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        match (&self.lon_accuracy, &self.lat_accuracy) {
            (Some(lon_acc), Some(lat_acc)) => Some((
                lon_acc.sample_bilinear(lon, lat),
                lat_acc.sample_bilinear(lon, lat),
            )),
            _ => None,
        }
    }
}

/// Returns the node count along an axis.
fn dimension(min: f64, max: f64, increment: f64) -> Option<usize> {
    if !(min.is_finite() && max.is_finite() && increment > 0.0 && min <= max) {
        return None;
    }
    let cells = ((max - min) / increment).round();
    if cells.is_finite() && cells < u32::MAX as f64 {
        Some(cells as usize + 1)
    } else {
        None
    }
}
