//! Provides the NTv2 grid shift file, [`GridShiftFile`].
//!
//! An NTv2 file is a forest of [`SubGrid`]s, a sub-grid may nest
//! finer grids inside its extent. A position always resolves to the
//! deepest sub-grid covering it.
//!
//! The file uses arc-seconds with positive-west longitude,
//! while [`OperationPoint`](crate::OperationPoint) holds degrees
//! with positive-east longitude, the operations convert between them.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::{Bounds, Ellipsoid};

pub use grid::SubGrid;
pub use operation::{ForwardShift, InverseShift};

mod grid;
mod operation;
mod reader;

#[cfg(test)]
pub(crate) mod fixture;

use reader::RecordReader;

/// The only shift unit supported.
const SECONDS: &str = "SECONDS";

/// A parsed NTv2 grid shift file.
///
/// # Example
///
/// ```no_run
/// use gridshift::{GridShiftFile, OperationPoint, ShiftOperation};
///
/// let file = GridShiftFile::open("NTV2_0.GSB", false)?;
///
/// let mut point = OperationPoint::new(-123.365646, 48.428421, 0.0);
/// if file.forward_operation().shift(&mut point)? {
///     println!("NAD83: {point:?}");
/// }
/// # Ok::<(), gridshift::Error>(())
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct GridShiftFile {
    version: String,
    from_ellipsoid: Ellipsoid,
    to_ellipsoid: Ellipsoid,
    grids: Vec<SubGrid>,
    roots: Vec<usize>,
}

impl GridShiftFile {
    /// Reads an NTv2 file from `path`.
    ///
    /// The accuracy rasters are kept only if `load_accuracy` is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when the file cannot be read or is not a valid NTv2 file.
    pub fn open(path: impl AsRef<Path>, load_accuracy: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::new_io(path, e))?;
        debug!(path = %path.display(), "reading NTv2 grid shift file");
        let reader = RecordReader::try_new(BufReader::new(file), path.to_path_buf())?;
        Self::parse(reader, load_accuracy)
    }

    /// Reads an NTv2 file from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when reading fails or the data is not a valid NTv2 file.
    pub fn from_reader<R>(reader: R, load_accuracy: bool) -> Result<Self>
    where
        R: Read,
    {
        let reader = RecordReader::try_new(reader, PathBuf::from("<reader>"))?;
        Self::parse(reader, load_accuracy)
    }

    /// Reads an NTv2 file from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] when the data is not a valid NTv2 file.
    #[inline]
    pub fn from_slice(data: &[u8], load_accuracy: bool) -> Result<Self> {
        Self::from_reader(data, load_accuracy)
    }

    fn parse<R>(mut reader: RecordReader<R>, load_accuracy: bool) -> Result<Self>
    where
        R: Read,
    {
        let _ = reader.record_int()?; // NUM_SREC
        let grid_count = reader.record_int()?;

        let shift_type = reader.record_string()?;
        if shift_type != SECONDS {
            return Err(Error::new(ErrorKind::UnsupportedShiftType { found: shift_type }));
        }

        let version = reader.record_string()?;
        let from_name = reader.record_string()?;
        let to_name = reader.record_string()?;
        let from_major = reader.record_double()?;
        let from_minor = reader.record_double()?;
        let to_major = reader.record_double()?;
        let to_minor = reader.record_double()?;

        let from_ellipsoid = Ellipsoid::from_name_or_axes(&from_name, from_major, from_minor);
        let to_ellipsoid = Ellipsoid::from_name_or_axes(&to_name, to_major, to_minor);

        let grid_count = usize::try_from(grid_count).unwrap_or(0);
        let mut grids = Vec::with_capacity(grid_count.min(1024));
        for _ in 0..grid_count {
            grids.push(SubGrid::read(&mut reader, load_accuracy)?);
        }

        let roots = link(&mut grids)?;

        debug!(
            version = %version,
            byte_order = ?reader.order(),
            grids = grids.len(),
            roots = roots.len(),
            "parsed NTv2 grid shift file"
        );

        Ok(Self {
            version,
            from_ellipsoid,
            to_ellipsoid,
            grids,
            roots,
        })
    }

    /// Returns the format version, `VERSION`.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the ellipsoid of the source datum.
    #[inline]
    pub fn from_ellipsoid(&self) -> &Ellipsoid {
        &self.from_ellipsoid
    }

    /// Returns the ellipsoid of the target datum.
    #[inline]
    pub fn to_ellipsoid(&self) -> &Ellipsoid {
        &self.to_ellipsoid
    }

    /// Returns all sub-grids in file order.
    #[inline]
    pub fn grids(&self) -> &[SubGrid] {
        &self.grids
    }

    /// Returns the top-level sub-grids.
    pub fn roots(&self) -> impl Iterator<Item = &SubGrid> + '_ {
        self.roots.iter().map(|&i| &self.grids[i])
    }

    /// Returns the deepest sub-grid covering (`lon`, `lat`),
    /// in positive-west arc-seconds.
    ///
    /// Returns [`None`] if no top-level sub-grid covers the position.
    pub fn find_grid(&self, lon: f64, lat: f64) -> Option<&SubGrid> {
        self.roots
            .iter()
            .find_map(|&root| self.find_in(root, lon, lat))
            .map(|i| &self.grids[i])
    }

    fn find_in(&self, index: usize, lon: f64, lat: f64) -> Option<usize> {
        let grid = &self.grids[index];
        if !grid.covers(lon, lat) {
            return None;
        }
        grid.children
            .iter()
            .find_map(|&child| self.find_in(child, lon, lat))
            .or(Some(index))
    }

    /// Returns the name and extent of every sub-grid, parents before children.
    pub fn extents(&self) -> Vec<(&str, &Bounds)> {
        let mut result = Vec::with_capacity(self.grids.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let grid = &self.grids[index];
            result.push((grid.name(), grid.bounds()));
            stack.extend(grid.children.iter().rev());
        }
        result
    }

    /// Returns the operation shifting from the source datum to the target one.
    #[inline]
    pub fn forward_operation(&self) -> ForwardShift<&Self> {
        ForwardShift::new(self)
    }

    /// Returns the operation shifting from the target datum to the source one.
    #[inline]
    pub fn inverse_operation(&self) -> InverseShift<&Self> {
        InverseShift::new(self)
    }
}

/// Attaches every sub-grid to its parent and returns the roots.
fn link(grids: &mut [SubGrid]) -> Result<Vec<usize>> {
    let index_by_name: HashMap<String, usize> = grids
        .iter()
        .enumerate()
        .map(|(i, grid)| (grid.name.clone(), i))
        .collect();

    let mut roots = Vec::new();
    for i in 0..grids.len() {
        match grids[i].parent.clone() {
            None => roots.push(i),
            Some(parent) => match index_by_name.get(&parent) {
                Some(&p) => grids[p].children.push(i),
                None => {
                    return Err(Error::new(ErrorKind::DanglingParent {
                        grid: grids[i].name.clone(),
                        parent,
                    }))
                }
            },
        }
    }
    Ok(roots)
}
