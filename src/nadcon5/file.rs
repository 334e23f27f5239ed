use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::internal::mul_add;

/// Bytes before the first row.
const HEADER_LENGTH: u64 = 52;

/// Tolerance \[deg\] of a query outside of the grid.
const TOLERANCE: f64 = 5.0e-6;

/// The preamble of a NADCON5 `.b` file.
///
/// Longitude is 0 to 360 positive-east, as the file stores it.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Header {
    /// Latitude of the first row \[deg\]
    pub min_lat: f64,
    /// Longitude of the first column \[deg\]
    pub min_lon: f64,
    /// Latitude of the last row \[deg\]
    pub max_lat: f64,
    /// Longitude of the last column \[deg\]
    pub max_lon: f64,
    /// Row spacing \[deg\]
    pub dlat: f64,
    /// Column spacing \[deg\]
    pub dlon: f64,
    /// Columns, padding excluded
    pub width: usize,
    /// Rows
    pub height: usize,
    /// Cell encoding flag, `0` or `1` for f32, otherwise i16
    pub kind: i32,
    /// Bytes per cell, `4` for f32 and `2` for i16
    pub cell_size: usize,
    /// Bytes per row, including a padding cell on each side
    pub row_stride: usize,
}

impl Header {
    /// Parses the big-endian header, [`None`] if it does not describe a 3x3 grid at least.
    fn parse(raw: &[u8; HEADER_LENGTH as usize]) -> Option<Self> {
        let f64_at = |i: usize| {
            let mut b = [0u8; 8];
            b.copy_from_slice(&raw[i..i + 8]);
            f64::from_be_bytes(b)
        };
        let i32_at = |i: usize| {
            let mut b = [0u8; 4];
            b.copy_from_slice(&raw[i..i + 4]);
            i32::from_be_bytes(b)
        };

        let min_lat = f64_at(4);
        let min_lon = f64_at(12);
        let dlat = f64_at(20);
        let dlon = f64_at(28);
        let height = usize::try_from(i32_at(36)).ok()?;
        let width = usize::try_from(i32_at(40)).ok()?;
        let kind = i32_at(44);

        if !(min_lat.is_finite() && min_lon.is_finite() && dlat > 0.0 && dlon > 0.0) {
            return None;
        }
        if height < 3 || width < 3 || !dlat.is_finite() || !dlon.is_finite() {
            return None;
        }

        let cell_size = if kind == 0 || kind == 1 { 4 } else { 2 };
        Some(Self {
            min_lat,
            min_lon,
            max_lat: mul_add!((height - 1) as f64, dlat, min_lat),
            max_lon: mul_add!((width - 1) as f64, dlon, min_lon),
            dlat,
            dlon,
            width,
            height,
            kind,
            cell_size,
            row_stride: (width + 2) * cell_size,
        })
    }

    /// Returns the first row of the 3x3 window around `lat`, [`None`] if out of the grid.
    #[inline]
    pub fn row(&self, lat: f64) -> Option<usize> {
        window(lat, self.min_lat, self.max_lat, self.dlat, self.height)
    }

    /// Returns the first column of the 3x3 window around `lon`, [`None`] if out of the grid.
    #[inline]
    pub fn column(&self, lon: f64) -> Option<usize> {
        window(lon, self.min_lon, self.max_lon, self.dlon, self.width)
    }

    #[inline]
    fn offset(&self, row: usize, column: usize) -> u64 {
        HEADER_LENGTH + (row * self.row_stride + (column + 1) * self.cell_size) as u64
    }

    #[inline]
    fn cell(&self, raw: &[u8]) -> f64 {
        if self.cell_size == 4 {
            f32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]) as f64
        } else {
            i16::from_be_bytes([raw[0], raw[1]]) as f64
        }
    }
}

/// Returns the first index of the 3-node window centred on the node nearest to `value`.
///
/// A `value` out of `[min, max]` by no more than the tolerance is clamped to the edge.
fn window(value: f64, min: f64, max: f64, delta: f64, dim: usize) -> Option<usize> {
    if value.is_nan() || value < min - TOLERANCE || value > max + TOLERANCE {
        return None;
    }
    let value = value.clamp(min, max);

    // counts half cells so that the parity tells the nearest node
    let half = ((value - min) / (delta / 2.0)).floor() as usize + 1;
    let nearest = if half % 2 == 1 {
        (half + 1) / 2 - 1
    } else {
        half / 2
    };
    Some(nearest.clamp(1, dim - 2) - 1)
}

/// Returns the quadratic through `(0, a)`, `(1, b)`, `(2, c)` at `t`.
///
/// # Example
///
/// ```
/// # use gridshift::nadcon5::quadratic;
/// assert_eq!(quadratic(0.5, 0.0, 1.0, 4.0), 0.25);
/// assert_eq!(quadratic(2.0, 0.0, 1.0, 4.0), 4.0);
/// ```
#[inline]
pub fn quadratic(t: f64, a: f64, b: f64, c: f64) -> f64 {
    let first = b - a;
    let second = c - b - first;
    mul_add!(0.5 * t * (t - 1.0), second, mul_add!(t, first, a))
}

#[derive(Debug)]
enum State {
    Unopened,
    Open { file: File, header: Header },
    Missing,
}

/// A NADCON5 `.b` file sampled by positioned reads.
///
/// The file is opened on the first sample.
/// A file which does not exist makes every sample NaN;
/// then the file is never looked up again.
///
/// No raster data is cached, each sample reads 9 cells.
/// The handle is guarded by a [`Mutex`], so a [`Nadcon5File`]
/// can be shared by threads.
#[derive(Debug)]
pub struct Nadcon5File {
    path: PathBuf,
    state: Mutex<State>,
}

impl Nadcon5File {
    /// Makes a handle of `path`, the file is not opened yet.
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(State::Unopened),
        }
    }

    /// Returns the path of the file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if the file is open.
    pub fn is_open(&self) -> bool {
        matches!(*self.lock(), State::Open { .. })
    }

    /// Returns `true` if the file has been found missing.
    pub fn is_missing(&self) -> bool {
        matches!(*self.lock(), State::Missing)
    }

    /// Closes the file, the next sample opens it again.
    pub fn close(&self) {
        let mut state = self.lock();
        if matches!(*state, State::Open { .. }) {
            *state = State::Unopened;
        }
    }

    fn open(&self) -> Result<State> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "NADCON5 file not installed");
                return Ok(State::Missing);
            }
            Err(e) => return Err(Error::new_io(self.path.clone(), e)),
        };

        let mut raw = [0u8; HEADER_LENGTH as usize];
        match file.read_exact(&mut raw) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                warn!(path = %self.path.display(), "NADCON5 file shorter than its header");
                return Ok(State::Missing);
            }
            Err(e) => return Err(Error::new_io(self.path.clone(), e)),
        }

        match Header::parse(&raw) {
            Some(header) => {
                debug!(
                    path = %self.path.display(),
                    width = header.width,
                    height = header.height,
                    "opened NADCON5 file"
                );
                Ok(State::Open { file, header })
            }
            None => {
                warn!(path = %self.path.display(), "invalid NADCON5 header");
                Ok(State::Missing)
            }
        }
    }

    /// Runs `f` on the open file, returns `Ok(None)` if the file is missing.
    fn with_open<T, F>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut File, &Header) -> Result<T>,
    {
        let mut state = self.lock();
        if matches!(*state, State::Unopened) {
            *state = self.open()?;
        }
        match &mut *state {
            State::Open { file, header } => f(file, header).map(Some),
            _ => Ok(None),
        }
    }

    /// Returns the header, [`None`] if the file is missing.
    pub fn header(&self) -> Result<Option<Header>> {
        self.with_open(|_, header| Ok(*header))
    }

    /// Returns the biquadratic interpolation at (`lon`, `lat`) \[deg\].
    ///
    /// `lon` is 0 to 360 positive-east.
    /// Returns NaN if the file is missing, the position is out of the grid,
    /// or the file ends before the cells.
    pub fn sample_biquadratic(&self, lon: f64, lat: f64) -> Result<f64> {
        let value = self.with_open(|file, header| {
            let (Some(row), Some(column)) = (header.row(lat), header.column(lon)) else {
                return Ok(f64::NAN);
            };

            let x = (lon - header.min_lon - header.dlon * column as f64) / header.dlon;
            let y = (lat - header.min_lat - header.dlat * row as f64) / header.dlat;

            let length = 3 * header.cell_size;
            let mut buf = [0u8; 12];
            let mut rows = [0f64; 3];
            for (k, value) in rows.iter_mut().enumerate() {
                let offset = header.offset(row + k, column);
                let complete = read_at(file, offset, &mut buf[..length])
                    .map_err(|e| Error::new_io(&self.path, e))?;
                if !complete {
                    return Ok(f64::NAN);
                }
                let cell = |i: usize| header.cell(&buf[i * header.cell_size..]);
                *value = quadratic(x, cell(0), cell(1), cell(2));
            }
            Ok(quadratic(y, rows[0], rows[1], rows[2]))
        })?;
        Ok(value.unwrap_or(f64::NAN))
    }
}

/// Fills `buf` from `offset`, returns `false` if the file ends first.
fn read_at(file: &mut File, offset: u64, buf: &mut [u8]) -> io::Result<bool> {
    file.seek(SeekFrom::Start(offset))?;
    match file.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nadcon5::fixture::FixtureRaster;

    /// 235E..236E, 40N..41N, quarter-degree nodes, `col + 10 * row`.
    fn linear() -> FixtureRaster {
        FixtureRaster::with_value((235.0, 40.0), (0.25, 0.25), (5, 5), |lon, lat| {
            (lon - 235.0) * 4.0 + (lat - 40.0) * 40.0
        })
    }

    fn written(raster: &FixtureRaster) -> (tempfile::TempDir, Nadcon5File) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.b");
        raster.write(&path);
        (dir, Nadcon5File::new(path))
    }

    #[test]
    fn test_header() {
        let (_dir, file) = written(&linear());
        assert!(!file.is_open());

        let header = file.header().unwrap().unwrap();
        assert!(file.is_open());
        assert_eq!(header.min_lon, 235.0);
        assert_eq!(header.max_lon, 236.0);
        assert_eq!(header.min_lat, 40.0);
        assert_eq!(header.max_lat, 41.0);
        assert_eq!((header.width, header.height), (5, 5));
        assert_eq!(header.cell_size, 4);
        assert_eq!(header.row_stride, 28);
    }

    #[test]
    fn test_window() {
        let header = linear().to_bytes();
        let header = Header::parse(header[..52].try_into().unwrap()).unwrap();

        // nearest node 2, window 1..=3
        assert_eq!(header.column(235.5), Some(1));
        assert_eq!(header.column(235.375), Some(1));
        // nearest node 1 is clamped to the window of node 1
        assert_eq!(header.column(235.3), Some(0));
        // edges
        assert_eq!(header.column(235.0), Some(0));
        assert_eq!(header.column(236.0), Some(2));
        assert_eq!(header.row(41.0), Some(2));
        // tolerance
        assert_eq!(header.column(235.0 - 4e-6), Some(0));
        assert_eq!(header.column(236.0 + 4e-6), Some(2));
        assert_eq!(header.column(235.0 - 6e-6), None);
        assert_eq!(header.row(41.0 + 6e-6), None);
        assert_eq!(header.row(f64::NAN), None);
    }

    #[test]
    fn test_quadratic() {
        assert_eq!(quadratic(0.5, 0.0, 1.0, 4.0), 0.25);
        assert_eq!(quadratic(0.0, 3.0, 5.0, 11.0), 3.0);
        assert_eq!(quadratic(1.0, 3.0, 5.0, 11.0), 5.0);
        assert_eq!(quadratic(2.0, 3.0, 5.0, 11.0), 11.0);
        assert!(quadratic(0.5, 0.0, f64::NAN, 4.0).is_nan());
    }

    mod test_sample {
        use super::*;

        #[test]
        fn test_node() {
            let (_dir, file) = written(&linear());
            assert_eq!(file.sample_biquadratic(235.5, 40.5).unwrap(), 22.0);
            assert_eq!(file.sample_biquadratic(235.0, 40.0).unwrap(), 0.0);
            assert_eq!(file.sample_biquadratic(236.0, 41.0).unwrap(), 44.0);
        }

        #[test]
        fn test_between() {
            let (_dir, file) = written(&linear());
            assert_eq!(file.sample_biquadratic(235.375, 40.625).unwrap(), 26.5);
        }

        #[test]
        fn test_quadratic_surface() {
            let raster = FixtureRaster::with_value((235.0, 40.0), (0.25, 0.25), (5, 5), |lon, _| {
                let column = (lon - 235.0) * 4.0;
                column * column
            });
            let (_dir, file) = written(&raster);
            assert_eq!(file.sample_biquadratic(235.375, 40.5).unwrap(), 2.25);
        }

        #[test]
        fn test_tolerance() {
            let (_dir, file) = written(&linear());
            // the window is clamped, the position is not, so it extrapolates slightly
            let value = file.sample_biquadratic(235.0 - 4e-6, 40.0).unwrap();
            assert!((value + 1.6e-5).abs() < 1e-9, "{value}");
            assert!(file.sample_biquadratic(235.0 - 6e-6, 40.0).unwrap().is_nan());
            assert!(file.sample_biquadratic(237.0, 40.5).unwrap().is_nan());
        }

        #[test]
        fn test_short_cells() {
            let mut raster = FixtureRaster::with_value((235.0, 40.0), (0.25, 0.25), (5, 5), |lon, lat| {
                ((lon - 235.0) * 4.0 - (lat - 40.0) * 40.0).round()
            });
            raster.kind = 2;
            let (_dir, file) = written(&raster);
            assert_eq!(file.header().unwrap().unwrap().cell_size, 2);
            assert_eq!(file.sample_biquadratic(235.5, 40.5).unwrap(), -18.0);
        }

        #[test]
        fn test_truncated() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("grid.b");
            let data = linear().to_bytes();
            // the header and two rows
            std::fs::write(&path, &data[..52 + 2 * 28]).unwrap();

            let file = Nadcon5File::new(path);
            assert!(file.sample_biquadratic(235.5, 41.0).unwrap().is_nan());
            assert!(file.is_open());
        }

        #[test]
        fn test_missing() {
            let dir = tempfile::tempdir().unwrap();
            let file = Nadcon5File::new(dir.path().join("absent.b"));

            assert!(file.sample_biquadratic(235.5, 40.5).unwrap().is_nan());
            assert!(file.is_missing());
            assert!(file.header().unwrap().is_none());

            // stays missing even if installed afterwards
            linear().write(file.path());
            assert!(file.sample_biquadratic(235.5, 40.5).unwrap().is_nan());
        }

        #[test]
        fn test_invalid_header() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("grid.b");
            std::fs::write(&path, [0u8; 20]).unwrap();

            let file = Nadcon5File::new(path);
            assert!(file.sample_biquadratic(235.5, 40.5).unwrap().is_nan());
            assert!(file.is_missing());
        }
    }

    #[test]
    fn test_close() {
        let (_dir, file) = written(&linear());
        assert_eq!(file.sample_biquadratic(235.5, 40.5).unwrap(), 22.0);
        assert!(file.is_open());

        file.close();
        assert!(!file.is_open());
        assert!(!file.is_missing());

        assert_eq!(file.sample_biquadratic(235.5, 40.5).unwrap(), 22.0);
        assert!(file.is_open());
    }

    #[test]
    fn test_threads() {
        let (_dir, file) = written(&linear());

        std::thread::scope(|s| {
            for i in 0..4 {
                let file = &file;
                s.spawn(move || {
                    for j in 0..16 {
                        let lon = 235.0 + 0.0625 * j as f64;
                        let expected = (lon - 235.0) * 4.0 + 20.0;
                        let actual = file.sample_biquadratic(lon, 40.5).unwrap();
                        assert!((actual - expected).abs() < 1e-12, "{i} {j}");
                        if j == 8 {
                            file.close();
                        }
                    }
                });
            }
        });
    }
}
