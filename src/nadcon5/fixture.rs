//! Writes synthetic NADCON5 data for tests.
use std::path::Path;

/// A `.b` raster, `values` are row-major from the south-west node.
pub(crate) struct FixtureRaster {
    pub(crate) minlat: f64,
    pub(crate) minlon: f64,
    pub(crate) dlat: f64,
    pub(crate) dlon: f64,
    pub(crate) width: usize,
    pub(crate) height: usize,
    /// `0` or `1` for f32 cells, otherwise i16
    pub(crate) kind: i32,
    pub(crate) values: Vec<f64>,
}

impl FixtureRaster {
    /// Makes an f32 raster, `value(lon, lat)` gives each node.
    pub(crate) fn with_value<F>(
        (minlon, minlat): (f64, f64),
        (dlon, dlat): (f64, f64),
        (width, height): (usize, usize),
        value: F,
    ) -> Self
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut values = Vec::with_capacity(width * height);
        for row in 0..height {
            let lat = minlat + dlat * row as f64;
            for column in 0..width {
                values.push(value(minlon + dlon * column as f64, lat));
            }
        }
        Self {
            minlat,
            minlon,
            dlat,
            dlon,
            width,
            height,
            kind: 1,
            values,
        }
    }

    /// Returns the file content, header and rows with one padding cell on each side.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend(44i32.to_be_bytes());
        buf.extend(self.minlat.to_be_bytes());
        buf.extend(self.minlon.to_be_bytes());
        buf.extend(self.dlat.to_be_bytes());
        buf.extend(self.dlon.to_be_bytes());
        buf.extend((self.height as i32).to_be_bytes());
        buf.extend((self.width as i32).to_be_bytes());
        buf.extend(self.kind.to_be_bytes());
        buf.extend(44i32.to_be_bytes());

        let cell = |buf: &mut Vec<u8>, value: f64| {
            if self.kind == 0 || self.kind == 1 {
                buf.extend((value as f32).to_be_bytes());
            } else {
                buf.extend((value as i16).to_be_bytes());
            }
        };
        for row in self.values.chunks(self.width) {
            cell(&mut buf, 0.0);
            for value in row {
                cell(&mut buf, *value);
            }
            cell(&mut buf, 0.0);
        }
        buf
    }

    pub(crate) fn write(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).unwrap();
    }
}
