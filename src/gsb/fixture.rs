//! Writes synthetic NTv2 data for tests.
use crate::gsb::reader::ByteOrder;

pub(crate) struct FixtureGrid {
    pub(crate) name: &'static str,
    pub(crate) parent: &'static str,
    pub(crate) south: f64,
    pub(crate) north: f64,
    pub(crate) east: f64,
    pub(crate) west: f64,
    pub(crate) lat_inc: f64,
    pub(crate) lon_inc: f64,
    /// Overrides `GS_COUNT`
    pub(crate) count: Option<i32>,
    /// (lat shift, lon shift, lat accuracy, lon accuracy)
    pub(crate) nodes: Vec<[f32; 4]>,
}

impl FixtureGrid {
    /// Makes a grid with square cells, `shift(lon, lat)` returns (lat shift, lon shift).
    pub(crate) fn with_shift<F>(
        name: &'static str,
        parent: &'static str,
        (east, south, west, north): (f64, f64, f64, f64),
        inc: f64,
        shift: F,
    ) -> Self
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        let width = ((west - east) / inc).round() as usize + 1;
        let height = ((north - south) / inc).round() as usize + 1;
        let mut nodes = Vec::with_capacity(width * height);
        for row in 0..height {
            let lat = south + inc * row as f64;
            for column in 0..width {
                let lon = east + inc * column as f64;
                let (dlat, dlon) = shift(lon, lat);
                nodes.push([dlat as f32, dlon as f32, 0.01, 0.02]);
            }
        }
        Self {
            name,
            parent,
            south,
            north,
            east,
            west,
            lat_inc: inc,
            lon_inc: inc,
            count: None,
            nodes,
        }
    }
}

struct Writer {
    order: ByteOrder,
    buf: Vec<u8>,
}

impl Writer {
    fn tag(&mut self, tag: &str) {
        let mut raw = [b' '; 8];
        raw[..tag.len()].copy_from_slice(tag.as_bytes());
        self.buf.extend(raw);
    }

    fn int(&mut self, tag: &str, value: i32) {
        self.tag(tag);
        self.buf.extend(match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        });
        self.buf.extend([0; 4]);
    }

    fn string(&mut self, tag: &str, value: &str) {
        self.tag(tag);
        self.tag(value);
    }

    fn double(&mut self, tag: &str, value: f64) {
        self.tag(tag);
        self.buf.extend(match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        });
    }

    fn float(&mut self, value: f32) {
        self.buf.extend(match self.order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        });
    }
}

/// Returns NTv2 data with the overview header and `grids`.
pub(crate) fn write(order: ByteOrder, shift_type: &str, grids: &[FixtureGrid]) -> Vec<u8> {
    let mut w = Writer {
        order,
        buf: Vec::new(),
    };

    w.int("NUM_OREC", 11);
    w.int("NUM_SREC", 11);
    w.int("NUM_FILE", grids.len() as i32);
    w.string("GS_TYPE", shift_type);
    w.string("VERSION", "NTv2.0");
    w.string("SYSTEM_F", "NAD27");
    w.string("SYSTEM_T", "MYELL");
    w.double("MAJOR_F", 6378206.4);
    w.double("MINOR_F", 6356583.8);
    w.double("MAJOR_T", 6378000.0);
    w.double("MINOR_T", 6356000.0);

    for grid in grids {
        w.string("SUB_NAME", grid.name);
        w.string("PARENT", grid.parent);
        w.string("CREATED", "20240101");
        w.string("UPDATED", "20240102");
        w.double("S_LAT", grid.south);
        w.double("N_LAT", grid.north);
        w.double("E_LONG", grid.east);
        w.double("W_LONG", grid.west);
        w.double("LAT_INC", grid.lat_inc);
        w.double("LONG_INC", grid.lon_inc);
        w.int("GS_COUNT", grid.count.unwrap_or(grid.nodes.len() as i32));
        for node in &grid.nodes {
            for value in node {
                w.float(*value);
            }
        }
    }

    w.tag("END");
    w.buf.extend([0; 8]);
    w.buf
}
