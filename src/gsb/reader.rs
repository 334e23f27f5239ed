use std::io::{self, Read};
use std::path::PathBuf;

use crate::error::{Error, ErrorKind, Result};

/// Byte order of an NTv2 file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum ByteOrder {
    Little,
    Big,
}

/// Reads the 16-byte records of an NTv2 file.
pub(crate) struct RecordReader<R> {
    inner: R,
    path: PathBuf,
    order: ByteOrder,
    offset: u64,
}

const OVERVIEW_RECORDS: i32 = 11;

impl<R> RecordReader<R>
where
    R: Read,
{
    /// Makes a reader and detects the byte order from the `NUM_OREC` record.
    pub(crate) fn try_new(inner: R, path: PathBuf) -> Result<Self> {
        let mut reader = Self {
            inner,
            path,
            order: ByteOrder::Little,
            offset: 0,
        };

        let tag = reader.bytes::<8>()?;
        if &tag != b"NUM_OREC" {
            return Err(Error::new(ErrorKind::NotGridShiftFile));
        }

        let raw = reader.bytes::<4>()?;
        let little = i32::from_le_bytes(raw);
        if little != OVERVIEW_RECORDS {
            if i32::from_be_bytes(raw) == OVERVIEW_RECORDS {
                reader.order = ByteOrder::Big;
            } else {
                return Err(Error::new(ErrorKind::ByteOrder { count: little }));
            }
        }
        reader.bytes::<4>()?;

        Ok(reader)
    }

    #[inline]
    pub(crate) fn order(&self) -> ByteOrder {
        self.order
    }

    fn bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.offset += N as u64;
                Ok(buf)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::new_eof(self.offset)),
            Err(e) => Err(Error::new_io(self.path.clone(), e)),
        }
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        let raw = self.bytes::<4>()?;
        Ok(match self.order {
            ByteOrder::Little => i32::from_le_bytes(raw),
            ByteOrder::Big => i32::from_be_bytes(raw),
        })
    }

    fn read_f64(&mut self) -> Result<f64> {
        let raw = self.bytes::<8>()?;
        Ok(match self.order {
            ByteOrder::Little => f64::from_le_bytes(raw),
            ByteOrder::Big => f64::from_be_bytes(raw),
        })
    }

    /// Reads one node, four `f32`.
    pub(crate) fn read_node(&mut self) -> Result<[f32; 4]> {
        let raw = self.bytes::<16>()?;
        let mut node = [0f32; 4];
        for (value, chunk) in node.iter_mut().zip(raw.chunks_exact(4)) {
            let chunk = [chunk[0], chunk[1], chunk[2], chunk[3]];
            *value = match self.order {
                ByteOrder::Little => f32::from_le_bytes(chunk),
                ByteOrder::Big => f32::from_be_bytes(chunk),
            };
        }
        Ok(node)
    }

    /// Reads an integer record, the tag is skipped.
    pub(crate) fn record_int(&mut self) -> Result<i32> {
        self.bytes::<8>()?;
        let value = self.read_i32()?;
        self.bytes::<4>()?;
        Ok(value)
    }

    /// Reads a double record, the tag is skipped.
    pub(crate) fn record_double(&mut self) -> Result<f64> {
        self.bytes::<8>()?;
        self.read_f64()
    }

    /// Reads an 8-character ISO-8859-1 record, trimmed.
    pub(crate) fn record_string(&mut self) -> Result<String> {
        self.bytes::<8>()?;
        let raw = self.bytes::<8>()?;
        let s: String = raw.iter().map(|&b| b as char).collect();
        Ok(s.trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn overview(count: [u8; 4]) -> Vec<u8> {
        let mut v = b"NUM_OREC".to_vec();
        v.extend(count);
        v.extend([0; 4]);
        v
    }

    #[test]
    fn test_byte_order() {
        let data = overview(11i32.to_le_bytes());
        let reader = RecordReader::try_new(data.as_slice(), PathBuf::new()).unwrap();
        assert_eq!(reader.order(), ByteOrder::Little);

        let data = overview(11i32.to_be_bytes());
        let reader = RecordReader::try_new(data.as_slice(), PathBuf::new()).unwrap();
        assert_eq!(reader.order(), ByteOrder::Big);

        let data = overview(12i32.to_le_bytes());
        let e = RecordReader::try_new(data.as_slice(), PathBuf::new())
            .err()
            .unwrap();
        assert!(matches!(e.kind(), ErrorKind::ByteOrder { count: 12 }));
    }

    #[test]
    fn test_not_gsb() {
        let mut data = overview(11i32.to_le_bytes());
        data[0] = b'X';
        let e = RecordReader::try_new(data.as_slice(), PathBuf::new())
            .err()
            .unwrap();
        assert!(matches!(e.kind(), ErrorKind::NotGridShiftFile));
    }

    #[test]
    fn test_records() {
        let mut data = overview(11i32.to_be_bytes());
        data.extend(b"GS_TYPE SECONDS ");
        data.extend(b"MAJOR_F ");
        data.extend(6378137.0f64.to_be_bytes());
        data.extend(b"NUM_FILE");
        data.extend(3i32.to_be_bytes());
        data.extend([0; 4]);

        let mut reader = RecordReader::try_new(data.as_slice(), PathBuf::new()).unwrap();
        assert_eq!(reader.record_string().unwrap(), "SECONDS");
        assert_eq!(reader.record_double().unwrap(), 6378137.0);
        assert_eq!(reader.record_int().unwrap(), 3);

        let e = reader.record_int().err().unwrap();
        assert!(matches!(e.kind(), ErrorKind::UnexpectedEof { offset: 64 }));
    }
}
