//! Provides [`Error`] and [`ErrorKind`].
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Alias for a `Result<T, gridshift::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents all possible errors that can occur by this crate.
///
/// Points outside of a dataset and datasets that are not installed
/// are not errors, the operations report them by returning `Ok(false)`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error {
    kind: Box<ErrorKind>,
}

/// An error kind used by [`Error`].
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The data does not start with the `NUM_OREC` record.
    #[error("input is not an NTv2 grid shift file")]
    NotGridShiftFile,
    /// The overview record count is 11 in neither byte order.
    #[error("invalid overview record count {count}, expected 11 in either byte order")]
    ByteOrder {
        /// The count read in little-endian order
        count: i32,
    },
    /// `GS_TYPE` is not `SECONDS`.
    #[error("shift type '{found}' not supported, must be SECONDS")]
    UnsupportedShiftType {
        /// The unit found in the file
        found: String,
    },
    /// `GS_COUNT` disagrees with the dimension of the sub-grid.
    #[error("sub-grid '{grid}' declares {found} nodes but its extent has {expected}")]
    NodeCount {
        /// Name of the sub-grid
        grid: String,
        /// Nodes implied by the bounds and increments
        expected: usize,
        /// Nodes declared by `GS_COUNT`
        found: usize,
    },
    /// The bounds or increments of a sub-grid do not describe a grid.
    #[error("sub-grid '{grid}' has an invalid extent or increment")]
    InvalidGridDimension {
        /// Name of the sub-grid
        grid: String,
    },
    /// A sub-grid names a parent that does not exist.
    #[error("sub-grid '{grid}' references unknown parent '{parent}'")]
    DanglingParent {
        /// Name of the sub-grid
        grid: String,
        /// The missing parent name
        parent: String,
    },
    /// The data ends inside a record.
    #[error("unexpected end of data at byte {offset}")]
    UnexpectedEof {
        /// Byte offset where reading stopped
        offset: u64,
    },
    /// Reading the underlying storage failed.
    #[error("I/O error on '{}'", path.display())]
    Io {
        /// The file being read
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Returns the detailed cause.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns `true` if the error is a malformed dataset.
    pub fn is_format(&self) -> bool {
        !matches!(*self.kind, ErrorKind::Io { .. })
    }

    #[cold]
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    #[cold]
    pub(crate) fn new_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.into(),
            source,
        })
    }

    #[cold]
    pub(crate) fn new_eof(offset: u64) -> Self {
        Self::new(ErrorKind::UnexpectedEof { offset })
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
