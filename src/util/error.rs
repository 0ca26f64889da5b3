//! Error types for triad operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::shp::LegacyDialect;

/// How a file was being accessed when an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Reading,
    Writing,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reading => write!(f, "reading"),
            Self::Writing => write!(f, "writing"),
        }
    }
}

/// Main error type for triad operations.
///
/// Every variant is fatal for the triad it names and carries the offending
/// path; errors never cross triad boundaries. A logically-deleted row is a
/// counted scan outcome ([`crate::shp::RowRead::Deleted`]), not an error.
#[derive(Error, Debug)]
pub enum Error {
    /// One of the three files cannot be opened or created
    #[error("unable to open '{}' for {}: {}", .path.display(), .mode, .source)]
    FileAccess {
        path: PathBuf,
        mode: AccessMode,
        #[source]
        source: std::io::Error,
    },

    /// A file header fails validation (bad magic number or truncated header)
    #[error("'{}': corrupted or invalid file header", .path.display())]
    CorruptHeader { path: PathBuf },

    /// A row's seek or length is inconsistent with the file contents
    #[error("'{}' is corrupted / has invalid format", .path.display())]
    CorruptRecord { path: PathBuf },

    /// The geometry file declares a shape type outside the supported set
    #[error("'{}' shape={} is not supported", .path.display(), .code)]
    UnsupportedShape { path: PathBuf, code: i32 },

    /// The attribute file belongs to a known but unsupported legacy dialect
    #[error("'{}': invalid magic number {:02x} [{} format]", .path.display(), .magic, .dialect)]
    LegacyFormat {
        path: PathBuf,
        magic: u8,
        dialect: LegacyDialect,
    },

    /// The attribute file's magic byte matches no known dialect
    #[error("'{}': invalid magic number {:02x} [unknown format]", .path.display(), .magic)]
    UnknownFormat { path: PathBuf, magic: u8 },

    /// A retained attribute column has a type outside the supported set
    #[error("'{}' contains unsupported data types", .path.display())]
    InvalidFieldTypes { path: PathBuf },

    /// I/O error outside the branches above (writer appends, backpatch)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for triad operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::UnsupportedShape {
            path: PathBuf::from("rivers"),
            code: 31,
        };
        assert_eq!(e.to_string(), "'rivers' shape=31 is not supported");

        let e = Error::LegacyFormat {
            path: PathBuf::from("rivers"),
            magic: 0xF5,
            dialect: LegacyDialect::FoxPro2,
        };
        assert!(e.to_string().contains("f5"));
        assert!(e.to_string().contains("FoxPro 2.x"));

        let e = Error::CorruptRecord {
            path: PathBuf::from("rivers"),
        };
        assert_eq!(e.to_string(), "'rivers' is corrupted / has invalid format");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_access_mode_display() {
        assert_eq!(AccessMode::Reading.to_string(), "reading");
        assert_eq!(AccessMode::Writing.to_string(), "writing");
    }
}
