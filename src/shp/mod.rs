//! Shapefile triad engine.
//!
//! One triad is addressed by its path stem: `<stem>.shp` holds the
//! variable-length geometry records, `<stem>.shx` one fixed 8-byte index
//! entry per logical row, and `<stem>.dbf` the fixed-length attribute
//! records. The geometry and index files always describe the same record
//! count; the index is the authority on where rows end.
//!
//! Scanning visits the files index -> attribute -> geometry for each row,
//! so a logically deleted attribute row never triggers a geometry read.
//! Repair copies the surviving rows into a fresh triad and backpatches the
//! output headers on close.

mod bbox;
mod codec;
mod format;
mod reader;
mod repair;
mod writer;

pub use bbox::*;
pub use codec::*;
pub use format::*;
pub use reader::*;
pub use repair::*;
pub use writer::*;

use std::path::{Path, PathBuf};

/// Append a triad member extension to a path stem.
///
/// Plain string append, unlike [`Path::with_extension`]: a stem such as
/// `tiles.v2` must become `tiles.v2.shp`, not `tiles.shp`.
pub(crate) fn triad_path(stem: &Path, ext: &str) -> PathBuf {
    let mut os = stem.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triad_path_appends() {
        assert_eq!(triad_path(Path::new("dir/rivers"), "shp"), PathBuf::from("dir/rivers.shp"));
        assert_eq!(triad_path(Path::new("tiles.v2"), "dbf"), PathBuf::from("tiles.v2.dbf"));
    }
}
