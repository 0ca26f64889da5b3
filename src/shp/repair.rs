//! Validate-only diagnostics and all-or-nothing triad repair.

use std::path::Path;

use tracing::{debug, info, warn};

use super::reader::{RowRead, TriadReader};
use super::writer::TriadWriter;
use crate::util::Result;

/// Row and defect counts from a read-only scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateReport {
    /// Logical rows visited, deleted ones included
    pub rows: u64,
    /// Rows carrying the deletion marker
    pub deleted: u64,
}

/// Collaborator-facing verdict for one triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No deleted rows; the triad needs no repair
    Clean,
    /// This many deleted rows would be dropped by a repair
    Repairable(u64),
}

impl ValidateReport {
    pub fn verdict(&self) -> Verdict {
        if self.deleted == 0 {
            Verdict::Clean
        } else {
            Verdict::Repairable(self.deleted)
        }
    }
}

/// Scan every row of the triad at `stem`, counting deleted rows.
///
/// Stops at the index's end-of-file; the first format violation after a
/// successful open aborts the scan with [`crate::Error::CorruptRecord`].
/// Rows already counted are not retroactively invalidated by a later error.
pub fn validate(stem: impl AsRef<Path>) -> Result<ValidateReport> {
    let stem = stem.as_ref();
    let mut reader = TriadReader::open(stem)?;
    let mut deleted = 0u64;
    let mut row = 0u64;
    loop {
        match reader.read_row(row)? {
            RowRead::EndOfFile => break,
            RowRead::Deleted => {
                warn!(row, stem = %stem.display(), "logical deletion found");
                deleted += 1;
            }
            RowRead::Record(_) => {}
        }
        row += 1;
    }
    debug!(rows = row, deleted, stem = %stem.display(), "scan finished");
    Ok(ValidateReport { rows: row, deleted })
}

/// Copy every surviving row of the triad at `in_stem` into a fresh triad at
/// `out_stem`, returning the number of rows written.
///
/// Deleted rows are skipped, not copied. Corruption aborts the whole repair
/// and leaves the partially-written output on disk for the operator to
/// inspect; it is diagnosed, never auto-deleted.
pub fn repair(in_stem: impl AsRef<Path>, out_stem: impl AsRef<Path>) -> Result<u64> {
    let in_stem = in_stem.as_ref();
    let out_stem = out_stem.as_ref();
    let mut reader = TriadReader::open(in_stem)?;
    let fields = reader.fields().to_vec();
    let mut writer = TriadWriter::create(out_stem, reader.shape_type(), &fields)?;

    let mut row = 0u64;
    loop {
        match reader.read_row(row)? {
            RowRead::EndOfFile => break,
            RowRead::Deleted => {
                debug!(row, "skipping deleted row");
            }
            RowRead::Record(view) => {
                writer.append(view.geometry, view.attribute)?;
            }
        }
        row += 1;
    }

    let written = u64::from(writer.record_count());
    writer.close()?;
    info!(
        rows = written,
        input = %in_stem.display(),
        output = %out_stem.display(),
        "triad repaired"
    );
    Ok(written)
}
