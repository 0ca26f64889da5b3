//! # shp-repack
//!
//! Validation and repair engine for ESRI Shapefile triads.
//!
//! A "triad" is the set of three cooperating files that represent one
//! spatial table on disk: the geometry file (`.shp`), the offset index
//! (`.shx`) and the attribute table (`.dbf`). This crate opens a triad,
//! verifies each file is well-formed, detects logically-deleted attribute
//! rows, and can rewrite a clean triad containing only the surviving
//! records with recomputed headers, offsets and bounding box.
//!
//! Geometry coordinates are never interpreted: records are copied as
//! opaque bytes using only their declared byte length, so repairing a
//! triad cannot alter the geometries it keeps.
//!
//! ## Modules
//!
//! - [`shp`] - Triad format, reader, writer, and the validate/repair drivers
//! - [`util`] - Error handling
//!
//! ## Example
//!
//! ```ignore
//! use shp_repack::{repair, validate, Verdict};
//!
//! let report = validate("data/rivers")?;
//! if let Verdict::Repairable(n) = report.verdict() {
//!     eprintln!("{n} deleted rows found, repairing");
//!     repair("data/rivers", "clean/rivers")?;
//! }
//! ```

pub mod shp;
pub mod util;

// Re-export commonly used types
pub use shp::{
    repair, validate, BoundingBox, FieldDescriptor, GeometryClass, RecordView, RowRead,
    ShapeType, TriadReader, TriadWriter, ValidateReport, Verdict,
};
pub use util::{Error, Result};
