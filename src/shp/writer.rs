//! Triad writer: provisional headers, record appends, header backpatch.
//!
//! The write protocol is append-then-backpatch: both the geometry and the
//! index file open with 100 zero bytes where the real header belongs,
//! records are appended one at a time, and [`TriadWriter::close`] rewrites
//! the two headers with the final sizes and bounding box. The attribute
//! file is the exception: its header size and record length are fully
//! known at create time, so it is written complete up front and never
//! revisited.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};
use time::OffsetDateTime;

use super::bbox::BoundingBox;
use super::codec::{self, Endian};
use super::format::{
    FieldDescriptor, ShapeType, DBF_FIELD_SIZE, DBF_HEADER_SIZE, DBF_HEADER_TERMINATOR,
    SHP_HEADER_SIZE, SHP_MAGIC, SHP_VERSION,
};
use super::triad_path;
use crate::util::{AccessMode, Error, Result};

/// An in-progress output triad.
///
/// Sizes for the geometry and index files are tracked in 16-bit words, the
/// unit both file headers and index entries are expressed in.
pub struct TriadWriter {
    stem: PathBuf,
    shp: BufWriter<File>,
    shx: BufWriter<File>,
    dbf: BufWriter<File>,
    shape: ShapeType,
    shp_size_words: u32,
    shx_size_words: u32,
    record_count: u32,
    bbox: BoundingBox,
}

impl TriadWriter {
    /// Create `<stem>.shx`, `<stem>.shp` and `<stem>.dbf` and write their
    /// initial headers.
    ///
    /// The geometry and index headers are zero-filled placeholders; the
    /// attribute header and its field descriptor block are final.
    pub fn create(
        stem: impl AsRef<Path>,
        shape: ShapeType,
        fields: &[FieldDescriptor],
    ) -> Result<Self> {
        let stem = stem.as_ref();
        let shx = create_for_write(&triad_path(stem, "shx"))?;
        let shp = create_for_write(&triad_path(stem, "shp"))?;
        let dbf = create_for_write(&triad_path(stem, "dbf"))?;
        let mut shp = BufWriter::new(shp);
        let mut shx = BufWriter::new(shx);
        let mut dbf = BufWriter::new(dbf);

        // provisional headers, backpatched on close
        let zeros = [0u8; SHP_HEADER_SIZE];
        shp.write_all(&zeros)?;
        shx.write_all(&zeros)?;

        // the extra byte holds the per-row deletion marker
        let record_len: u16 = 1 + fields.iter().map(|f| f.length as u16).sum::<u16>();
        let header_size = (DBF_HEADER_SIZE + DBF_FIELD_SIZE * fields.len() + 1) as u16;
        let mut header = [0u8; DBF_HEADER_SIZE];
        header[0] = 0x03;
        let date = OffsetDateTime::now_utc().date();
        // dBASE update date counts years since 1900
        header[1] = (date.year() - 1900) as u8;
        header[2] = date.month() as u8;
        header[3] = date.day();
        codec::write_u16(&mut header, 8, header_size, Endian::Little);
        codec::write_u16(&mut header, 10, record_len, Endian::Little);
        dbf.write_all(&header)?;
        for field in fields {
            let mut row = [0u8; DBF_FIELD_SIZE];
            let name = field.name.as_bytes();
            let len = name.len().min(11);
            row[..len].copy_from_slice(&name[..len]);
            row[11] = field.field_type;
            row[16] = field.length;
            row[17] = field.decimals;
            dbf.write_all(&row)?;
        }
        dbf.write_all(&[DBF_HEADER_TERMINATOR])?;

        Ok(Self {
            stem: stem.to_path_buf(),
            shp,
            shx,
            dbf,
            shape,
            shp_size_words: (SHP_HEADER_SIZE / 2) as u32,
            shx_size_words: (SHP_HEADER_SIZE / 2) as u32,
            record_count: 0,
            bbox: BoundingBox::new(),
        })
    }

    /// Append one record to all three files and fold its extent.
    ///
    /// `geometry` is the record content without the sub-header; `attribute`
    /// is one full attribute record, deletion-marker byte included.
    pub fn append(&mut self, geometry: &[u8], attribute: &[u8]) -> Result<()> {
        let words = (geometry.len() / 2) as u32;

        // index entry: where the record is about to land
        self.shx.write_u32::<BigEndian>(self.shp_size_words)?;
        self.shx.write_u32::<BigEndian>(words)?;
        self.shx_size_words += 4;

        // geometry record: 1-based sequential number, length, content
        self.shp.write_u32::<BigEndian>(self.record_count + 1)?;
        self.shp.write_u32::<BigEndian>(words)?;
        self.shp.write_all(geometry)?;
        self.shp_size_words += 4 + words;

        self.dbf.write_all(attribute)?;
        self.record_count += 1;

        self.bbox.fold(geometry);
        Ok(())
    }

    /// Records appended so far.
    #[inline]
    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    /// The extent accumulated over the appended records.
    #[inline]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bbox
    }

    /// The shape type this triad was created with.
    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape
    }

    /// The path stem this writer was created for.
    #[inline]
    pub fn stem(&self) -> &Path {
        &self.stem
    }

    /// Backpatch the geometry and index headers and flush everything.
    ///
    /// The file handles close when the writer drops, whether or not the
    /// backpatch succeeded; a failure is reported, never swallowed.
    pub fn close(mut self) -> Result<()> {
        let mut header = [0u8; SHP_HEADER_SIZE];
        codec::write_i32(&mut header, 0, SHP_MAGIC, Endian::Big);
        codec::write_i32(&mut header, 28, SHP_VERSION, Endian::Little);
        codec::write_i32(&mut header, 32, self.shape.code(), Endian::Little);
        codec::write_f64(&mut header, 36, self.bbox.min_x, Endian::Little);
        codec::write_f64(&mut header, 44, self.bbox.min_y, Endian::Little);
        codec::write_f64(&mut header, 52, self.bbox.max_x, Endian::Little);
        codec::write_f64(&mut header, 60, self.bbox.max_y, Endian::Little);

        codec::write_i32(&mut header, 24, self.shp_size_words as i32, Endian::Big);
        self.shp.seek(SeekFrom::Start(0))?;
        self.shp.write_all(&header)?;
        self.shp.flush()?;

        codec::write_i32(&mut header, 24, self.shx_size_words as i32, Endian::Big);
        self.shx.seek(SeekFrom::Start(0))?;
        self.shx.write_all(&header)?;
        self.shx.flush()?;

        self.dbf.flush()?;
        Ok(())
    }
}

fn create_for_write(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| Error::FileAccess {
            path: path.to_path_buf(),
            mode: AccessMode::Writing,
            source,
        })
}
