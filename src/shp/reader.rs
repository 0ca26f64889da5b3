//! Triad reader: header validation and sequential row scanning.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::codec::{self, Endian};
use super::format::{
    classify_dbf_magic, decode_field_name, DbfMagic, Dimensions, FieldDescriptor, GeometryClass,
    ShapeType, DBF_DELETED_MARKER, DBF_FIELD_SIZE, DBF_HEADER_SIZE, DBF_MEMO_TYPE,
    RECORD_HEADER_SIZE, SHP_HEADER_SIZE, SHP_MAGIC, SHX_ENTRY_SIZE,
};
use super::triad_path;
use crate::util::{AccessMode, Error, Result};

/// Outcome of reading one logical row.
#[derive(Debug)]
pub enum RowRead<'a> {
    /// A surviving row; the view borrows the reader's buffers
    Record(RecordView<'a>),
    /// The attribute record carries the deletion marker; no geometry was read
    Deleted,
    /// The index has no entry for this row: normal end of data
    EndOfFile,
}

/// Borrowed view of the current row's bytes.
///
/// Valid only until the next [`TriadReader::read_row`] call reuses the
/// underlying buffers.
#[derive(Debug)]
pub struct RecordView<'a> {
    /// Geometry record content, without the 8-byte sub-header
    pub geometry: &'a [u8],
    /// Full attribute record, deletion-marker byte included
    pub attribute: &'a [u8],
}

/// An open triad, validated and positioned for row scanning.
///
/// Owns the three file handles and the record buffers exclusively; dropping
/// the reader closes everything, on success and on every error path alike.
#[derive(Debug)]
pub struct TriadReader {
    stem: PathBuf,
    shp: File,
    shx: File,
    dbf: File,
    shape: ShapeType,
    fields: Vec<FieldDescriptor>,
    dbf_header_size: u64,
    dbf_record_len: usize,
    geom_buf: Vec<u8>,
    attr_buf: Vec<u8>,
}

impl TriadReader {
    /// Open `<stem>.shx`, `<stem>.shp` and `<stem>.dbf` for reading and
    /// validate all three headers.
    ///
    /// Fails with [`Error::FileAccess`] naming the missing file,
    /// [`Error::CorruptHeader`] on a bad magic number or truncated header,
    /// [`Error::UnsupportedShape`] for shape codes outside the supported
    /// set, [`Error::LegacyFormat`] / [`Error::UnknownFormat`] for foreign
    /// attribute dialects, and [`Error::InvalidFieldTypes`] when a retained
    /// column has an unsupported type.
    pub fn open(stem: impl AsRef<Path>) -> Result<Self> {
        let stem = stem.as_ref();
        let mut shx = open_for_read(&triad_path(stem, "shx"))?;
        let mut shp = open_for_read(&triad_path(stem, "shp"))?;
        let mut dbf = open_for_read(&triad_path(stem, "dbf"))?;

        let corrupt_header = || Error::CorruptHeader {
            path: stem.to_path_buf(),
        };

        // index file header
        let mut header = [0u8; SHP_HEADER_SIZE];
        shx.read_exact(&mut header).map_err(|_| corrupt_header())?;
        if codec::read_i32(&header, 0, Endian::Big) != SHP_MAGIC {
            return Err(corrupt_header());
        }

        // geometry file header
        shp.read_exact(&mut header).map_err(|_| corrupt_header())?;
        if codec::read_i32(&header, 0, Endian::Big) != SHP_MAGIC {
            return Err(corrupt_header());
        }
        let code = codec::read_i32(&header, 32, Endian::Little);
        let shape = ShapeType::from_code(code).ok_or(Error::UnsupportedShape {
            path: stem.to_path_buf(),
            code,
        })?;

        // attribute file header
        let mut dbf_header = [0u8; DBF_HEADER_SIZE];
        dbf.read_exact(&mut dbf_header).map_err(|_| corrupt_header())?;
        match classify_dbf_magic(dbf_header[0]) {
            DbfMagic::Live => {}
            DbfMagic::Legacy(dialect) => {
                return Err(Error::LegacyFormat {
                    path: stem.to_path_buf(),
                    magic: dbf_header[0],
                    dialect,
                })
            }
            DbfMagic::Unknown => {
                return Err(Error::UnknownFormat {
                    path: stem.to_path_buf(),
                    magic: dbf_header[0],
                })
            }
        }
        let dbf_header_size = codec::read_u16(&dbf_header, 8, Endian::Little) as usize;
        let dbf_record_len = codec::read_u16(&dbf_header, 10, Endian::Little) as usize;
        // every record carries at least the deletion-marker byte
        if dbf_record_len == 0 {
            return Err(corrupt_header());
        }

        let fields = read_field_descriptors(&mut dbf, dbf_header_size, stem)?;
        if fields.iter().any(|f| !f.is_supported_type()) {
            return Err(Error::InvalidFieldTypes {
                path: triad_path(stem, "dbf"),
            });
        }

        Ok(Self {
            stem: stem.to_path_buf(),
            shp,
            shx,
            dbf,
            shape,
            fields,
            dbf_header_size: dbf_header_size as u64,
            dbf_record_len,
            geom_buf: vec![0u8; 1024],
            attr_buf: vec![0u8; dbf_record_len],
        })
    }

    /// The shape type declared by the geometry file header.
    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        self.shape
    }

    /// Coarse geometry classification of the declared shape type.
    #[inline]
    pub fn geometry_class(&self) -> GeometryClass {
        self.shape.class()
    }

    /// Dimension model of the declared shape type.
    #[inline]
    pub fn dimensions(&self) -> Dimensions {
        self.shape.dimensions()
    }

    /// Retained attribute columns, in field order.
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fixed attribute record length in bytes, deletion marker included.
    #[inline]
    pub fn record_len(&self) -> usize {
        self.dbf_record_len
    }

    /// The path stem this reader was opened from.
    #[inline]
    pub fn stem(&self) -> &Path {
        &self.stem
    }

    /// Read the logical row at `row`.
    ///
    /// The files are visited index -> attribute -> geometry: a deleted
    /// attribute row is never geometry-read, since its geometry bytes may be
    /// stale or absent. A short index read at the row boundary is the normal
    /// end-of-data signal; any short read deeper in is corruption.
    pub fn read_row(&mut self, row: u64) -> Result<RowRead<'_>> {
        // index entry for this row
        let mut entry = [0u8; SHX_ENTRY_SIZE];
        let entry_pos = SHP_HEADER_SIZE as u64 + row * SHX_ENTRY_SIZE as u64;
        if self.shx.seek(SeekFrom::Start(entry_pos)).is_err()
            || self.shx.read_exact(&mut entry).is_err()
        {
            return Ok(RowRead::EndOfFile);
        }
        let word_offset = codec::read_u32(&entry, 0, Endian::Big) as u64;

        // attribute record; checked before any geometry I/O
        let record_pos = self.dbf_header_size + row * self.dbf_record_len as u64;
        self.dbf
            .seek(SeekFrom::Start(record_pos))
            .map_err(|_| self.corrupt())?;
        let corrupt = self.corrupt();
        self.dbf.read_exact(&mut self.attr_buf).map_err(|_| corrupt)?;
        if self.attr_buf[0] == DBF_DELETED_MARKER {
            return Ok(RowRead::Deleted);
        }

        // geometry record; the index stores its offset in 16-bit words
        self.shp
            .seek(SeekFrom::Start(word_offset * 2))
            .map_err(|_| self.corrupt())?;
        let mut sub_header = [0u8; RECORD_HEADER_SIZE];
        self.shp
            .read_exact(&mut sub_header)
            .map_err(|_| self.corrupt())?;
        let content_len = codec::read_u32(&sub_header, 4, Endian::Big) as usize * 2;
        if content_len > self.geom_buf.len() {
            self.geom_buf.resize(content_len, 0);
        }
        let corrupt = self.corrupt();
        self.shp
            .read_exact(&mut self.geom_buf[..content_len])
            .map_err(|_| corrupt)?;

        Ok(RowRead::Record(RecordView {
            geometry: &self.geom_buf[..content_len],
            attribute: &self.attr_buf,
        }))
    }

    fn corrupt(&self) -> Error {
        Error::CorruptRecord {
            path: self.stem.clone(),
        }
    }
}

fn open_for_read(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        mode: AccessMode::Reading,
        source,
    })
}

/// Parse the field descriptor rows between the fixed header and the
/// terminator byte. Memo columns are skipped with a warning, but their byte
/// span still advances the running record offset.
fn read_field_descriptors(
    dbf: &mut File,
    header_size: usize,
    stem: &Path,
) -> Result<Vec<FieldDescriptor>> {
    let mut fields = Vec::new();
    let mut offset = 0usize;
    let mut row = [0u8; DBF_FIELD_SIZE];
    let descriptor_end = header_size.saturating_sub(1);
    let mut pos = DBF_HEADER_SIZE;
    while pos < descriptor_end {
        dbf.read_exact(&mut row).map_err(|_| Error::CorruptHeader {
            path: stem.to_path_buf(),
        })?;
        let name = decode_field_name(&row);
        if row[11] == DBF_MEMO_TYPE {
            warn!(column = %name, "column is of the MEMO type and will be ignored");
            offset += row[16] as usize;
            pos += DBF_FIELD_SIZE;
            continue;
        }
        fields.push(FieldDescriptor::new(name, row[11], offset, row[16], row[17]));
        offset += row[16] as usize;
        pos += DBF_FIELD_SIZE;
    }
    Ok(fields)
}
