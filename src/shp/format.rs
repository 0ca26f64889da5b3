//! Triad format constants and lookup tables.
//!
//! ## File layouts
//!
//! ```text
//! .shp / .shx header (100 bytes)          .shx entry (8 bytes, one per row)
//! +--------------------------------+      +------------------------------+
//! |  0 magic 9994        u32 BE    |      | +0 offset in words   u32 BE  |
//! | 24 file length words u32 BE    |      | +4 length in words   u32 BE  |
//! | 28 version 1000      u32 LE    |      +------------------------------+
//! | 32 shape type        u32 LE    |
//! | 36 min X  44 min Y   f64 LE    |      .shp record
//! | 52 max X  60 max Y   f64 LE    |      +------------------------------+
//! +--------------------------------+      | +0 record number     u32 BE  |
//!                                         | +4 length in words   u32 BE  |
//! .dbf header (32 bytes)                  | +8 content (shape type u32 LE,
//! +--------------------------------+      |     then coordinates)        |
//! |  0 magic byte                  |      +------------------------------+
//! |  4 record count      u32 LE    |
//! |  8 header size       u16 LE    |      field descriptor (32 bytes each)
//! | 10 record length     u16 LE    |      +------------------------------+
//! +--------------------------------+      | +0..11 name, NUL padded      |
//! then field descriptors, then 0x0D       | +11 type char                |
//!                                         | +16 length  +17 decimals     |
//! attribute record: 1-byte deletion       +------------------------------+
//! marker ('*' = deleted) + field bytes
//! ```
//!
//! All sizes in the .shp/.shx files are counted in 16-bit words, not bytes.

use std::fmt;

/// Magic number opening both the geometry and the index file headers.
pub const SHP_MAGIC: i32 = 9994;

/// Format version backpatched into the headers on close.
pub const SHP_VERSION: i32 = 1000;

/// Size of the .shp/.shx file header in bytes.
pub const SHP_HEADER_SIZE: usize = 100;

/// Size of one .shx index entry in bytes.
pub const SHX_ENTRY_SIZE: usize = 8;

/// Size of a geometry record's sub-header (record number + length) in bytes.
pub const RECORD_HEADER_SIZE: usize = 8;

/// Size of the fixed .dbf header in bytes.
pub const DBF_HEADER_SIZE: usize = 32;

/// Size of one field descriptor row in bytes.
pub const DBF_FIELD_SIZE: usize = 32;

/// Byte closing the .dbf header after the last field descriptor.
pub const DBF_HEADER_TERMINATOR: u8 = 0x0D;

/// First byte of a logically deleted attribute record.
pub const DBF_DELETED_MARKER: u8 = b'*';

/// Field type codes retained during parsing (character, numeric, date,
/// logical, float). Memo columns are dropped, everything else is fatal.
pub const DBF_SUPPORTED_FIELD_TYPES: &[u8] = b"CNDLF";

/// Field type code for memo columns, skipped with a warning.
pub const DBF_MEMO_TYPE: u8 = b'M';

/// Shape type codes accepted by the engine.
///
/// Each geometry family exists in a planar variant plus +Z and +M variants;
/// the code alone determines classification and dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
}

/// Coarse geometry classification derived from the shape type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryClass {
    Point,
    MultiLinestring,
    MultiPolygon,
    MultiPoint,
}

/// Dimension model derived from the shape type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensions {
    Xy,
    XyZM,
    XyM,
}

impl ShapeType {
    /// Map a raw shape code to a supported shape type.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Point),
            3 => Some(Self::PolyLine),
            5 => Some(Self::Polygon),
            8 => Some(Self::MultiPoint),
            11 => Some(Self::PointZ),
            13 => Some(Self::PolyLineZ),
            15 => Some(Self::PolygonZ),
            18 => Some(Self::MultiPointZ),
            21 => Some(Self::PointM),
            23 => Some(Self::PolyLineM),
            25 => Some(Self::PolygonM),
            28 => Some(Self::MultiPointM),
            _ => None,
        }
    }

    /// The on-disk shape code.
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Coarse geometry classification.
    pub fn class(self) -> GeometryClass {
        match self {
            Self::Point | Self::PointZ | Self::PointM => GeometryClass::Point,
            Self::PolyLine | Self::PolyLineZ | Self::PolyLineM => GeometryClass::MultiLinestring,
            Self::Polygon | Self::PolygonZ | Self::PolygonM => GeometryClass::MultiPolygon,
            Self::MultiPoint | Self::MultiPointZ | Self::MultiPointM => GeometryClass::MultiPoint,
        }
    }

    /// Dimension model.
    pub fn dimensions(self) -> Dimensions {
        match self {
            Self::PointZ | Self::PolyLineZ | Self::PolygonZ | Self::MultiPointZ => Dimensions::XyZM,
            Self::PointM | Self::PolyLineM | Self::PolygonM | Self::MultiPointM => Dimensions::XyM,
            _ => Dimensions::Xy,
        }
    }
}

/// Known-but-unsupported attribute file dialects, identified by magic byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyDialect {
    FoxBase,
    FoxPro2,
    VisualFoxPro,
    DbaseIv,
}

impl fmt::Display for LegacyDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoxBase => write!(f, "FoxBASE"),
            Self::FoxPro2 => write!(f, "FoxPro 2.x (or earlier)"),
            Self::VisualFoxPro => write!(f, "Visual FoxPro"),
            Self::DbaseIv => write!(f, "dBASE IV"),
        }
    }
}

/// Classification of the attribute file's magic byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbfMagic {
    /// A dialect this engine reads (dBASE III, with or without memo file)
    Live,
    /// A recognized legacy dialect, rejected by name
    Legacy(LegacyDialect),
    /// No known dialect
    Unknown,
}

/// Classify the first byte of a .dbf header.
pub fn classify_dbf_magic(byte: u8) -> DbfMagic {
    match byte {
        0x03 | 0x83 => DbfMagic::Live,
        0x02 | 0xF8 => DbfMagic::Legacy(LegacyDialect::FoxBase),
        0xF5 => DbfMagic::Legacy(LegacyDialect::FoxPro2),
        0x30 | 0x31 | 0x32 => DbfMagic::Legacy(LegacyDialect::VisualFoxPro),
        0x43 | 0x63 | 0xBB | 0xCB => DbfMagic::Legacy(LegacyDialect::DbaseIv),
        _ => DbfMagic::Unknown,
    }
}

/// One attribute column: name, type char, byte offset within the record,
/// byte length and decimal count.
///
/// Descriptors are held in field order by the reader/writer that parsed or
/// created them. The record offset skips the 1-byte deletion marker; it also
/// accounts for any memo columns dropped before this field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: u8,
    pub offset: usize,
    pub length: u8,
    pub decimals: u8,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: u8, offset: usize, length: u8, decimals: u8) -> Self {
        Self {
            name: name.into(),
            field_type,
            offset,
            length,
            decimals,
        }
    }

    /// Whether this column's type is in the retained set.
    #[inline]
    pub fn is_supported_type(&self) -> bool {
        DBF_SUPPORTED_FIELD_TYPES.contains(&self.field_type)
    }
}

/// Decode the 11-byte NUL-padded field name of a descriptor row.
pub(crate) fn decode_field_name(raw: &[u8]) -> String {
    let name = &raw[..11];
    let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
    String::from_utf8_lossy(&name[..end]).into_owned()
}
