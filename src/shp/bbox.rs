//! Running minimum bounding rectangle over accepted geometry records.

use super::codec::{self, Endian};
use super::format::{GeometryClass, ShapeType};

/// Axis-aligned extent folded record by record.
///
/// Starts at the +inf/-inf sentinel and is monotonically non-shrinking: it
/// reflects only the records actually passed to [`BoundingBox::fold`]. A box
/// that never accepted a record stays at the sentinel and is written out
/// as-is, marking the triad's extent as empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The empty (sentinel) box.
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Whether no extent has been folded in yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// Widen the box with one X/Y pair.
    fn include(&mut self, x: f64, y: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// Fold one geometry record's embedded extent into the box.
    ///
    /// `record` is the record content (without the 8-byte sub-header): shape
    /// code u32 LE at +0, then for point shapes a single X/Y pair at +4/+12,
    /// for the other supported families the explicit 4-double MBR at +4..+36.
    /// Records with any other embedded code (null shapes in particular) carry
    /// no extent and leave the box unchanged.
    pub fn fold(&mut self, record: &[u8]) {
        if record.len() < 4 {
            return;
        }
        let code = codec::read_i32(record, 0, Endian::Little);
        match ShapeType::from_code(code).map(ShapeType::class) {
            Some(GeometryClass::Point) => {
                if record.len() >= 20 {
                    let x = codec::read_f64(record, 4, Endian::Little);
                    let y = codec::read_f64(record, 12, Endian::Little);
                    self.include(x, y);
                }
            }
            Some(_) => {
                if record.len() >= 36 {
                    let min_x = codec::read_f64(record, 4, Endian::Little);
                    let min_y = codec::read_f64(record, 12, Endian::Little);
                    let max_x = codec::read_f64(record, 20, Endian::Little);
                    let max_y = codec::read_f64(record, 28, Endian::Little);
                    self.include(min_x, min_y);
                    self.include(max_x, max_y);
                }
            }
            None => {}
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_record(x: f64, y: f64) -> Vec<u8> {
        let mut rec = vec![0u8; 20];
        codec::write_i32(&mut rec, 0, 1, Endian::Little);
        codec::write_f64(&mut rec, 4, x, Endian::Little);
        codec::write_f64(&mut rec, 12, y, Endian::Little);
        rec
    }

    fn mbr_record(code: i32, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u8> {
        let mut rec = vec![0u8; 48];
        codec::write_i32(&mut rec, 0, code, Endian::Little);
        codec::write_f64(&mut rec, 4, min_x, Endian::Little);
        codec::write_f64(&mut rec, 12, min_y, Endian::Little);
        codec::write_f64(&mut rec, 20, max_x, Endian::Little);
        codec::write_f64(&mut rec, 28, max_y, Endian::Little);
        rec
    }

    #[test]
    fn test_sentinel_box() {
        let bbox = BoundingBox::new();
        assert!(bbox.is_empty());
        assert_eq!(bbox.min_x, f64::INFINITY);
        assert_eq!(bbox.max_y, f64::NEG_INFINITY);
    }

    #[test]
    fn test_fold_points() {
        let mut bbox = BoundingBox::new();
        bbox.fold(&point_record(2.0, -3.0));
        bbox.fold(&point_record(-1.0, 7.0));
        assert!(!bbox.is_empty());
        assert_eq!(
            (bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y),
            (-1.0, -3.0, 2.0, 7.0)
        );
    }

    #[test]
    fn test_fold_mbr_shapes() {
        let mut bbox = BoundingBox::new();
        bbox.fold(&mbr_record(5, 0.0, 0.0, 10.0, 10.0));
        bbox.fold(&mbr_record(3, -5.0, 2.0, 1.0, 20.0));
        assert_eq!(
            (bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y),
            (-5.0, 0.0, 10.0, 20.0)
        );
    }

    #[test]
    fn test_fold_never_shrinks() {
        let mut bbox = BoundingBox::new();
        bbox.fold(&point_record(-10.0, -10.0));
        bbox.fold(&point_record(10.0, 10.0));
        bbox.fold(&point_record(0.0, 0.0));
        assert_eq!(
            (bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y),
            (-10.0, -10.0, 10.0, 10.0)
        );
    }

    #[test]
    fn test_fold_ignores_unknown_codes() {
        let mut bbox = BoundingBox::new();
        // null shape (code 0) carries no extent
        let mut rec = vec![0u8; 20];
        codec::write_i32(&mut rec, 0, 0, Endian::Little);
        bbox.fold(&rec);
        bbox.fold(&[]);
        assert!(bbox.is_empty());
    }
}
