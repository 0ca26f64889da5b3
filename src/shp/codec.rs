//! Mixed-endian field codec.
//!
//! Shapefile headers and records interleave big-endian and little-endian
//! fields in the same buffer, so every access names the byte order of the
//! field it touches. Out-of-range offsets are a caller contract violation:
//! buffers are sized by the fixed layouts in [`super::format`] before any
//! decode happens.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order of a stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Native byte order of the target, resolved once at compile time.
pub const NATIVE: Endian = if cfg!(target_endian = "big") {
    Endian::Big
} else {
    Endian::Little
};

/// Read a u16 at `offset` stored in the given byte order.
#[inline]
pub fn read_u16(buf: &[u8], offset: usize, order: Endian) -> u16 {
    match order {
        Endian::Big => BigEndian::read_u16(&buf[offset..]),
        Endian::Little => LittleEndian::read_u16(&buf[offset..]),
    }
}

/// Read a u32 at `offset` stored in the given byte order.
#[inline]
pub fn read_u32(buf: &[u8], offset: usize, order: Endian) -> u32 {
    match order {
        Endian::Big => BigEndian::read_u32(&buf[offset..]),
        Endian::Little => LittleEndian::read_u32(&buf[offset..]),
    }
}

/// Read an i32 at `offset` stored in the given byte order.
#[inline]
pub fn read_i32(buf: &[u8], offset: usize, order: Endian) -> i32 {
    match order {
        Endian::Big => BigEndian::read_i32(&buf[offset..]),
        Endian::Little => LittleEndian::read_i32(&buf[offset..]),
    }
}

/// Read an f64 at `offset` stored in the given byte order.
#[inline]
pub fn read_f64(buf: &[u8], offset: usize, order: Endian) -> f64 {
    match order {
        Endian::Big => BigEndian::read_f64(&buf[offset..]),
        Endian::Little => LittleEndian::read_f64(&buf[offset..]),
    }
}

/// Write a u16 at `offset` in the given byte order.
#[inline]
pub fn write_u16(buf: &mut [u8], offset: usize, value: u16, order: Endian) {
    match order {
        Endian::Big => BigEndian::write_u16(&mut buf[offset..], value),
        Endian::Little => LittleEndian::write_u16(&mut buf[offset..], value),
    }
}

/// Write a u32 at `offset` in the given byte order.
#[inline]
pub fn write_u32(buf: &mut [u8], offset: usize, value: u32, order: Endian) {
    match order {
        Endian::Big => BigEndian::write_u32(&mut buf[offset..], value),
        Endian::Little => LittleEndian::write_u32(&mut buf[offset..], value),
    }
}

/// Write an i32 at `offset` in the given byte order.
#[inline]
pub fn write_i32(buf: &mut [u8], offset: usize, value: i32, order: Endian) {
    match order {
        Endian::Big => BigEndian::write_i32(&mut buf[offset..], value),
        Endian::Little => LittleEndian::write_i32(&mut buf[offset..], value),
    }
}

/// Write an f64 at `offset` in the given byte order.
#[inline]
pub fn write_f64(buf: &mut [u8], offset: usize, value: f64, order: Endian) {
    match order {
        Endian::Big => BigEndian::write_f64(&mut buf[offset..], value),
        Endian::Little => LittleEndian::write_f64(&mut buf[offset..], value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_both_orders() {
        let mut buf = [0u8; 8];
        write_u32(&mut buf, 0, 9994, Endian::Big);
        write_u32(&mut buf, 4, 9994, Endian::Little);
        assert_eq!(&buf[..4], &[0x00, 0x00, 0x27, 0x0A]);
        assert_eq!(&buf[4..], &[0x0A, 0x27, 0x00, 0x00]);
        assert_eq!(read_u32(&buf, 0, Endian::Big), 9994);
        assert_eq!(read_u32(&buf, 4, Endian::Little), 9994);
    }

    #[test]
    fn test_i32_negative() {
        let mut buf = [0u8; 4];
        write_i32(&mut buf, 0, -12345, Endian::Big);
        assert_eq!(read_i32(&buf, 0, Endian::Big), -12345);
    }

    #[test]
    fn test_u16_offset() {
        let mut buf = [0u8; 12];
        write_u16(&mut buf, 10, 513, Endian::Little);
        assert_eq!(buf[10], 1);
        assert_eq!(buf[11], 2);
        assert_eq!(read_u16(&buf, 10, Endian::Little), 513);
    }

    #[test]
    fn test_f64_roundtrip() {
        let mut buf = [0u8; 16];
        write_f64(&mut buf, 0, -179.25, Endian::Little);
        write_f64(&mut buf, 8, f64::INFINITY, Endian::Little);
        assert_eq!(read_f64(&buf, 0, Endian::Little), -179.25);
        assert_eq!(read_f64(&buf, 8, Endian::Little), f64::INFINITY);
    }

    #[test]
    fn test_native_matches_target() {
        let probe: u32 = 1;
        let first = probe.to_ne_bytes()[0];
        match NATIVE {
            Endian::Little => assert_eq!(first, 1),
            Endian::Big => assert_eq!(first, 0),
        }
    }
}
