//! Primitive codecs for the backend-facing (source) protocol.
//!
//! Unlike the client leg, this protocol uses big-endian scalars and plain
//! unsigned varints without ZigZag.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;
use crate::types::VarIntError;

const VARINT_MAX_BYTES: usize = 5;
const VARLONG_MAX_BYTES: usize = 10;

/// Read an unsigned-LEB128 varint as i32.
pub fn read_varint(buf: &mut impl Buf) -> Result<i32, ProtoError> {
    let mut result: u32 = 0;
    let mut shift: u32 = 0;
    for i in 0..VARINT_MAX_BYTES {
        if !buf.has_remaining() {
            return Err(VarIntError::BufferTooShort.into());
        }
        let byte = buf.get_u8();
        result |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
        shift += 7;
        if i == VARINT_MAX_BYTES - 1 {
            return Err(VarIntError::TooManyBytes {
                max_bytes: VARINT_MAX_BYTES,
            }
            .into());
        }
    }
    Err(VarIntError::BufferTooShort.into())
}

/// Write an unsigned-LEB128 varint.
pub fn write_varint(buf: &mut impl BufMut, v: i32) {
    let mut value = v as u32;
    loop {
        if value & !0x7F == 0 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value & 0x7F | 0x80) as u8);
        value >>= 7;
    }
}

/// Read an unsigned-LEB128 varlong as i64.
pub fn read_varlong(buf: &mut impl Buf) -> Result<i64, ProtoError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    for i in 0..VARLONG_MAX_BYTES {
        if !buf.has_remaining() {
            return Err(VarIntError::BufferTooShort.into());
        }
        let byte = buf.get_u8();
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result as i64);
        }
        shift += 7;
        if i == VARLONG_MAX_BYTES - 1 {
            return Err(VarIntError::TooManyBytes {
                max_bytes: VARLONG_MAX_BYTES,
            }
            .into());
        }
    }
    Err(VarIntError::BufferTooShort.into())
}

/// Write an unsigned-LEB128 varlong.
pub fn write_varlong(buf: &mut impl BufMut, v: i64) {
    let mut value = v as u64;
    loop {
        if value & !0x7F == 0 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value & 0x7F | 0x80) as u8);
        value >>= 7;
    }
}

/// Read a varint-length-prefixed UTF-8 string.
pub fn read_string(buf: &mut impl Buf) -> Result<String, ProtoError> {
    let len = read_varint(buf)? as usize;
    if buf.remaining() < len {
        return Err(ProtoError::BufferTooShort {
            needed: len,
            remaining: buf.remaining(),
        });
    }
    let data = buf.copy_to_bytes(len);
    String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)
}

/// Write a varint-length-prefixed UTF-8 string.
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    write_varint(buf, s.len() as i32);
    buf.put_slice(s.as_bytes());
}

/// Read a single boolean byte.
pub fn read_bool(buf: &mut impl Buf) -> Result<bool, ProtoError> {
    if !buf.has_remaining() {
        return Err(ProtoError::BufferTooShort {
            needed: 1,
            remaining: 0,
        });
    }
    Ok(buf.get_u8() != 0)
}

/// Read a compressed angle byte as degrees.
pub fn read_angle(buf: &mut impl Buf) -> Result<f32, ProtoError> {
    if !buf.has_remaining() {
        return Err(ProtoError::BufferTooShort {
            needed: 1,
            remaining: 0,
        });
    }
    Ok(buf.get_u8() as f32 * (360.0 / 256.0))
}

/// Read a 128-bit UUID as a (most, least) pair.
pub fn read_uuid(buf: &mut impl Buf) -> Result<(u64, u64), ProtoError> {
    if buf.remaining() < 16 {
        return Err(ProtoError::BufferTooShort {
            needed: 16,
            remaining: buf.remaining(),
        });
    }
    Ok((buf.get_u64(), buf.get_u64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn varint_roundtrip() {
        for v in [0, 1, 127, 128, 255, 25565, i32::MAX, -1, i32::MIN] {
            let mut buf = BytesMut::new();
            write_varint(&mut buf, v);
            assert_eq!(read_varint(&mut buf.freeze()).unwrap(), v);
        }
    }

    #[test]
    fn varint_no_zigzag() {
        // 1 must encode as a single 0x01 byte, not ZigZag's 0x02.
        let mut buf = BytesMut::new();
        write_varint(&mut buf, 1);
        assert_eq!(&buf[..], &[0x01]);
        // Negative numbers take the full five bytes.
        let mut buf = BytesMut::new();
        write_varint(&mut buf, -1);
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn varlong_roundtrip() {
        for v in [0i64, 1, -1, 1 << 50, i64::MAX, i64::MIN] {
            let mut buf = BytesMut::new();
            write_varlong(&mut buf, v);
            assert_eq!(read_varlong(&mut buf.freeze()).unwrap(), v);
        }
    }

    #[test]
    fn string_roundtrip() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "localhost");
        assert_eq!(read_string(&mut buf.freeze()).unwrap(), "localhost");
    }

    #[test]
    fn angle_quarter_turn() {
        let bytes = [64u8];
        assert_eq!(read_angle(&mut &bytes[..]).unwrap(), 90.0);
    }

    #[test]
    fn uuid_big_endian() {
        let mut buf = BytesMut::new();
        buf.put_u64(0x0123456789ABCDEF);
        buf.put_u64(0xFEDCBA9876543210);
        let (most, least) = read_uuid(&mut buf.freeze()).unwrap();
        assert_eq!(most, 0x0123456789ABCDEF);
        assert_eq!(least, 0xFEDCBA9876543210);
    }
}
