//! Base data types shared by both wire codecs.
//!
//! Bedrock varints are ZigZag + LEB128 (`VarInt`/`VarLong`) or plain LEB128
//! (`VarUInt32`/`VarUInt64`); Java's unsigned varint lives in `java::codec`.

use std::fmt;
use std::ops::{Add, Sub};

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

#[derive(Debug, Error)]
pub enum VarIntError {
    #[error("buffer too short")]
    BufferTooShort,
    #[error("VarInt is too long (more than {max_bytes} bytes)")]
    TooManyBytes { max_bytes: usize },
}

fn zigzag_encode_32(v: i32) -> u32 {
    ((v << 1) ^ (v >> 31)) as u32
}

fn zigzag_decode_32(v: u32) -> i32 {
    ((v >> 1) as i32) ^ -((v & 1) as i32)
}

fn zigzag_encode_64(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

fn zigzag_decode_64(v: u64) -> i64 {
    ((v >> 1) as i64) ^ -((v & 1) as i64)
}

// ---------------------------------------------------------------------------
// VarInt (i32 — ZigZag + LEB128)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarInt(pub i32);

impl VarInt {
    pub const MAX_BYTES: usize = 5;
}

impl ProtoEncode for VarInt {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = zigzag_encode_32(self.0);
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarInt {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let raw = decode_uleb128(buf, Self::MAX_BYTES)? as u32;
        Ok(VarInt(zigzag_decode_32(raw)))
    }
}

impl fmt::Debug for VarInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarInt({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// VarLong (i64 — ZigZag + LEB128)
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarLong(pub i64);

impl VarLong {
    pub const MAX_BYTES: usize = 10;
}

impl ProtoEncode for VarLong {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = zigzag_encode_64(self.0);
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarLong {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let raw = decode_uleb128(buf, Self::MAX_BYTES)?;
        Ok(VarLong(zigzag_decode_64(raw)))
    }
}

impl fmt::Debug for VarLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarLong({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// VarUInt32 / VarUInt64 (plain LEB128)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarUInt32(pub u32);

impl ProtoEncode for VarUInt32 {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = self.0;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarUInt32 {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let raw = decode_uleb128(buf, 5)?;
        Ok(VarUInt32(raw as u32))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarUInt64(pub u64);

impl ProtoEncode for VarUInt64 {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        let mut value = self.0;
        loop {
            if value & !0x7F == 0 {
                buf.put_u8(value as u8);
                return;
            }
            buf.put_u8((value & 0x7F | 0x80) as u8);
            value >>= 7;
        }
    }
}

impl ProtoDecode for VarUInt64 {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let raw = decode_uleb128(buf, 10)?;
        Ok(VarUInt64(raw))
    }
}

fn decode_uleb128(buf: &mut impl Buf, max_bytes: usize) -> Result<u64, ProtoError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    for i in 0..max_bytes {
        if !buf.has_remaining() {
            return Err(VarIntError::BufferTooShort.into());
        }
        let byte = buf.get_u8();
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if i == max_bytes - 1 {
            return Err(VarIntError::TooManyBytes { max_bytes }.into());
        }
    }
    Err(VarIntError::BufferTooShort.into())
}

// ---------------------------------------------------------------------------
// Vec3 (f32 triple, little-endian on the Bedrock wire)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl ProtoEncode for Vec3 {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f32_le(self.x);
        buf.put_f32_le(self.y);
        buf.put_f32_le(self.z);
    }
}

impl ProtoDecode for Vec3 {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 12 {
            return Err(ProtoError::BufferTooShort {
                needed: 12,
                remaining: buf.remaining(),
            });
        }
        Ok(Vec3 {
            x: buf.get_f32_le(),
            y: buf.get_f32_le(),
            z: buf.get_f32_le(),
        })
    }
}

/// Signed block position (Bedrock wire: VarInt x, VarUInt32 y, VarInt z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl ProtoEncode for BlockPos {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.x).proto_encode(buf);
        VarUInt32(self.y as u32).proto_encode(buf);
        VarInt(self.z).proto_encode(buf);
    }
}

impl ProtoDecode for BlockPos {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(BlockPos {
            x: VarInt::proto_decode(buf)?.0,
            y: VarUInt32::proto_decode(buf)?.0 as i32,
            z: VarInt::proto_decode(buf)?.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    fn roundtrip_varint(v: i32) {
        let mut buf = BytesMut::new();
        VarInt(v).proto_encode(&mut buf);
        let decoded = VarInt::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded.0, v);
    }

    #[test]
    fn varint_roundtrip() {
        for v in [0, 1, -1, 127, -128, 300, -300, i32::MAX, i32::MIN] {
            roundtrip_varint(v);
        }
    }

    #[test]
    fn varint_zigzag_small_values_one_byte() {
        for v in [-64i32, -1, 0, 1, 63] {
            let mut buf = BytesMut::new();
            VarInt(v).proto_encode(&mut buf);
            assert_eq!(buf.len(), 1, "VarInt({v}) should encode to one byte");
        }
    }

    #[test]
    fn varlong_roundtrip() {
        for v in [0i64, -1, 1, i64::MAX, i64::MIN, 1 << 40] {
            let mut buf = BytesMut::new();
            VarLong(v).proto_encode(&mut buf);
            let decoded = VarLong::proto_decode(&mut buf.freeze()).unwrap();
            assert_eq!(decoded.0, v);
        }
    }

    #[test]
    fn varuint_roundtrip() {
        for v in [0u32, 1, 127, 128, 0xFFFF, u32::MAX] {
            let mut buf = BytesMut::new();
            VarUInt32(v).proto_encode(&mut buf);
            let decoded = VarUInt32::proto_decode(&mut buf.freeze()).unwrap();
            assert_eq!(decoded.0, v);
        }
    }

    #[test]
    fn varint_too_long_rejected() {
        let bytes = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x01];
        assert!(VarInt::proto_decode(&mut &bytes[..]).is_err());
    }

    #[test]
    fn varint_truncated_rejected() {
        let bytes = [0x80u8];
        assert!(VarInt::proto_decode(&mut &bytes[..]).is_err());
    }

    #[test]
    fn vec3_roundtrip() {
        let v = Vec3::new(1.5, -64.0, 200.25);
        let mut buf = BytesMut::new();
        v.proto_encode(&mut buf);
        assert_eq!(buf.len(), 12);
        let decoded = Vec3::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, v);
    }

    #[test]
    fn block_pos_roundtrip() {
        let p = BlockPos::new(-30_000_000, 255, 30_000_000);
        let mut buf = BytesMut::new();
        p.proto_encode(&mut buf);
        let decoded = BlockPos::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, p);
    }
}
