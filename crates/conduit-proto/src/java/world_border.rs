//! World border packets (0x42–0x44) — Backend → Proxy.

use bytes::Buf;

use crate::error::ProtoError;

use super::codec::read_varlong;

fn read_f64(buf: &mut impl Buf) -> Result<f64, ProtoError> {
    if buf.remaining() < 8 {
        return Err(ProtoError::BufferTooShort {
            needed: 8,
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_f64())
}

/// SetBorderCenter (0x42).
#[derive(Debug, Clone)]
pub struct SetBorderCenter {
    pub x: f64,
    pub z: f64,
}

impl SetBorderCenter {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(SetBorderCenter {
            x: read_f64(buf)?,
            z: read_f64(buf)?,
        })
    }
}

/// SetBorderLerpSize (0x43): resize over a duration.
#[derive(Debug, Clone)]
pub struct SetBorderLerpSize {
    pub old_diameter: f64,
    pub new_diameter: f64,
    /// Transition duration in milliseconds.
    pub speed: i64,
}

impl SetBorderLerpSize {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(SetBorderLerpSize {
            old_diameter: read_f64(buf)?,
            new_diameter: read_f64(buf)?,
            speed: read_varlong(buf)?,
        })
    }
}

/// SetBorderSize (0x44): instant resize.
#[derive(Debug, Clone)]
pub struct SetBorderSize {
    pub diameter: f64,
}

impl SetBorderSize {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(SetBorderSize {
            diameter: read_f64(buf)?,
        })
    }
}
