//! Entity movement family — Backend → Proxy.
//!
//! Relative moves carry deltas in 1/4096 block; velocities in 1/8000
//! block per tick; angles as compressed bytes.

use bytes::Buf;

use crate::error::ProtoError;

use super::codec::{read_angle, read_bool, read_varint};

/// Scale of relative move deltas.
pub const DELTA_SCALE: f64 = 4096.0;
/// Scale of velocity components.
pub const VELOCITY_SCALE: f64 = 8000.0;

fn read_f64(buf: &mut impl Buf) -> Result<f64, ProtoError> {
    if buf.remaining() < 8 {
        return Err(ProtoError::BufferTooShort {
            needed: 8,
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_f64())
}

fn read_i16(buf: &mut impl Buf) -> Result<i16, ProtoError> {
    if buf.remaining() < 2 {
        return Err(ProtoError::BufferTooShort {
            needed: 2,
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_i16())
}

/// EntityPosition (0x29): relative move without rotation.
#[derive(Debug, Clone)]
pub struct EntityPosition {
    pub entity_id: i32,
    pub delta_x: i16,
    pub delta_y: i16,
    pub delta_z: i16,
    pub on_ground: bool,
}

impl EntityPosition {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(EntityPosition {
            entity_id: read_varint(buf)?,
            delta_x: read_i16(buf)?,
            delta_y: read_i16(buf)?,
            delta_z: read_i16(buf)?,
            on_ground: read_bool(buf)?,
        })
    }
}

/// EntityPositionRotation (0x2A): relative move plus look.
#[derive(Debug, Clone)]
pub struct EntityPositionRotation {
    pub entity_id: i32,
    pub delta_x: i16,
    pub delta_y: i16,
    pub delta_z: i16,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl EntityPositionRotation {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(EntityPositionRotation {
            entity_id: read_varint(buf)?,
            delta_x: read_i16(buf)?,
            delta_y: read_i16(buf)?,
            delta_z: read_i16(buf)?,
            yaw: read_angle(buf)?,
            pitch: read_angle(buf)?,
            on_ground: read_bool(buf)?,
        })
    }
}

/// EntityRotation (0x2B): look only.
#[derive(Debug, Clone)]
pub struct EntityRotation {
    pub entity_id: i32,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl EntityRotation {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(EntityRotation {
            entity_id: read_varint(buf)?,
            yaw: read_angle(buf)?,
            pitch: read_angle(buf)?,
            on_ground: read_bool(buf)?,
        })
    }
}

/// EntityHeadLook (0x3E): head yaw only.
#[derive(Debug, Clone)]
pub struct EntityHeadLook {
    pub entity_id: i32,
    pub head_yaw: f32,
}

impl EntityHeadLook {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(EntityHeadLook {
            entity_id: read_varint(buf)?,
            head_yaw: read_angle(buf)?,
        })
    }
}

/// EntityTeleport (0x61): absolute position and look.
#[derive(Debug, Clone)]
pub struct EntityTeleport {
    pub entity_id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl EntityTeleport {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(EntityTeleport {
            entity_id: read_varint(buf)?,
            x: read_f64(buf)?,
            y: read_f64(buf)?,
            z: read_f64(buf)?,
            yaw: read_angle(buf)?,
            pitch: read_angle(buf)?,
            on_ground: read_bool(buf)?,
        })
    }
}

/// EntityVelocity (0x4F).
#[derive(Debug, Clone)]
pub struct EntityVelocity {
    pub entity_id: i32,
    pub velocity_x: i16,
    pub velocity_y: i16,
    pub velocity_z: i16,
}

impl EntityVelocity {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(EntityVelocity {
            entity_id: read_varint(buf)?,
            velocity_x: read_i16(buf)?,
            velocity_y: read_i16(buf)?,
            velocity_z: read_i16(buf)?,
        })
    }
}

/// DestroyEntities (0x3A).
#[derive(Debug, Clone)]
pub struct DestroyEntities {
    pub entity_ids: Vec<i32>,
}

impl DestroyEntities {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let count = read_varint(buf)?;
        if count < 0 {
            return Err(ProtoError::InvalidData(format!(
                "negative entity count: {count}"
            )));
        }
        let mut entity_ids = Vec::with_capacity(count.min(1024) as usize);
        for _ in 0..count {
            entity_ids.push(read_varint(buf)?);
        }
        Ok(DestroyEntities { entity_ids })
    }
}

/// SetPassengers (0x54).
#[derive(Debug, Clone)]
pub struct SetPassengers {
    pub vehicle_id: i32,
    pub passenger_ids: Vec<i32>,
}

impl SetPassengers {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let vehicle_id = read_varint(buf)?;
        let count = read_varint(buf)?;
        if count < 0 {
            return Err(ProtoError::InvalidData(format!(
                "negative passenger count: {count}"
            )));
        }
        let mut passenger_ids = Vec::with_capacity(count.min(64) as usize);
        for _ in 0..count {
            passenger_ids.push(read_varint(buf)?);
        }
        Ok(SetPassengers {
            vehicle_id,
            passenger_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    #[test]
    fn decode_relative_move() {
        let mut buf = BytesMut::new();
        buf.put_u8(5);
        buf.put_i16(4096); // +1.0 block
        buf.put_i16(0);
        buf.put_i16(-2048); // -0.5 block
        buf.put_u8(1);
        let pkt = EntityPosition::decode(&mut buf.freeze()).unwrap();
        assert_eq!(pkt.entity_id, 5);
        assert_eq!(pkt.delta_x as f64 / DELTA_SCALE, 1.0);
        assert_eq!(pkt.delta_z as f64 / DELTA_SCALE, -0.5);
        assert!(pkt.on_ground);
    }

    #[test]
    fn decode_teleport() {
        let mut buf = BytesMut::new();
        buf.put_u8(5);
        buf.put_f64(1.0);
        buf.put_f64(2.0);
        buf.put_f64(3.0);
        buf.put_u8(128); // 180°
        buf.put_u8(0);
        buf.put_u8(0);
        let pkt = EntityTeleport::decode(&mut buf.freeze()).unwrap();
        assert_eq!(pkt.yaw, 180.0);
        assert!(!pkt.on_ground);
    }

    #[test]
    fn decode_destroy_list() {
        let mut buf = BytesMut::new();
        buf.put_u8(3);
        buf.put_u8(1);
        buf.put_u8(2);
        buf.put_u8(3);
        let pkt = DestroyEntities::decode(&mut buf.freeze()).unwrap();
        assert_eq!(pkt.entity_ids, vec![1, 2, 3]);
    }

    #[test]
    fn decode_passengers() {
        let mut buf = BytesMut::new();
        buf.put_u8(9); // vehicle
        buf.put_u8(2);
        buf.put_u8(10);
        buf.put_u8(11);
        let pkt = SetPassengers::decode(&mut buf.freeze()).unwrap();
        assert_eq!(pkt.vehicle_id, 9);
        assert_eq!(pkt.passenger_ids, vec![10, 11]);
    }

    #[test]
    fn truncated_velocity_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(5);
        buf.put_i16(100);
        assert!(EntityVelocity::decode(&mut buf.freeze()).is_err());
    }
}
