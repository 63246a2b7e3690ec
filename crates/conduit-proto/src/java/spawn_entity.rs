//! SpawnLivingEntity (0x02) — Backend → Proxy.

use bytes::Buf;

use crate::error::ProtoError;

use super::codec::{read_angle, read_uuid, read_varint};

/// Spawn of a living entity on the backend.
#[derive(Debug, Clone)]
pub struct SpawnEntity {
    pub entity_id: i32,
    pub uuid: (u64, u64),
    /// Source-protocol entity type index.
    pub entity_type: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub head_yaw: f32,
    /// Velocity in 1/8000 blocks per tick.
    pub velocity_x: i16,
    pub velocity_y: i16,
    pub velocity_z: i16,
}

impl SpawnEntity {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let entity_id = read_varint(buf)?;
        let uuid = read_uuid(buf)?;
        let entity_type = read_varint(buf)?;
        if buf.remaining() < 3 * 8 {
            return Err(ProtoError::BufferTooShort {
                needed: 24,
                remaining: buf.remaining(),
            });
        }
        let x = buf.get_f64();
        let y = buf.get_f64();
        let z = buf.get_f64();
        let yaw = read_angle(buf)?;
        let pitch = read_angle(buf)?;
        let head_yaw = read_angle(buf)?;
        if buf.remaining() < 3 * 2 {
            return Err(ProtoError::BufferTooShort {
                needed: 6,
                remaining: buf.remaining(),
            });
        }
        let velocity_x = buf.get_i16();
        let velocity_y = buf.get_i16();
        let velocity_z = buf.get_i16();
        Ok(SpawnEntity {
            entity_id,
            uuid,
            entity_type,
            x,
            y,
            z,
            yaw,
            pitch,
            head_yaw,
            velocity_x,
            velocity_y,
            velocity_z,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::{BufMut, BytesMut};

    #[test]
    fn decode_spawn() {
        let mut buf = BytesMut::new();
        buf.put_u8(17); // entity id varint
        buf.put_u64(1);
        buf.put_u64(2);
        buf.put_u8(54); // entity type varint
        buf.put_f64(100.5);
        buf.put_f64(64.0);
        buf.put_f64(-20.25);
        buf.put_u8(64); // yaw 90°
        buf.put_u8(0); // pitch
        buf.put_u8(64); // head yaw
        buf.put_i16(0);
        buf.put_i16(-400);
        buf.put_i16(0);

        let pkt = SpawnEntity::decode(&mut buf.freeze()).unwrap();
        assert_eq!(pkt.entity_id, 17);
        assert_eq!(pkt.entity_type, 54);
        assert_eq!(pkt.x, 100.5);
        assert_eq!(pkt.yaw, 90.0);
        assert_eq!(pkt.velocity_y, -400);
    }

    #[test]
    fn truncated_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(17);
        buf.put_u64(1);
        assert!(SpawnEntity::decode(&mut buf.freeze()).is_err());
    }
}
