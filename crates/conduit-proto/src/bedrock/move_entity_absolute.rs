//! MoveEntityAbsolute (0x12) — Proxy → Client.
//!
//! Absolute position/rotation update for a mirrored entity. Angles travel
//! as compressed bytes (256ths of a turn).

use bytes::BufMut;

use crate::codec::ProtoEncode;
use crate::types::{VarUInt64, Vec3};

/// MoveEntityAbsolute packet.
#[derive(Debug, Clone)]
pub struct MoveEntityAbsolute {
    pub entity_runtime_id: u64,
    /// Bit 0 = on_ground, bit 1 = teleport.
    pub flags: u16,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
}

impl MoveEntityAbsolute {
    pub const FLAG_ON_GROUND: u16 = 0x01;
    pub const FLAG_TELEPORT: u16 = 0x02;

    fn angle_to_byte(angle: f32) -> u8 {
        ((angle % 360.0 + 360.0) % 360.0 * (256.0 / 360.0)) as u8
    }

    pub fn new(
        runtime_id: u64,
        position: Vec3,
        pitch: f32,
        yaw: f32,
        head_yaw: f32,
        on_ground: bool,
        teleported: bool,
    ) -> Self {
        let mut flags = 0;
        if on_ground {
            flags |= Self::FLAG_ON_GROUND;
        }
        if teleported {
            flags |= Self::FLAG_TELEPORT;
        }
        Self {
            entity_runtime_id: runtime_id,
            flags,
            position,
            pitch,
            yaw,
            head_yaw,
        }
    }
}

impl ProtoEncode for MoveEntityAbsolute {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarUInt64(self.entity_runtime_id).proto_encode(buf);
        buf.put_u16_le(self.flags);
        self.position.proto_encode(buf);
        buf.put_u8(Self::angle_to_byte(self.pitch));
        buf.put_u8(Self::angle_to_byte(self.head_yaw));
        buf.put_u8(Self::angle_to_byte(self.yaw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn encode_basic() {
        let pkt = MoveEntityAbsolute::new(
            42,
            Vec3::new(10.0, 64.0, 10.0),
            0.0,
            90.0,
            90.0,
            true,
            false,
        );
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        // VarUInt64(42)=1 + flags=2 + Vec3=12 + 3 angle bytes = 18
        assert_eq!(buf.len(), 18);
    }

    #[test]
    fn angle_to_byte_conversions() {
        assert_eq!(MoveEntityAbsolute::angle_to_byte(0.0), 0);
        assert_eq!(MoveEntityAbsolute::angle_to_byte(90.0), 64);
        assert_eq!(MoveEntityAbsolute::angle_to_byte(180.0), 128);
        assert_eq!(MoveEntityAbsolute::angle_to_byte(360.0), 0);
        assert_eq!(MoveEntityAbsolute::angle_to_byte(-90.0), 192);
    }

    #[test]
    fn flag_bits() {
        let grounded = MoveEntityAbsolute::new(1, Vec3::ZERO, 0.0, 0.0, 0.0, true, false);
        let teleported = MoveEntityAbsolute::new(1, Vec3::ZERO, 0.0, 0.0, 0.0, false, true);
        assert_eq!(grounded.flags, MoveEntityAbsolute::FLAG_ON_GROUND);
        assert_eq!(teleported.flags, MoveEntityAbsolute::FLAG_TELEPORT);
    }
}
