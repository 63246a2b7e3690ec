//! LevelEvent (0x19) — Proxy → Client.
//!
//! World-effect events. The proxy uses the particle events to draw the
//! world-border fence, which the target protocol has no native packet for.

use bytes::BufMut;

use crate::codec::ProtoEncode;
use crate::types::{VarInt, Vec3};

/// Event IDs the proxy emits.
pub mod event {
    /// Generic particle spawn; data = particle type.
    pub const ADD_PARTICLE: i32 = 0x4000;
    /// Red-tinted screen overlay used inside the border warning band.
    pub const DARKEN_SCREEN: i32 = 2002;
}

/// LevelEvent packet.
#[derive(Debug, Clone)]
pub struct LevelEvent {
    pub event_id: i32,
    pub position: Vec3,
    pub data: i32,
}

impl ProtoEncode for LevelEvent {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.event_id).proto_encode(buf);
        self.position.proto_encode(buf);
        VarInt(self.data).proto_encode(buf);
    }
}
