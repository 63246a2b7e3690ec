//! SetEntityMotion (0x28) — Proxy → Client.
//!
//! Applies a velocity to a mirrored entity.

use bytes::BufMut;

use crate::codec::ProtoEncode;
use crate::types::{VarUInt64, Vec3};

/// SetEntityMotion packet.
#[derive(Debug, Clone)]
pub struct SetEntityMotion {
    pub entity_runtime_id: u64,
    pub motion: Vec3,
}

impl ProtoEncode for SetEntityMotion {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarUInt64(self.entity_runtime_id).proto_encode(buf);
        self.motion.proto_encode(buf);
    }
}
