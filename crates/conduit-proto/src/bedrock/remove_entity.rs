//! RemoveEntity (0x0E) — Proxy → Client.

use bytes::BufMut;

use crate::codec::ProtoEncode;
use crate::types::VarLong;

/// Despawn an entity from the client's world.
#[derive(Debug, Clone)]
pub struct RemoveEntity {
    pub entity_unique_id: i64,
}

impl ProtoEncode for RemoveEntity {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarLong(self.entity_unique_id).proto_encode(buf);
    }
}
