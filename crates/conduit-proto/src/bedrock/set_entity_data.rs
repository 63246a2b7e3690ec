//! SetEntityData (0x27) — Proxy → Client.
//!
//! Full metadata snapshot for an already-spawned entity.

use bytes::BufMut;

use crate::codec::ProtoEncode;
use crate::types::VarUInt64;

use super::metadata::{encode_entity_metadata, EntityMetadataEntry};

/// SetEntityData packet.
#[derive(Debug, Clone)]
pub struct SetEntityData {
    pub entity_runtime_id: u64,
    pub metadata: Vec<EntityMetadataEntry>,
}

impl ProtoEncode for SetEntityData {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarUInt64(self.entity_runtime_id).proto_encode(buf);
        encode_entity_metadata(buf, &self.metadata);
    }
}
