//! AddEntity (0x0D) — Proxy → Client.
//!
//! Spawns a mirrored entity on the client. Rotation is already in target
//! axis order (pitch, head-yaw, yaw permuted by the entity mirror).

use bytes::BufMut;

use crate::codec::{write_string, ProtoEncode};
use crate::types::{VarLong, VarUInt32, VarUInt64, Vec3};

use super::metadata::{encode_entity_metadata, EntityMetadataEntry};

/// A single attribute sent with AddEntity.
#[derive(Debug, Clone)]
pub struct EntityAttribute {
    pub name: String,
    pub min: f32,
    pub max: f32,
    pub current: f32,
}

/// Spawn a non-player entity.
#[derive(Debug, Clone)]
pub struct AddEntity {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub identifier: String,
    pub position: Vec3,
    pub motion: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub attributes: Vec<EntityAttribute>,
    pub metadata: Vec<EntityMetadataEntry>,
}

impl ProtoEncode for AddEntity {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarLong(self.entity_unique_id).proto_encode(buf);
        VarUInt64(self.entity_runtime_id).proto_encode(buf);
        write_string(buf, &self.identifier);
        self.position.proto_encode(buf);
        self.motion.proto_encode(buf);
        buf.put_f32_le(self.pitch);
        buf.put_f32_le(self.yaw);
        buf.put_f32_le(self.head_yaw);
        VarUInt32(self.attributes.len() as u32).proto_encode(buf);
        for attr in &self.attributes {
            write_string(buf, &attr.name);
            buf.put_f32_le(attr.min);
            buf.put_f32_le(attr.max);
            buf.put_f32_le(attr.current);
        }
        encode_entity_metadata(buf, &self.metadata);
        // Entity links
        VarUInt32(0).proto_encode(buf);
    }
}
