//! Entity metadata wire encoding.
//!
//! Shared by AddEntity and SetEntityData. Each entry is
//! `VarUInt32(key) + VarUInt32(type) + value`.

use bytes::BufMut;

use crate::codec::{write_string, ProtoEncode};
use crate::types::{VarInt, VarLong, VarUInt32};

/// Metadata keys the proxy writes.
pub mod data_key {
    pub const FLAGS: u32 = 0;
    pub const COLOR: u32 = 2;
    pub const NAMETAG: u32 = 4;
    pub const AIR_SUPPLY: u32 = 7;
    pub const LEASH_HOLDER_EID: u32 = 37;
    pub const SCALE: u32 = 38;
    pub const MAX_AIR_SUPPLY: u32 = 42;
    pub const BOUNDING_BOX_WIDTH: u32 = 53;
    pub const BOUNDING_BOX_HEIGHT: u32 = 54;
    pub const NAMETAG_ALWAYS_SHOW: u32 = 81;
    pub const FREEZING_EFFECT_STRENGTH: u32 = 99;
}

/// Entity metadata value types.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Byte(u8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Long(i64),
}

impl MetadataValue {
    /// Wire type ID (0=byte, 1=short, 2=int, 3=float, 4=string, 7=long).
    pub fn type_id(&self) -> u32 {
        match self {
            MetadataValue::Byte(_) => 0,
            MetadataValue::Short(_) => 1,
            MetadataValue::Int(_) => 2,
            MetadataValue::Float(_) => 3,
            MetadataValue::String(_) => 4,
            MetadataValue::Long(_) => 7,
        }
    }
}

/// A single entity metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadataEntry {
    pub key: u32,
    pub value: MetadataValue,
}

/// Encode entity metadata entries.
pub fn encode_entity_metadata(buf: &mut impl BufMut, entries: &[EntityMetadataEntry]) {
    VarUInt32(entries.len() as u32).proto_encode(buf);
    for entry in entries {
        VarUInt32(entry.key).proto_encode(buf);
        VarUInt32(entry.value.type_id()).proto_encode(buf);
        match &entry.value {
            MetadataValue::Byte(v) => buf.put_u8(*v),
            MetadataValue::Short(v) => buf.put_i16_le(*v),
            MetadataValue::Int(v) => VarInt(*v).proto_encode(buf),
            MetadataValue::Float(v) => buf.put_f32_le(*v),
            MetadataValue::String(v) => write_string(buf, v),
            MetadataValue::Long(v) => VarLong(*v).proto_encode(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn encode_mixed_entries() {
        let entries = vec![
            EntityMetadataEntry {
                key: data_key::FLAGS,
                value: MetadataValue::Long(0),
            },
            EntityMetadataEntry {
                key: data_key::SCALE,
                value: MetadataValue::Float(1.0),
            },
            EntityMetadataEntry {
                key: data_key::NAMETAG,
                value: MetadataValue::String("Dinnerbone".into()),
            },
        ];
        let mut buf = BytesMut::new();
        encode_entity_metadata(&mut buf, &entries);
        // count byte first
        assert_eq!(buf[0], 3);
        assert!(buf.len() > 3 + 10);
    }

    #[test]
    fn type_ids_match_wire_contract() {
        assert_eq!(MetadataValue::Byte(0).type_id(), 0);
        assert_eq!(MetadataValue::Short(0).type_id(), 1);
        assert_eq!(MetadataValue::Int(0).type_id(), 2);
        assert_eq!(MetadataValue::Float(0.0).type_id(), 3);
        assert_eq!(MetadataValue::String(String::new()).type_id(), 4);
        assert_eq!(MetadataValue::Long(0).type_id(), 7);
    }

    #[test]
    fn identical_entries_encode_identically() {
        let entries = vec![EntityMetadataEntry {
            key: data_key::AIR_SUPPLY,
            value: MetadataValue::Short(300),
        }];
        let mut a = BytesMut::new();
        let mut b = BytesMut::new();
        encode_entity_metadata(&mut a, &entries);
        encode_entity_metadata(&mut b, &entries);
        assert_eq!(a, b);
    }
}
