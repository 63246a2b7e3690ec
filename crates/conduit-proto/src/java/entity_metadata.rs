//! EntityMetadata (0x4D) — Backend → Proxy.
//!
//! Field list terminated by index 0xFF. Only the value types the mirror
//! consumes are decoded; an unknown type aborts this packet (the field
//! length is unknowable), which the dispatcher treats as a recoverable
//! per-packet failure.

use bytes::Buf;

use crate::error::ProtoError;

use super::codec::{read_bool, read_string, read_varint};

/// Entity pose, as sent by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Standing,
    FallFlying,
    Sleeping,
    Swimming,
    SpinAttack,
    Sneaking,
    LongJumping,
    Dying,
}

impl Pose {
    fn from_index(idx: i32) -> Result<Self, ProtoError> {
        Ok(match idx {
            0 => Pose::Standing,
            1 => Pose::FallFlying,
            2 => Pose::Sleeping,
            3 => Pose::Swimming,
            4 => Pose::SpinAttack,
            5 => Pose::Sneaking,
            6 => Pose::LongJumping,
            7 => Pose::Dying,
            other => {
                return Err(ProtoError::InvalidData(format!("unknown pose: {other}")));
            }
        })
    }
}

/// Decoded metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum JavaMetadataValue {
    Byte(u8),
    VarInt(i32),
    Float(f32),
    String(String),
    /// Raw JSON chat component.
    Chat(String),
    OptChat(Option<String>),
    Boolean(bool),
    Pose(Pose),
}

/// A single metadata field.
#[derive(Debug, Clone, PartialEq)]
pub struct JavaMetadataField {
    pub index: u8,
    pub value: JavaMetadataValue,
}

/// EntityMetadata packet.
#[derive(Debug, Clone)]
pub struct EntityMetadata {
    pub entity_id: i32,
    pub fields: Vec<JavaMetadataField>,
}

mod value_type {
    pub const BYTE: i32 = 0;
    pub const VAR_INT: i32 = 1;
    pub const FLOAT: i32 = 2;
    pub const STRING: i32 = 3;
    pub const CHAT: i32 = 4;
    pub const OPT_CHAT: i32 = 5;
    pub const BOOLEAN: i32 = 7;
    pub const POSE: i32 = 18;
}

impl EntityMetadata {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let entity_id = read_varint(buf)?;
        let mut fields = Vec::new();
        loop {
            if !buf.has_remaining() {
                return Err(ProtoError::BufferTooShort {
                    needed: 1,
                    remaining: 0,
                });
            }
            let index = buf.get_u8();
            if index == 0xFF {
                break;
            }
            let type_id = read_varint(buf)?;
            let value = match type_id {
                value_type::BYTE => {
                    if !buf.has_remaining() {
                        return Err(ProtoError::BufferTooShort {
                            needed: 1,
                            remaining: 0,
                        });
                    }
                    JavaMetadataValue::Byte(buf.get_u8())
                }
                value_type::VAR_INT => JavaMetadataValue::VarInt(read_varint(buf)?),
                value_type::FLOAT => {
                    if buf.remaining() < 4 {
                        return Err(ProtoError::BufferTooShort {
                            needed: 4,
                            remaining: buf.remaining(),
                        });
                    }
                    JavaMetadataValue::Float(buf.get_f32())
                }
                value_type::STRING => JavaMetadataValue::String(read_string(buf)?),
                value_type::CHAT => JavaMetadataValue::Chat(read_string(buf)?),
                value_type::OPT_CHAT => {
                    if read_bool(buf)? {
                        JavaMetadataValue::OptChat(Some(read_string(buf)?))
                    } else {
                        JavaMetadataValue::OptChat(None)
                    }
                }
                value_type::BOOLEAN => JavaMetadataValue::Boolean(read_bool(buf)?),
                value_type::POSE => JavaMetadataValue::Pose(Pose::from_index(read_varint(buf)?)?),
                other => return Err(ProtoError::UnsupportedMetadataType(other)),
            };
            fields.push(JavaMetadataField { index, value });
        }
        Ok(EntityMetadata { entity_id, fields })
    }
}
