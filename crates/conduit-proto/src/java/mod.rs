//! Backend-facing (source) protocol packets.
//!
//! Clientbound packets (backend → proxy) are decoded into [`JavaPacket`];
//! the narrow serverbound surface the proxy emits lives in `serverbound`.

pub mod codec;
pub mod entity_metadata;
pub mod frame;
pub mod login;
pub mod movement;
pub mod serverbound;
pub mod spawn_entity;
pub mod world_border;

pub use entity_metadata::{EntityMetadata, JavaMetadataField, JavaMetadataValue, Pose};
pub use frame::{read_frame, write_frame, FrameConfig};
pub use login::{Handshake, LoginStart, LoginSuccess, SetCompression};
pub use movement::{
    DestroyEntities, EntityHeadLook, EntityPosition, EntityPositionRotation, EntityRotation,
    EntityTeleport, EntityVelocity, SetPassengers,
};
pub use spawn_entity::SpawnEntity;
pub use world_border::{SetBorderCenter, SetBorderLerpSize, SetBorderSize};

use bytes::Buf;

use crate::error::ProtoError;

/// The backend protocol version the proxy speaks.
pub const PROTOCOL_VERSION: i32 = 756;

/// Clientbound (play state) packet IDs.
pub mod id {
    pub const SPAWN_LIVING_ENTITY: i32 = 0x02;
    pub const JOIN_GAME: i32 = 0x26;
    pub const ENTITY_POSITION: i32 = 0x29;
    pub const ENTITY_POSITION_ROTATION: i32 = 0x2A;
    pub const ENTITY_ROTATION: i32 = 0x2B;
    pub const DESTROY_ENTITIES: i32 = 0x3A;
    pub const ENTITY_HEAD_LOOK: i32 = 0x3E;
    pub const SET_BORDER_CENTER: i32 = 0x42;
    pub const SET_BORDER_LERP_SIZE: i32 = 0x43;
    pub const SET_BORDER_SIZE: i32 = 0x44;
    pub const ENTITY_METADATA: i32 = 0x4D;
    pub const ENTITY_VELOCITY: i32 = 0x4F;
    pub const SET_PASSENGERS: i32 = 0x54;
    pub const ENTITY_TELEPORT: i32 = 0x61;
}

/// Minimal JoinGame view: the handful of fields the session needs to
/// finish its handshake. The remainder of the packet is ignored.
#[derive(Debug, Clone)]
pub struct JoinGame {
    pub entity_id: i32,
    pub hardcore: bool,
    pub gamemode: u8,
}

impl JoinGame {
    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 6 {
            return Err(ProtoError::BufferTooShort {
                needed: 6,
                remaining: buf.remaining(),
            });
        }
        let entity_id = buf.get_i32();
        let hardcore = buf.get_u8() != 0;
        let gamemode = buf.get_u8();
        Ok(JoinGame {
            entity_id,
            hardcore,
            gamemode,
        })
    }
}

/// Union of backend packets the proxy translates.
#[derive(Debug, Clone)]
pub enum JavaPacket {
    JoinGame(JoinGame),
    SpawnEntity(SpawnEntity),
    DestroyEntities(DestroyEntities),
    EntityPosition(EntityPosition),
    EntityPositionRotation(EntityPositionRotation),
    EntityRotation(EntityRotation),
    EntityHeadLook(EntityHeadLook),
    EntityTeleport(EntityTeleport),
    EntityVelocity(EntityVelocity),
    EntityMetadata(EntityMetadata),
    SetPassengers(SetPassengers),
    SetBorderCenter(SetBorderCenter),
    SetBorderLerpSize(SetBorderLerpSize),
    SetBorderSize(SetBorderSize),
}

/// Dispatch key for backend-originated packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaPacketKind {
    JoinGame,
    SpawnEntity,
    DestroyEntities,
    EntityPosition,
    EntityPositionRotation,
    EntityRotation,
    EntityHeadLook,
    EntityTeleport,
    EntityVelocity,
    EntityMetadata,
    SetPassengers,
    SetBorderCenter,
    SetBorderLerpSize,
    SetBorderSize,
}

impl JavaPacket {
    pub fn kind(&self) -> JavaPacketKind {
        match self {
            JavaPacket::JoinGame(_) => JavaPacketKind::JoinGame,
            JavaPacket::SpawnEntity(_) => JavaPacketKind::SpawnEntity,
            JavaPacket::DestroyEntities(_) => JavaPacketKind::DestroyEntities,
            JavaPacket::EntityPosition(_) => JavaPacketKind::EntityPosition,
            JavaPacket::EntityPositionRotation(_) => JavaPacketKind::EntityPositionRotation,
            JavaPacket::EntityRotation(_) => JavaPacketKind::EntityRotation,
            JavaPacket::EntityHeadLook(_) => JavaPacketKind::EntityHeadLook,
            JavaPacket::EntityTeleport(_) => JavaPacketKind::EntityTeleport,
            JavaPacket::EntityVelocity(_) => JavaPacketKind::EntityVelocity,
            JavaPacket::EntityMetadata(_) => JavaPacketKind::EntityMetadata,
            JavaPacket::SetPassengers(_) => JavaPacketKind::SetPassengers,
            JavaPacket::SetBorderCenter(_) => JavaPacketKind::SetBorderCenter,
            JavaPacket::SetBorderLerpSize(_) => JavaPacketKind::SetBorderLerpSize,
            JavaPacket::SetBorderSize(_) => JavaPacketKind::SetBorderSize,
        }
    }

    /// Decode a play-state clientbound packet body.
    ///
    /// Returns `Ok(None)` for packet IDs the proxy does not translate —
    /// those are expected and dropped by the dispatcher, not errors.
    pub fn decode(packet_id: i32, buf: &mut impl Buf) -> Result<Option<JavaPacket>, ProtoError> {
        let packet = match packet_id {
            id::JOIN_GAME => Some(JavaPacket::JoinGame(JoinGame::decode(buf)?)),
            id::SPAWN_LIVING_ENTITY => Some(JavaPacket::SpawnEntity(SpawnEntity::decode(buf)?)),
            id::DESTROY_ENTITIES => {
                Some(JavaPacket::DestroyEntities(DestroyEntities::decode(buf)?))
            }
            id::ENTITY_POSITION => Some(JavaPacket::EntityPosition(EntityPosition::decode(buf)?)),
            id::ENTITY_POSITION_ROTATION => Some(JavaPacket::EntityPositionRotation(
                EntityPositionRotation::decode(buf)?,
            )),
            id::ENTITY_ROTATION => Some(JavaPacket::EntityRotation(EntityRotation::decode(buf)?)),
            id::ENTITY_HEAD_LOOK => Some(JavaPacket::EntityHeadLook(EntityHeadLook::decode(buf)?)),
            id::ENTITY_TELEPORT => Some(JavaPacket::EntityTeleport(EntityTeleport::decode(buf)?)),
            id::ENTITY_VELOCITY => Some(JavaPacket::EntityVelocity(EntityVelocity::decode(buf)?)),
            id::ENTITY_METADATA => Some(JavaPacket::EntityMetadata(EntityMetadata::decode(buf)?)),
            id::SET_PASSENGERS => Some(JavaPacket::SetPassengers(SetPassengers::decode(buf)?)),
            id::SET_BORDER_CENTER => {
                Some(JavaPacket::SetBorderCenter(SetBorderCenter::decode(buf)?))
            }
            id::SET_BORDER_LERP_SIZE => Some(JavaPacket::SetBorderLerpSize(
                SetBorderLerpSize::decode(buf)?,
            )),
            id::SET_BORDER_SIZE => Some(JavaPacket::SetBorderSize(SetBorderSize::decode(buf)?)),
            _ => None,
        };
        Ok(packet)
    }
}
