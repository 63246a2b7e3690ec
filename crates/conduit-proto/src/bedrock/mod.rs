//! Client-facing (target) protocol packets.
//!
//! Outbound packets implement [`ProtoEncode`]; the handful the client sends
//! to the proxy implement [`ProtoDecode`] and surface through
//! [`ClientPacket::decode`].

pub mod add_entity;
pub mod disconnect;
pub mod inventory_transaction;
pub mod level_event;
pub mod login;
pub mod metadata;
pub mod move_entity_absolute;
pub mod play_status;
pub mod remove_entity;
pub mod set_entity_data;
pub mod set_entity_motion;
pub mod text;

pub use add_entity::{AddEntity, EntityAttribute};
pub use disconnect::Disconnect;
pub use inventory_transaction::{InventoryTransaction, TransactionUseItem};
pub use level_event::LevelEvent;
pub use login::Login;
pub use metadata::{encode_entity_metadata, data_key, EntityMetadataEntry, MetadataValue};
pub use move_entity_absolute::MoveEntityAbsolute;
pub use play_status::{PlayStatus, PlayStatusType};
pub use remove_entity::RemoveEntity;
pub use set_entity_data::SetEntityData;
pub use set_entity_motion::SetEntityMotion;
pub use text::Text;

use bytes::{Buf, Bytes, BytesMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::VarUInt32;

/// Packet IDs for the target protocol.
pub mod id {
    pub const LOGIN: u32 = 0x01;
    pub const PLAY_STATUS: u32 = 0x02;
    pub const DISCONNECT: u32 = 0x05;
    pub const TEXT: u32 = 0x09;
    pub const ADD_ENTITY: u32 = 0x0D;
    pub const REMOVE_ENTITY: u32 = 0x0E;
    pub const MOVE_ENTITY_ABSOLUTE: u32 = 0x12;
    pub const LEVEL_EVENT: u32 = 0x19;
    pub const INVENTORY_TRANSACTION: u32 = 0x1E;
    pub const SET_ENTITY_DATA: u32 = 0x27;
    pub const SET_ENTITY_MOTION: u32 = 0x28;
}

/// Union of packets the proxy sends to the client.
#[derive(Debug, Clone)]
pub enum BedrockPacket {
    PlayStatus(PlayStatus),
    Disconnect(Disconnect),
    Text(Text),
    AddEntity(AddEntity),
    RemoveEntity(RemoveEntity),
    MoveEntityAbsolute(MoveEntityAbsolute),
    LevelEvent(LevelEvent),
    SetEntityData(SetEntityData),
    SetEntityMotion(SetEntityMotion),
}

impl BedrockPacket {
    pub fn id(&self) -> u32 {
        match self {
            BedrockPacket::PlayStatus(_) => id::PLAY_STATUS,
            BedrockPacket::Disconnect(_) => id::DISCONNECT,
            BedrockPacket::Text(_) => id::TEXT,
            BedrockPacket::AddEntity(_) => id::ADD_ENTITY,
            BedrockPacket::RemoveEntity(_) => id::REMOVE_ENTITY,
            BedrockPacket::MoveEntityAbsolute(_) => id::MOVE_ENTITY_ABSOLUTE,
            BedrockPacket::LevelEvent(_) => id::LEVEL_EVENT,
            BedrockPacket::SetEntityData(_) => id::SET_ENTITY_DATA,
            BedrockPacket::SetEntityMotion(_) => id::SET_ENTITY_MOTION,
        }
    }

    /// Encode as `VarUInt32(id) + body`, ready for the client-leg framer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        VarUInt32(self.id()).proto_encode(&mut buf);
        match self {
            BedrockPacket::PlayStatus(p) => p.proto_encode(&mut buf),
            BedrockPacket::Disconnect(p) => p.proto_encode(&mut buf),
            BedrockPacket::Text(p) => p.proto_encode(&mut buf),
            BedrockPacket::AddEntity(p) => p.proto_encode(&mut buf),
            BedrockPacket::RemoveEntity(p) => p.proto_encode(&mut buf),
            BedrockPacket::MoveEntityAbsolute(p) => p.proto_encode(&mut buf),
            BedrockPacket::LevelEvent(p) => p.proto_encode(&mut buf),
            BedrockPacket::SetEntityData(p) => p.proto_encode(&mut buf),
            BedrockPacket::SetEntityMotion(p) => p.proto_encode(&mut buf),
        }
        buf.freeze()
    }
}

/// Union of packets the client sends to the proxy.
#[derive(Debug, Clone)]
pub enum ClientPacket {
    Login(Login),
    Text(Text),
    InventoryTransaction(InventoryTransaction),
}

/// Dispatch key for client-originated packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientPacketKind {
    Login,
    Text,
    InventoryTransaction,
}

impl ClientPacket {
    pub fn kind(&self) -> ClientPacketKind {
        match self {
            ClientPacket::Login(_) => ClientPacketKind::Login,
            ClientPacket::Text(_) => ClientPacketKind::Text,
            ClientPacket::InventoryTransaction(_) => ClientPacketKind::InventoryTransaction,
        }
    }

    /// Decode a framed client packet (`VarUInt32(id) + body`).
    ///
    /// Returns `Ok(None)` for packet kinds the proxy has no interest in.
    pub fn decode(payload: &mut impl Buf) -> Result<Option<ClientPacket>, ProtoError> {
        let id = VarUInt32::proto_decode(payload)?.0;
        let packet = match id {
            id::LOGIN => Some(ClientPacket::Login(Login::proto_decode(payload)?)),
            id::TEXT => Some(ClientPacket::Text(Text::proto_decode(payload)?)),
            id::INVENTORY_TRANSACTION => Some(ClientPacket::InventoryTransaction(
                InventoryTransaction::proto_decode(payload)?,
            )),
            _ => None,
        };
        Ok(packet)
    }
}
