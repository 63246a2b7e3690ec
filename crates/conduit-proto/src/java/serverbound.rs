//! Serverbound (proxy → backend) play packets.
//!
//! The client→backend surface is narrow: chat passthrough and item use
//! with the already-remapped source-protocol item index.

use bytes::BufMut;

use super::codec::{write_string, write_varint};

/// Serverbound packet IDs (play state).
pub mod id {
    pub const CHAT_MESSAGE: i32 = 0x03;
    pub const PLAYER_BLOCK_PLACEMENT: i32 = 0x2E;
    pub const USE_ITEM: i32 = 0x2F;
}

/// ChatMessage (0x03).
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub message: String,
}

impl ChatMessage {
    pub fn encode(&self, buf: &mut impl BufMut) {
        write_varint(buf, id::CHAT_MESSAGE);
        write_string(buf, &self.message);
    }
}

/// UseItem (0x2F).
#[derive(Debug, Clone)]
pub struct UseItem {
    /// 0 = main hand, 1 = off hand.
    pub hand: i32,
}

impl UseItem {
    pub fn encode(&self, buf: &mut impl BufMut) {
        write_varint(buf, id::USE_ITEM);
        write_varint(buf, self.hand);
    }
}

/// PlayerBlockPlacement (0x2E).
#[derive(Debug, Clone)]
pub struct BlockPlacement {
    pub hand: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub face: i32,
    pub cursor_x: f32,
    pub cursor_y: f32,
    pub cursor_z: f32,
    pub inside_block: bool,
}

impl BlockPlacement {
    pub fn encode(&self, buf: &mut impl BufMut) {
        write_varint(buf, id::PLAYER_BLOCK_PLACEMENT);
        write_varint(buf, self.hand);
        // Packed position: x(26) | z(26) | y(12).
        let packed = ((self.x as i64 & 0x3FF_FFFF) << 38)
            | ((self.z as i64 & 0x3FF_FFFF) << 12)
            | (self.y as i64 & 0xFFF);
        buf.put_i64(packed);
        write_varint(buf, self.face);
        buf.put_f32(self.cursor_x);
        buf.put_f32(self.cursor_y);
        buf.put_f32(self.cursor_z);
        buf.put_u8(self.inside_block as u8);
    }
}
