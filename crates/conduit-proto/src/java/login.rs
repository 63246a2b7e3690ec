//! Login-state packets for the backend leg.
//!
//! The proxy dials the backend, sends Handshake + LoginStart, then handles
//! SetCompression and LoginSuccess before switching the leg to play state.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;

use super::codec::{read_string, read_uuid, read_varint, write_string, write_varint};

/// Serverbound handshake (0x00, handshaking state).
#[derive(Debug, Clone)]
pub struct Handshake {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    /// 1 = status, 2 = login.
    pub next_state: i32,
}

impl Handshake {
    pub fn encode(&self, buf: &mut impl BufMut) {
        write_varint(buf, 0x00);
        write_varint(buf, self.protocol_version);
        write_string(buf, &self.server_address);
        buf.put_u16(self.server_port);
        write_varint(buf, self.next_state);
    }
}

/// Serverbound LoginStart (0x00, login state).
#[derive(Debug, Clone)]
pub struct LoginStart {
    pub username: String,
}

impl LoginStart {
    pub fn encode(&self, buf: &mut impl BufMut) {
        write_varint(buf, 0x00);
        write_string(buf, &self.username);
    }
}

/// Clientbound SetCompression (0x03, login state).
#[derive(Debug, Clone)]
pub struct SetCompression {
    pub threshold: i32,
}

impl SetCompression {
    pub const ID: i32 = 0x03;

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(SetCompression {
            threshold: read_varint(buf)?,
        })
    }
}

/// Clientbound LoginSuccess (0x02, login state).
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub uuid: (u64, u64),
    pub username: String,
}

impl LoginSuccess {
    pub const ID: i32 = 0x02;

    pub fn decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(LoginSuccess {
            uuid: read_uuid(buf)?,
            username: read_string(buf)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn handshake_encodes_login_intent() {
        let mut buf = BytesMut::new();
        Handshake {
            protocol_version: 756,
            server_address: "backend.local".into(),
            server_port: 25565,
            next_state: 2,
        }
        .encode(&mut buf);
        // Packet id 0x00 first, state 2 last.
        assert_eq!(buf[0], 0x00);
        assert_eq!(buf[buf.len() - 1], 0x02);
    }

    #[test]
    fn login_success_roundtrip() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&1u64.to_be_bytes());
        buf.extend_from_slice(&2u64.to_be_bytes());
        write_string(&mut buf, "Steve");
        let pkt = LoginSuccess::decode(&mut buf.freeze()).unwrap();
        assert_eq!(pkt.uuid, (1, 2));
        assert_eq!(pkt.username, "Steve");
    }
}
