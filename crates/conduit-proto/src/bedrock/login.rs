//! Login (0x01) — Client → Proxy.
//!
//! Only the fields the translation core needs are decoded: the protocol
//! version (selects the mapping-table snapshot) and the display name.
//! Authentication chain validation belongs to the hosting bootstrap.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Login request.
#[derive(Debug, Clone)]
pub struct Login {
    pub protocol_version: i32,
    pub username: String,
}

impl ProtoEncode for Login {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_i32(self.protocol_version);
        write_string(buf, &self.username);
    }
}

impl ProtoDecode for Login {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 4 {
            return Err(ProtoError::BufferTooShort {
                needed: 4,
                remaining: buf.remaining(),
            });
        }
        // Big-endian, unlike the rest of the protocol.
        let protocol_version = buf.get_i32();
        let username = read_string(buf)?;
        Ok(Login {
            protocol_version,
            username,
        })
    }
}
