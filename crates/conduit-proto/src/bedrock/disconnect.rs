//! Disconnect (0x05) — Proxy → Client.

use bytes::BufMut;

use crate::codec::{self, ProtoEncode};

/// Disconnect the client, optionally with a visible reason.
#[derive(Debug, Clone)]
pub struct Disconnect {
    /// If true, the client shows no disconnect screen.
    pub hide_disconnect_screen: bool,
    /// Message shown on the disconnect screen.
    pub message: Option<String>,
}

impl Disconnect {
    /// Create a disconnect with a visible message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            hide_disconnect_screen: false,
            message: Some(message.into()),
        }
    }

    /// Create a silent disconnect (no screen shown).
    pub fn silent() -> Self {
        Self {
            hide_disconnect_screen: true,
            message: None,
        }
    }
}

impl ProtoEncode for Disconnect {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.hide_disconnect_screen as u8);
        if !self.hide_disconnect_screen {
            codec::write_string(buf, self.message.as_deref().unwrap_or(""));
        }
    }
}
