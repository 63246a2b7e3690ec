//! Text (0x09) — Bidirectional.
//!
//! Chat and system messages. The proxy relays chat between the legs and
//! synthesizes raw messages for its own notices.

use bytes::{Buf, BufMut};

use crate::codec::{read_string, write_string, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Text message category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextType {
    Raw = 0,
    Chat = 1,
    Translation = 2,
}

impl TextType {
    fn from_byte(b: u8) -> Result<Self, ProtoError> {
        match b {
            0 => Ok(TextType::Raw),
            1 => Ok(TextType::Chat),
            2 => Ok(TextType::Translation),
            other => Err(ProtoError::InvalidData(format!(
                "unknown text type: {other}"
            ))),
        }
    }
}

/// Text packet.
#[derive(Debug, Clone)]
pub struct Text {
    pub text_type: TextType,
    pub needs_translation: bool,
    /// Sender name; only present for chat messages.
    pub source_name: Option<String>,
    pub message: String,
}

impl Text {
    pub fn raw(message: impl Into<String>) -> Self {
        Self {
            text_type: TextType::Raw,
            needs_translation: false,
            source_name: None,
            message: message.into(),
        }
    }

    pub fn chat(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text_type: TextType::Chat,
            needs_translation: false,
            source_name: Some(source.into()),
            message: message.into(),
        }
    }
}

impl ProtoEncode for Text {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.text_type as u8);
        buf.put_u8(self.needs_translation as u8);
        if self.text_type == TextType::Chat {
            write_string(buf, self.source_name.as_deref().unwrap_or(""));
        }
        write_string(buf, &self.message);
    }
}

impl ProtoDecode for Text {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 2 {
            return Err(ProtoError::BufferTooShort {
                needed: 2,
                remaining: buf.remaining(),
            });
        }
        let text_type = TextType::from_byte(buf.get_u8())?;
        let needs_translation = buf.get_u8() != 0;
        let source_name = if text_type == TextType::Chat {
            Some(read_string(buf)?)
        } else {
            None
        };
        let message = read_string(buf)?;
        Ok(Text {
            text_type,
            needs_translation,
            source_name,
            message,
        })
    }
}
