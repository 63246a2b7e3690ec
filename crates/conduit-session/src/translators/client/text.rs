//! Chat passthrough to the backend.

use bytes::BytesMut;
use tracing::debug;

use conduit_proto::bedrock::text::TextType;
use conduit_proto::bedrock::ClientPacket;
use conduit_proto::java::serverbound::ChatMessage;

use crate::dispatch::ClientTranslator;
use crate::error::TranslateError;
use crate::session::{Session, SessionState};

pub struct TextTranslator;

impl ClientTranslator for TextTranslator {
    fn translate(&self, session: &mut Session, packet: &ClientPacket) -> Result<(), TranslateError> {
        let ClientPacket::Text(text) = packet else {
            return Ok(());
        };
        if session.state != SessionState::Active {
            debug!("chat before spawn dropped");
            return Ok(());
        }
        if text.text_type != TextType::Chat {
            return Ok(());
        }
        let mut out = BytesMut::new();
        ChatMessage {
            message: text.message.clone(),
        }
        .encode(&mut out);
        session.backend().send(out.freeze());
        Ok(())
    }
}
