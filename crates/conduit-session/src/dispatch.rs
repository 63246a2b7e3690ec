//! Packet-translation dispatch.
//!
//! One stateless translator per packet kind, registered once at startup.
//! Unregistered kinds are expected traffic and dropped at debug level. A
//! translator failure drops that single packet — unless the session is
//! still handshaking, where any failure is fatal.

use std::collections::HashMap;

use tracing::{debug, warn};

use conduit_proto::bedrock::{ClientPacket, ClientPacketKind};
use conduit_proto::java::{JavaPacket, JavaPacketKind};

use crate::error::{SessionError, TranslateError};
use crate::session::Session;
use crate::translators;

/// Backend → client translator.
pub trait JavaTranslator: Send + Sync {
    fn translate(&self, session: &mut Session, packet: &JavaPacket)
        -> Result<(), TranslateError>;
}

/// Client → backend translator.
pub trait ClientTranslator: Send + Sync {
    fn translate(
        &self,
        session: &mut Session,
        packet: &ClientPacket,
    ) -> Result<(), TranslateError>;
}

/// The two independent translator tables of a proxy build.
pub struct TranslatorRegistry {
    java: HashMap<JavaPacketKind, Box<dyn JavaTranslator>>,
    client: HashMap<ClientPacketKind, Box<dyn ClientTranslator>>,
}

impl TranslatorRegistry {
    pub fn empty() -> Self {
        Self {
            java: HashMap::new(),
            client: HashMap::new(),
        }
    }

    /// The full translator set shipped with the proxy.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        translators::register_defaults(&mut registry);
        registry
    }

    pub fn register_java(&mut self, kind: JavaPacketKind, translator: Box<dyn JavaTranslator>) {
        self.java.insert(kind, translator);
    }

    pub fn register_client(
        &mut self,
        kind: ClientPacketKind,
        translator: Box<dyn ClientTranslator>,
    ) {
        self.client.insert(kind, translator);
    }

    /// Dispatch one backend-originated packet.
    pub fn dispatch_java(
        &self,
        session: &mut Session,
        packet: JavaPacket,
    ) -> Result<(), SessionError> {
        let kind = packet.kind();
        let Some(translator) = self.java.get(&kind) else {
            debug!(?kind, "no translator registered; dropping backend packet");
            return Ok(());
        };
        if let Err(error) = translator.translate(session, &packet) {
            if session.is_handshaking() {
                return Err(SessionError::Fatal {
                    phase: "handshake",
                    reason: error.to_string(),
                });
            }
            warn!(?kind, %error, "translator failed; dropping packet");
        }
        Ok(())
    }

    /// Dispatch one client-originated packet.
    pub fn dispatch_client(
        &self,
        session: &mut Session,
        packet: ClientPacket,
    ) -> Result<(), SessionError> {
        let kind = packet.kind();
        let Some(translator) = self.client.get(&kind) else {
            debug!(?kind, "no translator registered; dropping client packet");
            return Ok(());
        };
        if let Err(error) = translator.translate(session, &packet) {
            if session.is_handshaking() {
                return Err(SessionError::Fatal {
                    phase: "login",
                    reason: error.to_string(),
                });
            }
            warn!(?kind, %error, "translator failed; dropping packet");
        }
        Ok(())
    }
}
