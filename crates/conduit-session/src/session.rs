//! The per-connection session: owned state plus the single-worker event
//! loop that serializes all translator work for one client.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use conduit_mappings::{MappingRegistry, VersionMappings};
use conduit_proto::bedrock::level_event::event;
use conduit_proto::bedrock::{BedrockPacket, ClientPacket, Disconnect, LevelEvent};
use conduit_proto::java::JavaPacket;
use conduit_proto::types::Vec3;

use crate::dispatch::TranslatorRegistry;
use crate::error::{SessionError, TranslateError};
use crate::sink::{BackendSink, ClientSink};
use crate::world::{BorderChange, WorldBorder};
use crate::world_lookup::WorldBlockLookup;
use crate::entity::EntityCache;

/// Process-wide translation configuration handed down by the bootstrap.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub extended_world_height: bool,
    pub add_non_native_items: bool,
    pub debug_mode: bool,
    pub default_locale: String,
    pub backend_address: String,
    pub backend_port: u16,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            extended_world_height: false,
            add_non_native_items: true,
            debug_mode: false,
            default_locale: "en_us".into(),
            backend_address: "127.0.0.1".into(),
            backend_port: 25565,
        }
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the client's login (version negotiation).
    AwaitingLogin,
    /// Logged in; waiting for the backend's join confirmation.
    AwaitingJoin,
    Active,
    /// Terminal. No further dispatch happens.
    Closed,
}

/// One client ↔ backend bridge.
pub struct Session {
    pub username: String,
    pub state: SessionState,
    pub locale: String,
    /// The client's own entity ID on the backend, known after join.
    pub own_entity_id: Option<i32>,
    pub entities: EntityCache,
    pub border: WorldBorder,
    mappings: Option<VersionMappings>,
    registry: Arc<MappingRegistry>,
    pub config: Arc<CoreConfig>,
    pub world: Arc<dyn WorldBlockLookup>,
    client: ClientSink,
    backend: BackendSink,
}

impl Session {
    pub fn new(
        registry: Arc<MappingRegistry>,
        config: Arc<CoreConfig>,
        world: Arc<dyn WorldBlockLookup>,
        client: ClientSink,
        backend: BackendSink,
    ) -> Self {
        Self {
            username: String::new(),
            state: SessionState::AwaitingLogin,
            locale: config.default_locale.clone(),
            own_entity_id: None,
            entities: EntityCache::new(),
            border: WorldBorder::default(),
            mappings: None,
            registry,
            config,
            world,
            client,
            backend,
        }
    }

    pub fn client(&self) -> &ClientSink {
        &self.client
    }

    pub fn backend(&self) -> &BackendSink {
        &self.backend
    }

    pub fn is_handshaking(&self) -> bool {
        matches!(
            self.state,
            SessionState::AwaitingLogin | SessionState::AwaitingJoin
        )
    }

    /// Pin this session to the mapping snapshot for the client's protocol
    /// version. Unsupported versions are session-fatal.
    pub fn select_version(&mut self, protocol_version: i32) -> Result<(), TranslateError> {
        let tables = self
            .registry
            .for_version(protocol_version)
            .ok_or(TranslateError::UnsupportedVersion(protocol_version))?;
        self.mappings = Some(tables.clone());
        Ok(())
    }

    /// The selected mapping snapshot; an error before version negotiation.
    pub fn mappings(&self) -> Result<&VersionMappings, TranslateError> {
        self.mappings.as_ref().ok_or(TranslateError::NoMappings)
    }

    /// Disconnect the client with a visible reason and close the session.
    pub fn disconnect(&mut self, reason: &str) {
        info!(session = %self.username, reason, "disconnecting session");
        self.client
            .send(BedrockPacket::Disconnect(Disconnect::with_message(reason)));
        self.state = SessionState::Closed;
    }

    /// Periodic update step; currently drives border replication.
    pub fn tick(&mut self, now: Instant) {
        if let Some(change) = self.border.update(now) {
            self.emit_border(change);
        }
    }

    /// Border recompute entry point used by the border translators.
    pub fn push_border_update(&mut self, now: Instant) {
        if let Some(change) = self.border.update(now) {
            self.emit_border(change);
        }
    }

    /// The target protocol has no border packet; draw a particle fence at
    /// the edge midpoints and darken the screen while shrinking.
    fn emit_border(&mut self, change: BorderChange) {
        let radius = (change.diameter / 2.0) as f32;
        let cx = change.center_x as f32;
        let cz = change.center_z as f32;
        const FENCE_PARTICLE: i32 = 28;
        const EDGE_Y: f32 = 64.0;
        for (x, z) in [
            (cx + radius, cz),
            (cx - radius, cz),
            (cx, cz + radius),
            (cx, cz - radius),
        ] {
            self.client.send(BedrockPacket::LevelEvent(LevelEvent {
                event_id: event::ADD_PARTICLE,
                position: Vec3::new(x, EDGE_Y, z),
                data: FENCE_PARTICLE,
            }));
        }
        if change.resizing && self.border.new_diameter < self.border.old_diameter {
            self.client.send(BedrockPacket::LevelEvent(LevelEvent {
                event_id: event::DARKEN_SCREEN,
                position: Vec3::new(cx, EDGE_Y, cz),
                data: 0,
            }));
        }
        debug!(diameter = change.diameter, "border state pushed");
    }
}

/// Everything a session worker reacts to. Both legs feed this stream, so
/// one receiver means one logical worker per session.
#[derive(Debug)]
pub enum SessionEvent {
    Backend(JavaPacket),
    Client(ClientPacket),
    Tick,
    Shutdown,
}

/// Run a session to completion. All translator invocations for this
/// session happen on this task; different sessions run independently.
pub async fn run_session(
    mut session: Session,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    translators: Arc<TranslatorRegistry>,
) -> Session {
    while let Some(event) = events.recv().await {
        let result = match event {
            SessionEvent::Backend(packet) => translators.dispatch_java(&mut session, packet),
            SessionEvent::Client(packet) => translators.dispatch_client(&mut session, packet),
            SessionEvent::Tick => {
                session.tick(Instant::now());
                Ok(())
            }
            SessionEvent::Shutdown => break,
        };
        if let Err(SessionError::Fatal { phase, reason }) = result {
            session.disconnect(&format!("{phase} failed: {reason}"));
        }
        if session.state == SessionState::Closed {
            break;
        }
    }
    info!(session = %session.username, entities = session.entities.len(), "session ended");
    session
}

/// Builders for session unit tests.
#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::world_lookup::EmptyWorldLookup;
    use conduit_mappings::MappingsConfig;
    use tokio::sync::mpsc::UnboundedReceiver;

    /// A session in `Active` state with real mapping tables and a capturing
    /// client sink.
    pub fn active_session() -> (Session, UnboundedReceiver<BedrockPacket>) {
        let (session, client_rx, _backend_rx) = session_pair();
        (session, client_rx)
    }

    pub fn session_pair() -> (
        Session,
        UnboundedReceiver<BedrockPacket>,
        UnboundedReceiver<bytes::Bytes>,
    ) {
        let registry = Arc::new(
            MappingRegistry::load(&MappingsConfig::default()).expect("bundled data must build"),
        );
        let (client, client_rx) = ClientSink::channel();
        let (backend, backend_rx) = BackendSink::channel();
        let mut session = Session::new(
            registry,
            Arc::new(CoreConfig::default()),
            Arc::new(EmptyWorldLookup),
            client,
            backend,
        );
        session.state = SessionState::Active;
        session
            .select_version(465)
            .expect("bundled version must exist");
        (session, client_rx, backend_rx)
    }
}
