//! Backend join confirmation: finishes the session handshake.

use tracing::debug;

use conduit_proto::java::JavaPacket;

use crate::dispatch::JavaTranslator;
use crate::error::TranslateError;
use crate::session::{Session, SessionState};

pub struct JoinGameTranslator;

impl JavaTranslator for JoinGameTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::JoinGame(join) = packet else {
            return Ok(());
        };
        // The mapping snapshot must already be pinned; a join without a
        // completed login is a handshake failure.
        session.mappings()?;
        session.own_entity_id = Some(join.entity_id);
        session.state = SessionState::Active;
        debug!(
            session = %session.username,
            entity_id = join.entity_id,
            gamemode = join.gamemode,
            "backend join complete"
        );
        Ok(())
    }
}
