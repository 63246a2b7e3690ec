//! Client login: version negotiation and backend handshake.

use bytes::BytesMut;
use tracing::{debug, info};

use conduit_proto::bedrock::{BedrockPacket, ClientPacket, PlayStatus, PlayStatusType};
use conduit_proto::java::{Handshake, LoginStart, PROTOCOL_VERSION};

use crate::dispatch::ClientTranslator;
use crate::error::TranslateError;
use crate::session::{Session, SessionState};

pub struct LoginTranslator;

impl ClientTranslator for LoginTranslator {
    fn translate(&self, session: &mut Session, packet: &ClientPacket) -> Result<(), TranslateError> {
        let ClientPacket::Login(login) = packet else {
            return Ok(());
        };
        if session.state != SessionState::AwaitingLogin {
            debug!("duplicate login ignored");
            return Ok(());
        }

        // Version negotiation: pins the mapping snapshot for the whole
        // session. Unsupported versions are fatal here.
        session.select_version(login.protocol_version)?;
        session.username = login.username.clone();

        session.client().send(BedrockPacket::PlayStatus(PlayStatus {
            status: PlayStatusType::LoginSuccess,
        }));

        // Open the backend side of the bridge.
        let mut handshake = BytesMut::new();
        Handshake {
            protocol_version: PROTOCOL_VERSION,
            server_address: session.config.backend_address.clone(),
            server_port: session.config.backend_port,
            next_state: 2,
        }
        .encode(&mut handshake);
        session.backend().send(handshake.freeze());

        let mut login_start = BytesMut::new();
        LoginStart {
            username: login.username.clone(),
        }
        .encode(&mut login_start);
        session.backend().send(login_start.freeze());

        session.state = SessionState::AwaitingJoin;
        info!(
            session = %session.username,
            version = login.protocol_version,
            "client logged in; dialing backend"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support;
    use conduit_proto::bedrock::Login;

    #[test]
    fn login_negotiates_version_and_dials_backend() {
        let (mut session, mut client_rx, mut backend_rx) = test_support::session_pair();
        session.state = SessionState::AwaitingLogin;
        let packet = ClientPacket::Login(Login {
            protocol_version: 471,
            username: "Alex".into(),
        });
        LoginTranslator.translate(&mut session, &packet).unwrap();
        assert_eq!(session.state, SessionState::AwaitingJoin);
        assert_eq!(session.username, "Alex");
        assert!(session.mappings().is_ok());
        assert!(matches!(
            client_rx.try_recv().unwrap(),
            BedrockPacket::PlayStatus(_)
        ));
        // Handshake then LoginStart queued for the backend leg.
        let handshake = backend_rx.try_recv().unwrap();
        assert_eq!(handshake[0], 0x00);
        assert!(backend_rx.try_recv().is_ok());
    }

    #[test]
    fn unsupported_version_fails_login() {
        let (mut session, _client_rx, _backend_rx) = test_support::session_pair();
        session.state = SessionState::AwaitingLogin;
        let packet = ClientPacket::Login(Login {
            protocol_version: 9999,
            username: "Alex".into(),
        });
        assert!(matches!(
            LoginTranslator.translate(&mut session, &packet),
            Err(TranslateError::UnsupportedVersion(9999))
        ));
    }
}
