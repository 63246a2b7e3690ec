//! Session-layer errors.
//!
//! `TranslateError` is the per-packet, recoverable kind: the dispatcher
//! logs it and drops that one packet. `SessionError` tears the session
//! down — both legs.

use thiserror::Error;

use conduit_proto::error::ProtoError;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("no mirrored entity for source id {0}")]
    UnknownEntity(i32),

    #[error("unknown entity type {0}")]
    UnknownEntityType(i32),

    #[error("unsupported protocol version {0}")]
    UnsupportedVersion(i32),

    #[error("no mapping tables selected yet")]
    NoMappings,

    #[error("no item mapping for target runtime id {0}")]
    UnknownItem(i32),

    #[error("protocol error: {0}")]
    Proto(#[from] ProtoError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session-fatal during {phase}: {reason}")]
    Fatal { phase: &'static str, reason: String },
}
