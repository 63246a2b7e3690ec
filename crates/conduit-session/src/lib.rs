//! Per-connection translation core: session state machine, packet
//! dispatch, entity mirror and world-state replication.

pub mod chat;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod registry_ext;
pub mod session;
pub mod sink;
pub mod translators;
pub mod world;
pub mod world_lookup;

pub use dispatch::{ClientTranslator, JavaTranslator, TranslatorRegistry};
pub use error::{SessionError, TranslateError};
pub use registry_ext::{diagnostics, DiagnosticsReport, SessionRegistry};
pub use session::{run_session, CoreConfig, Session, SessionEvent, SessionState};
pub use sink::{BackendSink, ClientSink};
pub use world_lookup::{EmptyWorldLookup, WorldBlockLookup};
