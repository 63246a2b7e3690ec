//! World-state replication units owned by a session.

pub mod border;

pub use border::{BorderChange, WorldBorder};
