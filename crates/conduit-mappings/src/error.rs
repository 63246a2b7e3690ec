//! Mapping-table construction errors.
//!
//! Every variant is fatal: a table that cannot be built completely and
//! consistently must abort startup before any session is accepted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("invalid bundled data in {file}: {source}")]
    InvalidData {
        file: &'static str,
        source: serde_json::Error,
    },

    #[error("missing target item palette entry for {identifier} (version {version})")]
    MissingPaletteEntry { identifier: String, version: i32 },

    #[error("creative item {identifier} not present in the item palette (version {version})")]
    UnknownCreativeItem { identifier: String, version: i32 },

    #[error("could not find a block state match for {identifier} (version {version})")]
    NoBlockMatch { identifier: String, version: i32 },

    #[error("well-known item {identifier} missing from the item palette (version {version})")]
    MissingWellKnownItem {
        identifier: &'static str,
        version: i32,
    },

    #[error("source block runtime id {id} outside mapping table (len {len})")]
    BlockIdOutOfRange { id: i32, len: usize },

    #[error("target block runtime id {id} outside palette (len {len})")]
    BlockStateOutOfRange { id: i32, len: usize },

    #[error("invalid base64 payload on creative item {identifier}: {reason}")]
    InvalidNbtPayload { identifier: String, reason: String },
}
