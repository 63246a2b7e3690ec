//! Per-version block mappings: source runtime IDs to target runtime IDs,
//! plus the target block-state palette used for disambiguation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MappingError;

/// A single block-state property value.
///
/// The palette files carry ints, bools and strings; equality is what the
/// disambiguation algorithm cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Int(i64),
    Bool(bool),
    Str(String),
}

/// One entry of the target block-state palette. Its index in the palette
/// is the block runtime ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStateEntry {
    pub name: String,
    #[serde(default)]
    pub states: BTreeMap<String, StateValue>,
}

#[derive(Deserialize)]
struct RawBlockMappings {
    java_to_bedrock: Vec<i32>,
    palette: Vec<BlockStateEntry>,
}

/// Immutable block mapping table for one target-protocol version.
#[derive(Debug)]
pub struct BlockMappings {
    pub protocol_version: i32,
    java_to_bedrock: Vec<i32>,
    palette: Vec<BlockStateEntry>,
}

impl BlockMappings {
    /// Build from a bundled `block_mappings.<ver>.json` payload.
    pub fn from_json(
        protocol_version: i32,
        file: &'static str,
        json: &str,
    ) -> Result<Self, MappingError> {
        let raw: RawBlockMappings =
            serde_json::from_str(json).map_err(|source| MappingError::InvalidData { file, source })?;
        Ok(Self {
            protocol_version,
            java_to_bedrock: raw.java_to_bedrock,
            palette: raw.palette,
        })
    }

    /// Target block runtime ID for a source block runtime ID.
    pub fn bedrock_block_id(&self, java_runtime_id: i32) -> Result<i32, MappingError> {
        self.java_to_bedrock
            .get(java_runtime_id as usize)
            .copied()
            .ok_or(MappingError::BlockIdOutOfRange {
                id: java_runtime_id,
                len: self.java_to_bedrock.len(),
            })
    }

    /// Palette entry for a target block runtime ID.
    pub fn state(&self, bedrock_runtime_id: i32) -> Result<&BlockStateEntry, MappingError> {
        self.palette
            .get(bedrock_runtime_id as usize)
            .ok_or(MappingError::BlockStateOutOfRange {
                id: bedrock_runtime_id,
                len: self.palette.len(),
            })
    }

    /// The full target block-state palette, indexed by runtime ID.
    pub fn palette(&self) -> &[BlockStateEntry] {
        &self.palette
    }
}
