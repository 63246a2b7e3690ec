//! Item mapping tables: source-protocol item rows resolved against a
//! target-protocol version's item palette, creative inventory and block
//! palette.
//!
//! Built once at startup, then shared read-only. Any inconsistency in the
//! bundled data is a fatal [`MappingError`] — a partially built table must
//! never serve a session.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{BlockMappings, StateValue};
use crate::error::MappingError;
use crate::MappingsConfig;

const ITEMS_FILE: &str = "items.json";

/// Identifiers that exist on the source protocol only. Their rows get a
/// translation string so a synthesized display name can be rendered.
const JAVA_ONLY_ITEMS: &[&str] = &[
    "minecraft:spectral_arrow",
    "minecraft:debug_stick",
    "minecraft:knowledge_book",
    "minecraft:tipped_arrow",
    "minecraft:trader_llama_spawn_egg",
    "minecraft:bundle",
];

/// A target-protocol version with its bundled data set and the
/// identifier substitutions active below newer versions.
pub struct PaletteVersion {
    pub data_name: &'static str,
    pub protocol_version: i32,
    /// source identifier → source identifier whose row backs it instead.
    pub substitutions: &'static [(&'static str, &'static str)],
}

/// Every version the proxy can speak to a client.
pub const PALETTE_VERSIONS: &[PaletteVersion] = &[
    PaletteVersion {
        data_name: "1_17_30",
        protocol_version: 465,
        // Glow frames render correctly from 1_17_40 onward; below that the
        // plain frame row backs them.
        substitutions: &[("minecraft:glow_item_frame", "minecraft:item_frame")],
    },
    PaletteVersion {
        data_name: "1_17_40",
        protocol_version: 471,
        substitutions: &[],
    },
];

// ---------------------------------------------------------------------------
// Bundled data schemas
// ---------------------------------------------------------------------------

fn default_stack_size() -> u32 {
    64
}

#[derive(Debug, Clone, Deserialize)]
struct RawMappingItem {
    bedrock_identifier: String,
    #[serde(default)]
    bedrock_data: i32,
    #[serde(default)]
    first_block_runtime_id: Option<i32>,
    #[serde(default)]
    last_block_runtime_id: Option<i32>,
    #[serde(default = "default_stack_size")]
    stack_size: u32,
    #[serde(default)]
    tool_type: Option<String>,
    #[serde(default)]
    tool_tier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PaletteItem {
    name: String,
    id: i32,
}

#[derive(Debug, Deserialize)]
struct RawCreativeFile {
    items: Vec<RawCreativeItem>,
}

fn default_count() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawCreativeItem {
    id: String,
    #[serde(default)]
    damage: i32,
    #[serde(default = "default_count")]
    count: i32,
    #[serde(default, rename = "blockRuntimeId")]
    block_runtime_id: i32,
    #[serde(default)]
    nbt_b64: Option<String>,
}

// ---------------------------------------------------------------------------
// Built table types
// ---------------------------------------------------------------------------

/// One row of the built item table.
#[derive(Debug, Clone, Serialize)]
pub struct ItemMapping {
    pub java_identifier: String,
    /// Position-assigned source index; the ID source item-use packets carry.
    pub java_id: i32,
    pub bedrock_identifier: String,
    pub bedrock_id: i32,
    pub bedrock_data: i32,
    /// Target block runtime ID, or -1 for non-block items.
    pub bedrock_block_id: i32,
    pub stack_size: u32,
    pub tool_type: Option<String>,
    pub tool_tier: Option<String>,
    /// Set only for rows with no native target representation.
    pub translation_string: Option<String>,
}

/// Item palette entry advertised to the client at session start.
#[derive(Debug, Clone, Serialize)]
pub struct ItemEntry {
    pub identifier: String,
    pub numeric_id: i32,
    pub component_based: bool,
}

/// A creative inventory row with its per-version network ID.
#[derive(Debug, Clone, Serialize)]
pub struct CreativeItem {
    pub net_id: i32,
    pub identifier: String,
    pub bedrock_id: i32,
    pub damage: i32,
    pub count: i32,
    pub block_runtime_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbt: Option<Vec<u8>>,
}

/// Carpet variant addressed by ordinal index on the source protocol.
#[derive(Debug, Clone, Serialize)]
pub struct CarpetVariant {
    pub bedrock_id: i32,
    pub bedrock_data: i32,
    pub block_runtime_id: i32,
}

/// Music disc row; the source record level event addresses discs by index.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEntry {
    pub java_id: i32,
    pub sound: String,
}

/// A synthesized item injected beyond the native palette range.
#[derive(Debug, Clone, Serialize)]
pub struct CustomItemEntry {
    pub identifier: String,
    pub bedrock_id: i32,
    pub components: serde_json::Value,
}

/// Immutable item mapping table for one target-protocol version.
#[derive(Debug, Serialize)]
pub struct ItemMappings {
    pub protocol_version: i32,
    items: BTreeMap<i32, ItemMapping>,
    by_identifier: BTreeMap<String, i32>,
    pub item_entries: BTreeMap<String, ItemEntry>,
    pub item_names: Vec<String>,
    pub creative_items: Vec<CreativeItem>,
    pub java_only_items: BTreeSet<String>,
    pub boat_ids: Vec<i32>,
    pub bucket_ids: Vec<i32>,
    pub spawn_egg_ids: Vec<i32>,
    pub carpets: Vec<CarpetVariant>,
    pub records: Vec<RecordEntry>,
    pub custom_items: Vec<CustomItemEntry>,
}

impl ItemMappings {
    /// Row by source index.
    pub fn mapping(&self, java_id: i32) -> Option<&ItemMapping> {
        self.items.get(&java_id)
    }

    /// Row by source identifier.
    pub fn mapping_by_identifier(&self, identifier: &str) -> Option<&ItemMapping> {
        self.by_identifier
            .get(identifier)
            .and_then(|id| self.items.get(id))
    }

    /// Reverse resolution for client-originated item references. Prefers an
    /// exact (id, damage) match, falling back to the first id match.
    pub fn mapping_by_bedrock(&self, bedrock_id: i32, bedrock_data: i32) -> Option<&ItemMapping> {
        self.items
            .values()
            .find(|m| m.bedrock_id == bedrock_id && m.bedrock_data == bedrock_data)
            .or_else(|| self.items.values().find(|m| m.bedrock_id == bedrock_id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All rows in source-index order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemMapping> {
        self.items.values()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the item table for one target-protocol version.
pub fn populate(
    version: &PaletteVersion,
    blocks: &BlockMappings,
    config: &MappingsConfig,
    items_json: &str,
    palette_json: &str,
    creative_json: &str,
) -> Result<ItemMappings, MappingError> {
    let proto = version.protocol_version;

    let source_items: serde_json::Map<String, serde_json::Value> = serde_json::from_str(items_json)
        .map_err(|source| MappingError::InvalidData {
            file: ITEMS_FILE,
            source,
        })?;

    // Step 1: native item palette.
    let palette_items: Vec<PaletteItem> =
        serde_json::from_str(palette_json).map_err(|source| MappingError::InvalidData {
            file: "runtime_item_states",
            source,
        })?;
    let mut item_entries: BTreeMap<String, ItemEntry> = BTreeMap::new();
    let mut bedrock_identifier_to_id: HashMap<String, i32> = HashMap::new();
    let mut max_palette_id = 0;
    for entry in &palette_items {
        bedrock_identifier_to_id.insert(entry.name.clone(), entry.id);
        max_palette_id = max_palette_id.max(entry.id);
        item_entries.insert(
            entry.name.clone(),
            ItemEntry {
                identifier: entry.name.clone(),
                numeric_id: entry.id,
                component_based: false,
            },
        );
    }

    // Step 2: creative inventory, collecting block-runtime-ID overrides.
    // An identifier seen twice with different runtime IDs is ambiguous: the
    // override is discarded and the identifier blacklisted, keeping the
    // last-seen runtime ID as a disambiguation seed.
    let raw_creative: RawCreativeFile =
        serde_json::from_str(creative_json).map_err(|source| MappingError::InvalidData {
            file: "creative_items",
            source,
        })?;
    let mut creative_items: Vec<CreativeItem> = Vec::with_capacity(raw_creative.items.len());
    let mut block_id_overrides: HashMap<String, i32> = HashMap::new();
    let mut blacklisted_identifiers: HashMap<String, i32> = HashMap::new();
    let mut net_id = 1;
    for raw in &raw_creative.items {
        if raw.id == "minecraft:sculk_sensor" && !config.extended_world_height {
            continue;
        }
        let bedrock_id = *bedrock_identifier_to_id.get(&raw.id).ok_or_else(|| {
            MappingError::UnknownCreativeItem {
                identifier: raw.id.clone(),
                version: proto,
            }
        })?;
        let nbt = match &raw.nbt_b64 {
            Some(b64) => Some(
                base64::engine::general_purpose::STANDARD
                    .decode(b64)
                    .map_err(|e| MappingError::InvalidNbtPayload {
                        identifier: raw.id.clone(),
                        reason: e.to_string(),
                    })?,
            ),
            None => None,
        };
        creative_items.push(CreativeItem {
            net_id,
            identifier: raw.id.clone(),
            bedrock_id,
            damage: raw.damage,
            count: raw.count,
            block_runtime_id: raw.block_runtime_id,
            nbt,
        });
        net_id += 1;

        if raw.block_runtime_id != 0 && !blacklisted_identifiers.contains_key(&raw.id) {
            if block_id_overrides.remove(&raw.id).is_some() {
                blacklisted_identifiers.insert(raw.id.clone(), raw.block_runtime_id);
            } else {
                block_id_overrides.insert(raw.id.clone(), raw.block_runtime_id);
            }
        }
    }

    // Source-only identifiers for this version.
    let mut java_only_items: BTreeSet<String> =
        JAVA_ONLY_ITEMS.iter().map(|s| s.to_string()).collect();
    if !config.add_non_native_items {
        java_only_items.insert("minecraft:furnace_minecart".into());
    }
    if !config.extended_world_height {
        java_only_items.insert("minecraft:sculk_sensor".into());
    }
    for (from, _) in version.substitutions {
        java_only_items.insert((*from).to_string());
    }

    // Step 3: resolve every source row in file order.
    let mut items: BTreeMap<i32, ItemMapping> = BTreeMap::new();
    let mut by_identifier: BTreeMap<String, i32> = BTreeMap::new();
    let mut item_names: Vec<String> = Vec::with_capacity(source_items.len());
    let mut boat_ids = Vec::new();
    let mut bucket_ids = Vec::new();
    let mut spawn_egg_ids = Vec::new();
    let mut carpets = Vec::new();
    let mut records = Vec::new();

    let mut item_index = 0;
    let mut java_furnace_minecart_id = 0;

    for (java_identifier, raw_value) in &source_items {
        let substituted = version
            .substitutions
            .iter()
            .find(|(from, _)| *from == java_identifier.as_str())
            .map(|(_, to)| *to);
        let row_value = match substituted {
            Some(replacement) => source_items.get(replacement).ok_or_else(|| {
                MappingError::MissingPaletteEntry {
                    identifier: replacement.to_string(),
                    version: proto,
                }
            })?,
            None => raw_value,
        };
        let mapping_item: RawMappingItem = serde_json::from_value(row_value.clone())
            .map_err(|source| MappingError::InvalidData {
                file: ITEMS_FILE,
                source,
            })?;

        if config.add_non_native_items && java_identifier == "minecraft:furnace_minecart" {
            // Handled below as a synthesized item; the source index is
            // still consumed so later rows keep their positions.
            java_furnace_minecart_id = item_index;
            item_index += 1;
            continue;
        }

        let bedrock_id = *bedrock_identifier_to_id
            .get(&mapping_item.bedrock_identifier)
            .ok_or_else(|| MappingError::MissingPaletteEntry {
                identifier: mapping_item.bedrock_identifier.clone(),
                version: proto,
            })?;

        let mut bedrock_block_id = -1;
        if let Some(first_block_id) = mapping_item.first_block_runtime_id {
            if let Some(&override_id) = block_id_overrides.get(&mapping_item.bedrock_identifier) {
                // A single creative entry pins the exact runtime ID.
                bedrock_block_id = override_id;
            } else {
                match blacklisted_identifiers.get(&mapping_item.bedrock_identifier) {
                    None => {
                        bedrock_block_id = blocks.bedrock_block_id(first_block_id)?;
                    }
                    Some(&seed_block_id) => {
                        let last_block_id =
                            mapping_item.last_block_runtime_id.unwrap_or(first_block_id);
                        let (seed_name, direct, required) = required_state_subset(
                            blocks,
                            seed_block_id,
                            first_block_id,
                            last_block_id,
                        )?;
                        bedrock_block_id = match direct {
                            Some(id) => id,
                            None => find_canonical_state(blocks, &seed_name, &required)
                                .ok_or_else(|| MappingError::NoBlockMatch {
                                    identifier: java_identifier.clone(),
                                    version: proto,
                                })?,
                        };
                        // Step 5: keep the creative entry consistent with
                        // the resolved runtime ID.
                        patch_creative_blocks(
                            &mut creative_items,
                            blocks,
                            bedrock_id,
                            &required,
                            bedrock_block_id,
                        )?;
                    }
                }
            }
        }

        let translation_string = if java_only_items.contains(java_identifier) {
            let prefix = if bedrock_block_id != -1 { "block." } else { "item." };
            debug!("{java_identifier} has no native target item; synthesizing its name");
            Some(format!("{prefix}{}", java_identifier.replace(':', ".")))
        } else {
            None
        };

        let mapping = ItemMapping {
            java_identifier: java_identifier.clone(),
            java_id: item_index,
            bedrock_identifier: mapping_item.bedrock_identifier.clone(),
            bedrock_id,
            bedrock_data: mapping_item.bedrock_data,
            bedrock_block_id,
            stack_size: mapping_item.stack_size,
            tool_type: mapping_item.tool_type.clone(),
            tool_tier: mapping_item.tool_tier.clone(),
            translation_string,
        };

        // Step 6: categorical lists in discovery order; ordinal indexes on
        // the source protocol address these directly.
        if java_identifier.contains("boat") {
            boat_ids.push(bedrock_id);
        } else if java_identifier.contains("bucket") && !java_identifier.contains("milk") {
            bucket_ids.push(bedrock_id);
        } else if java_identifier.contains("_carpet") && !java_identifier.contains("moss") {
            carpets.push(CarpetVariant {
                bedrock_id: mapping.bedrock_id,
                bedrock_data: mapping.bedrock_data,
                block_runtime_id: mapping.bedrock_block_id,
            });
        } else if let Some(disc) = java_identifier.strip_prefix("minecraft:music_disc_") {
            records.push(RecordEntry {
                java_id: item_index,
                sound: format!("record.{disc}"),
            });
        } else if java_identifier.ends_with("_spawn_egg") {
            spawn_egg_ids.push(bedrock_id);
        }

        items.insert(item_index, mapping);
        by_identifier.insert(java_identifier.clone(), item_index);
        item_names.push(java_identifier.clone());
        item_index += 1;
    }

    if config.add_non_native_items {
        item_names.push("minecraft:furnace_minecart".into());
    }

    // Step 7a: the lodestone compass exists only on the target side but is
    // needed for reverse item conversion.
    let lodestone_id = bedrock_identifier_to_id
        .get("minecraft:lodestone_compass")
        .copied()
        .ok_or(MappingError::MissingWellKnownItem {
            identifier: "minecraft:lodestone_compass",
            version: proto,
        })?;
    let lodestone = ItemMapping {
        java_identifier: "minecraft:lodestone_compass".into(),
        java_id: item_index,
        bedrock_identifier: "minecraft:lodestone_compass".into(),
        bedrock_id: lodestone_id,
        bedrock_data: 0,
        bedrock_block_id: -1,
        stack_size: 1,
        tool_type: None,
        tool_tier: None,
        translation_string: None,
    };
    by_identifier.insert(lodestone.java_identifier.clone(), item_index);
    items.insert(item_index, lodestone);

    // Step 7b: synthesized furnace minecart past the native palette range.
    let mut custom_items = Vec::new();
    if config.add_non_native_items {
        let custom_id = max_palette_id + 1;
        item_entries.insert(
            "conduit:furnace_minecart".into(),
            ItemEntry {
                identifier: "conduit:furnace_minecart".into(),
                numeric_id: custom_id,
                component_based: true,
            },
        );
        items.insert(
            java_furnace_minecart_id,
            ItemMapping {
                java_identifier: "conduit:furnace_minecart".into(),
                java_id: java_furnace_minecart_id,
                bedrock_identifier: "conduit:furnace_minecart".into(),
                bedrock_id: custom_id,
                bedrock_data: 0,
                bedrock_block_id: -1,
                stack_size: 1,
                tool_type: None,
                tool_tier: None,
                translation_string: None,
            },
        );
        by_identifier.insert("conduit:furnace_minecart".into(), java_furnace_minecart_id);
        creative_items.push(CreativeItem {
            net_id,
            identifier: "conduit:furnace_minecart".into(),
            bedrock_id: custom_id,
            damage: 0,
            count: 1,
            block_runtime_id: 0,
            nbt: None,
        });
        custom_items.push(CustomItemEntry {
            identifier: "conduit:furnace_minecart".into(),
            bedrock_id: custom_id,
            components: furnace_minecart_components(custom_id),
        });
    }

    // Step 8: freeze.
    Ok(ItemMappings {
        protocol_version: proto,
        items,
        by_identifier,
        item_entries,
        item_names,
        creative_items,
        java_only_items,
        boat_ids,
        bucket_ids,
        spawn_egg_ids,
        carpets,
        records,
        custom_items,
    })
}

/// Component definition for the synthesized furnace minecart.
fn furnace_minecart_components(custom_id: i32) -> serde_json::Value {
    let use_on = serde_json::json!([{ "tags": "q.any_tag('rail')" }]);
    serde_json::json!({
        "name": "conduit:furnace_minecart",
        "id": custom_id,
        "components": {
            "minecraft:display_name": { "value": "item.minecartFurnace.name" },
            "minecraft:entity_placer": {
                "entity": "minecraft:minecart",
                "use_on": use_on,
                "dispense_on": use_on,
            },
            "item_properties": {
                "minecraft:icon": {
                    "texture": "minecart_furnace",
                    "frame": "0.000000",
                    "frame_version": 1,
                    "legacy_id": "",
                },
                "allow_off_hand": true,
                "hand_equipped": false,
                "max_stack_size": 1,
                "creative_group": "itemGroup.name.minecart",
                "creative_category": 4,
            },
        },
    })
}

// ---------------------------------------------------------------------------
// Block-state disambiguation (step 4)
// ---------------------------------------------------------------------------

/// Compute the required-state subset for an item whose block form spans
/// `first..=last` source runtime IDs, seeded by a known-good target ID.
///
/// Returns the seed's block name, a directly resolved runtime ID when the
/// first matching state has no properties (nothing to disambiguate), and
/// otherwise the key/value pairs shared by every range member with the
/// seed's name. A key whose value varies across the range is irrelevant to
/// item identity and dropped.
pub fn required_state_subset(
    blocks: &BlockMappings,
    seed_block_id: i32,
    first: i32,
    last: i32,
) -> Result<(String, Option<i32>, BTreeMap<String, StateValue>), MappingError> {
    let seed_name = blocks.state(seed_block_id)?.name.clone();
    let mut required: BTreeMap<String, StateValue> = BTreeMap::new();
    let mut first_pass = true;

    for java_id in first..=last {
        let bedrock_id = blocks.bedrock_block_id(java_id)?;
        let entry = blocks.state(bedrock_id)?;
        if entry.name != seed_name {
            continue;
        }
        if first_pass {
            first_pass = false;
            if entry.states.is_empty() {
                // Only one possible state; no scan needed.
                return Ok((seed_name, Some(bedrock_id), required));
            }
            required = entry.states.clone();
            continue;
        }
        for (key, value) in &entry.states {
            if required.get(key).is_some_and(|existing| existing != value) {
                required.remove(key);
            }
        }
        if required.is_empty() {
            break;
        }
    }

    Ok((seed_name, None, required))
}

/// Scan the target palette for the first entry matching `name` whose
/// states agree on every required key.
pub fn find_canonical_state(
    blocks: &BlockMappings,
    name: &str,
    required: &BTreeMap<String, StateValue>,
) -> Option<i32> {
    blocks
        .palette()
        .iter()
        .position(|entry| {
            entry.name == name
                && required
                    .iter()
                    .all(|(key, value)| entry.states.get(key) == Some(value))
        })
        .map(|index| index as i32)
}

/// Rewrite the creative entry backing a block-ID-overridden item so
/// creative placement and crafting stay consistent with the resolved
/// runtime ID. Entries with a non-zero damage value are left alone.
pub fn patch_creative_blocks(
    creative_items: &mut [CreativeItem],
    blocks: &BlockMappings,
    item_bedrock_id: i32,
    required: &BTreeMap<String, StateValue>,
    resolved_block_id: i32,
) -> Result<(), MappingError> {
    for item in creative_items.iter_mut() {
        if item.bedrock_id != item_bedrock_id {
            continue;
        }
        if item.damage != 0 {
            break;
        }
        let entry = blocks.state(item.block_runtime_id)?;
        let valid = required
            .iter()
            .all(|(key, value)| entry.states.get(key) == Some(value));
        if valid {
            item.block_runtime_id = resolved_block_id;
            break;
        }
    }
    Ok(())
}
