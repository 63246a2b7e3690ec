//! Cross-protocol registry layer.
//!
//! Built once, synchronously, before any session is accepted; the result is
//! immutable and shared read-only by every session. Construction failure is
//! fatal to startup — a session must never run against a partial table.

pub mod block;
pub mod entity_type;
pub mod error;
pub mod item;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

pub use block::{BlockMappings, BlockStateEntry, StateValue};
pub use entity_type::EntityKind;
pub use error::MappingError;
pub use item::{
    CreativeItem, CustomItemEntry, ItemEntry, ItemMapping, ItemMappings, PaletteVersion,
    PALETTE_VERSIONS,
};

/// Translation toggles handed down from the bootstrap.
#[derive(Debug, Clone, Copy)]
pub struct MappingsConfig {
    pub extended_world_height: bool,
    pub add_non_native_items: bool,
}

impl Default for MappingsConfig {
    fn default() -> Self {
        Self {
            extended_world_height: false,
            add_non_native_items: true,
        }
    }
}

/// The item and block tables for one target-protocol version.
#[derive(Clone)]
pub struct VersionMappings {
    pub items: Arc<ItemMappings>,
    pub blocks: Arc<BlockMappings>,
}

/// All supported versions, keyed by target protocol number.
pub struct MappingRegistry {
    versions: BTreeMap<i32, VersionMappings>,
}

impl MappingRegistry {
    /// Build every version's tables from the bundled data.
    pub fn load(config: &MappingsConfig) -> Result<Self, MappingError> {
        let items_json = include_str!("data/items.json");
        let mut versions = BTreeMap::new();
        for palette in PALETTE_VERSIONS {
            let blocks = Arc::new(BlockMappings::from_json(
                palette.protocol_version,
                "block_mappings",
                block_mappings_json(palette.data_name),
            )?);
            let items = Arc::new(item::populate(
                palette,
                &blocks,
                config,
                items_json,
                runtime_item_states_json(palette.data_name),
                creative_items_json(palette.data_name),
            )?);
            info!(
                version = palette.protocol_version,
                items = items.len(),
                creative = items.creative_items.len(),
                "built item mappings"
            );
            versions.insert(
                palette.protocol_version,
                VersionMappings { items, blocks },
            );
        }
        Ok(Self { versions })
    }

    /// Tables for a client's protocol version, if supported.
    pub fn for_version(&self, protocol_version: i32) -> Option<&VersionMappings> {
        self.versions.get(&protocol_version)
    }

    pub fn supported_versions(&self) -> impl Iterator<Item = i32> + '_ {
        self.versions.keys().copied()
    }
}

fn runtime_item_states_json(data_name: &str) -> &'static str {
    match data_name {
        "1_17_30" => include_str!("data/runtime_item_states.1_17_30.json"),
        "1_17_40" => include_str!("data/runtime_item_states.1_17_40.json"),
        other => unreachable!("no bundled item palette for {other}"),
    }
}

fn creative_items_json(data_name: &str) -> &'static str {
    match data_name {
        "1_17_30" => include_str!("data/creative_items.1_17_30.json"),
        "1_17_40" => include_str!("data/creative_items.1_17_40.json"),
        other => unreachable!("no bundled creative items for {other}"),
    }
}

fn block_mappings_json(data_name: &str) -> &'static str {
    match data_name {
        "1_17_30" => include_str!("data/block_mappings.1_17_30.json"),
        "1_17_40" => include_str!("data/block_mappings.1_17_40.json"),
        other => unreachable!("no bundled block mappings for {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MappingRegistry {
        MappingRegistry::load(&MappingsConfig::default()).expect("bundled data must build")
    }

    #[test]
    fn builds_all_versions() {
        let reg = registry();
        assert_eq!(reg.supported_versions().collect::<Vec<_>>(), vec![465, 471]);
    }

    #[test]
    fn every_row_has_resolvable_target_id(){
        let reg = registry();
        for version in reg.supported_versions().collect::<Vec<_>>() {
            let tables = reg.for_version(version).unwrap();
            for mapping in tables.items.iter() {
                assert!(
                    tables
                        .items
                        .item_entries
                        .values()
                        .any(|e| e.numeric_id == mapping.bedrock_id),
                    "{} (version {version}) has unresolvable target id {}",
                    mapping.java_identifier,
                    mapping.bedrock_id
                );
            }
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let config = MappingsConfig::default();
        let a = MappingRegistry::load(&config).unwrap();
        let b = MappingRegistry::load(&config).unwrap();
        for version in a.supported_versions().collect::<Vec<_>>() {
            let left = serde_json::to_string(&*a.for_version(version).unwrap().items).unwrap();
            let right = serde_json::to_string(&*b.for_version(version).unwrap().items).unwrap();
            assert_eq!(left, right, "version {version} tables differ between builds");
        }
    }

    #[test]
    fn categorical_lists_preserve_order_without_duplicates() {
        let reg = registry();
        let items = &reg.for_version(465).unwrap().items;
        // Discovery order follows the source table: oak, spruce, birch.
        assert_eq!(items.boat_ids.len(), 3);
        assert_eq!(items.bucket_ids.len(), 3); // milk excluded
        assert_eq!(items.spawn_egg_ids.len(), 3);
        assert_eq!(items.carpets.len(), 2); // moss excluded
        for ids in [&items.boat_ids, &items.bucket_ids, &items.spawn_egg_ids] {
            let mut seen = std::collections::HashSet::new();
            assert!(ids.iter().all(|id| seen.insert(*id)), "duplicate target id");
        }
    }

    #[test]
    fn blacklisted_wool_resolves_canonical_color_states() {
        let reg = registry();
        let tables = reg.for_version(465).unwrap();
        let white = tables
            .items
            .mapping_by_identifier("minecraft:white_wool")
            .unwrap();
        let red = tables
            .items
            .mapping_by_identifier("minecraft:red_wool")
            .unwrap();
        assert_ne!(white.bedrock_block_id, red.bedrock_block_id);
        let white_state = tables.blocks.state(white.bedrock_block_id).unwrap();
        assert_eq!(white_state.name, "minecraft:wool");
        assert_eq!(
            white_state.states.get("color"),
            Some(&StateValue::Str("white".into()))
        );
        let red_state = tables.blocks.state(red.bedrock_block_id).unwrap();
        assert_eq!(
            red_state.states.get("color"),
            Some(&StateValue::Str("red".into()))
        );
    }

    #[test]
    fn slab_resolution_drops_half_and_repatches_creative() {
        let reg = registry();
        let tables = reg.for_version(465).unwrap();
        let slab = tables
            .items
            .mapping_by_identifier("minecraft:oak_slab")
            .unwrap();
        // The canonical slab state is the first palette entry named
        // wooden_slab; which half it is does not identify the item.
        let state = tables.blocks.state(slab.bedrock_block_id).unwrap();
        assert_eq!(state.name, "minecraft:wooden_slab");
        // The creative entry for the slab was rewritten to the resolved id.
        let creative = tables
            .items
            .creative_items
            .iter()
            .find(|c| c.bedrock_id == slab.bedrock_id)
            .unwrap();
        assert_eq!(creative.block_runtime_id, slab.bedrock_block_id);
    }

    #[test]
    fn java_only_rows_carry_translation_strings() {
        let reg = registry();
        let items = &reg.for_version(465).unwrap().items;
        let stick = items
            .mapping_by_identifier("minecraft:debug_stick")
            .unwrap();
        assert_eq!(
            stick.translation_string.as_deref(),
            Some("item.minecraft.debug_stick")
        );
        // Substituted below 1_17_40 only: the glow frame is backed by the
        // plain frame row on 465 and native on 471.
        let glow_465 = items
            .mapping_by_identifier("minecraft:glow_item_frame")
            .unwrap();
        assert!(glow_465.translation_string.is_some());
        let items_471 = &reg.for_version(471).unwrap().items;
        let glow_471 = items_471
            .mapping_by_identifier("minecraft:glow_item_frame")
            .unwrap();
        assert!(glow_471.translation_string.is_none());
        assert_ne!(glow_465.bedrock_identifier, glow_471.bedrock_identifier);
    }

    #[test]
    fn synthesized_furnace_minecart_sits_past_native_range() {
        let reg = registry();
        let items = &reg.for_version(465).unwrap().items;
        let cart = items
            .mapping_by_identifier("conduit:furnace_minecart")
            .unwrap();
        let max_native = items
            .item_entries
            .values()
            .filter(|e| !e.component_based)
            .map(|e| e.numeric_id)
            .max()
            .unwrap();
        assert!(cart.bedrock_id > max_native);
        // Injected into both the palette and the creative list.
        assert!(items.item_entries.contains_key("conduit:furnace_minecart"));
        assert!(items
            .creative_items
            .iter()
            .any(|c| c.bedrock_id == cart.bedrock_id));
        assert_eq!(items.custom_items.len(), 1);
    }

    #[test]
    fn furnace_minecart_disabled_becomes_java_only() {
        let config = MappingsConfig {
            extended_world_height: false,
            add_non_native_items: false,
        };
        let reg = MappingRegistry::load(&config).unwrap();
        let items = &reg.for_version(465).unwrap().items;
        let cart = items
            .mapping_by_identifier("minecraft:furnace_minecart")
            .unwrap();
        assert!(cart.translation_string.is_some());
        assert!(items.custom_items.is_empty());
        assert_eq!(cart.bedrock_identifier, "minecraft:minecart");
    }

    #[test]
    fn creative_net_ids_are_sequential_and_unique() {
        let reg = registry();
        let items = &reg.for_version(465).unwrap().items;
        for (index, item) in items.creative_items.iter().enumerate() {
            assert_eq!(item.net_id, index as i32 + 1);
        }
    }

    #[test]
    fn reverse_lookup_prefers_damage_match() {
        let reg = registry();
        let items = &reg.for_version(465).unwrap().items;
        let white = items.mapping_by_identifier("minecraft:white_wool").unwrap();
        let red = items.mapping_by_identifier("minecraft:red_wool").unwrap();
        assert_eq!(white.bedrock_id, red.bedrock_id);
        let resolved = items
            .mapping_by_bedrock(red.bedrock_id, red.bedrock_data)
            .unwrap();
        assert_eq!(resolved.java_identifier, "minecraft:red_wool");
    }
}
