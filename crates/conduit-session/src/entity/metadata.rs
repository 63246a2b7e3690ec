//! Typed target-protocol entity metadata.
//!
//! A `MetadataMap` is the session-side model of everything the client can
//! see about an entity. Keys are ordered so a serialized snapshot is
//! deterministic: identical maps always produce identical wire entries.

use std::collections::BTreeMap;

use conduit_proto::bedrock::metadata::{data_key, EntityMetadataEntry, MetadataValue};

/// Flag bit indices within the packed flags field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EntityFlag {
    OnFire = 0,
    Sneaking = 1,
    Riding = 2,
    Sprinting = 3,
    Invisible = 5,
    CanShowName = 14,
    Silent = 17,
    CanClimb = 19,
    Gliding = 32,
    HasCollision = 47,
    HasGravity = 48,
    FireImmune = 50,
    Swimming = 56,
    Sleeping = 58,
}

/// Packed entity flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityFlags(u64);

impl EntityFlags {
    pub fn get(&self, flag: EntityFlag) -> bool {
        self.0 & (1 << flag as u64) != 0
    }

    pub fn set(&mut self, flag: EntityFlag, value: bool) {
        if value {
            self.0 |= 1 << flag as u64;
        } else {
            self.0 &= !(1 << flag as u64);
        }
    }

    pub fn bits(&self) -> u64 {
        self.0
    }
}

/// Metadata keys the mirror maintains, in wire-key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityDataKey {
    Color,
    Nametag,
    AirSupply,
    LeashHolder,
    Scale,
    MaxAirSupply,
    BoundingBoxWidth,
    BoundingBoxHeight,
    NametagAlwaysShow,
    FreezingEffectStrength,
}

impl EntityDataKey {
    fn wire_key(&self) -> u32 {
        match self {
            EntityDataKey::Color => data_key::COLOR,
            EntityDataKey::Nametag => data_key::NAMETAG,
            EntityDataKey::AirSupply => data_key::AIR_SUPPLY,
            EntityDataKey::LeashHolder => data_key::LEASH_HOLDER_EID,
            EntityDataKey::Scale => data_key::SCALE,
            EntityDataKey::MaxAirSupply => data_key::MAX_AIR_SUPPLY,
            EntityDataKey::BoundingBoxWidth => data_key::BOUNDING_BOX_WIDTH,
            EntityDataKey::BoundingBoxHeight => data_key::BOUNDING_BOX_HEIGHT,
            EntityDataKey::NametagAlwaysShow => data_key::NAMETAG_ALWAYS_SHOW,
            EntityDataKey::FreezingEffectStrength => data_key::FREEZING_EFFECT_STRENGTH,
        }
    }
}

/// Typed metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityDataValue {
    Byte(u8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Long(i64),
}

impl EntityDataValue {
    fn to_wire(&self) -> MetadataValue {
        match self {
            EntityDataValue::Byte(v) => MetadataValue::Byte(*v),
            EntityDataValue::Short(v) => MetadataValue::Short(*v),
            EntityDataValue::Int(v) => MetadataValue::Int(*v),
            EntityDataValue::Float(v) => MetadataValue::Float(*v),
            EntityDataValue::String(v) => MetadataValue::String(v.clone()),
            EntityDataValue::Long(v) => MetadataValue::Long(*v),
        }
    }
}

/// The full client-visible metadata of one mirrored entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataMap {
    values: BTreeMap<EntityDataKey, EntityDataValue>,
    flags: EntityFlags,
}

impl MetadataMap {
    pub fn set(&mut self, key: EntityDataKey, value: EntityDataValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: EntityDataKey) -> Option<&EntityDataValue> {
        self.values.get(&key)
    }

    pub fn flags(&self) -> &EntityFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut EntityFlags {
        &mut self.flags
    }

    /// Serialize the full map for the wire, flags first.
    pub fn to_entries(&self) -> Vec<EntityMetadataEntry> {
        let mut entries = Vec::with_capacity(self.values.len() + 1);
        entries.push(EntityMetadataEntry {
            key: data_key::FLAGS,
            value: MetadataValue::Long(self.flags.0 as i64),
        });
        for (key, value) in &self.values {
            entries.push(EntityMetadataEntry {
                key: key.wire_key(),
                value: value.to_wire(),
            });
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_set_and_clear() {
        let mut flags = EntityFlags::default();
        flags.set(EntityFlag::HasGravity, true);
        flags.set(EntityFlag::OnFire, true);
        assert!(flags.get(EntityFlag::HasGravity));
        assert!(flags.get(EntityFlag::OnFire));
        flags.set(EntityFlag::OnFire, false);
        assert!(!flags.get(EntityFlag::OnFire));
        assert!(flags.get(EntityFlag::HasGravity));
    }

    #[test]
    fn entries_lead_with_flags() {
        let mut map = MetadataMap::default();
        map.set(EntityDataKey::Scale, EntityDataValue::Float(1.0));
        map.flags_mut().set(EntityFlag::Sneaking, true);
        let entries = map.to_entries();
        assert_eq!(entries[0].key, data_key::FLAGS);
        assert_eq!(
            entries[0].value,
            MetadataValue::Long(1 << EntityFlag::Sneaking as u64)
        );
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn identical_maps_serialize_identically() {
        let mut a = MetadataMap::default();
        let mut b = MetadataMap::default();
        for map in [&mut a, &mut b] {
            map.set(EntityDataKey::AirSupply, EntityDataValue::Short(300));
            map.set(EntityDataKey::Scale, EntityDataValue::Float(1.0));
            map.flags_mut().set(EntityFlag::HasGravity, true);
        }
        assert_eq!(a.to_entries(), b.to_entries());
    }

    #[test]
    fn set_overwrites() {
        let mut map = MetadataMap::default();
        map.set(EntityDataKey::AirSupply, EntityDataValue::Short(300));
        map.set(EntityDataKey::AirSupply, EntityDataValue::Short(100));
        assert_eq!(
            map.get(EntityDataKey::AirSupply),
            Some(&EntityDataValue::Short(100))
        );
        assert_eq!(map.to_entries().len(), 2);
    }
}
