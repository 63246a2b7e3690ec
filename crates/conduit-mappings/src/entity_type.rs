//! Entity-type metadata consumed by the entity mirror.
//!
//! Static dimensions, identifiers and air supply per kind. The numeric
//! values on the left of `from_java_type` are the source protocol's
//! registry indices for this protocol era.

/// Kinds of entities the proxy mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    ArmorStand,
    Bat,
    Boat,
    Chicken,
    Cow,
    Creeper,
    Dolphin,
    Minecart,
    Parrot,
    Pig,
    Sheep,
    Skeleton,
    Squid,
    Zombie,
}

impl EntityKind {
    /// Resolve a source-protocol entity type index.
    pub fn from_java_type(type_id: i32) -> Option<EntityKind> {
        Some(match type_id {
            1 => EntityKind::ArmorStand,
            4 => EntityKind::Bat,
            7 => EntityKind::Boat,
            9 => EntityKind::Chicken,
            11 => EntityKind::Cow,
            12 => EntityKind::Creeper,
            13 => EntityKind::Dolphin,
            50 => EntityKind::Minecart,
            65 => EntityKind::Pig,
            76 => EntityKind::Parrot,
            79 => EntityKind::Sheep,
            84 => EntityKind::Skeleton,
            86 => EntityKind::Squid,
            107 => EntityKind::Zombie,
            _ => return None,
        })
    }

    /// Target-protocol entity identifier.
    pub fn identifier(&self) -> &'static str {
        match self {
            EntityKind::ArmorStand => "minecraft:armor_stand",
            EntityKind::Bat => "minecraft:bat",
            EntityKind::Boat => "minecraft:boat",
            EntityKind::Chicken => "minecraft:chicken",
            EntityKind::Cow => "minecraft:cow",
            EntityKind::Creeper => "minecraft:creeper",
            EntityKind::Dolphin => "minecraft:dolphin",
            EntityKind::Minecart => "minecraft:minecart",
            EntityKind::Parrot => "minecraft:parrot",
            EntityKind::Pig => "minecraft:pig",
            EntityKind::Sheep => "minecraft:sheep",
            EntityKind::Skeleton => "minecraft:skeleton",
            EntityKind::Squid => "minecraft:squid",
            EntityKind::Zombie => "minecraft:zombie",
        }
    }

    /// Bounding box width.
    pub fn width(&self) -> f32 {
        match self {
            EntityKind::ArmorStand => 0.5,
            EntityKind::Bat => 0.5,
            EntityKind::Boat => 1.375,
            EntityKind::Chicken => 0.4,
            EntityKind::Cow => 0.9,
            EntityKind::Creeper => 0.6,
            EntityKind::Dolphin => 0.9,
            EntityKind::Minecart => 0.98,
            EntityKind::Parrot => 0.5,
            EntityKind::Pig => 0.9,
            EntityKind::Sheep => 0.9,
            EntityKind::Skeleton => 0.6,
            EntityKind::Squid => 0.8,
            EntityKind::Zombie => 0.6,
        }
    }

    /// Bounding box height.
    pub fn height(&self) -> f32 {
        match self {
            EntityKind::ArmorStand => 1.975,
            EntityKind::Bat => 0.9,
            EntityKind::Boat => 0.5625,
            EntityKind::Chicken => 0.7,
            EntityKind::Cow => 1.4,
            EntityKind::Creeper => 1.7,
            EntityKind::Dolphin => 0.6,
            EntityKind::Minecart => 0.7,
            EntityKind::Parrot => 0.9,
            EntityKind::Pig => 0.9,
            EntityKind::Sheep => 1.3,
            EntityKind::Skeleton => 1.99,
            EntityKind::Squid => 0.8,
            EntityKind::Zombie => 1.95,
        }
    }

    /// Maximum air supply in ticks. Aquatic mammals carry more.
    pub fn max_air(&self) -> i16 {
        match self {
            EntityKind::Dolphin => 4800,
            _ => 300,
        }
    }
}
