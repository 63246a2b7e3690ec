//! The mirrored entity: an authoritative shadow of one backend entity,
//! incrementally diffed into client-visible wire state.
//!
//! Rotation is stored in source axis order (x = yaw, y = pitch,
//! z = head yaw) and permuted only while building outbound packets.

use std::collections::BTreeSet;

use conduit_mappings::EntityKind;
use conduit_proto::bedrock::{AddEntity, BedrockPacket, MoveEntityAbsolute, SetEntityData, SetEntityMotion};
use conduit_proto::java::{JavaMetadataField, JavaMetadataValue, Pose};
use conduit_proto::types::Vec3;

use crate::chat;
use crate::sink::ClientSink;

use super::metadata::{EntityDataKey, EntityDataValue, EntityFlag, MetadataMap};

/// Byte-flag bits of the source protocol's shared flags field.
mod java_flag {
    pub const ON_FIRE: u8 = 0x01;
    pub const SNEAKING: u8 = 0x02;
    pub const SPRINTING: u8 = 0x08;
    pub const INVISIBLE: u8 = 0x20;
    pub const GLIDING: u8 = 0x80;
}

/// Freezing ticks cap on the source protocol.
const MAX_FREEZING_TICKS: i32 = 140;

/// One mirrored entity.
#[derive(Debug)]
pub struct MirroredEntity {
    pub java_id: i32,
    pub mirror_id: u64,
    pub kind: EntityKind,
    pub position: Vec3,
    pub motion: Vec3,
    /// x = yaw, y = pitch, z = head yaw. Never stored permuted.
    rotation: Vec3,
    /// Kept so idle entities do not look like they are falling.
    pub on_ground: bool,
    valid: bool,
    pub passengers: BTreeSet<i32>,
    pub metadata: MetadataMap,
}

impl MirroredEntity {
    pub fn new(
        java_id: i32,
        mirror_id: u64,
        kind: EntityKind,
        position: Vec3,
        motion: Vec3,
        rotation: Vec3,
    ) -> Self {
        let mut entity = Self {
            java_id,
            mirror_id,
            kind,
            position,
            motion,
            rotation,
            on_ground: false,
            valid: false,
            passengers: BTreeSet::new(),
            metadata: MetadataMap::default(),
        };
        entity.seed_default_metadata();
        entity
    }

    fn seed_default_metadata(&mut self) {
        let max_air = self.kind.max_air();
        self.metadata
            .set(EntityDataKey::Scale, EntityDataValue::Float(1.0));
        self.metadata
            .set(EntityDataKey::Color, EntityDataValue::Byte(0));
        self.metadata
            .set(EntityDataKey::MaxAirSupply, EntityDataValue::Short(max_air));
        self.metadata
            .set(EntityDataKey::LeashHolder, EntityDataValue::Long(-1));
        self.metadata.set(
            EntityDataKey::BoundingBoxWidth,
            EntityDataValue::Float(self.kind.width()),
        );
        self.metadata.set(
            EntityDataKey::BoundingBoxHeight,
            EntityDataValue::Float(self.kind.height()),
        );
        self.set_air(max_air as i32);
        let flags = self.metadata.flags_mut();
        flags.set(EntityFlag::HasGravity, true);
        flags.set(EntityFlag::HasCollision, true);
        flags.set(EntityFlag::CanShowName, true);
        flags.set(EntityFlag::CanClimb, true);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Rotation in source axis order: (yaw, pitch, head yaw).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Rotation in target axis order: (pitch, head yaw, yaw).
    pub fn bedrock_rotation(&self) -> Vec3 {
        Vec3::new(self.rotation.y, self.rotation.z, self.rotation.x)
    }

    /// Send the add-entity packet and mark the mirror live.
    pub(crate) fn spawn(&mut self, client: &ClientSink) {
        let packet = AddEntity {
            entity_unique_id: self.mirror_id as i64,
            entity_runtime_id: self.mirror_id,
            identifier: self.kind.identifier().to_string(),
            position: self.position,
            motion: self.motion,
            pitch: self.rotation.y,
            yaw: self.rotation.x,
            head_yaw: self.rotation.z,
            attributes: Vec::new(),
            metadata: self.metadata.to_entries(),
        };
        self.valid = true;
        client.send(BedrockPacket::AddEntity(packet));
    }

    // -- movement ---------------------------------------------------------

    pub fn move_relative(
        &mut self,
        dx: f64,
        dy: f64,
        dz: f64,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
        client: &ClientSink,
    ) {
        let rotation = Vec3::new(yaw, pitch, self.rotation.z);
        self.move_relative_look(dx, dy, dz, rotation, on_ground, client);
    }

    pub fn move_relative_look(
        &mut self,
        dx: f64,
        dy: f64,
        dz: f64,
        rotation: Vec3,
        on_ground: bool,
        client: &ClientSink,
    ) {
        if !self.valid {
            return;
        }
        self.rotation = rotation;
        self.on_ground = on_ground;
        self.position = Vec3::new(
            (self.position.x as f64 + dx) as f32,
            (self.position.y as f64 + dy) as f32,
            (self.position.z as f64 + dz) as f32,
        );
        client.send(BedrockPacket::MoveEntityAbsolute(MoveEntityAbsolute::new(
            self.mirror_id,
            self.position,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
            on_ground,
            false,
        )));
    }

    pub fn move_absolute(
        &mut self,
        position: Vec3,
        rotation: Vec3,
        on_ground: bool,
        teleported: bool,
        client: &ClientSink,
    ) {
        if !self.valid {
            return;
        }
        self.position = position;
        self.rotation = rotation;
        self.on_ground = on_ground;
        client.send(BedrockPacket::MoveEntityAbsolute(MoveEntityAbsolute::new(
            self.mirror_id,
            self.position,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
            on_ground,
            teleported,
        )));
    }

    pub fn teleport(&mut self, position: Vec3, yaw: f32, pitch: f32, on_ground: bool, client: &ClientSink) {
        let rotation = Vec3::new(yaw, pitch, self.rotation.z);
        self.move_absolute(position, rotation, on_ground, false, client);
    }

    /// Body yaw follows the head on living entities; the movement yaw
    /// lands in the head slot instead.
    pub fn update_position_rotation(
        &mut self,
        dx: f64,
        dy: f64,
        dz: f64,
        yaw: f32,
        pitch: f32,
        on_ground: bool,
        client: &ClientSink,
    ) {
        let rotation = Vec3::new(self.rotation.x, pitch, yaw);
        self.move_relative_look(dx, dy, dz, rotation, on_ground, client);
    }

    pub fn update_rotation(&mut self, yaw: f32, pitch: f32, on_ground: bool, client: &ClientSink) {
        self.update_position_rotation(0.0, 0.0, 0.0, yaw, pitch, on_ground, client);
    }

    pub fn update_head_look(&mut self, head_yaw: f32, client: &ClientSink) {
        let rotation = Vec3::new(head_yaw, self.rotation.y, self.rotation.z);
        let on_ground = self.on_ground;
        self.move_relative_look(0.0, 0.0, 0.0, rotation, on_ground, client);
    }

    pub fn set_motion(&mut self, motion: Vec3, client: &ClientSink) {
        if !self.valid {
            return;
        }
        self.motion = motion;
        client.send(BedrockPacket::SetEntityMotion(SetEntityMotion {
            entity_runtime_id: self.mirror_id,
            motion,
        }));
    }

    // -- metadata ---------------------------------------------------------

    /// Apply one source-protocol metadata field to the target map.
    pub fn apply_java_metadata(&mut self, field: &JavaMetadataField, locale: &str) {
        match (field.index, &field.value) {
            (0, JavaMetadataValue::Byte(bits)) => {
                let fire_immune = self.metadata.flags().get(EntityFlag::FireImmune);
                let flags = self.metadata.flags_mut();
                // Immune entities would flicker if the fire bit went through.
                flags.set(
                    EntityFlag::OnFire,
                    bits & java_flag::ON_FIRE != 0 && !fire_immune,
                );
                flags.set(EntityFlag::Sneaking, bits & java_flag::SNEAKING != 0);
                flags.set(EntityFlag::Sprinting, bits & java_flag::SPRINTING != 0);
                // The swim bit is ignored here; the pose drives the visual.
                flags.set(EntityFlag::Gliding, bits & java_flag::GLIDING != 0);
                flags.set(EntityFlag::Invisible, bits & java_flag::INVISIBLE != 0);
            }
            (1, JavaMetadataValue::VarInt(air)) => self.set_air(*air),
            (2, JavaMetadataValue::OptChat(component)) => {
                let name = component.as_deref().map(|json| chat::render_message(json, locale));
                self.set_display_name(name);
            }
            (3, JavaMetadataValue::Boolean(visible)) => {
                self.metadata.set(
                    EntityDataKey::NametagAlwaysShow,
                    EntityDataValue::Byte(*visible as u8),
                );
            }
            (4, JavaMetadataValue::Boolean(silent)) => {
                self.metadata.flags_mut().set(EntityFlag::Silent, *silent);
            }
            (5, JavaMetadataValue::Boolean(no_gravity)) => {
                self.metadata
                    .flags_mut()
                    .set(EntityFlag::HasGravity, !no_gravity);
            }
            (6, JavaMetadataValue::Pose(pose)) => {
                let flags = self.metadata.flags_mut();
                flags.set(EntityFlag::Sleeping, *pose == Pose::Sleeping);
                // Also covers crawling.
                flags.set(EntityFlag::Swimming, *pose == Pose::Swimming);
                self.set_dimensions(*pose);
            }
            (7, JavaMetadataValue::VarInt(ticks)) => {
                let capped = (*ticks).min(MAX_FREEZING_TICKS).max(0);
                self.metadata.set(
                    EntityDataKey::FreezingEffectStrength,
                    EntityDataValue::Float(capped as f32 / MAX_FREEZING_TICKS as f32),
                );
            }
            _ => {}
        }
    }

    /// Send the full metadata snapshot. No-op while the mirror is not live.
    pub fn push_metadata(&self, client: &ClientSink) {
        if !self.valid {
            return;
        }
        client.send(BedrockPacket::SetEntityData(SetEntityData {
            entity_runtime_id: self.mirror_id,
            metadata: self.metadata.to_entries(),
        }));
    }

    fn set_air(&mut self, amount: i32) {
        let max_air = self.kind.max_air() as i32;
        let clamped = amount.clamp(0, max_air) as i16;
        self.metadata
            .set(EntityDataKey::AirSupply, EntityDataValue::Short(clamped));
    }

    fn set_display_name(&mut self, name: Option<String>) {
        match name {
            Some(name) => {
                self.metadata
                    .set(EntityDataKey::Nametag, EntityDataValue::String(name));
            }
            None => {
                let has_name = matches!(
                    self.metadata.get(EntityDataKey::Nametag),
                    Some(EntityDataValue::String(s)) if !s.is_empty()
                );
                if has_name {
                    self.metadata
                        .set(EntityDataKey::Nametag, EntityDataValue::String(String::new()));
                }
            }
        }
    }

    fn set_dimensions(&mut self, _pose: Pose) {
        self.metadata.set(
            EntityDataKey::BoundingBoxWidth,
            EntityDataValue::Float(self.kind.width()),
        );
        self.metadata.set(
            EntityDataKey::BoundingBoxHeight,
            EntityDataValue::Float(self.kind.height()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ClientSink;
    use conduit_proto::bedrock::BedrockPacket;

    fn spawned() -> (MirroredEntity, ClientSink, tokio::sync::mpsc::UnboundedReceiver<BedrockPacket>) {
        let (client, rx) = ClientSink::channel();
        let mut entity = MirroredEntity::new(
            12,
            1,
            EntityKind::Zombie,
            Vec3::new(0.0, 64.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
        );
        entity.spawn(&client);
        (entity, client, rx)
    }

    fn field(index: u8, value: JavaMetadataValue) -> JavaMetadataField {
        JavaMetadataField { index, value }
    }

    #[test]
    fn freezing_ticks_clamp_and_rescale() {
        let (mut entity, _client, _rx) = spawned();
        entity.apply_java_metadata(&field(7, JavaMetadataValue::VarInt(200)), "en_us");
        assert_eq!(
            entity.metadata.get(EntityDataKey::FreezingEffectStrength),
            Some(&EntityDataValue::Float(1.0))
        );
        entity.apply_java_metadata(&field(7, JavaMetadataValue::VarInt(70)), "en_us");
        assert_eq!(
            entity.metadata.get(EntityDataKey::FreezingEffectStrength),
            Some(&EntityDataValue::Float(0.5))
        );
    }

    #[test]
    fn fire_immune_suppresses_on_fire() {
        let (mut entity, _client, _rx) = spawned();
        entity.metadata.flags_mut().set(EntityFlag::FireImmune, true);
        entity.apply_java_metadata(&field(0, JavaMetadataValue::Byte(0x01)), "en_us");
        assert!(!entity.metadata.flags().get(EntityFlag::OnFire));

        // Without immunity the same bit takes effect.
        entity.metadata.flags_mut().set(EntityFlag::FireImmune, false);
        entity.apply_java_metadata(&field(0, JavaMetadataValue::Byte(0x01)), "en_us");
        assert!(entity.metadata.flags().get(EntityFlag::OnFire));
    }

    #[test]
    fn swim_flag_comes_from_pose_not_bits() {
        let (mut entity, _client, _rx) = spawned();
        // Source swim bit 0x10 is deliberately not translated.
        entity.apply_java_metadata(&field(0, JavaMetadataValue::Byte(0x10)), "en_us");
        assert!(!entity.metadata.flags().get(EntityFlag::Swimming));
        entity.apply_java_metadata(&field(6, JavaMetadataValue::Pose(Pose::Swimming)), "en_us");
        assert!(entity.metadata.flags().get(EntityFlag::Swimming));
        entity.apply_java_metadata(&field(6, JavaMetadataValue::Pose(Pose::Standing)), "en_us");
        assert!(!entity.metadata.flags().get(EntityFlag::Swimming));
    }

    #[test]
    fn repeated_updates_produce_identical_snapshots() {
        let (mut entity, _client, _rx) = spawned();
        entity.apply_java_metadata(&field(1, JavaMetadataValue::VarInt(120)), "en_us");
        let first = entity.metadata.to_entries();
        entity.apply_java_metadata(&field(1, JavaMetadataValue::VarInt(120)), "en_us");
        let second = entity.metadata.to_entries();
        assert_eq!(first, second);
    }

    #[test]
    fn air_clamps_to_type_maximum() {
        let (mut entity, _client, _rx) = spawned();
        entity.apply_java_metadata(&field(1, JavaMetadataValue::VarInt(9999)), "en_us");
        assert_eq!(
            entity.metadata.get(EntityDataKey::AirSupply),
            Some(&EntityDataValue::Short(300))
        );
        entity.apply_java_metadata(&field(1, JavaMetadataValue::VarInt(-5)), "en_us");
        assert_eq!(
            entity.metadata.get(EntityDataKey::AirSupply),
            Some(&EntityDataValue::Short(0))
        );
    }

    #[test]
    fn display_name_clear_only_when_set() {
        let (mut entity, _client, _rx) = spawned();
        // Clearing a never-set name leaves the key absent.
        entity.apply_java_metadata(&field(2, JavaMetadataValue::OptChat(None)), "en_us");
        assert!(entity.metadata.get(EntityDataKey::Nametag).is_none());

        entity.apply_java_metadata(
            &field(2, JavaMetadataValue::OptChat(Some(r#"{"text":"Jeb"}"#.into()))),
            "en_us",
        );
        assert_eq!(
            entity.metadata.get(EntityDataKey::Nametag),
            Some(&EntityDataValue::String("Jeb".into()))
        );
        entity.apply_java_metadata(&field(2, JavaMetadataValue::OptChat(None)), "en_us");
        assert_eq!(
            entity.metadata.get(EntityDataKey::Nametag),
            Some(&EntityDataValue::String(String::new()))
        );
    }

    #[test]
    fn rotation_permuted_only_on_the_wire() {
        let (mut entity, client, mut rx) = spawned();
        rx.try_recv().unwrap(); // discard the add packet
        entity.move_relative(0.0, 0.0, 0.0, 90.0, 30.0, true, &client);
        // Stored order stays (yaw, pitch, head yaw).
        assert_eq!(entity.bedrock_rotation(), Vec3::new(30.0, 0.0, 90.0));
        match rx.try_recv().unwrap() {
            BedrockPacket::MoveEntityAbsolute(pkt) => {
                assert_eq!(pkt.pitch, 30.0);
                assert_eq!(pkt.yaw, 90.0);
                assert_eq!(pkt.head_yaw, 0.0);
                assert_eq!(pkt.flags, MoveEntityAbsolute::FLAG_ON_GROUND);
            }
            other => panic!("unexpected packet: {other:?}"),
        }
    }

    #[test]
    fn push_metadata_noop_while_invalid() {
        let (client, mut rx) = ClientSink::channel();
        let entity = MirroredEntity::new(
            5,
            2,
            EntityKind::Cow,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
        );
        entity.push_metadata(&client);
        assert!(rx.try_recv().is_err());
    }
}
