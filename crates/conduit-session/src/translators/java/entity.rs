//! Entity lifecycle and metadata translators.

use tracing::debug;

use conduit_mappings::EntityKind;
use conduit_proto::java::movement::VELOCITY_SCALE;
use conduit_proto::java::JavaPacket;
use conduit_proto::types::Vec3;

use crate::dispatch::JavaTranslator;
use crate::error::TranslateError;
use crate::session::Session;

pub struct SpawnEntityTranslator;

impl JavaTranslator for SpawnEntityTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::SpawnEntity(spawn) = packet else {
            return Ok(());
        };
        let kind = EntityKind::from_java_type(spawn.entity_type)
            .ok_or(TranslateError::UnknownEntityType(spawn.entity_type))?;
        let position = Vec3::new(spawn.x as f32, spawn.y as f32, spawn.z as f32);
        let motion = Vec3::new(
            (spawn.velocity_x as f64 / VELOCITY_SCALE) as f32,
            (spawn.velocity_y as f64 / VELOCITY_SCALE) as f32,
            (spawn.velocity_z as f64 / VELOCITY_SCALE) as f32,
        );
        let rotation = Vec3::new(spawn.yaw, spawn.pitch, spawn.head_yaw);
        let client = session.client().clone();
        let mirror_id =
            session
                .entities
                .spawn(spawn.entity_id, kind, position, motion, rotation, &client);
        debug!(
            kind = kind.identifier(),
            java_id = spawn.entity_id,
            mirror_id,
            "spawned mirrored entity"
        );
        Ok(())
    }
}

pub struct DestroyEntitiesTranslator;

impl JavaTranslator for DestroyEntitiesTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::DestroyEntities(destroy) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        for entity_id in &destroy.entity_ids {
            session.entities.despawn(*entity_id, &client);
        }
        Ok(())
    }
}

pub struct EntityMetadataTranslator;

impl JavaTranslator for EntityMetadataTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityMetadata(metadata) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let locale = session.locale.clone();
        // A missing mirror is a normal race with despawn, not an error.
        let Some(entity) = session.entities.get_mut(metadata.entity_id) else {
            debug!(java_id = metadata.entity_id, "metadata for unknown entity");
            return Ok(());
        };
        for field in &metadata.fields {
            entity.apply_java_metadata(field, &locale);
        }
        entity.push_metadata(&client);
        Ok(())
    }
}

pub struct SetPassengersTranslator;

impl JavaTranslator for SetPassengersTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::SetPassengers(passengers) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        session
            .entities
            .set_passengers(passengers.vehicle_id, &passengers.passenger_ids, &client);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support;
    use conduit_proto::bedrock::BedrockPacket;
    use conduit_proto::java::{DestroyEntities, SpawnEntity};

    fn spawn_packet(entity_id: i32, entity_type: i32) -> JavaPacket {
        JavaPacket::SpawnEntity(SpawnEntity {
            entity_id,
            uuid: (0, 0),
            entity_type,
            x: 10.0,
            y: 64.0,
            z: -10.0,
            yaw: 90.0,
            pitch: 0.0,
            head_yaw: 90.0,
            velocity_x: 0,
            velocity_y: -800,
            velocity_z: 0,
        })
    }

    #[test]
    fn spawn_then_destroy_roundtrip() {
        let (mut session, mut rx) = test_support::active_session();
        SpawnEntityTranslator
            .translate(&mut session, &spawn_packet(7, 107))
            .unwrap();
        assert!(session.entities.get(7).is_some());
        match rx.try_recv().unwrap() {
            BedrockPacket::AddEntity(pkt) => {
                assert_eq!(pkt.identifier, "minecraft:zombie");
                assert_eq!(pkt.position, Vec3::new(10.0, 64.0, -10.0));
                assert_eq!(pkt.motion.y, -0.1);
            }
            other => panic!("unexpected packet: {other:?}"),
        }

        DestroyEntitiesTranslator
            .translate(
                &mut session,
                &JavaPacket::DestroyEntities(DestroyEntities {
                    entity_ids: vec![7],
                }),
            )
            .unwrap();
        assert!(session.entities.get(7).is_none());
        assert!(matches!(
            rx.try_recv().unwrap(),
            BedrockPacket::RemoveEntity(_)
        ));
    }

    #[test]
    fn unknown_entity_type_is_a_translate_error() {
        let (mut session, _rx) = test_support::active_session();
        let result = SpawnEntityTranslator.translate(&mut session, &spawn_packet(7, 9999));
        assert!(matches!(
            result,
            Err(TranslateError::UnknownEntityType(9999))
        ));
    }

    #[test]
    fn metadata_for_missing_entity_is_dropped_quietly() {
        let (mut session, mut rx) = test_support::active_session();
        let packet = JavaPacket::EntityMetadata(conduit_proto::java::EntityMetadata {
            entity_id: 404,
            fields: vec![],
        });
        EntityMetadataTranslator
            .translate(&mut session, &packet)
            .unwrap();
        assert!(rx.try_recv().is_err());
    }
}
