//! Entity movement translators. Deltas and velocities are rescaled from
//! the source protocol's fixed-point units at the boundary.

use tracing::debug;

use conduit_proto::java::movement::{DELTA_SCALE, VELOCITY_SCALE};
use conduit_proto::java::JavaPacket;
use conduit_proto::types::Vec3;

use crate::dispatch::JavaTranslator;
use crate::error::TranslateError;
use crate::session::Session;

macro_rules! mirrored_entity_or_return {
    ($session:expr, $id:expr) => {{
        let Some(entity) = $session.entities.get_mut($id) else {
            debug!(java_id = $id, "movement for unknown entity");
            return Ok(());
        };
        entity
    }};
}

pub struct EntityPositionTranslator;

impl JavaTranslator for EntityPositionTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityPosition(mv) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let entity = mirrored_entity_or_return!(session, mv.entity_id);
        let rotation = entity.rotation();
        entity.move_relative_look(
            mv.delta_x as f64 / DELTA_SCALE,
            mv.delta_y as f64 / DELTA_SCALE,
            mv.delta_z as f64 / DELTA_SCALE,
            rotation,
            mv.on_ground,
            &client,
        );
        Ok(())
    }
}

pub struct EntityPositionRotationTranslator;

impl JavaTranslator for EntityPositionRotationTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityPositionRotation(mv) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let entity = mirrored_entity_or_return!(session, mv.entity_id);
        entity.update_position_rotation(
            mv.delta_x as f64 / DELTA_SCALE,
            mv.delta_y as f64 / DELTA_SCALE,
            mv.delta_z as f64 / DELTA_SCALE,
            mv.yaw,
            mv.pitch,
            mv.on_ground,
            &client,
        );
        Ok(())
    }
}

pub struct EntityRotationTranslator;

impl JavaTranslator for EntityRotationTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityRotation(mv) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let entity = mirrored_entity_or_return!(session, mv.entity_id);
        entity.update_rotation(mv.yaw, mv.pitch, mv.on_ground, &client);
        Ok(())
    }
}

pub struct EntityHeadLookTranslator;

impl JavaTranslator for EntityHeadLookTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityHeadLook(look) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let entity = mirrored_entity_or_return!(session, look.entity_id);
        entity.update_head_look(look.head_yaw, &client);
        Ok(())
    }
}

pub struct EntityTeleportTranslator;

impl JavaTranslator for EntityTeleportTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityTeleport(tp) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let entity = mirrored_entity_or_return!(session, tp.entity_id);
        entity.teleport(
            Vec3::new(tp.x as f32, tp.y as f32, tp.z as f32),
            tp.yaw,
            tp.pitch,
            tp.on_ground,
            &client,
        );
        Ok(())
    }
}

pub struct EntityVelocityTranslator;

impl JavaTranslator for EntityVelocityTranslator {
    fn translate(&self, session: &mut Session, packet: &JavaPacket) -> Result<(), TranslateError> {
        let JavaPacket::EntityVelocity(vel) = packet else {
            return Ok(());
        };
        let client = session.client().clone();
        let entity = mirrored_entity_or_return!(session, vel.entity_id);
        entity.set_motion(
            Vec3::new(
                (vel.velocity_x as f64 / VELOCITY_SCALE) as f32,
                (vel.velocity_y as f64 / VELOCITY_SCALE) as f32,
                (vel.velocity_z as f64 / VELOCITY_SCALE) as f32,
            ),
            &client,
        );
        Ok(())
    }
}
