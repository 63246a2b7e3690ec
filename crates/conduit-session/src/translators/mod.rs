//! The shipped translator set, one value per packet kind.

pub mod client;
pub mod java;

use conduit_proto::bedrock::ClientPacketKind;
use conduit_proto::java::JavaPacketKind;

use crate::dispatch::TranslatorRegistry;

/// Register every translator the proxy ships with.
pub fn register_defaults(registry: &mut TranslatorRegistry) {
    registry.register_java(JavaPacketKind::JoinGame, Box::new(java::join::JoinGameTranslator));
    registry.register_java(
        JavaPacketKind::SpawnEntity,
        Box::new(java::entity::SpawnEntityTranslator),
    );
    registry.register_java(
        JavaPacketKind::DestroyEntities,
        Box::new(java::entity::DestroyEntitiesTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityMetadata,
        Box::new(java::entity::EntityMetadataTranslator),
    );
    registry.register_java(
        JavaPacketKind::SetPassengers,
        Box::new(java::entity::SetPassengersTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityPosition,
        Box::new(java::movement::EntityPositionTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityPositionRotation,
        Box::new(java::movement::EntityPositionRotationTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityRotation,
        Box::new(java::movement::EntityRotationTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityHeadLook,
        Box::new(java::movement::EntityHeadLookTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityTeleport,
        Box::new(java::movement::EntityTeleportTranslator),
    );
    registry.register_java(
        JavaPacketKind::EntityVelocity,
        Box::new(java::movement::EntityVelocityTranslator),
    );
    registry.register_java(
        JavaPacketKind::SetBorderCenter,
        Box::new(java::border::SetBorderCenterTranslator),
    );
    registry.register_java(
        JavaPacketKind::SetBorderLerpSize,
        Box::new(java::border::SetBorderLerpSizeTranslator),
    );
    registry.register_java(
        JavaPacketKind::SetBorderSize,
        Box::new(java::border::SetBorderSizeTranslator),
    );

    registry.register_client(ClientPacketKind::Login, Box::new(client::login::LoginTranslator));
    registry.register_client(ClientPacketKind::Text, Box::new(client::text::TextTranslator));
    registry.register_client(
        ClientPacketKind::InventoryTransaction,
        Box::new(client::item_use::ItemUseTranslator),
    );
}
