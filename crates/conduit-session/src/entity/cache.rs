//! Session-scoped entity arena.
//!
//! Entities are keyed by their stable backend ID; mirror IDs are allocated
//! locally and never reused within a session. Passenger relationships are
//! ID sets resolved through this cache, so a despawned vehicle can never
//! dangle a reference.

use std::collections::HashMap;

use conduit_mappings::EntityKind;
use conduit_proto::bedrock::{BedrockPacket, RemoveEntity};
use conduit_proto::types::Vec3;
use tracing::debug;

use crate::sink::ClientSink;

use super::metadata::EntityFlag;
use super::mirror::MirroredEntity;

pub struct EntityCache {
    entities: HashMap<i32, MirroredEntity>,
    next_mirror_id: u64,
}

impl EntityCache {
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            // 1 is reserved for the client's own player entity.
            next_mirror_id: 2,
        }
    }

    /// Mirror a newly spawned backend entity and announce it to the client.
    pub fn spawn(
        &mut self,
        java_id: i32,
        kind: EntityKind,
        position: Vec3,
        motion: Vec3,
        rotation: Vec3,
        client: &ClientSink,
    ) -> u64 {
        // A backend reusing a live ID implies we missed the removal.
        if self.entities.contains_key(&java_id) {
            debug!(java_id, "respawn of live entity id; despawning stale mirror");
            self.despawn(java_id, client);
        }
        let mirror_id = self.next_mirror_id;
        self.next_mirror_id += 1;
        let mut entity = MirroredEntity::new(java_id, mirror_id, kind, position, motion, rotation);
        entity.spawn(client);
        self.entities.insert(java_id, entity);
        mirror_id
    }

    /// Remove a mirrored entity. Returns `true` when it was already gone —
    /// a defined success, not an error.
    pub fn despawn(&mut self, java_id: i32, client: &ClientSink) -> bool {
        let Some(entity) = self.entities.get(&java_id) else {
            return true;
        };
        if !entity.is_valid() {
            return true;
        }
        let mirror_id = entity.mirror_id;
        let passengers: Vec<i32> = entity.passengers.iter().copied().collect();

        // Riders of the removed vehicle must not stay in the riding pose.
        // Missing passengers are skipped; the reference is weak.
        for passenger_id in passengers {
            if let Some(passenger) = self.entities.get_mut(&passenger_id) {
                passenger.metadata.flags_mut().set(EntityFlag::Riding, false);
                passenger.push_metadata(client);
            }
        }

        client.send(BedrockPacket::RemoveEntity(RemoveEntity {
            entity_unique_id: mirror_id as i64,
        }));
        let mut entity = self
            .entities
            .remove(&java_id)
            .expect("entity present above");
        entity.invalidate();
        false
    }

    pub fn get(&self, java_id: i32) -> Option<&MirroredEntity> {
        self.entities.get(&java_id)
    }

    pub fn get_mut(&mut self, java_id: i32) -> Option<&mut MirroredEntity> {
        self.entities.get_mut(&java_id)
    }

    /// Replace a vehicle's passenger set, updating riding poses on both
    /// the added and the removed riders.
    pub fn set_passengers(&mut self, vehicle_id: i32, passenger_ids: &[i32], client: &ClientSink) {
        let Some(vehicle) = self.entities.get_mut(&vehicle_id) else {
            return;
        };
        let old: Vec<i32> = vehicle.passengers.iter().copied().collect();
        vehicle.passengers = passenger_ids.iter().copied().collect();

        for id in passenger_ids {
            if let Some(passenger) = self.entities.get_mut(id) {
                passenger.metadata.flags_mut().set(EntityFlag::Riding, true);
                passenger.push_metadata(client);
            }
        }
        for id in old {
            if passenger_ids.contains(&id) {
                continue;
            }
            if let Some(passenger) = self.entities.get_mut(&id) {
                passenger.metadata.flags_mut().set(EntityFlag::Riding, false);
                passenger.push_metadata(client);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conduit_proto::bedrock::BedrockPacket;

    fn cache_with_zombie() -> (
        EntityCache,
        ClientSink,
        tokio::sync::mpsc::UnboundedReceiver<BedrockPacket>,
    ) {
        let (client, rx) = ClientSink::channel();
        let mut cache = EntityCache::new();
        cache.spawn(
            10,
            EntityKind::Zombie,
            Vec3::new(0.0, 64.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
            &client,
        );
        (cache, client, rx)
    }

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<BedrockPacket>) -> Vec<BedrockPacket> {
        let mut out = Vec::new();
        while let Ok(pkt) = rx.try_recv() {
            out.push(pkt);
        }
        out
    }

    #[test]
    fn spawn_emits_add_entity_and_allocates_mirror_ids() {
        let (mut cache, client, mut rx) = cache_with_zombie();
        let second = cache.spawn(
            11,
            EntityKind::Cow,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            &client,
        );
        let packets = drain(&mut rx);
        assert_eq!(packets.len(), 2);
        assert!(matches!(packets[0], BedrockPacket::AddEntity(_)));
        let first = cache.get(10).unwrap().mirror_id;
        assert_ne!(first, second);
    }

    #[test]
    fn double_despawn_is_idempotent() {
        let (mut cache, client, mut rx) = cache_with_zombie();
        drain(&mut rx);
        assert!(!cache.despawn(10, &client));
        let packets = drain(&mut rx);
        assert_eq!(packets.len(), 1);
        assert!(matches!(packets[0], BedrockPacket::RemoveEntity(_)));

        // Second despawn: already removed, no second removal packet.
        assert!(cache.despawn(10, &client));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn despawn_of_unknown_entity_is_success() {
        let (client, mut rx) = ClientSink::channel();
        let mut cache = EntityCache::new();
        assert!(cache.despawn(999, &client));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn despawning_vehicle_clears_rider_pose() {
        let (mut cache, client, mut rx) = cache_with_zombie();
        cache.spawn(
            20,
            EntityKind::Pig,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            &client,
        );
        cache.set_passengers(10, &[20], &client);
        assert!(cache.get(20).unwrap().metadata.flags().get(EntityFlag::Riding));
        drain(&mut rx);

        cache.despawn(10, &client);
        assert!(!cache.get(20).unwrap().metadata.flags().get(EntityFlag::Riding));
        let packets = drain(&mut rx);
        // Rider metadata refresh, then the removal.
        assert!(matches!(packets[0], BedrockPacket::SetEntityData(_)));
        assert!(matches!(packets[1], BedrockPacket::RemoveEntity(_)));
    }

    #[test]
    fn missing_passengers_are_skipped() {
        let (mut cache, client, mut rx) = cache_with_zombie();
        cache.get_mut(10).unwrap().passengers.insert(555);
        drain(&mut rx);
        // Must not panic or emit anything for the dangling reference.
        assert!(!cache.despawn(10, &client));
        let packets = drain(&mut rx);
        assert_eq!(packets.len(), 1);
        assert!(matches!(packets[0], BedrockPacket::RemoveEntity(_)));
    }

    #[test]
    fn passenger_swap_updates_both_riders() {
        let (mut cache, client, mut rx) = cache_with_zombie();
        cache.spawn(21, EntityKind::Pig, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, &client);
        cache.spawn(22, EntityKind::Chicken, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, &client);
        cache.set_passengers(10, &[21], &client);
        cache.set_passengers(10, &[22], &client);
        drain(&mut rx);
        assert!(!cache.get(21).unwrap().metadata.flags().get(EntityFlag::Riding));
        assert!(cache.get(22).unwrap().metadata.flags().get(EntityFlag::Riding));
    }
}
