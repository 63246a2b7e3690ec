//! Item-use remapping: the one client→backend path that references items
//! by target-protocol runtime ID.

use bytes::BytesMut;
use tracing::debug;

use conduit_proto::bedrock::{ClientPacket, InventoryTransaction, TransactionUseItem};
use conduit_proto::java::serverbound::{BlockPlacement, UseItem};

use crate::dispatch::ClientTranslator;
use crate::error::TranslateError;
use crate::session::Session;

/// Item-use action discriminants.
mod action {
    pub const CLICK_BLOCK: u32 = 0;
    pub const CLICK_AIR: u32 = 1;
    pub const BREAK_BLOCK: u32 = 2;
}

pub struct ItemUseTranslator;

impl ClientTranslator for ItemUseTranslator {
    fn translate(&self, session: &mut Session, packet: &ClientPacket) -> Result<(), TranslateError> {
        let ClientPacket::InventoryTransaction(InventoryTransaction {
            use_item: Some(use_item),
            ..
        }) = packet
        else {
            return Ok(());
        };

        self.remap_held_item(session, use_item)?;

        match use_item.action_type {
            action::CLICK_BLOCK => {
                let pos = use_item.block_position;
                if session.config.debug_mode {
                    let block = session.world.block_at(pos.x, pos.y, pos.z);
                    debug!(x = pos.x, y = pos.y, z = pos.z, block, "block click");
                }
                let mut out = BytesMut::new();
                BlockPlacement {
                    hand: 0,
                    x: pos.x,
                    y: pos.y,
                    z: pos.z,
                    face: use_item.face,
                    cursor_x: use_item.click_position.x,
                    cursor_y: use_item.click_position.y,
                    cursor_z: use_item.click_position.z,
                    inside_block: false,
                }
                .encode(&mut out);
                session.backend().send(out.freeze());
            }
            action::CLICK_AIR => {
                let mut out = BytesMut::new();
                UseItem { hand: 0 }.encode(&mut out);
                session.backend().send(out.freeze());
            }
            action::BREAK_BLOCK => {
                // Block breaking goes through the player-action path, which
                // the backend drives from its own dig tracking.
                debug!("break action ignored on the item-use path");
            }
            other => {
                debug!(action = other, "unknown item-use action dropped");
            }
        }
        Ok(())
    }
}

impl ItemUseTranslator {
    /// Resolve the held target-protocol item against the session's mapping
    /// snapshot. An unmapped item is a per-packet error: the use is dropped
    /// rather than forwarded with a wrong ID.
    fn remap_held_item(
        &self,
        session: &Session,
        use_item: &TransactionUseItem,
    ) -> Result<(), TranslateError> {
        if use_item.held_item_runtime_id == 0 {
            return Ok(()); // empty hand
        }
        let mappings = session.mappings()?;
        let mapping = mappings
            .items
            .mapping_by_bedrock(use_item.held_item_runtime_id, 0)
            .ok_or(TranslateError::UnknownItem(use_item.held_item_runtime_id))?;
        debug!(
            item = %mapping.java_identifier,
            java_id = mapping.java_id,
            "remapped held item"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support;
    use conduit_proto::types::{BlockPos, Vec3};

    fn use_item_packet(action_type: u32, held_item_runtime_id: i32) -> ClientPacket {
        ClientPacket::InventoryTransaction(InventoryTransaction {
            legacy_request_id: 0,
            use_item: Some(TransactionUseItem {
                action_type,
                block_position: BlockPos::new(1, 64, 1),
                face: 1,
                hotbar_slot: 0,
                held_item_runtime_id,
                player_position: Vec3::new(1.5, 65.6, 1.5),
                click_position: Vec3::new(0.5, 1.0, 0.5),
            }),
        })
    }

    #[test]
    fn block_click_forwards_placement() {
        let (mut session, _client_rx, mut backend_rx) = test_support::session_pair();
        // 35 is the wool item in the bundled palette.
        ItemUseTranslator
            .translate(&mut session, &use_item_packet(0, 35))
            .unwrap();
        let bytes = backend_rx.try_recv().unwrap();
        assert_eq!(bytes[0], 0x2E);
    }

    #[test]
    fn air_click_forwards_use_item() {
        let (mut session, _client_rx, mut backend_rx) = test_support::session_pair();
        ItemUseTranslator
            .translate(&mut session, &use_item_packet(1, 0))
            .unwrap();
        let bytes = backend_rx.try_recv().unwrap();
        assert_eq!(bytes[0], 0x2F);
    }

    #[test]
    fn unknown_item_is_a_translate_error() {
        let (mut session, _client_rx, mut backend_rx) = test_support::session_pair();
        let result = ItemUseTranslator.translate(&mut session, &use_item_packet(0, 30_000));
        assert!(matches!(result, Err(TranslateError::UnknownItem(30_000))));
        assert!(backend_rx.try_recv().is_err());
    }
}
