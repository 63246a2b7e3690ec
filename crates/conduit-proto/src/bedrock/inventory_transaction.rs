//! InventoryTransaction (0x1E) — Client → Proxy.
//!
//! Only the item-use transaction is decoded; it is the one path where the
//! client references items by target-protocol runtime ID and therefore
//! needs remapping before the backend sees it.

use bytes::{Buf, BufMut};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::{BlockPos, VarInt, VarUInt32, Vec3};

/// Transaction type discriminants.
pub mod transaction_type {
    pub const NORMAL: u32 = 0;
    pub const MISMATCH: u32 = 1;
    pub const ITEM_USE: u32 = 2;
}

/// Item-use payload: place, use, or destroy aimed at a block.
#[derive(Debug, Clone)]
pub struct TransactionUseItem {
    /// 0 = place/click block, 1 = use item in air, 2 = destroy.
    pub action_type: u32,
    pub block_position: BlockPos,
    pub face: i32,
    pub hotbar_slot: i32,
    /// Target-protocol runtime ID of the held item (0 = empty hand).
    pub held_item_runtime_id: i32,
    pub player_position: Vec3,
    pub click_position: Vec3,
}

/// InventoryTransaction packet (item-use subset).
#[derive(Debug, Clone)]
pub struct InventoryTransaction {
    pub legacy_request_id: i32,
    pub use_item: Option<TransactionUseItem>,
}

impl ProtoEncode for InventoryTransaction {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.legacy_request_id).proto_encode(buf);
        match &self.use_item {
            Some(use_item) => {
                VarUInt32(transaction_type::ITEM_USE).proto_encode(buf);
                // No inventory actions carried on the proxy path.
                VarUInt32(0).proto_encode(buf);
                VarUInt32(use_item.action_type).proto_encode(buf);
                use_item.block_position.proto_encode(buf);
                VarInt(use_item.face).proto_encode(buf);
                VarInt(use_item.hotbar_slot).proto_encode(buf);
                VarInt(use_item.held_item_runtime_id).proto_encode(buf);
                use_item.player_position.proto_encode(buf);
                use_item.click_position.proto_encode(buf);
            }
            None => {
                VarUInt32(transaction_type::NORMAL).proto_encode(buf);
                VarUInt32(0).proto_encode(buf);
            }
        }
    }
}

impl ProtoDecode for InventoryTransaction {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let legacy_request_id = VarInt::proto_decode(buf)?.0;
        let tx_type = VarUInt32::proto_decode(buf)?.0;
        let action_count = VarUInt32::proto_decode(buf)?.0;
        if action_count != 0 {
            return Err(ProtoError::InvalidData(format!(
                "unexpected inventory actions: {action_count}"
            )));
        }
        let use_item = if tx_type == transaction_type::ITEM_USE {
            Some(TransactionUseItem {
                action_type: VarUInt32::proto_decode(buf)?.0,
                block_position: BlockPos::proto_decode(buf)?,
                face: VarInt::proto_decode(buf)?.0,
                hotbar_slot: VarInt::proto_decode(buf)?.0,
                held_item_runtime_id: VarInt::proto_decode(buf)?.0,
                player_position: Vec3::proto_decode(buf)?,
                click_position: Vec3::proto_decode(buf)?,
            })
        } else {
            None
        };
        Ok(InventoryTransaction {
            legacy_request_id,
            use_item,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn item_use_roundtrip() {
        let pkt = InventoryTransaction {
            legacy_request_id: 0,
            use_item: Some(TransactionUseItem {
                action_type: 0,
                block_position: BlockPos::new(10, 64, -3),
                face: 1,
                hotbar_slot: 2,
                held_item_runtime_id: 5,
                player_position: Vec3::new(10.5, 65.6, -2.5),
                click_position: Vec3::new(0.5, 1.0, 0.5),
            }),
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        let decoded = InventoryTransaction::proto_decode(&mut buf.freeze()).unwrap();
        let use_item = decoded.use_item.expect("item use payload");
        assert_eq!(use_item.held_item_runtime_id, 5);
        assert_eq!(use_item.block_position, BlockPos::new(10, 64, -3));
        assert_eq!(use_item.hotbar_slot, 2);
    }

    #[test]
    fn normal_transaction_has_no_payload() {
        let pkt = InventoryTransaction {
            legacy_request_id: 0,
            use_item: None,
        };
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        let decoded = InventoryTransaction::proto_decode(&mut buf.freeze()).unwrap();
        assert!(decoded.use_item.is_none());
    }
}
