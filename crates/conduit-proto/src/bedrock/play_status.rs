//! PlayStatus (0x02) — Proxy → Client.

use bytes::BufMut;

use crate::codec::ProtoEncode;

/// Status codes the proxy sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatusType {
    LoginSuccess = 0,
    FailedClientOutdated = 1,
    FailedServerOutdated = 2,
    PlayerSpawn = 3,
}

/// PlayStatus packet.
#[derive(Debug, Clone)]
pub struct PlayStatus {
    pub status: PlayStatusType,
}

impl ProtoEncode for PlayStatus {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        // Big-endian, unlike the rest of the protocol.
        buf.put_i32(self.status as i32);
    }
}
