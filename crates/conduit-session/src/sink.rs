//! Outbound packet sinks.
//!
//! Emission is a non-blocking enqueue onto the owning leg's writer task.
//! A closed channel means the leg is tearing down; the packet is dropped,
//! which is fine — no new state will be dispatched afterwards.

use bytes::Bytes;
use tokio::sync::mpsc;

use conduit_proto::bedrock::BedrockPacket;

/// Sender half of the client leg.
#[derive(Debug, Clone)]
pub struct ClientSink(mpsc::UnboundedSender<BedrockPacket>);

impl ClientSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BedrockPacket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    pub fn send(&self, packet: BedrockPacket) {
        let _ = self.0.send(packet);
    }
}

/// Sender half of the backend leg; carries pre-encoded packet bodies.
#[derive(Debug, Clone)]
pub struct BackendSink(mpsc::UnboundedSender<Bytes>);

impl BackendSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }

    pub fn send(&self, payload: Bytes) {
        let _ = self.0.send(payload);
    }
}
