//! Protocol-level errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("buffer too short: need {needed} more bytes, have {remaining}")]
    BufferTooShort { needed: usize, remaining: usize },

    #[error("VarInt encoding error: {0}")]
    VarInt(#[from] crate::types::VarIntError),

    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    #[error("decompression error: {0}")]
    DecompressError(String),

    #[error("compression error: {0}")]
    CompressError(String),

    #[error("frame exceeds maximum size: {0} bytes")]
    FrameTooLarge(usize),

    #[error("unknown packet id: 0x{0:02X}")]
    UnknownPacketId(u32),

    #[error("unsupported metadata type: {0}")]
    UnsupportedMetadataType(i32),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
