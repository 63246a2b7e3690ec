//! Backend-leg framing: varint length prefix with optional zlib body.
//!
//! Below the negotiated threshold a frame carries `0x00` (uncompressed
//! marker) followed by the raw packet; at or above it the marker is the
//! uncompressed length and the body is deflated.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::codec::MAX_FRAME_LEN;
use crate::error::ProtoError;
use crate::types::VarIntError;

use super::codec::{read_varint, write_varint};

/// Framing configuration for the backend leg.
#[derive(Debug, Clone, Copy)]
pub struct FrameConfig {
    /// `None` until the backend enables compression.
    pub compression_threshold: Option<usize>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            compression_threshold: None,
        }
    }
}

/// Frame a packet (`varint(id) + body` in `payload`) for the wire.
pub fn write_frame(
    out: &mut BytesMut,
    payload: &[u8],
    config: &FrameConfig,
) -> Result<(), ProtoError> {
    match config.compression_threshold {
        None => {
            write_varint(out, payload.len() as i32);
            out.put_slice(payload);
        }
        Some(threshold) if payload.len() < threshold => {
            // Data-length 0 marks an uncompressed body.
            write_varint(out, payload.len() as i32 + 1);
            out.put_u8(0);
            out.put_slice(payload);
        }
        Some(_) => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(payload)
                .and_then(|_| encoder.finish())
                .map_err(|e| ProtoError::CompressError(e.to_string()))
                .map(|compressed| {
                    let mut header = BytesMut::new();
                    write_varint(&mut header, payload.len() as i32);
                    write_varint(out, (header.len() + compressed.len()) as i32);
                    out.put_slice(&header);
                    out.put_slice(&compressed);
                })?;
        }
    }
    Ok(())
}

/// Try to split one complete frame off the front of `buf`, returning the
/// decompressed packet payload. `Ok(None)` means more bytes are needed.
pub fn read_frame(buf: &mut BytesMut, config: &FrameConfig) -> Result<Option<Bytes>, ProtoError> {
    let mut peek = &buf[..];
    let frame_len = match read_varint(&mut peek) {
        Ok(v) => v as usize,
        Err(ProtoError::VarInt(VarIntError::BufferTooShort)) => return Ok(None),
        Err(e) => return Err(e),
    };
    if frame_len > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge(frame_len));
    }
    let header = buf.len() - peek.remaining();
    if buf.len() < header + frame_len {
        return Ok(None);
    }
    buf.advance(header);
    let mut frame = buf.split_to(frame_len).freeze();

    if config.compression_threshold.is_none() {
        return Ok(Some(frame));
    }

    let data_len = read_varint(&mut frame)? as usize;
    if data_len == 0 {
        return Ok(Some(frame));
    }
    if data_len > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge(data_len));
    }
    let mut decoder = ZlibDecoder::new(frame.as_ref());
    let mut raw = Vec::with_capacity(data_len);
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| ProtoError::DecompressError(e.to_string()))?;
    if raw.len() != data_len {
        return Err(ProtoError::InvalidData(format!(
            "frame declared {data_len} bytes, inflated to {}",
            raw.len()
        )));
    }
    Ok(Some(Bytes::from(raw)))
}
