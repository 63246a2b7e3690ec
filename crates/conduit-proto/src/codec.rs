//! Encoding/decoding traits and Bedrock string/frame helpers.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtoError;
use crate::types::VarUInt32;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Write a Bedrock protocol string (VarUInt32 length + UTF-8).
pub fn write_string(buf: &mut impl BufMut, s: &str) {
    VarUInt32(s.len() as u32).proto_encode(buf);
    buf.put_slice(s.as_bytes());
}

/// Read a Bedrock protocol string (VarUInt32 length + UTF-8).
pub fn read_string(buf: &mut impl Buf) -> Result<String, ProtoError> {
    let len = VarUInt32::proto_decode(buf)?.0 as usize;
    if buf.remaining() < len {
        return Err(ProtoError::BufferTooShort {
            needed: len,
            remaining: buf.remaining(),
        });
    }
    let data = buf.copy_to_bytes(len);
    String::from_utf8(data.to_vec()).map_err(|_| ProtoError::InvalidUtf8)
}

/// Hard cap on a single client-leg frame. Anything larger is malformed.
pub const MAX_FRAME_LEN: usize = 2 * 1024 * 1024;

/// Frame a client-leg packet payload (VarUInt32 length + payload).
pub fn write_frame(buf: &mut BytesMut, payload: &[u8]) {
    VarUInt32(payload.len() as u32).proto_encode(buf);
    buf.put_slice(payload);
}

/// Try to split one complete client-leg frame off the front of `buf`.
///
/// Returns `Ok(None)` when the buffer does not yet hold a full frame; the
/// caller keeps accumulating bytes and retries.
pub fn read_frame(buf: &mut BytesMut) -> Result<Option<Bytes>, ProtoError> {
    let mut peek = &buf[..];
    let len = match VarUInt32::proto_decode(&mut peek) {
        Ok(v) => v.0 as usize,
        Err(ProtoError::VarInt(crate::types::VarIntError::BufferTooShort)) => return Ok(None),
        Err(e) => return Err(e),
    };
    if len > MAX_FRAME_LEN {
        return Err(ProtoError::FrameTooLarge(len));
    }
    let header = buf.len() - peek.remaining();
    if buf.len() < header + len {
        return Ok(None);
    }
    buf.advance(header);
    Ok(Some(buf.split_to(len).freeze()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_roundtrip() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "Hello, world!");
        let result = read_string(&mut buf.freeze()).unwrap();
        assert_eq!(result, "Hello, world!");
    }

    #[test]
    fn string_empty() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "");
        let result = read_string(&mut buf.freeze()).unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn string_buffer_too_short() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "Hello");
        let truncated = buf.freeze().slice(..3);
        assert!(read_string(&mut truncated.clone()).is_err());
    }

    #[test]
    fn frame_roundtrip() {
        let mut buf = BytesMut::new();
        write_frame(&mut buf, b"abc");
        write_frame(&mut buf, b"defg");
        assert_eq!(read_frame(&mut buf).unwrap().unwrap().as_ref(), b"abc");
        assert_eq!(read_frame(&mut buf).unwrap().unwrap().as_ref(), b"defg");
        assert!(read_frame(&mut buf).unwrap().is_none());
    }

    #[test]
    fn frame_partial() {
        let mut full = BytesMut::new();
        write_frame(&mut full, b"hello frame");
        let mut partial = BytesMut::from(&full[..4]);
        assert!(read_frame(&mut partial).unwrap().is_none());
        partial.extend_from_slice(&full[4..]);
        assert_eq!(
            read_frame(&mut partial).unwrap().unwrap().as_ref(),
            b"hello frame"
        );
    }
}
