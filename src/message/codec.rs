//! Wire framing for cross-member delivery.
//!
//! Frame layout (all integers big-endian):
//!
//! ```text
//! [u32 frame_len][u16 proto_version][u16 tag_len][tag_len bytes: type tag][payload...]
//! ```
//!
//! `frame_len` counts everything after itself. The type tag is the
//! registered manifest string used to pick a deserializer on the receiving
//! side (the wire is the one place in this crate where message types are
//! erased to bytes, mirroring the spec's own wire contract).

// Layer 1: Standard library imports
use std::io;

// Layer 2: Third-party crate imports
use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;
use tokio_util::codec::{Decoder, Encoder};

// Layer 3: Internal module imports
// (none)

/// Current wire protocol version. Bumped on incompatible frame-layout
/// changes; a mismatch is always fatal to the connection.
pub const PROTO_VERSION: u16 = 1;

const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// One decoded frame: a type tag plus its still-serialized payload. The
/// codec does not deserialize the payload itself — that is the transport
/// layer's job, once it knows which concrete type the tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub type_tag: String,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(type_tag: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            type_tag: type_tag.into(),
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: u32, max: u32 },

    #[error("unsupported wire protocol version {found} (expected {expected})")]
    MalformedFrame { found: u16, expected: u16 },

    #[error("frame declares a type tag longer than its own body")]
    TruncatedTag,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// `tokio_util::codec::{Encoder, Decoder}` pair for [`Frame`]s over a
/// `Framed<TcpStream, _>` (see `transport`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ClusterCodec;

impl Encoder<Frame> for ClusterCodec {
    type Error = CodecError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let tag_bytes = frame.type_tag.as_bytes();
        let tag_len = tag_bytes.len() as u16;
        let body_len = 2 + 2 + tag_bytes.len() + frame.payload.len();
        let frame_len = body_len as u32;
        if frame_len > MAX_FRAME_LEN {
            return Err(CodecError::FrameTooLarge {
                len: frame_len,
                max: MAX_FRAME_LEN,
            });
        }

        dst.reserve(4 + body_len);
        dst.put_u32(frame_len);
        dst.put_u16(PROTO_VERSION);
        dst.put_u16(tag_len);
        dst.put_slice(tag_bytes);
        dst.put_slice(&frame.payload);
        Ok(())
    }
}

impl Decoder for ClusterCodec {
    type Item = Frame;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < 4 {
            return Ok(None);
        }
        let frame_len = u32::from_be_bytes(src[0..4].try_into().expect("checked len"));
        if frame_len > MAX_FRAME_LEN {
            return Err(CodecError::FrameTooLarge {
                len: frame_len,
                max: MAX_FRAME_LEN,
            });
        }
        if src.len() < 4 + frame_len as usize {
            src.reserve(4 + frame_len as usize - src.len());
            return Ok(None);
        }

        src.advance(4);
        let mut body = src.split_to(frame_len as usize);

        if body.len() < 4 {
            return Err(CodecError::TruncatedTag);
        }
        let proto_version = body.get_u16();
        if proto_version != PROTO_VERSION {
            return Err(CodecError::MalformedFrame {
                found: proto_version,
                expected: PROTO_VERSION,
            });
        }
        let tag_len = body.get_u16() as usize;
        if body.len() < tag_len {
            return Err(CodecError::TruncatedTag);
        }
        let tag_bytes = body.split_to(tag_len);
        let type_tag = String::from_utf8(tag_bytes.to_vec())
            .map_err(|_| CodecError::TruncatedTag)?;
        let payload = body.freeze();

        Ok(Some(Frame { type_tag, payload }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_frame() {
        let mut codec = ClusterCodec;
        let mut buf = BytesMut::new();
        let frame = Frame::new("hello.Greet", Bytes::from_static(b"{\"name\":\"world\"}"));
        codec.encode(frame.clone(), &mut buf).unwrap();

        let decoded = codec.decode(&mut buf).unwrap().expect("one frame");
        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_waits_for_a_full_frame() {
        let mut codec = ClusterCodec;
        let mut buf = BytesMut::new();
        codec
            .encode(Frame::new("tag", Bytes::from_static(b"payload")), &mut buf)
            .unwrap();

        let mut partial = buf.split_to(buf.len() - 1);
        assert!(codec.decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn rejects_mismatched_proto_version() {
        let mut codec = ClusterCodec;
        let mut buf = BytesMut::new();
        buf.put_u32(4);
        buf.put_u16(99); // wrong version
        buf.put_u16(0);

        let result = codec.decode(&mut buf);
        assert!(matches!(result, Err(CodecError::MalformedFrame { .. })));
    }

    #[test]
    fn rejects_oversized_frames() {
        let mut codec = ClusterCodec;
        let mut buf = BytesMut::new();
        buf.put_u32(MAX_FRAME_LEN + 1);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(CodecError::FrameTooLarge { .. })
        ));
    }
}
