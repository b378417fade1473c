//! Message envelope: the fixed header shared by every RexPro message.
//!
//! Layout (big-endian):
//! `version(1) type(1) flag(1) session(16) request(16) body_len(4) body`
//!
//! Parsing rules:
//! - Never index the buffer; check `remaining()` before every read.
//! - A negative or oversized body length is a framing error, not a panic.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::error::{Result, RexProError};

/// Protocol version written by this implementation.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the fixed header preceding the body.
pub const HEADER_LEN: usize = 1 + 1 + 1 + 16 + 16 + 4;

/// Message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Error,
    SessionRequest,
    SessionResponse,
    ScriptRequest,
    ScriptResponse,
}

impl MessageType {
    /// Wire byte for this kind.
    pub fn as_u8(self) -> u8 {
        match self {
            MessageType::Error => 0,
            MessageType::SessionRequest => 1,
            MessageType::SessionResponse => 2,
            MessageType::ScriptRequest => 3,
            MessageType::ScriptResponse => 5,
        }
    }

    /// Kind for a wire byte, if known.
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(MessageType::Error),
            1 => Some(MessageType::SessionRequest),
            2 => Some(MessageType::SessionResponse),
            3 => Some(MessageType::ScriptRequest),
            5 => Some(MessageType::ScriptResponse),
            _ => None,
        }
    }
}

/// Decoded message envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Protocol version (kept as data, not enforced).
    pub version: u8,
    /// Message kind.
    pub msg_type: MessageType,
    /// Opaque modifier byte.
    pub flag: u8,
    /// Session the message belongs to.
    pub session: Uuid,
    /// Per-message id used to correlate responses.
    pub request: Uuid,
    /// Type-dependent payload (zero-copy).
    pub body: Bytes,
}

impl Envelope {
    /// Build an envelope at the current version with a fresh request id.
    pub fn new(msg_type: MessageType, flag: u8, session: Uuid, body: impl Into<Bytes>) -> Self {
        Self {
            version: CURRENT_VERSION,
            msg_type,
            flag,
            session,
            request: Uuid::new_v4(),
            body: body.into(),
        }
    }

    /// Encode header and body into one buffer.
    pub fn encode(&self) -> Result<Bytes> {
        let body_len = i32::try_from(self.body.len()).map_err(|_| {
            RexProError::MalformedEnvelope(format!("body too large: {} bytes", self.body.len()))
        })?;

        let mut out = BytesMut::with_capacity(HEADER_LEN + self.body.len());
        out.put_u8(self.version);
        out.put_u8(self.msg_type.as_u8());
        out.put_u8(self.flag);
        out.put_slice(self.session.as_bytes());
        out.put_slice(self.request.as_bytes());
        out.put_i32(body_len);
        out.put_slice(&self.body);

        tracing::trace!(msg_type = ?self.msg_type, body_len, "envelope encoded");
        Ok(out.freeze())
    }

    /// Decode an envelope. Bytes past the declared body are ignored.
    pub fn decode(mut buf: Bytes) -> Result<Self> {
        if buf.remaining() < HEADER_LEN {
            return Err(RexProError::MalformedEnvelope(format!(
                "header needs {HEADER_LEN} bytes, got {}",
                buf.remaining()
            )));
        }

        let version = buf.get_u8();
        let type_byte = buf.get_u8();
        let msg_type = MessageType::from_u8(type_byte).ok_or_else(|| {
            RexProError::MalformedEnvelope(format!("unknown message type: {type_byte}"))
        })?;
        let flag = buf.get_u8();
        let session = get_uuid(&mut buf);
        let request = get_uuid(&mut buf);

        let declared = buf.get_i32();
        let body_len = usize::try_from(declared).map_err(|_| {
            RexProError::MalformedEnvelope(format!("negative body length: {declared}"))
        })?;
        if buf.remaining() < body_len {
            return Err(RexProError::MalformedEnvelope(format!(
                "body declares {body_len} bytes, {} available",
                buf.remaining()
            )));
        }
        let body = buf.split_to(body_len);

        Ok(Self {
            version,
            msg_type,
            flag,
            session,
            request,
            body,
        })
    }

    /// Refuse envelopes of any other kind. Call before parsing the body.
    pub fn expect_type(self, expected: MessageType) -> Result<Self> {
        if self.msg_type != expected {
            return Err(RexProError::UnexpectedMessageType {
                expected,
                actual: self.msg_type,
            });
        }
        Ok(self)
    }
}

/// Body length declared by a complete header, for stream readers.
pub fn peek_body_len(header: &[u8]) -> Result<usize> {
    let mut len_field = header.get(HEADER_LEN - 4..HEADER_LEN).ok_or_else(|| {
        RexProError::MalformedEnvelope(format!(
            "header needs {HEADER_LEN} bytes, got {}",
            header.len()
        ))
    })?;
    let declared = len_field.get_i32();
    usize::try_from(declared)
        .map_err(|_| RexProError::MalformedEnvelope(format!("negative body length: {declared}")))
}

// Caller guarantees 16 bytes remain.
fn get_uuid(buf: &mut Bytes) -> Uuid {
    let mut raw = [0u8; 16];
    buf.copy_to_slice(&mut raw);
    Uuid::from_bytes(raw)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Envelope {
        Envelope {
            version: 7,
            msg_type: MessageType::ScriptResponse,
            flag: 0x80,
            session: Uuid::from_u128(0x0102_0304_0506_0708_090a_0b0c_0d0e_0f10),
            request: Uuid::from_u128(0xffee_ddcc_bbaa_9988_7766_5544_3322_1100),
            body: Bytes::from_static(b"payload"),
        }
    }

    #[test]
    fn round_trips_all_fields() {
        let env = sample();
        let raw = env.encode().unwrap();
        assert_eq!(raw.len(), HEADER_LEN + 7);
        assert_eq!(Envelope::decode(raw).unwrap(), env);
    }

    #[test]
    fn header_layout_is_big_endian() {
        let raw = sample().encode().unwrap();
        assert_eq!(&raw[..3], &[7, 5, 0x80]);
        assert_eq!(raw[3], 0x01);
        assert_eq!(raw[19], 0xff);
        assert_eq!(&raw[35..39], &[0, 0, 0, 7]);
        assert_eq!(peek_body_len(&raw).unwrap(), 7);
    }

    #[test]
    fn empty_body_round_trips() {
        let env = Envelope::new(MessageType::SessionRequest, 0, Uuid::nil(), Bytes::new());
        let back = Envelope::decode(env.encode().unwrap()).unwrap();
        assert!(back.body.is_empty());
        assert_eq!(back.version, CURRENT_VERSION);
        assert_eq!(back.request, env.request);
    }

    #[test]
    fn fresh_request_ids_differ() {
        let a = Envelope::new(MessageType::ScriptRequest, 0, Uuid::nil(), Bytes::new());
        let b = Envelope::new(MessageType::ScriptRequest, 0, Uuid::nil(), Bytes::new());
        assert_ne!(a.request, b.request);
    }

    #[test]
    fn short_header_is_malformed() {
        let raw = sample().encode().unwrap();
        let err = Envelope::decode(raw.slice(..HEADER_LEN - 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
    }

    #[test]
    fn short_body_is_malformed() {
        let raw = sample().encode().unwrap();
        let err = Envelope::decode(raw.slice(..raw.len() - 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
    }

    #[test]
    fn negative_body_length_is_malformed() {
        let mut raw = BytesMut::from(&sample().encode().unwrap()[..HEADER_LEN]);
        raw[35] = 0x80;
        let err = Envelope::decode(raw.freeze()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
    }

    #[test]
    fn unknown_type_is_malformed() {
        let mut raw = BytesMut::from(&sample().encode().unwrap()[..]);
        raw[1] = 4;
        let err = Envelope::decode(raw.freeze()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEnvelope);
    }

    #[test]
    fn expect_type_guards_kind() {
        let env = sample();
        assert!(env.clone().expect_type(MessageType::ScriptResponse).is_ok());
        let err = env.expect_type(MessageType::ScriptRequest).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedMessageType);
    }
}
