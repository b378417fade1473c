//! Script request body.
//!
//! Layout: `[i32 lang_len][lang][i32 script_len][script][i32 bindings_len][bindings]`.

use bytes::{Buf, Bytes, BytesMut};
use uuid::Uuid;

use super::bindings::{self, Bindings};
use super::envelope::{Envelope, MessageType};
use super::{put_segment, LEN_PREFIX};
use crate::error::{Result, RexProError};

/// A script to evaluate in a named language.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    pub language: String,
    pub script: String,
    pub bindings: Bindings,
}

impl ScriptRequest {
    pub fn new(language: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            script: script.into(),
            bindings: Bindings::new(),
        }
    }

    pub fn encode_body(&self) -> Result<Bytes> {
        let blob = bindings::serialize(&self.bindings)?;
        let mut out = BytesMut::with_capacity(
            3 * LEN_PREFIX + self.language.len() + self.script.len() + blob.len(),
        );
        for part in [self.language.as_bytes(), self.script.as_bytes(), blob.as_slice()] {
            put_segment(&mut out, part).ok_or_else(|| {
                RexProError::MalformedEnvelope("script request field too large".into())
            })?;
        }
        Ok(out.freeze())
    }

    pub fn decode_body(mut body: Bytes) -> Result<Self> {
        let language = take_segment(&mut body, "language")?;
        let script = take_segment(&mut body, "script")?;
        let blob = take_segment(&mut body, "bindings")?;
        Ok(Self {
            language: String::from_utf8_lossy(&language).into_owned(),
            script: String::from_utf8_lossy(&script).into_owned(),
            bindings: bindings::deserialize(&blob)?,
        })
    }

    /// Wrap as a SCRIPT_REQUEST for `session`.
    pub fn into_envelope(self, session: Uuid) -> Result<Envelope> {
        let body = self.encode_body()?;
        Ok(Envelope::new(MessageType::ScriptRequest, 0, session, body))
    }

    /// Parse a received SCRIPT_REQUEST envelope.
    pub fn parse(env: Envelope) -> Result<Self> {
        let env = env.expect_type(MessageType::ScriptRequest)?;
        Self::decode_body(env.body)
    }
}

fn take_segment(buf: &mut Bytes, field: &str) -> Result<Bytes> {
    if buf.remaining() < LEN_PREFIX {
        return Err(RexProError::MalformedEnvelope(format!(
            "script request missing {field} length"
        )));
    }
    let declared = buf.get_i32();
    match usize::try_from(declared) {
        Ok(len) if len <= buf.remaining() => Ok(buf.split_to(len)),
        _ => Err(RexProError::MalformedEnvelope(format!(
            "script request {field} length {declared} out of range"
        ))),
    }
}
