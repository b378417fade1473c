//! Script response: bindings block followed by result lines.
//!
//! Body layout: `[i32 bindings_len][bindings blob][result-line block]`.
//! A bindings blob that fails to parse is reported next to the lines instead
//! of failing the whole response; framing errors are always fatal.

use bytes::{Buf, Bytes, BytesMut};
use uuid::Uuid;

use super::bindings::{self, Bindings};
use super::envelope::{Envelope, MessageType};
use super::{lines, put_segment, LEN_PREFIX};
use crate::error::{Result, RexProError};
use crate::result::{self, Evaluation, ResultValue};

/// Decoded SCRIPT_RESPONSE.
#[derive(Debug)]
pub struct ScriptResponse {
    pub session: Uuid,
    pub flag: u8,
    /// `None` when the blob could not be decoded (see `bindings_error`).
    pub bindings: Option<Bindings>,
    pub bindings_error: Option<RexProError>,
    pub lines: Vec<String>,
}

/// Display shape of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Exactly one line.
    Scalar(String),
    Lines(Vec<String>),
}

impl ScriptResponse {
    /// Compose a response for a finished evaluation with no captured output.
    pub fn compose(
        session: Uuid,
        flag: u8,
        value: impl Into<ResultValue>,
        bindings: &Bindings,
    ) -> Result<Envelope> {
        Self::compose_evaluation(session, flag, Evaluation::new(value), bindings)
    }

    /// Compose a response from a result value and its captured output.
    pub fn compose_evaluation(
        session: Uuid,
        flag: u8,
        eval: Evaluation,
        bindings: &Bindings,
    ) -> Result<Envelope> {
        let blob = bindings::serialize(bindings)?;
        let block = lines::encode(&result::normalize(eval))?;
        let body = encode_body(&blob, &block)?;

        tracing::debug!(
            %session,
            bindings_len = blob.len(),
            lines_len = block.len(),
            "script response composed"
        );
        Ok(Envelope::new(MessageType::ScriptResponse, flag, session, body))
    }

    /// Parse a received envelope. Fails unless it is a SCRIPT_RESPONSE.
    pub fn parse(env: Envelope) -> Result<Self> {
        let env = env.expect_type(MessageType::ScriptResponse)?;
        let mut body = env.body;

        if body.remaining() < LEN_PREFIX {
            return Err(RexProError::MalformedEnvelope(format!(
                "script response body too short: {} bytes",
                body.remaining()
            )));
        }
        let declared = body.get_i32();
        let blob = match usize::try_from(declared) {
            Ok(len) if len <= body.remaining() => body.split_to(len),
            _ => {
                return Err(RexProError::MalformedEnvelope(format!(
                    "bindings length {declared} exceeds body ({} bytes left)",
                    body.remaining()
                )))
            }
        };

        let (bindings, bindings_error) = match bindings::deserialize(&blob) {
            Ok(b) => (Some(b), None),
            Err(e) => {
                tracing::warn!(
                    session = %env.session,
                    error = %e,
                    "script response bindings unreadable"
                );
                (None, Some(e))
            }
        };

        let lines = lines::decode(body)?;

        Ok(Self {
            session: env.session,
            flag: env.flag,
            bindings,
            bindings_error,
            lines,
        })
    }

    /// Collapse a one-line response to a scalar. Display convenience only.
    pub fn into_reply(self) -> Reply {
        let mut lines = self.lines;
        if lines.len() == 1 {
            if let Some(only) = lines.pop() {
                return Reply::Scalar(only);
            }
        }
        Reply::Lines(lines)
    }
}

/// Raw body from already-encoded parts, for callers framing their own blobs.
pub fn encode_body(bindings_blob: &[u8], line_block: &[u8]) -> Result<Bytes> {
    let mut body = BytesMut::with_capacity(LEN_PREFIX + bindings_blob.len() + line_block.len());
    put_segment(&mut body, bindings_blob)
        .ok_or_else(|| RexProError::MalformedEnvelope("bindings blob too large".into()))?;
    body.extend_from_slice(line_block);
    Ok(body.freeze())
}
