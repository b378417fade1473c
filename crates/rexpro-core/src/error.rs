//! Shared error type across RexPro crates.

use thiserror::Error;

use crate::protocol::envelope::MessageType;

/// Stable error codes (used in logs and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Envelope or body framing is structurally invalid.
    MalformedEnvelope,
    /// A type-specialized parser received a different message type.
    UnexpectedMessageType,
    /// Result-line block is shorter than a declared segment.
    TruncatedSegment,
    /// Bindings blob could not be parsed.
    BindingsDecode,
    /// Array element or map value was null where text is required.
    ElementToText,
    /// Invalid console configuration.
    Config,
    /// Connection, timeout, or socket failure.
    Transport,
    /// Server answered with an ERROR message.
    Server,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::MalformedEnvelope => "MALFORMED_ENVELOPE",
            ErrorKind::UnexpectedMessageType => "UNEXPECTED_MESSAGE_TYPE",
            ErrorKind::TruncatedSegment => "TRUNCATED_SEGMENT",
            ErrorKind::BindingsDecode => "BINDINGS_DECODE",
            ErrorKind::ElementToText => "ELEMENT_TO_TEXT",
            ErrorKind::Config => "CONFIG",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Server => "SERVER",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RexProError>;

/// Unified error type used by core and console.
#[derive(Debug, Error)]
pub enum RexProError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("unexpected message type: expected {expected:?}, got {actual:?}")]
    UnexpectedMessageType {
        expected: MessageType,
        actual: MessageType,
    },
    #[error("truncated segment: {0}")]
    TruncatedSegment(String),
    #[error("bindings decode failed: {0}")]
    BindingsDecode(String),
    #[error("{0}")]
    ElementToText(String),
    #[error("config: {0}")]
    Config(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("{0}")]
    Server(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RexProError {
    /// Map the error to its stable code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RexProError::MalformedEnvelope(_) => ErrorKind::MalformedEnvelope,
            RexProError::UnexpectedMessageType { .. } => ErrorKind::UnexpectedMessageType,
            RexProError::TruncatedSegment(_) => ErrorKind::TruncatedSegment,
            RexProError::BindingsDecode(_) => ErrorKind::BindingsDecode,
            RexProError::ElementToText(_) => ErrorKind::ElementToText,
            RexProError::Config(_) => ErrorKind::Config,
            RexProError::Transport(_) => ErrorKind::Transport,
            RexProError::Server(_) => ErrorKind::Server,
            RexProError::Internal(_) => ErrorKind::Internal,
        }
    }
}
