//! Session and error messages.
//!
//! A session is opened with a SESSION_REQUEST carrying the nil session id and
//! flag `SESSION_NEW`; the server answers with a SESSION_RESPONSE whose
//! envelope session id is the assigned key and whose body lists the script
//! languages available (a result-line block). Flag `SESSION_KILL` closes it.

use bytes::Bytes;
use uuid::Uuid;

use super::envelope::{Envelope, MessageType};
use super::lines;
use crate::error::{Result, RexProError};

/// SESSION_REQUEST flag: open a new session.
pub const SESSION_NEW: u8 = 0;
/// SESSION_REQUEST flag: destroy an existing session.
pub const SESSION_KILL: u8 = 1;

/// Request a new session.
pub fn open_request() -> Envelope {
    Envelope::new(MessageType::SessionRequest, SESSION_NEW, Uuid::nil(), Bytes::new())
}

/// Request that `session` be destroyed.
pub fn kill_request(session: Uuid) -> Envelope {
    Envelope::new(MessageType::SessionRequest, SESSION_KILL, session, Bytes::new())
}

/// Server-side answer to an open request.
pub fn response<S: AsRef<str>>(session: Uuid, languages: &[S]) -> Result<Envelope> {
    let body = lines::encode(languages)?;
    Ok(Envelope::new(MessageType::SessionResponse, 0, session, body))
}

/// Accepted session: assigned key plus available languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub session: Uuid,
    pub languages: Vec<String>,
}

impl SessionInfo {
    pub fn parse(env: Envelope) -> Result<Self> {
        let env = env.expect_type(MessageType::SessionResponse)?;
        let languages = lines::decode(env.body)?;
        Ok(Self {
            session: env.session,
            languages,
        })
    }
}

/// Build an ERROR message carrying `message` as its body.
pub fn error_response(session: Uuid, flag: u8, message: &str) -> Envelope {
    Envelope::new(
        MessageType::Error,
        flag,
        session,
        Bytes::copy_from_slice(message.as_bytes()),
    )
}

/// Turn an ERROR envelope into `RexProError::Server`; other kinds pass through.
pub fn check_error(env: Envelope) -> Result<Envelope> {
    if env.msg_type == MessageType::Error {
        let msg = String::from_utf8_lossy(&env.body).into_owned();
        return Err(RexProError::Server(msg));
    }
    Ok(env)
}
