//! Remote session: open once, evaluate scripts, close.
//!
//! One request is in flight at a time; `eval` waits for the full response
//! before returning.

use uuid::Uuid;

use rexpro_core::error::{Result, RexProError};
use rexpro_core::protocol::session::{self as messages, SessionInfo};
use rexpro_core::protocol::{Bindings, ScriptRequest, ScriptResponse};

use crate::transport::Transport;

pub struct RemoteSession<T: Transport> {
    transport: T,
    info: Option<SessionInfo>,
    last_bindings: Option<Bindings>,
}

impl<T: Transport> RemoteSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            info: None,
            last_bindings: None,
        }
    }

    /// Session key, once opened.
    pub fn session_id(&self) -> Option<Uuid> {
        self.info.as_ref().map(|i| i.session)
    }

    /// Languages the server advertised when the session opened.
    pub fn languages(&self) -> &[String] {
        self.info
            .as_ref()
            .map(|i| i.languages.as_slice())
            .unwrap_or(&[])
    }

    /// Bindings from the most recent response that carried readable ones.
    pub fn last_bindings(&self) -> Option<&Bindings> {
        self.last_bindings.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.info.is_some()
    }

    /// Open the session if needed and return its key.
    pub async fn open(&mut self) -> Result<Uuid> {
        if let Some(info) = &self.info {
            return Ok(info.session);
        }

        let reply = self.transport.send(messages::open_request()).await?;
        let info = SessionInfo::parse(messages::check_error(reply)?)?;
        if info.session.is_nil() {
            return Err(RexProError::Server("server assigned an empty session key".into()));
        }

        tracing::info!(session = %info.session, languages = ?info.languages, "session opened");
        let key = info.session;
        self.info = Some(info);
        Ok(key)
    }

    /// Evaluate `script` in `language` and return the decoded response.
    pub async fn eval(&mut self, script: &str, language: &str) -> Result<ScriptResponse> {
        let session = self.open().await?;

        let request = ScriptRequest::new(language, script).into_envelope(session)?;
        let request_id = request.request;
        let reply = messages::check_error(self.transport.send(request).await?)?;
        let response = ScriptResponse::parse(reply)?;

        if response.session != session {
            tracing::warn!(
                expected = %session,
                got = %response.session,
                "response for another session"
            );
        }
        if let Some(b) = &response.bindings {
            self.last_bindings = Some(b.clone());
        }

        tracing::debug!(
            %session,
            request = %request_id,
            lines = response.lines.len(),
            "script evaluated"
        );
        Ok(response)
    }

    /// Close the session if it is open.
    pub async fn close(&mut self) -> Result<()> {
        let Some(info) = self.info.take() else {
            return Ok(());
        };
        self.last_bindings = None;

        let reply = self.transport.send(messages::kill_request(info.session)).await?;
        messages::check_error(reply)?;
        tracing::info!(session = %info.session, "session closed");
        Ok(())
    }
}
