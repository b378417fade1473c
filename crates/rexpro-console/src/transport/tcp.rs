//! TCP transport: one connection per exchange.
//!
//! Connect, write the request, read one framed response, close. Connect and
//! IO deadlines come from `server.connect_timeout_ms` / `server.io_timeout_ms`.

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use rexpro_core::error::{Result, RexProError};
use rexpro_core::protocol::Envelope;

use super::codec::{read_envelope, write_envelope};
use super::Transport;
use crate::config::ServerSection;

#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: String,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>, connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            io_timeout,
        }
    }

    pub fn from_config(server: &ServerSection) -> Self {
        Self::new(
            server.addr(),
            Duration::from_millis(server.connect_timeout_ms),
            Duration::from_millis(server.io_timeout_ms),
        )
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, request: Envelope) -> Result<Envelope> {
        let mut stream = timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| RexProError::Transport(format!("connect to {} timed out", self.addr)))?
            .map_err(|e| RexProError::Transport(format!("connect to {} failed: {e}", self.addr)))?;

        let msg_type = request.msg_type;
        let exchange = async {
            write_envelope(&mut stream, &request).await?;
            read_envelope(&mut stream).await
        };
        let response = timeout(self.io_timeout, exchange).await.map_err(|_| {
            RexProError::Transport(format!("no response from {} in time", self.addr))
        })??;

        tracing::debug!(
            addr = %self.addr,
            request = ?msg_type,
            response = ?response.msg_type,
            "exchange complete"
        );
        Ok(response)
    }
}
