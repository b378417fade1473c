//! Transport layer (TCP).
//!
//! Exposes the `Transport` seam used by sessions, the stream codec that frames
//! whole envelopes, and the TCP implementation.

pub mod codec;
pub mod tcp;

use async_trait::async_trait;

use rexpro_core::error::Result;
use rexpro_core::protocol::Envelope;

pub use tcp::TcpTransport;

/// One request out, one complete response back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Envelope) -> Result<Envelope>;
}
