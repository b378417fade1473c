//! Stream framing for envelopes.
//!
//! - Writes the encoded envelope in one call.
//! - Reads the fixed header, then exactly the declared body.
//! - A frame is fully buffered before it is decoded.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use rexpro_core::error::{Result, RexProError};
use rexpro_core::protocol::envelope::{peek_body_len, HEADER_LEN};
use rexpro_core::protocol::Envelope;

/// Upper bound on a single response body.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub async fn write_envelope<W>(w: &mut W, env: &Envelope) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let raw = env.encode()?;
    w.write_all(&raw).await.map_err(io_err)?;
    w.flush().await.map_err(io_err)?;
    Ok(())
}

pub async fn read_envelope<R>(r: &mut R) -> Result<Envelope>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::zeroed(HEADER_LEN);
    r.read_exact(&mut buf).await.map_err(io_err)?;

    let body_len = peek_body_len(&buf)?;
    if body_len > MAX_BODY_BYTES {
        return Err(RexProError::MalformedEnvelope(format!(
            "body of {body_len} bytes exceeds limit of {MAX_BODY_BYTES}"
        )));
    }

    buf.resize(HEADER_LEN + body_len, 0);
    r.read_exact(&mut buf[HEADER_LEN..]).await.map_err(io_err)?;

    Envelope::decode(buf.freeze())
}

fn io_err(e: std::io::Error) -> RexProError {
    RexProError::Transport(e.to_string())
}
