//! Result-line block: `([i32 len][len bytes UTF-8])*`.
//!
//! Decoding consumes segments until the buffer is exhausted. Each iteration
//! consumes at least the 4-byte prefix, so the loop is bounded by the input.

use bytes::{Buf, Bytes, BytesMut};

use super::{put_segment, LEN_PREFIX};
use crate::error::{Result, RexProError};

/// Encode lines in order. An empty list encodes to no bytes.
pub fn encode<S: AsRef<str>>(lines: &[S]) -> Result<Bytes> {
    let total: usize = lines.iter().map(|l| LEN_PREFIX + l.as_ref().len()).sum();
    let mut out = BytesMut::with_capacity(total);
    for line in lines {
        let text = line.as_ref();
        put_segment(&mut out, text.as_bytes()).ok_or_else(|| {
            RexProError::Internal(format!("result line too large: {} bytes", text.len()))
        })?;
    }
    Ok(out.freeze())
}

/// Decode every segment in `buf`.
pub fn decode(mut buf: Bytes) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    while buf.has_remaining() {
        if buf.remaining() < LEN_PREFIX {
            return Err(RexProError::TruncatedSegment(format!(
                "dangling length prefix: {} bytes",
                buf.remaining()
            )));
        }
        let declared = buf.get_i32();
        let len = usize::try_from(declared).map_err(|_| {
            RexProError::TruncatedSegment(format!("negative segment length: {declared}"))
        })?;
        if buf.remaining() < len {
            return Err(RexProError::TruncatedSegment(format!(
                "segment {} declares {len} bytes, {} available",
                lines.len(),
                buf.remaining()
            )));
        }
        let segment = buf.split_to(len);
        lines.push(String::from_utf8_lossy(&segment).into_owned());
    }
    Ok(lines)
}
