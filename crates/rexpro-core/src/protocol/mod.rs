//! Protocol modules (RexPro binary messages).
//!
//! - `envelope`: fixed header shared by every message.
//! - `bindings`: opaque named-value block carried next to a script.
//! - `lines`: length-prefixed UTF-8 result lines.
//! - `script_request` / `script_response` / `session`: typed message bodies.
//!
//! All parsers are panic-free: malformed input is reported as `RexProError`
//! instead of panicking or reading past the buffer.

pub mod bindings;
pub mod envelope;
pub mod lines;
pub mod script_request;
pub mod script_response;
pub mod session;

use bytes::{BufMut, BytesMut};

pub use bindings::Bindings;
pub use envelope::{Envelope, MessageType};
pub use script_request::ScriptRequest;
pub use script_response::{Reply, ScriptResponse};

/// Size of every length prefix on the wire.
pub(crate) const LEN_PREFIX: usize = 4;

/// Append `[i32 len][bytes]`. `None` if the length does not fit an i32.
pub(crate) fn put_segment(out: &mut BytesMut, bytes: &[u8]) -> Option<()> {
    let len = i32::try_from(bytes.len()).ok()?;
    out.put_i32(len);
    out.put_slice(bytes);
    Some(())
}
