//! RexPro core: wire primitives, result normalization, and the shared error type.
//!
//! This crate defines the binary message contracts exchanged with a RexPro
//! script server (envelope, bindings block, result-line block, script
//! request/response bodies) and the normalizer that turns an evaluation result
//! into display lines. It carries no transport or runtime dependencies so the
//! console, servers, and test tooling can all share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `RexProError`/`Result` so malformed bytes
//! from the wire never crash a client.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;
pub mod result;

/// Shared result type.
pub use error::{ErrorKind, Result, RexProError};
