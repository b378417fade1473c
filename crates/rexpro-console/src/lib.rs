//! RexPro console library entry.
//!
//! This crate wires config, the TCP transport, the remote session, and the
//! interactive console loop on top of `rexpro-core`. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod config;
pub mod console;
pub mod session;
pub mod transport;
