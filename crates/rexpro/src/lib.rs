//! Top-level facade crate for RexPro.
//!
//! Re-exports the protocol core and the console client so users can depend on a single crate.

pub mod core {
    pub use rexpro_core::*;
}

pub mod console {
    pub use rexpro_console::*;
}
