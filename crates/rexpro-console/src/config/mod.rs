//! Console config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use rexpro_core::error::{Result, RexProError};

pub use schema::{ConsoleConfig, ConsoleSection, ServerSection};

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ConsoleConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| RexProError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ConsoleConfig> {
    let cfg: ConsoleConfig = serde_yaml::from_str(s)
        .map_err(|e| RexProError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Build a config from the classic `host port language` arguments.
pub fn from_args(host: &str, port: &str, language: &str) -> Result<ConsoleConfig> {
    let port: u16 = port
        .parse()
        .map_err(|_| RexProError::Config("the port parameter must be an integer value".into()))?;

    let mut cfg = ConsoleConfig::default();
    cfg.server.host = host.to_string();
    cfg.server.port = port;
    cfg.console.language = language.to_string();
    cfg.validate()?;
    Ok(cfg)
}
