use rexpro_core::error::{Result, RexProError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub console: ConsoleSection,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            console: ConsoleSection::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RexProError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.console.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_io_timeout_ms")]
    pub io_timeout_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_ms: default_connect_timeout_ms(),
            io_timeout_ms: default_io_timeout_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(RexProError::Config("server.host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(RexProError::Config("server.port must not be 0".into()));
        }
        if !(100..=60000).contains(&self.connect_timeout_ms) {
            return Err(RexProError::Config(
                "server.connect_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=600000).contains(&self.io_timeout_ms) {
            return Err(RexProError::Config(
                "server.io_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    8184
}
fn default_connect_timeout_ms() -> u64 {
    5000
}
fn default_io_timeout_ms() -> u64 {
    60000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default = "default_result_prefix")]
    pub result_prefix: String,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            language: default_language(),
            result_prefix: default_result_prefix(),
        }
    }
}

impl ConsoleSection {
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() || self.language.contains(char::is_whitespace) {
            return Err(RexProError::Config(
                "console.language must be a single non-empty word".into(),
            ));
        }
        Ok(())
    }
}

fn default_language() -> String {
    "groovy".into()
}
fn default_result_prefix() -> String {
    "==>".into()
}
