//! RexPro console
//!
//! Usage: `rexpro-console [host port language]`
//! - Three positional args pick the server and starting language
//! - Otherwise `$REXPRO_CONSOLE_CONFIG` or `rexpro-console.yaml`, else defaults
//! - Logs go to stderr (`RUST_LOG`), results to stdout

use std::path::Path;
use std::process::ExitCode;

use tokio::io::BufReader;
use tracing_subscriber::{fmt, EnvFilter};

use rexpro_console::config::{self, ConsoleConfig};
use rexpro_console::console::Console;
use rexpro_console::session::RemoteSession;
use rexpro_console::transport::TcpTransport;
use rexpro_core::error::{Result, RexProError};

const DEFAULT_CONFIG: &str = "rexpro-console.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let transport = TcpTransport::from_config(&cfg.server);
    tracing::info!(
        addr = %transport.addr(),
        language = %cfg.console.language,
        "rexpro-console starting"
    );

    let session = RemoteSession::new(transport);
    let input = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(session, &cfg.console, input, tokio::io::stdout());

    match console.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<ConsoleConfig> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [host, port, language] => config::from_args(host, port, language),
        [] => {
            let path = std::env::var("REXPRO_CONSOLE_CONFIG")
                .unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
            if Path::new(&path).exists() {
                config::load_from_file(&path)
            } else {
                tracing::debug!(%path, "no config file, using defaults");
                Ok(ConsoleConfig::default())
            }
        }
        _ => Err(RexProError::Config(
            "rexpro-console expects three parameters in the following order: host port language"
                .into(),
        )),
    }
}
