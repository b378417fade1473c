//! Interactive console loop.
//!
//! Responsibilities:
//! - Read input, joining lines that end in `" ."` into one submission
//! - Handle `?` commands locally (quit, help, bindings, languages, switch)
//! - Send scripts through the session and print each result line with the
//!   configured prefix
//!
//! Evaluation failures are printed and the loop continues; only console IO
//! failures end it early.

pub mod command;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use rexpro_core::error::{Result, RexProError};
use rexpro_core::protocol::{Reply, ScriptResponse};

use crate::config::ConsoleSection;
use crate::session::RemoteSession;
use crate::transport::Transport;
use command::{Command, CONTINUATION, HELP_TEXT};

const BANNER: &[&str] = &[
    "        (l_(l",
    "(_______( 0 0",
    "(        (-Y-)",
    "l l-----l l",
    "l l,,   l l,,",
];

pub struct Console<T: Transport, R, W> {
    session: RemoteSession<T>,
    language: String,
    prefix: String,
    input: R,
    out: W,
}

impl<T, R, W> Console<T, R, W>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(session: RemoteSession<T>, cfg: &ConsoleSection, input: R, out: W) -> Self {
        Self {
            session,
            language: cfg.language.clone(),
            prefix: cfg.result_prefix.clone(),
            input,
            out,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn prompt(&self) -> String {
        format!("rexpro[{}]> ", self.language)
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `?q` or end of input. The session is closed on the way out.
    pub async fn run(&mut self) -> Result<()> {
        for line in BANNER {
            self.emit(line).await?;
        }
        self.emit("").await?;

        while let Some(submission) = self.read_submission().await? {
            if submission.is_empty() {
                continue;
            }
            match Command::parse(&submission) {
                Command::Quit => break,
                Command::Help => {
                    for line in HELP_TEXT {
                        self.emit(line).await?;
                    }
                }
                Command::Bindings => self.print_bindings().await?,
                Command::Languages => self.print_languages().await?,
                Command::Language(lang) => {
                    tracing::debug!(from = %self.language, to = %lang, "language switched");
                    self.language = lang;
                }
                Command::Script(script) => {
                    let outcome = self.session.eval(&script, &self.language).await;
                    match outcome {
                        Ok(response) => self.print_response(response).await?,
                        Err(e) => self.print_error(&e).await?,
                    }
                }
            }
        }

        if let Err(e) = self.session.close().await {
            tracing::warn!(error = %e, "session close failed");
        }
        Ok(())
    }

    /// Read one submission. `None` at end of input.
    async fn read_submission(&mut self) -> Result<Option<String>> {
        let mut text = String::new();
        let mut continued = false;

        loop {
            let prompt = if continued {
                " ".repeat(self.prompt().len())
            } else {
                self.prompt()
            };
            self.out.write_all(prompt.as_bytes()).await.map_err(out_err)?;
            self.out.flush().await.map_err(out_err)?;

            let mut line = String::new();
            let n = self
                .input
                .read_line(&mut line)
                .await
                .map_err(|e| RexProError::Internal(format!("console input failed: {e}")))?;
            if n == 0 {
                self.emit("").await?;
                return Ok(None);
            }

            let line = line.trim_end_matches(['\r', '\n']);
            text.push('\n');
            text.push_str(line);

            if !text.ends_with(CONTINUATION) {
                return Ok(Some(text.trim().to_string()));
            }
            text.truncate(text.len() - CONTINUATION.len());
            continued = true;
        }
    }

    async fn print_response(&mut self, response: ScriptResponse) -> Result<()> {
        match response.into_reply() {
            Reply::Scalar(line) => self.emit_result(&line).await,
            Reply::Lines(lines) => {
                for line in &lines {
                    self.emit_result(line).await?;
                }
                Ok(())
            }
        }
    }

    async fn print_error(&mut self, e: &RexProError) -> Result<()> {
        tracing::debug!(kind = e.kind().as_str(), error = %e, "evaluation failed");
        self.emit(&format!("Evaluation error: {e}")).await
    }

    async fn print_bindings(&mut self) -> Result<()> {
        let rows: Vec<String> = match self.session.last_bindings() {
            Some(bindings) => bindings
                .iter()
                .map(|(name, value)| match value {
                    serde_json::Value::String(s) => format!("{name}={s}"),
                    other => format!("{name}={other}"),
                })
                .collect(),
            None => Vec::new(),
        };
        for row in &rows {
            self.emit(row).await?;
        }
        Ok(())
    }

    async fn print_languages(&mut self) -> Result<()> {
        if let Err(e) = self.session.open().await {
            return self.print_error(&e).await;
        }
        let languages = self.session.languages().to_vec();
        for lang in &languages {
            self.emit(lang).await?;
        }
        Ok(())
    }

    async fn emit_result(&mut self, line: &str) -> Result<()> {
        let row = format!("{}{line}", self.prefix);
        self.emit(&row).await
    }

    async fn emit(&mut self, line: &str) -> Result<()> {
        self.out.write_all(line.as_bytes()).await.map_err(out_err)?;
        self.out.write_all(b"\n").await.map_err(out_err)?;
        self.out.flush().await.map_err(out_err)
    }
}

fn out_err(e: std::io::Error) -> RexProError {
    RexProError::Internal(format!("console output failed: {e}"))
}
