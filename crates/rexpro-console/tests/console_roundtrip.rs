//! Console against an in-process RexPro server over real TCP.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::time::Duration;
use uuid::Uuid;

use rexpro_console::config::ConsoleSection;
use rexpro_console::console::Console;
use rexpro_console::session::RemoteSession;
use rexpro_console::transport::codec::{read_envelope, write_envelope};
use rexpro_console::transport::TcpTransport;
use rexpro_core::protocol::session::{self as messages, SESSION_KILL};
use rexpro_core::protocol::{Bindings, Envelope, MessageType, ScriptRequest, ScriptResponse};
use rexpro_core::result::{Evaluation, ResultValue};
use rexpro_core::ErrorKind;

const LANGUAGES: [&str; 2] = ["groovy", "gremlin"];

/// Scripts are JSON values; `text|>json` also prints `text` while evaluating.
fn evaluate(script: &str) -> Evaluation {
    let (output, source) = script.split_once("|>").unwrap_or(("", script));
    let value = match serde_json::from_str::<serde_json::Value>(source.trim()) {
        Ok(v) => ResultValue::from(v),
        Err(e) => ResultValue::Error(format!("cannot evaluate: {e}")),
    };
    Evaluation::new(value).with_output(output.replace("\\n", "\n"))
}

fn answer(request: Envelope, session: Uuid) -> Envelope {
    match request.msg_type {
        MessageType::SessionRequest if request.flag == SESSION_KILL => {
            messages::response(request.session, &[] as &[&str]).unwrap()
        }
        MessageType::SessionRequest => messages::response(session, &LANGUAGES).unwrap(),
        MessageType::ScriptRequest => {
            let req = ScriptRequest::parse(request).unwrap();
            if !LANGUAGES.contains(&req.language.as_str()) {
                let msg = format!("no engine for {}", req.language);
                return messages::error_response(session, 0, &msg);
            }
            let mut bindings = Bindings::new();
            bindings.insert("lang", req.language.clone());
            let eval = evaluate(&req.script);
            ScriptResponse::compose_evaluation(session, 0, eval, &bindings).unwrap()
        }
        other => messages::error_response(session, 0, &format!("unexpected {other:?}")),
    }
}

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let session = Uuid::new_v4();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else { break };
            let Ok(request) = read_envelope(&mut stream).await else { continue };
            let reply = answer(request, session);
            let _ = write_envelope(&mut stream, &reply).await;
        }
    });
    addr
}

fn transport(addr: SocketAddr) -> TcpTransport {
    TcpTransport::new(addr.to_string(), Duration::from_secs(2), Duration::from_secs(5))
}

async fn run_console(addr: SocketAddr, input: &str) -> String {
    let session = RemoteSession::new(transport(addr));
    let cfg = ConsoleSection::default();
    let mut console = Console::new(session, &cfg, input.as_bytes(), Vec::new());
    console.run().await.unwrap();
    String::from_utf8(console.into_output()).unwrap()
}

fn result_rows(out: &str) -> Vec<&str> {
    out.lines()
        .filter_map(|l| l.split_once("==>").map(|(_, rest)| rest))
        .collect()
}

#[tokio::test]
async fn sequence_and_scalar_results() {
    let addr = spawn_server().await;
    let out = run_console(addr, "[\"x\", \"y\"]\n42\nnull\n?q\n").await;
    assert_eq!(result_rows(&out), vec!["x", "y", "42", ""]);
}

#[tokio::test]
async fn map_and_printed_output() {
    let addr = spawn_server().await;
    let out = run_console(addr, "{\"a\": 1, \"b\": 2}\nfoo\\nbar|>42\n").await;
    assert_eq!(result_rows(&out), vec!["a=1", "b=2", "foo", "bar", "42"]);
}

#[tokio::test]
async fn multi_line_script_is_one_request() {
    let addr = spawn_server().await;
    let out = run_console(addr, "[1, .\n 2, .\n 3]\n").await;
    assert_eq!(result_rows(&out), vec!["1", "2", "3"]);
}

#[tokio::test]
async fn language_switch_and_server_errors() {
    let addr = spawn_server().await;
    let out = run_console(addr, "?cobol\n1\n?gremlin\n1\n?b\n?l\n").await;
    assert!(out.contains("Evaluation error: no engine for cobol"));
    assert!(out.contains("rexpro[gremlin]> "));
    assert_eq!(result_rows(&out), vec!["1"]);
    assert!(out.lines().any(|l| l.ends_with("lang=gremlin")));
    assert!(out.lines().any(|l| l.ends_with("groovy")));
}

#[tokio::test]
async fn script_errors_show_message_only() {
    let addr = spawn_server().await;
    let out = run_console(addr, "not json\n").await;
    let rows = result_rows(&out);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("cannot evaluate:"));
}

#[tokio::test]
async fn session_is_reused_and_closed() {
    let addr = spawn_server().await;
    let mut session = RemoteSession::new(transport(addr));

    let first = session.eval("1", "groovy").await.unwrap();
    let key = session.session_id().unwrap();
    let second = session.eval("[true, null]", "groovy").await.unwrap();

    assert_eq!(first.session, key);
    assert_eq!(second.session, key);
    assert_eq!(second.lines, vec!["true", "null"]);
    assert_eq!(session.languages(), LANGUAGES.map(String::from));

    session.close().await.unwrap();
    assert!(session.session_id().is_none());
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = RemoteSession::new(transport(addr));
    let err = session.eval("1", "groovy").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
