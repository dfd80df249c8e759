//! End-to-end debate through `AnthropicOracle` against a local stub of the
//! Messages API, plus one `#[ignore]` test against the live API.
//!
//! Run the live test with `cargo test -p debate-agents -- --ignored`
//! (needs `ANTHROPIC_API_KEY`).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use coordination::debate::{DebateError, DebateInit, DebateOrchestrator, Role, Side};
use coordination::oracle::OracleError;
use debate_agents::anthropic::AnthropicOracle;
use debate_agents::config::{AnthropicEndpoint, BilogicConfig};

/// A request as seen by the stub: raw header block plus parsed JSON body.
#[derive(Debug, Clone)]
struct Captured {
    headers: String,
    body: Value,
}

/// Minimal HTTP/1.1 server that answers every `POST /v1/messages`.
///
/// Text requests get a numbered statement; requests carrying `tool_choice`
/// get a `record_verdict` tool call. A fixed `status` overrides both.
struct StubApi {
    base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl StubApi {
    async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, status, log).await;
                });
            }
        });

        Self { base_url, requests }
    }

    fn endpoint(&self) -> AnthropicEndpoint {
        AnthropicEndpoint {
            base_url: self.base_url.clone(),
            api_key: "sk-test".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn captured(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    mut stream: TcpStream,
    status: u16,
    log: Arc<Mutex<Vec<Captured>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body: Value = serde_json::from_slice(&buf[header_end..]).unwrap_or(Value::Null);
    let index = {
        let mut log = log.lock().unwrap();
        log.push(Captured {
            headers,
            body: body.clone(),
        });
        log.len()
    };

    let (status_line, payload) = if status != 200 {
        (
            format!("HTTP/1.1 {status} Overloaded"),
            json!({"type": "error", "error": {"type": "overloaded_error"}}),
        )
    } else if body.get("tool_choice").is_some() {
        (
            "HTTP/1.1 200 OK".to_string(),
            json!({
                "stop_reason": "tool_use",
                "content": [{
                    "type": "tool_use",
                    "id": "toolu_stub",
                    "name": "record_verdict",
                    "input": {
                        "reasoning": "The negative side answered every point.",
                        "winner": "AGAINST"
                    }
                }]
            }),
        )
    } else {
        (
            "HTTP/1.1 200 OK".to_string(),
            json!({
                "stop_reason": "end_turn",
                "content": [{"type": "text", "text": format!("Statement {index}.")}]
            }),
        )
    };

    let payload = payload.to_string();
    let response = format!(
        "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{payload}",
        payload.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

#[tokio::test]
async fn test_full_debate_over_http() {
    let api = StubApi::start(200).await;
    let oracle = AnthropicOracle::new(api.endpoint()).unwrap();
    let orchestrator = DebateOrchestrator::new(Arc::new(oracle));

    let state = orchestrator
        .run(DebateInit::new("Remote work improves productivity", 2))
        .await
        .unwrap();

    assert_eq!(state.history().len(), 4);
    assert_eq!(state.current_turn(), 2);
    assert_eq!(state.history()[0].content, "Statement 1.");
    assert_eq!(state.history()[3].role, Role::AgentAgainst);
    assert_eq!(state.winner(), Some(Side::Against));
    assert_eq!(
        state.judge_reasoning(),
        Some("The negative side answered every point.")
    );

    let captured = api.captured();
    assert_eq!(captured.len(), 5);
    for request in &captured {
        assert!(request.headers.starts_with("post /v1/messages"));
        assert!(request.headers.contains("x-api-key: sk-test"));
        assert!(request.headers.contains("anthropic-version: 2023-06-01"));
    }

    // Four debater turns carry no tools; the judge call forces one.
    assert!(captured[..4].iter().all(|r| r.body.get("tools").is_none()));
    let judge = &captured[4].body;
    assert_eq!(judge["tool_choice"]["name"], "record_verdict");
    assert_eq!(
        judge["tools"][0]["input_schema"]["properties"]["winner"]["enum"],
        json!(["FOR", "AGAINST"])
    );
    // The second affirmative turn replies to the negative's opening.
    let reply = captured[2].body["messages"][0]["content"].as_str().unwrap();
    assert!(reply.contains("Statement 2."));
}

#[tokio::test]
async fn test_http_error_aborts_run() {
    let api = StubApi::start(529).await;
    let oracle = AnthropicOracle::new(api.endpoint()).unwrap();
    let orchestrator = DebateOrchestrator::new(Arc::new(oracle));

    let err = orchestrator
        .run(DebateInit::new("Tabs over spaces", 3))
        .await
        .unwrap_err();

    match err {
        DebateError::OracleFailure { role, source } => {
            assert_eq!(role, Role::AgentFor);
            assert!(matches!(source, OracleError::Status { status: 529, .. }));
        }
        other => panic!("expected oracle failure, got {other:?}"),
    }
    assert_eq!(api.captured().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_live_single_round_debate() {
    let _ = dotenvy::dotenv();
    let config = BilogicConfig::from_env().expect("ANTHROPIC_API_KEY must be set");
    let oracle = AnthropicOracle::new(config.endpoint.clone()).unwrap();
    let orchestrator = DebateOrchestrator::with_config(Arc::new(oracle), config.debate_config());

    let state = orchestrator
        .run(DebateInit::new("Remote work improves productivity", 1))
        .await
        .expect("live debate should complete");

    assert_eq!(state.history().len(), 2);
    assert!(state.winner().is_some());
    assert!(!state.judge_reasoning().unwrap_or("").trim().is_empty());
}
