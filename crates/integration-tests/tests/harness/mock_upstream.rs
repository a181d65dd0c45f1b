//! Mock completion backend for integration tests
//!
//! Serves `POST /chat/completions`, records every request it receives and
//! answers with either a canned completion or a configured failure.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Content of the canned assistant reply
pub const MOCK_REPLY: &str = "Hello from mock upstream";

/// A request received by the mock
#[derive(Debug, Clone)]
pub struct Received {
    pub body: Value,
    pub authorization: Option<String>,
}

enum Behavior {
    Complete,
    Fail { status: StatusCode, body: &'static str },
}

struct MockState {
    behavior: Behavior,
    received: Mutex<Vec<Received>>,
}

/// Mock upstream that returns predictable responses
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockUpstream {
    /// Start a mock that answers every request with a completion
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Complete).await
    }

    /// Start a mock that answers every request with `status` and a plain text `body`
    pub async fn start_failing(status: StatusCode, body: &'static str) -> anyhow::Result<Self> {
        Self::start_inner(Behavior::Fail { status, body }).await
    }

    async fn start_inner(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            received: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let (addr, shutdown) = super::spawn_router(app).await?;

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the upstream
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, in arrival order
    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }

    /// Messages of the only request received
    pub fn single_request_messages(&self) -> Vec<Value> {
        let received = self.received();
        assert_eq!(received.len(), 1, "expected exactly one upstream request");
        received[0].body["messages"].as_array().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);

    let model = body["model"].as_str().unwrap_or("mock-model").to_owned();
    state.received.lock().unwrap().push(Received { body, authorization });

    match state.behavior {
        Behavior::Complete => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": MOCK_REPLY},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 5, "completion_tokens": 4, "total_tokens": 9}
        }))
        .into_response(),
        Behavior::Fail { status, body } => (status, body).into_response(),
    }
}
