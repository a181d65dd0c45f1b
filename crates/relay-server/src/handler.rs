//! Axum route handlers for the chat completion proxy

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use http::StatusCode;
use relay_preprocess::{Message, TokenCount};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProxyError;
use crate::state::AppState;
use crate::upstream::UpstreamReply;

/// OpenAI-style chat completion request
///
/// Only `messages` is interpreted; every other field is forwarded untouched.
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Build the router with the completion and token counting endpoints
pub fn chat_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/v1/chat/completions/tokens", routing::post(count_tokens))
        .with_state(state)
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(
    State(state): State<AppState>,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Result<UpstreamReply, ProxyError> {
    let Json(mut request) = payload?;

    let preprocessed = state.preprocess(std::mem::take(&mut request.messages)).await?;
    request.messages = preprocessed.messages;

    Ok(state.upstream().chat_completions(&request).await?)
}

/// Handle `POST /v1/chat/completions/tokens`
async fn count_tokens(
    State(state): State<AppState>,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Result<Json<TokenCount>, ProxyError> {
    let Json(request) = payload?;
    let preprocessed = state.preprocess(request.messages).await?;

    Ok(Json(preprocessed.tokens))
}
