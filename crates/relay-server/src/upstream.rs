//! Forwarding of chat completion requests to the configured backend

use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use relay_config::UpstreamConfig;
use relay_core::UpstreamFailure;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// HTTP client for the completion backend
pub struct UpstreamClient {
    client: Client,
    completions_url: String,
    api_key: Option<SecretString>,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns an error if the timeout is invalid or the HTTP client cannot
    /// be built
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout()?).build()?;
        let base = config.base_url.as_str().trim_end_matches('/');

        Ok(Self {
            client,
            completions_url: format!("{base}/chat/completions"),
            api_key: config.api_key.clone(),
        })
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }

    /// Send a chat completion request upstream
    ///
    /// A success is returned as-is for relaying; any other status becomes an
    /// [`UpstreamFailure`] carrying the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or upstream answers
    /// with a non-success status
    pub async fn chat_completions<T: Serialize + Sync>(&self, request: &T) -> anyhow::Result<UpstreamReply> {
        let mut builder = self.client.post(&self.completions_url).json(request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(url = %self.completions_url, error = %e, "upstream request failed");
            anyhow::anyhow!("upstream request failed: {e}")
        })?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();

        if !status.is_success() {
            let body = response.bytes().await.map_err(|e| e.to_string());
            tracing::warn!(status = %status, "upstream returned error");
            return Err(UpstreamFailure::new(
                "upstream chat completion failed",
                status.as_u16(),
                status.canonical_reason().map(ToOwned::to_owned),
                body,
            )
            .into());
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| anyhow::anyhow!("failed to read upstream response: {e}"))?;

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

/// Successful upstream response, relayed verbatim
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        response
    }
}
