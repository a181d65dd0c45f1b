use std::sync::Arc;

use relay_preprocess::{Message, Pipeline, Preprocessed};

use crate::error::ProxyError;
use crate::upstream::UpstreamClient;

/// Shared state for route handlers
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pipeline: Pipeline,
    upstream: UpstreamClient,
}

impl AppState {
    pub fn new(pipeline: Pipeline, upstream: UpstreamClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pipeline, upstream }),
        }
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.inner.upstream
    }

    /// Normalize and count `messages` on the blocking pool
    ///
    /// File inlining reads from disk, so the pipeline must not run on a
    /// runtime worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error only if the blocking task panicked or was cancelled
    pub async fn preprocess(&self, messages: Vec<Message>) -> Result<Preprocessed, ProxyError> {
        let inner = Arc::clone(&self.inner);
        let preprocessed = tokio::task::spawn_blocking(move || inner.pipeline.run(&messages)).await?;

        tracing::info!(
            messages = preprocessed.messages.len(),
            input_tokens = preprocessed.tokens.input,
            output_tokens = preprocessed.tokens.output,
            degraded = preprocessed.degradations.len(),
            "messages preprocessed"
        );

        Ok(preprocessed)
    }
}
