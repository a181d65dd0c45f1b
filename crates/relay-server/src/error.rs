use axum::response::{IntoResponse, Response};
use relay_core::forward_error;

/// Any error that escapes a request handler
///
/// Rendered through the error boundary, so an upstream failure keeps its
/// status and body while everything else becomes a 500 envelope.
#[derive(Debug)]
pub struct ProxyError(anyhow::Error);

impl ProxyError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl<E> From<E> for ProxyError
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let response = forward_error(&self.0);
        tracing::error!(error = %self.0, status = %response.status, "request failed");
        response.into_response()
    }
}
