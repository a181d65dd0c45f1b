use bytes::Bytes;
use thiserror::Error;

/// A completion backend answered with a non-success status
///
/// Carries the upstream response so the error boundary can mirror its status
/// and relay its body. The body is buffered when the failure is built; a read
/// failure at that point is kept as the `Err` reason.
#[derive(Debug, Error)]
#[error("{message} (upstream status {status})")]
pub struct UpstreamFailure {
    /// Description of the failed operation
    pub message: String,
    /// Raw upstream status code
    pub status: u16,
    /// Upstream reason phrase, if any
    pub status_text: Option<String>,
    /// Buffered upstream body, or the reason it could not be read
    pub body: Result<Bytes, String>,
}

impl UpstreamFailure {
    pub fn new(message: impl Into<String>, status: u16, status_text: Option<String>, body: Result<Bytes, String>) -> Self {
        Self {
            message: message.into(),
            status,
            status_text,
            body,
        }
    }

    /// Upstream body as text
    ///
    /// Fails when the body could not be read or is not valid UTF-8.
    pub fn body_text(&self) -> Result<&str, String> {
        let bytes = self.body.as_ref().map_err(Clone::clone)?;
        std::str::from_utf8(bytes).map_err(|e| format!("upstream body is not valid UTF-8: {e}"))
    }
}
