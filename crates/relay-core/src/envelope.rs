use serde::{Deserialize, Serialize};

/// Value of the `type` field on every envelope
pub const ERROR_TYPE: &str = "error";

/// Uniform JSON error body returned to API consumers
///
/// Serializes as `{"error": {"message": ..., "type": "error", "status"?: ..., "statusText"?: ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// Inner object of an [`ErrorEnvelope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub message: String,
    /// Always `"error"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Upstream status code, present only when the failure came from upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Upstream reason phrase, present only when the failure came from upstream
    #[serde(default, rename = "statusText", skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

impl ErrorEnvelope {
    /// Envelope for a failure with no upstream status attached
    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                kind: ERROR_TYPE.to_owned(),
                status: None,
                status_text: None,
            },
        }
    }

    /// Envelope mirroring a failed upstream response
    pub fn upstream(message: impl Into<String>, status: u16, status_text: Option<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                kind: ERROR_TYPE.to_owned(),
                status: Some(status),
                status_text,
            },
        }
    }
}
