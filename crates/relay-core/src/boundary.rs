//! Conversion of any request-handling error into a JSON error response
//!
//! Every branch ends in a well-formed envelope; nothing here can fail.

use http::StatusCode;

use crate::envelope::ErrorEnvelope;
use crate::upstream::UpstreamFailure;

/// Message used when an error carries no description
pub const DEFAULT_MESSAGE: &str = "Unknown error";

/// Message used when an upstream failure cannot be mirrored
pub const PROCESSING_FALLBACK_MESSAGE: &str = "Error processing request";

/// Status code and envelope produced by [`forward_error`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub envelope: ErrorEnvelope,
}

impl ErrorResponse {
    fn internal(message: &str, default: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            envelope: ErrorEnvelope::generic(non_empty_or(message, default)),
        }
    }
}

/// Build the error response for an error that reached the HTTP layer
///
/// An [`UpstreamFailure`] anywhere in the error chain is mirrored: its body
/// becomes the message and its status the response status. Anything else is
/// reported as a 500 with the error's own message.
pub fn forward_error(error: &anyhow::Error) -> ErrorResponse {
    let upstream = error
        .downcast_ref::<UpstreamFailure>()
        .or_else(|| error.chain().find_map(|cause| cause.downcast_ref::<UpstreamFailure>()));

    match upstream {
        Some(failure) => upstream_response(failure),
        None => ErrorResponse::internal(&error.to_string(), DEFAULT_MESSAGE),
    }
}

fn upstream_response(failure: &UpstreamFailure) -> ErrorResponse {
    let message = failure
        .body_text()
        .map_or_else(|_| non_empty_or(&failure.message, DEFAULT_MESSAGE), ToOwned::to_owned);

    match envelope_status(failure.status) {
        Some(status) => ErrorResponse {
            status,
            envelope: ErrorEnvelope::upstream(message, status.as_u16(), failure.status_text.clone()),
        },
        None => ErrorResponse::internal(&failure.message, PROCESSING_FALLBACK_MESSAGE),
    }
}

/// Statuses a JSON error body can be sent with
///
/// Informational codes cannot carry a body and anything past 599 is not a
/// real HTTP status.
fn envelope_status(code: u16) -> Option<StatusCode> {
    if !(200..=599).contains(&code) {
        return None;
    }
    StatusCode::from_u16(code).ok()
}

fn non_empty_or(message: &str, default: &str) -> String {
    if message.is_empty() {
        default.to_owned()
    } else {
        message.to_owned()
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status, axum::Json(self.envelope)).into_response()
    }
}
