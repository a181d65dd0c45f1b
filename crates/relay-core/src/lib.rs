//! Shared error plumbing for Relay
//!
//! Holds the JSON error envelope returned to API consumers, the carrier used
//! to report failed upstream responses, and the error boundary that turns
//! any error into an envelope with a status code.

#![allow(clippy::must_use_candidate)]

pub mod boundary;
pub mod envelope;
pub mod upstream;

pub use boundary::{ErrorResponse, forward_error};
pub use envelope::{ErrorBody, ErrorEnvelope};
pub use upstream::UpstreamFailure;
