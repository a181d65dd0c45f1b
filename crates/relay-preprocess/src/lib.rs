//! Message normalization and token accounting for Relay
//!
//! Turns caller-supplied chat messages into plain-text messages (flattening
//! multi-part content and inlining referenced files) and counts their tokens
//! split into input and output groups. Every operation is fail-soft: failures
//! degrade to descriptive text or zero counts and are reported through
//! [`Outcome`] and the injected [`Diagnostics`] sink.

#![allow(clippy::must_use_candidate)]

pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod normalize;
pub mod outcome;
pub mod pipeline;
pub mod tokens;
pub mod types;

pub use diagnostics::{Diagnostics, PipelineEvent, Silent, TracingDiagnostics};
pub use error::{Degradation, DirectiveError, TokenizerError};
pub use normalize::ContentNormalizer;
pub use outcome::Outcome;
pub use pipeline::{Pipeline, Preprocessed};
pub use tokens::{ChatTurn, TiktokenOracle, TokenAccountant, TokenCount, TokenOracle, UnavailableOracle};
pub use types::{Content, ContentPart, ImageUrl, Message, Role};
