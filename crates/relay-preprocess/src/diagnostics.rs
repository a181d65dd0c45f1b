//! Side channel for pipeline events
//!
//! Components receive a [`Diagnostics`] sink instead of logging directly, so
//! their behavior can be tested without a global subscriber.

use crate::error::Degradation;
use crate::tokens::TokenCount;

/// Pipeline stage that converted non-text content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Normalize,
    TokenCount,
}

/// Something worth reporting that happened while processing a batch
///
/// `index` is the message's position in its batch, when known.
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    /// A referenced file was read and spliced into the message
    FileInlined { index: Option<usize>, path: &'a str },
    /// Non-text content was converted to text
    ContentCoerced { index: Option<usize>, stage: Stage },
    /// A step fell back to a degraded result
    Degraded {
        index: Option<usize>,
        degradation: &'a Degradation,
    },
    /// Token accounting finished
    TokensCounted(TokenCount),
}

/// Receiver of [`PipelineEvent`]s
pub trait Diagnostics: Send + Sync {
    fn record(&self, event: PipelineEvent<'_>);
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: PipelineEvent<'_>) {
        match event {
            PipelineEvent::FileInlined { index, path } => {
                tracing::debug!(message_index = ?index, path, "file content inlined");
            }
            PipelineEvent::ContentCoerced { index, stage } => {
                tracing::warn!(message_index = ?index, ?stage, "non-string message content converted");
            }
            PipelineEvent::Degraded { index, degradation } => {
                if matches!(degradation, Degradation::Tokenizer(_)) {
                    tracing::error!(error = %degradation, "token counting failed");
                } else {
                    tracing::warn!(message_index = ?index, error = %degradation, "message content degraded");
                }
            }
            PipelineEvent::TokensCounted(count) => {
                tracing::debug!(input_tokens = count.input, output_tokens = count.output, "tokens counted");
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn record(&self, _event: PipelineEvent<'_>) {}
}
