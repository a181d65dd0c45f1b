//! Conversion of message content into canonical plain text

use std::sync::Arc;

use relay_config::PreprocessConfig;

use crate::diagnostics::{Diagnostics, PipelineEvent, Stage};
use crate::directive::FileDirective;
use crate::error::{Degradation, DirectiveError};
use crate::outcome::Outcome;
use crate::types::{Content, Message};

/// Content used when a message cannot be turned into text at all
pub const PROCESSING_ERROR_PLACEHOLDER: &str = "Error: Unable to process message content.";

/// Normalizes message content to plain text
///
/// Optionally resolves a file-reference directive in text content. Never
/// fails: every failure is folded into the returned text and reported as a
/// [`Degradation`].
pub struct ContentNormalizer {
    /// Directive marker; `None` disables file inlining
    marker: Option<String>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ContentNormalizer {
    /// Normalizer that inlines files referenced with `marker`
    pub fn new(marker: impl Into<String>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            marker: Some(marker.into()),
            diagnostics,
        }
    }

    /// Normalizer that leaves file-reference directives as plain text
    pub fn without_file_inlining(diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            marker: None,
            diagnostics,
        }
    }

    pub fn from_config(config: &PreprocessConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        if config.inline_files {
            Self::new(config.file_marker.clone(), diagnostics)
        } else {
            Self::without_file_inlining(diagnostics)
        }
    }

    /// Normalize one message
    ///
    /// The returned message always has [`Content::Text`] and keeps every
    /// other field of `message`. `index` is the message's position in its
    /// batch and only tags diagnostics.
    pub fn normalize(&self, message: &Message, index: Option<usize>) -> Outcome<Message> {
        let outcome = match &message.content {
            Content::Text(text) => self.resolve_directive(text, index),
            content @ (Content::Parts(_) | Content::Other(_)) => {
                self.diagnostics.record(PipelineEvent::ContentCoerced {
                    index,
                    stage: Stage::Normalize,
                });
                coerce(content)
            }
        };

        if let Some(degradation) = outcome.degradation() {
            self.diagnostics.record(PipelineEvent::Degraded { index, degradation });
        }

        let (text, degradation) = outcome.into_parts();
        let normalized = message.with_text(text);

        match degradation {
            Some(degradation) => Outcome::degraded(normalized, degradation),
            None => Outcome::clean(normalized),
        }
    }

    /// Normalize a batch, preserving length and order
    ///
    /// Messages are handled independently; a degraded message does not
    /// affect its neighbours.
    pub fn normalize_batch(&self, messages: &[Message]) -> Vec<Outcome<Message>> {
        messages
            .iter()
            .enumerate()
            .map(|(index, message)| self.normalize(message, Some(index)))
            .collect()
    }

    fn resolve_directive(&self, text: &str, index: Option<usize>) -> Outcome<String> {
        let Some(directive) = self
            .marker
            .as_deref()
            .and_then(|marker| FileDirective::find(text, marker))
        else {
            return Outcome::clean(text.to_owned());
        };

        match directive.inline(text) {
            Ok(inlined) => {
                self.diagnostics.record(PipelineEvent::FileInlined {
                    index,
                    path: directive.path(),
                });
                Outcome::clean(inlined)
            }
            Err(error) => Outcome::degraded(annotate(text, &error), error.into()),
        }
    }
}

/// Original text with a note describing why the file was not inlined
fn annotate(text: &str, error: &DirectiveError) -> String {
    match error {
        DirectiveError::EmptyPath => format!("{text}\nError: Empty file path provided."),
        DirectiveError::Read { source, .. } => {
            format!("{text}\nError: Unable to read file content. Details: {source}")
        }
    }
}

fn coerce(content: &Content) -> Outcome<String> {
    match content.render() {
        Ok(text) => Outcome::clean(text.into_owned()),
        Err(e) => Outcome::degraded(
            PROCESSING_ERROR_PLACEHOLDER.to_owned(),
            Degradation::ContentCoercion(e.to_string()),
        ),
    }
}
