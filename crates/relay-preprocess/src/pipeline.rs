//! Normalize-then-count over a whole request batch

use std::sync::Arc;

use relay_config::{PreprocessConfig, TokenizerConfig};

use crate::diagnostics::Diagnostics;
use crate::error::Degradation;
use crate::normalize::ContentNormalizer;
use crate::tokens::{TiktokenOracle, TokenAccountant, TokenCount, TokenOracle, UnavailableOracle};
use crate::types::Message;

/// Result of running a batch through the [`Pipeline`]
#[derive(Debug)]
pub struct Preprocessed {
    /// Normalized messages, same length and order as the input
    pub messages: Vec<Message>,
    pub tokens: TokenCount,
    /// Every degradation, tagged with the message index when it concerns one
    pub degradations: Vec<(Option<usize>, Degradation)>,
}

impl Preprocessed {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Message normalization followed by token accounting
///
/// Holds the loaded tokenizer; build once and share across requests.
pub struct Pipeline {
    normalizer: ContentNormalizer,
    accountant: TokenAccountant,
}

impl Pipeline {
    pub fn new(normalizer: ContentNormalizer, accountant: TokenAccountant) -> Self {
        Self { normalizer, accountant }
    }

    /// Build a pipeline from configuration
    ///
    /// A tokenizer that fails to load does not prevent startup: counting then
    /// degrades to zero on every request.
    pub fn from_config(
        preprocess: &PreprocessConfig,
        tokenizer: &TokenizerConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        let oracle: Arc<dyn TokenOracle> = match TiktokenOracle::new(tokenizer.encoding) {
            Ok(oracle) => {
                tracing::debug!(encoding = tokenizer.encoding.as_str(), "tokenizer loaded");
                Arc::new(oracle)
            }
            Err(e) => {
                tracing::warn!(error = %e, "tokenizer unavailable, token counts will be zero");
                Arc::new(UnavailableOracle::new(e.to_string()))
            }
        };

        Self::new(
            ContentNormalizer::from_config(preprocess, diagnostics.clone()),
            TokenAccountant::new(oracle, diagnostics),
        )
    }

    /// Normalize `messages`, then count the tokens of the normalized batch
    ///
    /// Performs blocking file reads; run it off the async runtime.
    pub fn run(&self, messages: &[Message]) -> Preprocessed {
        let mut degradations = Vec::new();

        let messages: Vec<Message> = self
            .normalizer
            .normalize_batch(messages)
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                let (message, degradation) = outcome.into_parts();
                if let Some(degradation) = degradation {
                    degradations.push((Some(index), degradation));
                }
                message
            })
            .collect();

        let (tokens, degradation) = self.accountant.count(&messages).into_parts();
        if let Some(degradation) = degradation {
            degradations.push((None, degradation));
        }

        Preprocessed {
            messages,
            tokens,
            degradations,
        }
    }
}
