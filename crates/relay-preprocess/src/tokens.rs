//! Token accounting split by conversation role
//!
//! Assistant messages are counted as output, everything else as input. The
//! count itself comes from a [`TokenOracle`]; an oracle failure zeroes both
//! counts instead of failing the request.

use std::borrow::Cow;
use std::sync::Arc;

use relay_config::TokenizerEncoding;
use serde::{Deserialize, Serialize};
use tiktoken_rs::CoreBPE;

use crate::diagnostics::{Diagnostics, PipelineEvent, Stage};
use crate::error::{Degradation, TokenizerError};
use crate::outcome::Outcome;
use crate::types::{Content, Message, Role};

/// Content counted when a message cannot be turned into text
pub const TOKEN_COUNT_ERROR_PLACEHOLDER: &str = "Error: Unable to process message content for token counting.";

/// Framing tokens around every message
const TOKENS_PER_MESSAGE: u64 = 3;
/// Extra token when a message carries a participant name
const TOKENS_PER_NAME: u64 = 1;
/// Tokens priming the assistant reply, once per counted group
const REPLY_PRIMING_TOKENS: u64 = 3;

/// Token counts for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    /// Tokens of every non-assistant message
    pub input: u64,
    /// Tokens of assistant messages
    pub output: u64,
}

/// Text-only view of a message handed to a [`TokenOracle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn<'a> {
    pub role: Role,
    pub name: Option<&'a str>,
    pub content: Cow<'a, str>,
}

/// Counts the tokens a group of chat turns would consume
///
/// Role and name are part of the count, not just the content.
pub trait TokenOracle: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the turns cannot be counted
    fn count(&self, turns: &[ChatTurn<'_>]) -> Result<u64, TokenizerError>;
}

/// Oracle backed by a `tiktoken` BPE encoding
///
/// Applies the chat framing used by `OpenAI` models: a fixed overhead per
/// message and name, plus reply priming for a non-empty group.
pub struct TiktokenOracle {
    bpe: CoreBPE,
    encoding: TokenizerEncoding,
}

impl TiktokenOracle {
    /// Load the BPE tables for `encoding`
    ///
    /// # Errors
    ///
    /// Returns [`TokenizerError::Load`] if the tables cannot be built
    pub fn new(encoding: TokenizerEncoding) -> Result<Self, TokenizerError> {
        let bpe = match encoding {
            TokenizerEncoding::O200kBase => tiktoken_rs::o200k_base(),
            TokenizerEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
        }
        .map_err(|e| TokenizerError::Load {
            encoding: encoding.as_str(),
            reason: e.to_string(),
        })?;

        Ok(Self { bpe, encoding })
    }

    pub const fn encoding(&self) -> TokenizerEncoding {
        self.encoding
    }

    fn tokens(&self, text: &str) -> Result<u64, TokenizerError> {
        if text.is_empty() {
            return Ok(0);
        }
        u64::try_from(self.bpe.encode_ordinary(text).len()).map_err(|_| TokenizerError::Overflow)
    }

    fn turn_tokens(&self, turn: &ChatTurn<'_>) -> Result<u64, TokenizerError> {
        let role = self.tokens(turn.role.as_str())?;
        let content = self.tokens(&turn.content)?;
        let name = match turn.name {
            Some(name) => TOKENS_PER_NAME
                .checked_add(self.tokens(name)?)
                .ok_or(TokenizerError::Overflow)?,
            None => 0,
        };

        [role, content, name]
            .into_iter()
            .try_fold(TOKENS_PER_MESSAGE, u64::checked_add)
            .ok_or(TokenizerError::Overflow)
    }
}

impl TokenOracle for TiktokenOracle {
    fn count(&self, turns: &[ChatTurn<'_>]) -> Result<u64, TokenizerError> {
        if turns.is_empty() {
            return Ok(0);
        }

        turns.iter().try_fold(REPLY_PRIMING_TOKENS, |total, turn| {
            total
                .checked_add(self.turn_tokens(turn)?)
                .ok_or(TokenizerError::Overflow)
        })
    }
}

/// Oracle used when no tokenizer could be loaded; every count fails
#[derive(Debug, Clone)]
pub struct UnavailableOracle {
    reason: String,
}

impl UnavailableOracle {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl TokenOracle for UnavailableOracle {
    fn count(&self, _turns: &[ChatTurn<'_>]) -> Result<u64, TokenizerError> {
        Err(TokenizerError::Unavailable(self.reason.clone()))
    }
}

/// Splits a batch by role and counts each group
pub struct TokenAccountant {
    oracle: Arc<dyn TokenOracle>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl TokenAccountant {
    pub fn new(oracle: Arc<dyn TokenOracle>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self { oracle, diagnostics }
    }

    /// Count input and output tokens of `messages`
    ///
    /// Non-text content is flattened first, so the batch need not be
    /// normalized. Never fails: an oracle error yields zero counts with a
    /// [`Degradation::Tokenizer`].
    pub fn count(&self, messages: &[Message]) -> Outcome<TokenCount> {
        let (output, input): (Vec<_>, Vec<_>) = messages
            .iter()
            .enumerate()
            .map(|(index, message)| self.turn(message, index))
            .partition(|turn| turn.role == Role::Assistant);

        match self.count_groups(&input, &output) {
            Ok(count) => {
                self.diagnostics.record(PipelineEvent::TokensCounted(count));
                Outcome::clean(count)
            }
            Err(error) => {
                let degradation = Degradation::Tokenizer(error);
                self.diagnostics.record(PipelineEvent::Degraded {
                    index: None,
                    degradation: &degradation,
                });
                Outcome::degraded(TokenCount::default(), degradation)
            }
        }
    }

    fn count_groups(&self, input: &[ChatTurn<'_>], output: &[ChatTurn<'_>]) -> Result<TokenCount, TokenizerError> {
        Ok(TokenCount {
            input: self.oracle.count(input)?,
            output: self.oracle.count(output)?,
        })
    }

    fn turn<'a>(&self, message: &'a Message, index: usize) -> ChatTurn<'a> {
        let content = match &message.content {
            Content::Text(text) => Cow::Borrowed(text.as_str()),
            content @ (Content::Parts(_) | Content::Other(_)) => {
                self.diagnostics.record(PipelineEvent::ContentCoerced {
                    index: Some(index),
                    stage: Stage::TokenCount,
                });
                content
                    .render()
                    .unwrap_or(Cow::Borrowed(TOKEN_COUNT_ERROR_PLACEHOLDER))
            }
        };

        ChatTurn {
            role: message.role.clone(),
            name: message.name.as_deref(),
            content,
        }
    }
}
