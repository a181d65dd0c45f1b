use std::path::PathBuf;

use thiserror::Error;

/// Why a pipeline step produced a degraded result instead of the real one
#[derive(Debug, Error)]
pub enum Degradation {
    /// File-reference marker with nothing after it
    #[error("empty file path provided")]
    EmptyFilePath,

    /// Referenced file could not be read as text
    #[error("unable to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content could not be turned into text
    #[error("unable to process message content: {0}")]
    ContentCoercion(String),

    /// Token oracle failed; counts were zeroed
    #[error("token counting failed: {0}")]
    Tokenizer(#[from] TokenizerError),
}

/// Why a file-reference directive could not be resolved
#[derive(Debug, Error)]
pub enum DirectiveError {
    /// Marker with nothing after it
    #[error("empty file path provided")]
    EmptyPath,

    /// Referenced file could not be read as text
    #[error("unable to read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<DirectiveError> for Degradation {
    fn from(error: DirectiveError) -> Self {
        match error {
            DirectiveError::EmptyPath => Self::EmptyFilePath,
            DirectiveError::Read { path, source } => Self::FileRead { path, source },
        }
    }
}

/// Errors raised by a token oracle
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// BPE tables could not be loaded
    #[error("failed to load {encoding} encoding: {reason}")]
    Load { encoding: &'static str, reason: String },

    /// No tokenizer is available
    #[error("tokenizer unavailable: {0}")]
    Unavailable(String),

    /// Count does not fit the result type
    #[error("token count overflow")]
    Overflow,
}
