use serde::Deserialize;

/// Marker that introduces an inline file reference
pub const DEFAULT_FILE_MARKER: &str = "file_path:";

/// Message normalization settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreprocessConfig {
    /// Replace file-reference directives with the referenced file's content
    #[serde(default = "default_inline_files")]
    pub inline_files: bool,
    /// Directive marker, immediately followed by the file path
    #[serde(default = "default_file_marker")]
    pub file_marker: String,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            inline_files: default_inline_files(),
            file_marker: default_file_marker(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_inline_files() -> bool {
    true
}

fn default_file_marker() -> String {
    DEFAULT_FILE_MARKER.to_owned()
}

/// Token accounting settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenizerConfig {
    #[serde(default)]
    pub encoding: TokenizerEncoding,
}

/// BPE encoding used to count tokens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TokenizerEncoding {
    /// GPT-4o family
    #[default]
    #[serde(rename = "o200k_base")]
    O200kBase,
    /// GPT-4 and GPT-3.5 family
    #[serde(rename = "cl100k_base")]
    Cl100kBase,
}

impl TokenizerEncoding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::O200kBase => "o200k_base",
            Self::Cl100kBase => "cl100k_base",
        }
    }
}
