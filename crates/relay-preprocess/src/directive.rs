//! Inline file-reference directives
//!
//! A directive is the marker immediately followed by a path that runs to the
//! next newline or the end of the text, e.g. `file_path:/tmp/notes.md`. Only
//! the first marker in a text is considered.

use std::ops::Range;
use std::path::PathBuf;

use crate::error::DirectiveError;

/// Heading placed before inlined file content
pub const FILE_CONTENT_HEADING: &str = "File content:\n";

/// First file-reference directive found in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDirective<'a> {
    span: Range<usize>,
    path: &'a str,
}

impl<'a> FileDirective<'a> {
    /// Locate the first `marker` in `text`
    pub fn find(text: &'a str, marker: &str) -> Option<Self> {
        if marker.is_empty() {
            return None;
        }

        let start = text.find(marker)?;
        let path_start = start + marker.len();
        let end = text[path_start..].find('\n').map_or(text.len(), |offset| path_start + offset);

        Some(Self {
            span: start..end,
            path: text[path_start..end].trim(),
        })
    }

    /// Byte range from the marker up to (not including) the newline
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Referenced path with surrounding whitespace removed
    pub const fn path(&self) -> &'a str {
        self.path
    }

    /// Replace the directive span in `text` with the referenced file's content
    ///
    /// `text` must be the string this directive was found in. Text outside
    /// the span is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::EmptyPath`] when no path follows the marker,
    /// and [`DirectiveError::Read`] when the file cannot be read as UTF-8 text
    pub fn inline(&self, text: &str) -> Result<String, DirectiveError> {
        if self.path.is_empty() {
            return Err(DirectiveError::EmptyPath);
        }

        let contents = std::fs::read_to_string(self.path).map_err(|source| DirectiveError::Read {
            path: PathBuf::from(self.path),
            source,
        })?;

        let mut inlined =
            String::with_capacity(text.len() - self.span.len() + FILE_CONTENT_HEADING.len() + contents.len());
        inlined.push_str(&text[..self.span.start]);
        inlined.push_str(FILE_CONTENT_HEADING);
        inlined.push_str(&contents);
        inlined.push_str(&text[self.span.end..]);

        Ok(inlined)
    }
}
