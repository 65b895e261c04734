//! Source file buffer.
//!
//! A [`SourceFile`] is read from disk exactly once. It keeps the full text
//! (with NUL bytes stripped) for the lexer to walk and an ordered list of
//! line starts so diagnostics can excerpt the offending line.

use std::fs;
use std::path::Path;

use crate::error::LoadError;

/// A source file held in memory for the duration of a parse.
#[derive(Debug)]
pub struct SourceFile {
    /// Display name used in diagnostics (normally the path given on the
    /// command line).
    name: String,
    /// Full file contents. NUL bytes in the input are ignored.
    text: String,
    /// Byte range of each line within `text`, excluding the terminator.
    line_spans: Vec<(usize, usize)>,
}

impl SourceFile {
    /// Reads a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<SourceFile, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filtered: Vec<u8> = bytes.into_iter().filter(|&b| b != 0).collect();
        let text = String::from_utf8(filtered).map_err(|_| LoadError::InvalidUtf8 {
            path: path.display().to_string(),
        })?;
        Ok(Self::from_source(path.display().to_string(), text))
    }

    /// Builds a source file from an in-memory string. Used by tests and by
    /// the `#read` directive, which substitutes file contents at parse
    /// time.
    pub fn from_source(name: impl Into<String>, text: impl Into<String>) -> SourceFile {
        let text = text.into();
        let mut line_spans = Vec::new();
        let mut start = 0;
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_spans.push((start, i));
                start = i + 1;
            }
        }
        line_spans.push((start, text.len()));
        SourceFile {
            name: name.into(),
            text,
            line_spans,
        }
    }

    /// The display name of this file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The complete source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines, counting a trailing unterminated line.
    pub fn line_count(&self) -> usize {
        self.line_spans.len()
    }

    /// Returns the text of a line (1-based), without its terminator.
    pub fn line(&self, line_no: u32) -> Option<&str> {
        let (start, end) = *self.line_spans.get(line_no.checked_sub(1)? as usize)?;
        Some(&self.text[start..end])
    }
}
