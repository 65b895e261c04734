//! Shared error types.

use thiserror::Error;

/// Errors raised while loading source text into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("unable to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid UTF-8.
    #[error("'{path}' is not valid UTF-8")]
    InvalidUtf8 { path: String },
}
