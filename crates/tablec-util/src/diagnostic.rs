//! Diagnostic collection.
//!
//! Parse rules report problems through a [`Handler`], which records each
//! [`Diagnostic`] with its severity and span. Rendering is a separate
//! concern (see [`crate::emitter`]): the handler only collects and counts,
//! so tests can assert on counts without capturing output.

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

/// Diagnostic severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A syntax or semantic problem; the parse result is discarded.
    Error,
    /// Suspicious but accepted input.
    Warning,
    /// Informational remark.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "Error"),
            Level::Warning => write!(f, "Warning"),
            Level::Note => write!(f, "Note"),
        }
    }
}

/// A single reported problem.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: Level, span: Span, message: impl Into<String>) -> Self {
        Self {
            level,
            span,
            message: message.into(),
        }
    }

    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self::new(Level::Error, span, message)
    }

    pub fn warning(span: Span, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, span, message)
    }

    pub fn note(span: Span, message: impl Into<String>) -> Self {
        Self::new(Level::Note, span, message)
    }
}

/// Collects diagnostics emitted during lexing and parsing.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Records a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Records an error at `span`.
    pub fn error(&self, span: Span, message: impl Into<String>) {
        self.emit(Diagnostic::error(span, message));
    }

    /// Records a warning at `span`.
    pub fn warning(&self, span: Span, message: impl Into<String>) {
        self.emit(Diagnostic::warning(span, message));
    }

    /// Records a note at `span`.
    pub fn note(&self, span: Span, message: impl Into<String>) {
        self.emit(Diagnostic::note(span, message));
    }

    /// True if at least one error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Number of recorded warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// Snapshot of everything recorded so far, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}
