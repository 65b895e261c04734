//! Diagnostic rendering.
//!
//! Formats a diagnostic as a header line followed by a two-line excerpt:
//!
//! ```text
//! Error in 'demo.tbl' at line 3, column 9: Expected ':' or '=' after constant name
//!     3 |	const x 12
//!       	        ↑↑
//! ```
//!
//! The pointer line underlines columns `start_col..=end_col` of the span.
//! When the span runs past the end of the line (multi-line tokens), the
//! pointer extends to the end of the excerpted line. ANSI color is applied
//! only when the caller enables it.

use std::io::Write;

use crate::diagnostic::{Diagnostic, Level};
use crate::source::SourceFile;
use crate::span::Span;

const CLEAR: &str = "\x1b[0m";
const FG_RED: &str = "\x1b[31m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GRAY: &str = "\x1b[90m";
const FG_LYELLOW: &str = "\x1b[93m";

/// Writes diagnostics with line excerpts and column pointers.
pub struct Emitter {
    colors: bool,
    unicode_arrows: bool,
}

impl Emitter {
    /// Creates an emitter. `colors` should be true only when the output
    /// stream is a terminal that understands ANSI escapes.
    pub fn new(colors: bool) -> Self {
        Self {
            colors,
            unicode_arrows: true,
        }
    }

    /// Switches the pointer line between `↑` and plain `^`.
    pub fn ascii_arrows(mut self) -> Self {
        self.unicode_arrows = false;
        self
    }

    /// Renders one diagnostic against its source file.
    pub fn emit(
        &self,
        out: &mut dyn Write,
        file: &SourceFile,
        diagnostic: &Diagnostic,
    ) -> std::io::Result<()> {
        let span = diagnostic.span;
        self.color_start(out, self.level_color(diagnostic.level))?;
        write!(out, "{}", diagnostic.level)?;
        self.color_end(out)?;
        writeln!(
            out,
            " in '{}' at line {}, column {}: {}",
            file.name(),
            span.start_line,
            span.start_col,
            diagnostic.message
        )?;

        if let Some(line) = file.line(span.start_line) {
            self.show_line(out, line, span)?;
        }
        Ok(())
    }

    /// Renders every diagnostic recorded in a handler.
    pub fn emit_all(
        &self,
        out: &mut dyn Write,
        file: &SourceFile,
        diagnostics: &[Diagnostic],
    ) -> std::io::Result<()> {
        for diagnostic in diagnostics {
            self.emit(out, file, diagnostic)?;
        }
        Ok(())
    }

    fn show_line(&self, out: &mut dyn Write, line: &str, span: Span) -> std::io::Result<()> {
        self.color_start(out, FG_GRAY)?;
        write!(out, "{:>5} |\t", span.start_line)?;
        self.color_end(out)?;
        writeln!(out, "{}", line)?;

        let line_cols = line.chars().count() as u32;
        let end_col = if span.end_line > span.start_line {
            line_cols.max(span.start_col)
        } else {
            span.end_col.max(span.start_col)
        };
        let arrow = if self.unicode_arrows { "\u{2191}" } else { "^" };

        write!(out, "      \t")?;
        self.color_start(out, FG_LYELLOW)?;
        for col in 1..=end_col {
            if col < span.start_col {
                write!(out, " ")?;
            } else {
                write!(out, "{}", arrow)?;
            }
        }
        self.color_end(out)?;
        writeln!(out)
    }

    fn level_color(&self, level: Level) -> &'static str {
        match level {
            Level::Error => FG_RED,
            Level::Warning => FG_YELLOW,
            Level::Note => FG_CYAN,
        }
    }

    fn color_start(&self, out: &mut dyn Write, color: &str) -> std::io::Result<()> {
        if self.colors {
            write!(out, "{}", color)?;
        }
        Ok(())
    }

    fn color_end(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if self.colors {
            write!(out, "{}", CLEAR)?;
        }
        Ok(())
    }
}
