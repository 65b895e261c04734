//! tablec-util - Shared infrastructure for the Table compiler.
//!
//! This crate carries everything the front-end phases have in common:
//!
//! - [`span::Span`] - line/column source regions
//! - [`source::SourceFile`] - the once-read source buffer with line access
//! - [`symbol::Symbol`] - interned strings with stable, leaked storage
//! - [`diagnostic::Handler`] - diagnostic collection and counting
//! - [`emitter::Emitter`] - diagnostic rendering with excerpts and color
//!
//! Nothing here knows about tokens or AST nodes; those live in
//! `tablec-lex` and `tablec-par` respectively.

pub mod diagnostic;
pub mod emitter;
pub mod error;
pub mod source;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use emitter::Emitter;
pub use error::LoadError;
pub use source::SourceFile;
pub use span::Span;
pub use symbol::Symbol;
