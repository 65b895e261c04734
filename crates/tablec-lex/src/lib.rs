//! tablec-lex - Lexical analysis for the Table language.
//!
//! The lexer turns source text into a lazy stream of [`Token`]s. The
//! parser drives it through a four-slot ring buffer: [`Lexer::peek`]
//! accepts offsets `0..4` to look ahead (lexing on demand) and `-3..0`
//! to re-read recently consumed tokens, and [`Lexer::pop`] consumes the
//! oldest buffered token.
//!
//! Every token records the exact source text it came from along with a
//! 1-based line/column span, so diagnostics can point back into the file
//! and so concatenating literals reconstructs the source up to
//! whitespace. Malformed input becomes `Error` tokens rather than
//! panics or diagnostics; the parser reports them where it meets them.

pub mod cursor;
pub mod keyword;
mod lexer;
pub mod token;
pub mod unicode;

#[cfg(test)]
mod edge_cases;

pub use keyword::Keyword;
pub use lexer::{Lexer, RING_CAPACITY};
pub use token::{Token, TokenKind};
