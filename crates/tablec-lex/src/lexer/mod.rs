//! Lexer implementation, split by token family:
//! - `core` - dispatch, the token ring buffer, and span/literal capture
//! - `identifier` - identifiers, keywords, directives, backtick names
//! - `number` - integer and float literals
//! - `string` - string and character literals with escape decoding
//! - `operator` - punctuation, operator runs, comments, continuations

mod core;
mod identifier;
mod number;
mod operator;
mod string;

pub use core::{Lexer, RING_CAPACITY};
