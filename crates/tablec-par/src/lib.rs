//! tablec-par - Syntactic analysis for the Table language.
//!
//! A recursive-descent parser with a Pratt-style expression engine. The
//! parser drives the lexer directly through its token ring, building an
//! owned AST rooted at [`ast::Module`] and reporting problems to a shared
//! [`Handler`].
//!
//! Rules return `Option`: `None` propagates a failure up to the nearest
//! recovery boundary (statement or top level), where the token stream is
//! resynchronized and parsing continues. Non-fatal problems are recorded
//! without failing the active rule. Whenever any error was recorded,
//! [`Parser::execute`] withholds the (partial) tree and returns `None`.

pub mod ast;
mod atoms;
mod expr;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use tablec_lex::{Keyword, Lexer, Token, TokenKind};
use tablec_util::{Handler, SourceFile, Span};

use ast::Module;

pub use expr::prec;
pub use types::type_prec;

/// Parser state: the lexer it drives and the diagnostic sink.
pub struct Parser<'a> {
    lex: Lexer<'a>,
    handler: &'a Handler,
    file: &'a SourceFile,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a loaded source file.
    pub fn new(file: &'a SourceFile, handler: &'a Handler) -> Self {
        Self {
            lex: Lexer::new(file.text()),
            handler,
            file,
        }
    }

    /// Parses the whole file into a module.
    ///
    /// Returns `None` when any error was recorded, even though a partial
    /// tree was built; callers inspect the handler for the details.
    pub fn execute(&mut self) -> Option<Module> {
        let start = self.top().span;
        let mut module = Module {
            scope: indexmap::IndexMap::new(),
            tests: Vec::new(),
            span: start,
        };

        loop {
            match self.top().kind {
                TokenKind::Eof => break,
                TokenKind::Eol => {
                    self.pop();
                },
                _ => {
                    if self.toplevel_item(&mut module).is_none() {
                        self.seek_toplevel();
                    }
                },
            }
        }

        module.span = self.close_span(start);
        if self.handler.error_count() > 0 {
            None
        } else {
            Some(module)
        }
    }

    /// The display name of the file being parsed.
    pub fn file_name(&self) -> &str {
        self.file.name()
    }

    // -----------------------------------------------------------------------
    // Token access
    // -----------------------------------------------------------------------

    /// The next unconsumed token.
    pub(crate) fn top(&mut self) -> Token {
        self.lex.peek(0)
    }

    /// Looks `offset` tokens ahead (or behind, for negative offsets).
    pub(crate) fn lookahead(&mut self, offset: isize) -> Token {
        self.lex.peek(offset)
    }

    /// Consumes the next token.
    pub(crate) fn pop(&mut self) -> Token {
        self.lex.pop()
    }

    /// The span of the most recently consumed token; node spans end here.
    pub(crate) fn prev_span(&mut self) -> Span {
        let prev = self.lex.peek(-1);
        if prev.kind == TokenKind::Empty {
            self.top().span
        } else {
            prev.span
        }
    }

    /// Completes a node span: from `start` through the last consumed
    /// token.
    pub(crate) fn close_span(&mut self, start: Span) -> Span {
        let end = self.prev_span();
        start.to(end)
    }

    // -----------------------------------------------------------------------
    // Token predicates
    // -----------------------------------------------------------------------

    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        self.top().kind == kind
    }

    pub(crate) fn at_kw(&mut self, kw: Keyword) -> bool {
        self.top().kind == TokenKind::Keyword(kw)
    }

    /// Consumes the token if it matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pop();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_kw(&mut self, kw: Keyword) -> bool {
        self.eat(TokenKind::Keyword(kw))
    }

    pub(crate) fn skip_eols(&mut self) {
        while self.at(TokenKind::Eol) {
            self.pop();
        }
    }

    // -----------------------------------------------------------------------
    // Expectations
    // -----------------------------------------------------------------------

    /// Fails unless the next token matches `kind`. Does not consume.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<()> {
        if self.at(kind) {
            Some(())
        } else {
            self.error(message)
        }
    }

    /// Fails unless the next token matches `kind`; consumes it otherwise.
    pub(crate) fn consume(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        self.expect(kind, message)?;
        Some(self.pop())
    }

    pub(crate) fn consume_kw(&mut self, kw: Keyword, message: &str) -> Option<Token> {
        self.consume(TokenKind::Keyword(kw), message)
    }

    /// Consumes the end-of-line terminating a declaration or statement.
    /// End of file and a closing `}` also count as terminators; neither
    /// is consumed.
    pub(crate) fn end_of_line(&mut self, message: &str) -> Option<()> {
        match self.top().kind {
            TokenKind::Eol => {
                self.pop();
                Some(())
            },
            TokenKind::Eof | TokenKind::RBrace => Some(()),
            _ => self.error(message),
        }
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Records an error at the current token and fails the rule.
    pub(crate) fn error<T>(&mut self, message: impl Into<String>) -> Option<T> {
        let span = self.top().span;
        self.handler.error(span, message);
        None
    }

    /// Records an error at an explicit span and fails the rule.
    pub(crate) fn error_at<T>(&mut self, span: Span, message: impl Into<String>) -> Option<T> {
        self.handler.error(span, message);
        None
    }

    /// Records an error without failing the rule; parsing continues.
    pub(crate) fn error_nonfatal(&mut self, span: Span, message: impl Into<String>) {
        self.handler.error(span, message);
    }

    pub(crate) fn warning(&mut self, span: Span, message: impl Into<String>) {
        self.handler.warning(span, message);
    }

    pub(crate) fn note(&mut self, span: Span, message: impl Into<String>) {
        self.handler.note(span, message);
    }

    // -----------------------------------------------------------------------
    // Recovery
    // -----------------------------------------------------------------------

    /// Top-level recovery: discards tokens until something that can start
    /// a top-level declaration appears at brace depth zero. The offending
    /// token is always dropped first so recovery makes progress.
    pub(crate) fn seek_toplevel(&mut self) {
        let mut depth = 0i32;
        match self.top().kind {
            TokenKind::Eof => return,
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth -= 1,
            _ => {},
        }
        self.pop();
        loop {
            let top = self.top();
            match top.kind {
                TokenKind::Eof => return,
                TokenKind::Keyword(
                    Keyword::Pub
                    | Keyword::Import
                    | Keyword::Func
                    | Keyword::Const
                    | Keyword::Struct
                    | Keyword::Macro,
                )
                | TokenKind::Directive(_)
                    if depth <= 0 =>
                {
                    return;
                },
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {},
            }
            self.pop();
        }
    }
}
