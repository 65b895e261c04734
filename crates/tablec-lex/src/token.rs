//! Token model.
//!
//! Every token carries its kind (with any decoded payload), its span, and
//! the exact source text it was lexed from. For non-synthetic tokens the
//! literal text is the precise substring of the source between the span
//! endpoints; `Eol` and `Eof` use fixed placeholders.

use tablec_util::{Span, Symbol};

use crate::keyword::Keyword;

/// The closed set of token kinds, with kind-specific payloads decoded at
/// lex time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    /// Ring-buffer sentinel for "no such token".
    Empty,

    /// Identifier, including backtick-forced identifiers.
    Ident(Symbol),
    /// `#name` compile-time directive; the payload omits the `#`.
    Directive(Symbol),
    /// Integer literal of any radix.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal with escapes already decoded.
    Str(Symbol),
    /// Character literal as a Unicode scalar.
    Char(char),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// A reserved word.
    Keyword(Keyword),

    Colon,
    Semicolon,
    Comma,
    Dot,
    At,
    Dollar,
    Question,
    Bang,
    Assign,
    Lt,
    Gt,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Bar,
    Tilde,
    Backslash,
    LParen,
    RParen,
    LSquare,
    RSquare,
    LBrace,
    RBrace,

    /// `..`
    Range,
    /// `...`
    Ellipsis,
    /// `=>`
    Arrow,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<=`
    Le,
    /// `>=`
    Ge,

    /// A run of two or more operator characters, e.g. `**` or `<|`-less
    /// runs like `+~`. The payload is the full spelling.
    CustomOp(Symbol),

    /// End of line.
    Eol,
    /// End of file. Popping past the end keeps returning this.
    Eof,
    /// Malformed input; the token's literal text is kept for diagnosis.
    Error,
}

impl TokenKind {
    /// True for any keyword token, regardless of which keyword.
    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(self, TokenKind::Keyword(_))
    }

    /// True if this token is the given keyword.
    #[inline]
    pub fn is_kw(self, kw: Keyword) -> bool {
        self == TokenKind::Keyword(kw)
    }

    /// True for tokens usable as binary operators in the expression
    /// engine (single operator characters, custom runs, `?`, and `;`).
    #[inline]
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Amp
                | TokenKind::Bar
                | TokenKind::Tilde
                | TokenKind::Question
                | TokenKind::Semicolon
                | TokenKind::CustomOp(_)
        )
    }

    /// True for the six comparison operators, which chain n-ary.
    #[inline]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge
        )
    }
}

/// A lexed token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Exact source text of the token (interned).
    pub literal: Symbol,
}

impl Token {
    /// Builds a token.
    pub fn new(kind: TokenKind, span: Span, literal: Symbol) -> Token {
        Token {
            kind,
            span,
            literal,
        }
    }

    /// The ring-buffer sentinel returned for out-of-window negative peeks.
    pub fn empty() -> Token {
        Token {
            kind: TokenKind::Empty,
            span: Span::DUMMY,
            literal: Symbol::intern("<EMPTY>"),
        }
    }

    /// The sentinel returned for peeks beyond the ring capacity.
    pub fn out_of_range() -> Token {
        Token {
            kind: TokenKind::Error,
            span: Span::DUMMY,
            literal: Symbol::intern("<OUT-OF-RANGE>"),
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    #[inline]
    pub fn is_eol(&self) -> bool {
        self.kind == TokenKind::Eol
    }
}
