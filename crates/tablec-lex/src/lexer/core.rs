//! Core lexer: dispatch and the token ring buffer.

use tablec_util::{Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crate::unicode::{is_ident_start, is_operator_char};

/// Number of tokens the ring buffer holds. Lookahead up to
/// `RING_CAPACITY - 1` tokens and look-behind over not-yet-overwritten
/// slots are both served from the ring.
pub const RING_CAPACITY: usize = 4;

/// Lexer for Table source text.
///
/// Tokens are produced lazily: [`Lexer::peek`] lexes just far enough to
/// fill the requested slot, and [`Lexer::pop`] consumes the oldest
/// buffered token. Consumed tokens stay in the ring until their slot is
/// reused, which is what makes negative `peek` offsets work.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    buf: [Token; RING_CAPACITY],
    /// Index of the oldest buffered token.
    next: usize,
    /// Number of tokens currently buffered ahead of the parser.
    buffered: usize,
    /// Total number of tokens ever lexed.
    emitted: usize,
    /// Start of the token currently being lexed.
    pub(crate) start_pos: usize,
    pub(crate) start_line: u32,
    pub(crate) start_col: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            buf: [Token::empty(); RING_CAPACITY],
            next: 0,
            buffered: 0,
            emitted: 0,
            start_pos: 0,
            start_line: 1,
            start_col: 1,
        }
    }

    /// Returns a buffered token without consuming it.
    ///
    /// Non-negative offsets look ahead (`0` is the next token to be
    /// popped), lexing on demand; offsets at or beyond the ring capacity
    /// return an `Error` sentinel. Negative offsets look back at already
    /// popped tokens; if the requested token was never lexed or its slot
    /// has been reused, an `Empty` sentinel comes back.
    pub fn peek(&mut self, offset: isize) -> Token {
        if offset < 0 {
            let back = offset.unsigned_abs();
            if self.emitted >= back && self.buffered + back < RING_CAPACITY {
                return self.buf[(self.next + RING_CAPACITY - back) % RING_CAPACITY];
            }
            return Token::empty();
        }
        let offset = offset as usize;
        if offset >= RING_CAPACITY {
            return Token::out_of_range();
        }
        while self.buffered <= offset {
            self.fill_one();
        }
        self.buf[(self.next + offset) % RING_CAPACITY]
    }

    /// Consumes and returns the next token. Past the end of input this
    /// keeps returning `Eof`.
    pub fn pop(&mut self) -> Token {
        if self.buffered == 0 {
            self.fill_one();
        }
        let token = self.buf[self.next];
        self.next = (self.next + 1) % RING_CAPACITY;
        self.buffered -= 1;
        token
    }

    fn fill_one(&mut self) {
        let token = self.next_token();
        let slot = (self.next + self.buffered) % RING_CAPACITY;
        self.buf[slot] = token;
        self.buffered += 1;
        self.emitted += 1;
    }

    /// Lexes one token from the input. The ring is bypassed; callers
    /// normally go through [`Lexer::peek`] / [`Lexer::pop`].
    pub(crate) fn next_token(&mut self) -> Token {
        loop {
            while !self.cursor.is_at_end() {
                let c = self.cursor.current_char();
                if c != '\n' && c.is_whitespace() {
                    self.cursor.advance();
                } else {
                    break;
                }
            }
            self.start_pos = self.cursor.position();
            self.start_line = self.cursor.line();
            self.start_col = self.cursor.column();

            if self.cursor.is_at_end() {
                return self.eof_token();
            }

            let c = self.cursor.current_char();
            return match c {
                '\n' => {
                    self.cursor.advance();
                    self.eol_token()
                },
                ':' => self.single(TokenKind::Colon),
                ';' => self.single(TokenKind::Semicolon),
                ',' => self.single(TokenKind::Comma),
                '$' => self.single(TokenKind::Dollar),
                '@' => self.single(TokenKind::At),
                '?' => self.single(TokenKind::Question),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '[' => self.single(TokenKind::LSquare),
                ']' => self.single(TokenKind::RSquare),
                '{' => self.single(TokenKind::LBrace),
                '}' => self.single(TokenKind::RBrace),
                '.' => self.lex_dot(),
                '=' => self.lex_equals(),
                '<' => self.lex_less(),
                '>' => self.lex_greater(),
                '!' => self.lex_bang(),
                '\\' => match self.lex_backslash() {
                    Some(token) => token,
                    // Line continuation: keep lexing as if the break were
                    // not there.
                    None => continue,
                },
                '"' => self.lex_string(false),
                '\'' => self.lex_char(),
                '#' => self.lex_directive(),
                '`' => self.lex_backtick_ident(),
                c if is_operator_char(c) => self.lex_operator(),
                c if c.is_ascii_digit() => self.lex_number(),
                c if is_ident_start(c) => self.lex_identifier(),
                _ => {
                    self.cursor.advance();
                    self.make_token(TokenKind::Error)
                },
            };
        }
    }

    /// Consumes one character and emits its direct token kind.
    pub(crate) fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.make_token(kind)
    }

    /// Builds a token covering everything consumed since the token start,
    /// with the exact source text as its literal.
    pub(crate) fn make_token(&self, kind: TokenKind) -> Token {
        let literal = Symbol::intern(self.cursor.slice_from(self.start_pos));
        let span = Span::new(
            self.start_line,
            self.start_col,
            self.cursor.line(),
            self.cursor.column().saturating_sub(1),
        );
        Token::new(kind, span, literal)
    }

    /// An `Eol` token. Its span runs through the line break, ending at
    /// column 0 of the following line.
    pub(crate) fn eol_token(&self) -> Token {
        let span = Span::new(self.start_line, self.start_col, self.start_line + 1, 0);
        Token::new(TokenKind::Eol, span, Symbol::intern("\n"))
    }

    /// An `Eof` token at the current position.
    pub(crate) fn eof_token(&self) -> Token {
        let span = Span::point(self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, span, Symbol::intern("<EOF>"))
    }

}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.pop();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}
