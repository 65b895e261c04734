//! String and character literal lexing.

use tablec_util::Symbol;

use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal; the cursor sits on the opening quote.
    ///
    /// Three opening quotes start a triple-quoted string, which accepts
    /// raw newlines and only closes on `"""`. When `raw` is set (the
    /// `\"..."` form) escape sequences pass through verbatim.
    pub(crate) fn lex_string(&mut self, raw: bool) -> Token {
        self.cursor.advance();
        let mut triple = false;
        if self.cursor.current_char() == '"' {
            if self.cursor.peek_char(1) == '"' {
                triple = true;
                self.cursor.advance();
                self.cursor.advance();
            } else {
                self.cursor.advance();
                return self.make_token(TokenKind::Str(Symbol::intern("")));
            }
        }

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                // Unterminated string.
                return self.make_token(TokenKind::Error);
            }
            let c = self.cursor.current_char();
            match c {
                '"' => {
                    if !triple {
                        self.cursor.advance();
                        break;
                    }
                    if self.cursor.peek_char(1) == '"' && self.cursor.peek_char(2) == '"' {
                        self.cursor.advance();
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    value.push('"');
                    self.cursor.advance();
                },
                '\\' if !raw => {
                    self.cursor.advance();
                    match self.decode_escape() {
                        Some(decoded) => value.push(decoded),
                        None => return self.make_token(TokenKind::Error),
                    }
                },
                '\n' if !triple => {
                    // The newline stays in the input; only triple-quoted
                    // strings may span lines.
                    return self.make_token(TokenKind::Error);
                },
                _ => {
                    value.push(c);
                    self.cursor.advance();
                },
            }
        }
        self.make_token(TokenKind::Str(Symbol::intern(&value)))
    }

    /// Lexes a character literal; the cursor sits on the opening quote.
    pub(crate) fn lex_char(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.is_at_end() {
            return self.make_token(TokenKind::Error);
        }
        let c = self.cursor.current_char();
        let value = if c == '\\' {
            if self.cursor.peek_char(1).is_whitespace() {
                // A backslash with nothing escaped is the backslash
                // character itself.
                self.cursor.advance();
                '\\'
            } else {
                self.cursor.advance();
                match self.decode_escape() {
                    Some(decoded) => decoded,
                    None => return self.make_token(TokenKind::Error),
                }
            }
        } else if c == '\n' || c == '\r' {
            self.cursor.advance();
            ' '
        } else {
            self.cursor.advance();
            c
        };
        // A missing closing quote is tolerated; the next token picks up
        // where the literal left off.
        if self.cursor.current_char() == '\'' {
            self.cursor.advance();
        }
        self.make_token(TokenKind::Char(value))
    }

    /// Decodes one escape sequence; the cursor sits just past the
    /// backslash. Returns `None` for malformed escapes.
    pub(crate) fn decode_escape(&mut self) -> Option<char> {
        let c = self.cursor.current_char();
        self.cursor.advance();
        match c {
            '0' => Some('\0'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            'e' => Some('\u{1B}'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            'o' => self.decode_codepoint(3, 8),
            'x' => self.decode_codepoint(2, 16),
            'u' => self.decode_codepoint(4, 16),
            'U' => self.decode_codepoint(6, 16),
            _ => None,
        }
    }

    /// Reads exactly `count` digits in `radix` and converts the result to
    /// a Unicode scalar.
    fn decode_codepoint(&mut self, count: usize, radix: u32) -> Option<char> {
        let mut value: u32 = 0;
        for _ in 0..count {
            let digit = self.cursor.current_char().to_digit(radix)?;
            self.cursor.advance();
            value = value * radix + digit;
        }
        char::from_u32(value)
    }
}
