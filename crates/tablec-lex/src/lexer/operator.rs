//! Operators, compound punctuation, comments, and line continuations.

use tablec_util::Symbol;

use crate::token::{Token, TokenKind};
use crate::unicode::is_operator_char;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `.`, `..`, or `...`.
    pub(crate) fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            if self.cursor.match_char('.') {
                self.make_token(TokenKind::Ellipsis)
            } else {
                self.make_token(TokenKind::Range)
            }
        } else {
            self.make_token(TokenKind::Dot)
        }
    }

    /// Lexes `=`, `==`, or `=>`.
    pub(crate) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            self.make_token(TokenKind::Arrow)
        } else if self.cursor.match_char('=') {
            self.make_token(TokenKind::Eq)
        } else {
            self.make_token(TokenKind::Assign)
        }
    }

    /// Lexes `<` or `<=`.
    pub(crate) fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::Le)
        } else {
            self.make_token(TokenKind::Lt)
        }
    }

    /// Lexes `>` or `>=`.
    pub(crate) fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::Ge)
        } else {
            self.make_token(TokenKind::Gt)
        }
    }

    /// Lexes `!` or `!=`.
    pub(crate) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.make_token(TokenKind::Ne)
        } else {
            self.make_token(TokenKind::Bang)
        }
    }

    /// Lexes a run of operator characters. A single character emits its
    /// direct kind; two or more fuse into one custom operator whose
    /// spelling is the whole run.
    pub(crate) fn lex_operator(&mut self) -> Token {
        let first = self.cursor.current_char();
        self.cursor.advance();
        if !is_operator_char(self.cursor.current_char()) {
            let kind = match first {
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '^' => TokenKind::Caret,
                '&' => TokenKind::Amp,
                '|' => TokenKind::Bar,
                _ => TokenKind::Tilde,
            };
            return self.make_token(kind);
        }
        while is_operator_char(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let spelling = Symbol::intern(self.cursor.slice_from(self.start_pos));
        self.make_token(TokenKind::CustomOp(spelling))
    }

    /// Handles a backslash: `\\` comment, `\"` raw string, backslash
    /// before a newline (line continuation, yielding no token at all), or
    /// a lone backslash token.
    pub(crate) fn lex_backslash(&mut self) -> Option<Token> {
        self.cursor.advance();
        match self.cursor.current_char() {
            '\\' => {
                // Line comment: swallow through the newline and stand in
                // for it with a single Eol.
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                if self.cursor.is_at_end() {
                    return Some(self.eof_token());
                }
                self.cursor.advance();
                Some(self.eol_token())
            },
            '"' => Some(self.lex_string(true)),
            '\n' => {
                self.cursor.advance();
                None
            },
            _ => Some(self.make_token(TokenKind::Backslash)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_token(source: &str) -> Token {
        Lexer::new(source).pop()
    }

    fn first_kind(source: &str) -> TokenKind {
        first_token(source).kind
    }

    #[test]
    fn test_single_operators() {
        assert_eq!(first_kind("+ x"), TokenKind::Plus);
        assert_eq!(first_kind("- x"), TokenKind::Minus);
        assert_eq!(first_kind("* x"), TokenKind::Star);
        assert_eq!(first_kind("/ x"), TokenKind::Slash);
        assert_eq!(first_kind("% x"), TokenKind::Percent);
        assert_eq!(first_kind("^ x"), TokenKind::Caret);
        assert_eq!(first_kind("& x"), TokenKind::Amp);
        assert_eq!(first_kind("| x"), TokenKind::Bar);
        assert_eq!(first_kind("~ x"), TokenKind::Tilde);
    }

    #[test]
    fn test_custom_operator_run() {
        let token = Lexer::new("a ** b").nth(1).unwrap();
        assert_eq!(token.kind, TokenKind::CustomOp(Symbol::intern("**")));
        assert_eq!(token.literal.as_str(), "**");
    }

    #[test]
    fn test_long_custom_operator() {
        let token = first_token("+-~^");
        assert_eq!(token.kind, TokenKind::CustomOp(Symbol::intern("+-~^")));
        assert_eq!(token.literal.as_str(), "+-~^");
    }

    #[test]
    fn test_operator_not_fused_with_equals() {
        // `=` is not an operator character, so `+=` stays two tokens for
        // the parser's compound-assignment lookahead.
        let kinds: Vec<_> = Lexer::new("x += 1").map(|t| t.kind).collect();
        assert_eq!(kinds[1], TokenKind::Plus);
        assert_eq!(kinds[2], TokenKind::Assign);
    }

    #[test]
    fn test_slash_is_not_comment() {
        // Comments use backslashes; `//` is a custom operator.
        let token = Lexer::new("a // b").nth(1).unwrap();
        assert_eq!(token.kind, TokenKind::CustomOp(Symbol::intern("//")));
    }
}
