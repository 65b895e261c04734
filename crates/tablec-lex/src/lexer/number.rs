//! Integer and float literal lexing.

use crate::token::{Token, TokenKind};
use crate::unicode::is_digit_in_base;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a number literal.
    ///
    /// A leading `0` followed by `x`/`o`/`b` (either case) selects radix
    /// 16/8/2. Underscores inside digit runs are ignored. A `.` followed
    /// by a digit switches to float mode, as does an `e`/`E` exponent.
    pub(crate) fn lex_number(&mut self) -> Token {
        let mut digits = String::new();

        let first = self.cursor.current_char();
        self.cursor.advance();
        if first == '0' {
            match self.cursor.current_char() {
                'x' | 'X' => return self.lex_radix(16),
                'o' | 'O' => return self.lex_radix(8),
                'b' | 'B' => return self.lex_radix(2),
                _ => {},
            }
        }
        digits.push(first);

        self.collect_digits(&mut digits);

        let c = self.cursor.current_char();
        if c == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            self.cursor.advance();
            digits.push('.');
            self.collect_digits(&mut digits);
            if matches!(self.cursor.current_char(), 'e' | 'E') {
                return self.lex_exponent(digits);
            }
            return self.float_token(&digits);
        }
        if matches!(c, 'e' | 'E') {
            return self.lex_exponent(digits);
        }

        self.int_token(&digits, 10)
    }

    /// Lexes the digits of a radix-prefixed integer; the cursor sits on
    /// the radix letter. A prefix with no digits after it is malformed.
    fn lex_radix(&mut self, radix: u32) -> Token {
        self.cursor.advance();
        let mut digits = String::new();
        loop {
            let c = self.cursor.current_char();
            if c == '_' {
                self.cursor.advance();
            } else if is_digit_in_base(c, radix) {
                digits.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return self.make_token(TokenKind::Error);
        }
        self.int_token(&digits, radix)
    }

    /// Lexes an exponent suffix; the cursor sits on the `e`/`E`. The
    /// character after it must be a sign or a digit.
    fn lex_exponent(&mut self, mut digits: String) -> Token {
        self.cursor.advance();
        digits.push('e');
        let c = self.cursor.current_char();
        if c == '+' || c == '-' || c.is_ascii_digit() {
            digits.push(c);
            self.cursor.advance();
        } else {
            return self.make_token(TokenKind::Error);
        }
        self.collect_digits(&mut digits);
        self.float_token(&digits)
    }

    fn collect_digits(&mut self, digits: &mut String) {
        loop {
            let c = self.cursor.current_char();
            if c == '_' {
                self.cursor.advance();
            } else if c.is_ascii_digit() {
                digits.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    fn int_token(&self, digits: &str, radix: u32) -> Token {
        // Out-of-range literals saturate, matching strtoll.
        let value = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);
        self.make_token(TokenKind::Int(value))
    }

    fn float_token(&self, digits: &str) -> Token {
        let value = digits.parse::<f64>().unwrap_or(f64::MAX);
        self.make_token(TokenKind::Float(value))
    }
}
