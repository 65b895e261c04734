//! Identifier, keyword, directive, and backtick-identifier lexing.

use tablec_util::Symbol;

use crate::keyword::Keyword;
use crate::token::{Token, TokenKind};
use crate::unicode::{is_directive_continue, is_ident_continue, is_ident_start};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword; the cursor sits on its first
    /// character. `true`, `false`, and `null` become literal tokens.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.start_pos);
        let kind = if let Some(kw) = Keyword::from_str(text) {
            TokenKind::Keyword(kw)
        } else {
            match text {
                "true" => TokenKind::Bool(true),
                "false" => TokenKind::Bool(false),
                "null" => TokenKind::Null,
                _ => TokenKind::Ident(Symbol::intern(text)),
            }
        };
        self.make_token(kind)
    }

    /// Lexes a `#directive`. A lone `#` is an identifier named `#`.
    pub(crate) fn lex_directive(&mut self) -> Token {
        self.cursor.advance();
        let name_start = self.cursor.position();
        while is_directive_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let name = self.cursor.slice_from(name_start);
        if name.is_empty() {
            self.make_token(TokenKind::Ident(Symbol::intern("#")))
        } else {
            self.make_token(TokenKind::Directive(Symbol::intern(name)))
        }
    }

    /// Lexes a backtick-quoted identifier, which is never a keyword. A
    /// missing closing backtick is tolerated.
    pub(crate) fn lex_backtick_ident(&mut self) -> Token {
        self.cursor.advance();
        if !is_ident_start(self.cursor.current_char()) {
            if !self.cursor.is_at_end() {
                self.cursor.advance();
            }
            return self.make_token(TokenKind::Error);
        }
        let name_start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let name = Symbol::intern(self.cursor.slice_from(name_start));
        self.cursor.match_char('`');
        self.make_token(TokenKind::Ident(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_one(source: &str) -> Token {
        Lexer::new(source).pop()
    }

    #[test]
    fn test_plain_identifier() {
        let token = lex_one("counter_2");
        assert_eq!(token.kind, TokenKind::Ident(Symbol::intern("counter_2")));
        assert_eq!(token.literal.as_str(), "counter_2");
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(
            lex_one("переменная").kind,
            TokenKind::Ident(Symbol::intern("переменная"))
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lex_one("const").kind, TokenKind::Keyword(Keyword::Const));
        assert_eq!(lex_one("while").kind, TokenKind::Keyword(Keyword::While));
    }

    #[test]
    fn test_literal_words() {
        assert_eq!(lex_one("true").kind, TokenKind::Bool(true));
        assert_eq!(lex_one("false").kind, TokenKind::Bool(false));
        assert_eq!(lex_one("null").kind, TokenKind::Null);
    }

    #[test]
    fn test_directive() {
        let token = lex_one("#test");
        assert_eq!(token.kind, TokenKind::Directive(Symbol::intern("test")));
        assert_eq!(token.literal.as_str(), "#test");
    }

    #[test]
    fn test_lone_hash_is_identifier() {
        assert_eq!(lex_one("# x").kind, TokenKind::Ident(Symbol::intern("#")));
    }

    #[test]
    fn test_backtick_forces_identifier() {
        // Keywords lose their reserved meaning inside backticks.
        let token = lex_one("`func`");
        assert_eq!(token.kind, TokenKind::Ident(Symbol::intern("func")));
        assert_eq!(token.literal.as_str(), "`func`");
    }

    #[test]
    fn test_backtick_missing_close() {
        assert_eq!(lex_one("`abc ").kind, TokenKind::Ident(Symbol::intern("abc")));
    }

    #[test]
    fn test_backtick_bad_start() {
        assert_eq!(lex_one("`1`").kind, TokenKind::Error);
    }

    #[test]
    fn test_underscore_identifier() {
        assert_eq!(lex_one("_tmp").kind, TokenKind::Ident(Symbol::intern("_tmp")));
        assert_eq!(lex_one("_").kind, TokenKind::Ident(Symbol::intern("_")));
    }
}
