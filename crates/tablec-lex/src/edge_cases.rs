//! Whole-lexer edge cases and properties that cut across token families.

use proptest::prelude::*;

use crate::{Lexer, TokenKind};

fn all_tokens(source: &str) -> Vec<crate::Token> {
    Lexer::new(source).collect()
}

#[test]
fn spans_are_ordered() {
    let source = "func f(x: int): int {\n    return x + 1\n}\n";
    for token in all_tokens(source) {
        assert!(
            token.span.is_ordered(),
            "unordered span {} for {:?}",
            token.span,
            token.kind
        );
    }
}

#[test]
fn token_starts_are_monotonic() {
    let source = "const x = [1, 2.5, \"three\"]\nconst y = x[0..2]\n";
    let mut prev = (0, 0);
    for token in all_tokens(source) {
        let start = (token.span.start_line, token.span.start_col);
        assert!(start >= prev, "token {:?} starts before its predecessor", token.kind);
        prev = start;
    }
}

#[test]
fn crlf_is_not_special() {
    // Carriage returns are ordinary whitespace; only line feeds end lines.
    let kinds: Vec<_> = Lexer::new("a\r\nb").map(|t| t.kind).collect();
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[1], TokenKind::Eol);
}

#[test]
fn deeply_mixed_line() {
    let source = "x: @int! = arr[1..3] \\max y \\\\ trailing comment\n";
    let tokens = all_tokens(source);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::At));
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Range));
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Backslash));
    assert_eq!(tokens.last().unwrap().kind, TokenKind::Eol);
}

#[test]
fn error_token_carries_its_text() {
    let tokens = all_tokens("1e$");
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].literal.as_str(), "1e");
}

#[test]
fn directive_then_string() {
    let tokens = all_tokens("#read \"other.tbl\"");
    assert!(matches!(tokens[0].kind, TokenKind::Directive(_)));
    assert!(matches!(tokens[1].kind, TokenKind::Str(_)));
}

proptest! {
    /// Concatenating every literal with single spaces between re-lexes to
    /// the same token kinds: literals carry the whole token.
    #[test]
    fn relex_from_literals(source in "[a-z]{1,6}( (([0-9]{1,4})|([a-z]{1,6})|[-+*/%,:]|==|!=|<=)){0,8}") {
        let original = all_tokens(&source);
        let rebuilt: String = original
            .iter()
            .map(|t| t.literal.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let relexed = all_tokens(&rebuilt);
        prop_assert_eq!(
            original.iter().map(|t| t.kind).collect::<Vec<_>>(),
            relexed.iter().map(|t| t.kind).collect::<Vec<_>>()
        );
    }

    /// Literal text always matches the source slice implied by the span
    /// for single-line, non-synthetic tokens.
    #[test]
    fn literal_matches_span(source in "[ a-z0-9+*<>=,.()\\[\\]{}]{0,40}") {
        for token in all_tokens(&source) {
            if token.kind == TokenKind::Eol || token.kind == TokenKind::Eof {
                continue;
            }
            let span = token.span;
            prop_assume!(span.start_line == span.end_line);
            let expected: String = source
                .chars()
                .skip(span.start_col as usize - 1)
                .take((span.end_col + 1 - span.start_col) as usize)
                .collect();
            prop_assert_eq!(token.literal.as_str(), expected);
        }
    }

    /// The lexer never panics, whatever bytes come in.
    #[test]
    fn lexer_total(source in "\\PC{0,60}") {
        let mut lexer = Lexer::new(&source);
        for _ in 0..200 {
            if lexer.pop().is_eof() {
                break;
            }
        }
    }
}
