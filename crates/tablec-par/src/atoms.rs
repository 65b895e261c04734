//! Leaf rules: names, qualified names, and literal atoms.

use tablec_lex::TokenKind;
use tablec_util::Symbol;

use crate::ast::*;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses a dotted name: `a`, `a.b`, `a.b.c`.
    pub(crate) fn qualname(&mut self) -> Option<Qualname> {
        let start = self.top().span;
        let mut parts = Vec::new();
        loop {
            match self.top().kind {
                TokenKind::Ident(name) => {
                    parts.push(name);
                    self.pop();
                },
                _ if parts.is_empty() => {
                    let literal = self.top().literal;
                    return self.error(format!(
                        "Unexpected token in qualified name: '{}'",
                        literal
                    ));
                },
                _ => return self.error("Expected an identifier after '.'"),
            }
            if !self.at(TokenKind::Dot) {
                break;
            }
            self.pop();
        }
        let span = self.close_span(start);
        Some(Qualname { parts, span })
    }

    /// Parses a single identifier into a [`Name`].
    pub(crate) fn simple_name(&mut self) -> Option<Name> {
        match self.top().kind {
            TokenKind::Ident(name) => {
                let token = self.pop();
                Some(Name {
                    name,
                    span: token.span,
                })
            },
            _ => {
                let literal = self.top().literal;
                self.error(format!("Expected a name here, not '{}'", literal))
            },
        }
    }

    /// Like [`Parser::simple_name`], for declaration sites: `_` and names
    /// starting with a double underscore are reserved.
    pub(crate) fn declared_name(&mut self) -> Option<Name> {
        let name = self.simple_name()?;
        let text = name.name.as_str();
        if text == "_" || text.starts_with("__") {
            self.error_nonfatal(name.span, format!("'{}' is a reserved identifier", text));
        }
        Some(name)
    }

    /// Parses one atom: a literal or a qualified name.
    pub(crate) fn atom(&mut self) -> Option<Expr> {
        let top = self.top();
        match top.kind {
            TokenKind::Int(value) => {
                let token = self.pop();
                Some(Expr::Int(IntLit {
                    value,
                    span: token.span,
                }))
            },
            TokenKind::Float(value) => {
                let token = self.pop();
                Some(Expr::Float(FloatLit {
                    value,
                    span: token.span,
                }))
            },
            TokenKind::Bool(value) => {
                let token = self.pop();
                Some(Expr::Bool(BoolLit {
                    value,
                    span: token.span,
                }))
            },
            TokenKind::Char(value) => {
                let token = self.pop();
                Some(Expr::Char(CharLit {
                    value,
                    span: token.span,
                }))
            },
            TokenKind::Null => {
                let token = self.pop();
                Some(Expr::Null(NullLit { span: token.span }))
            },
            TokenKind::Str(_) => self.string_atom(),
            TokenKind::Ident(_) => self.qualname().map(Expr::Qualname),
            _ => self.error(format!(
                "Expected atom (an integer, float, boolean, string, or qualified name), not '{}'",
                top.literal
            )),
        }
    }

    /// Parses a string atom. Adjacent string literals concatenate into a
    /// single node.
    pub(crate) fn string_atom(&mut self) -> Option<Expr> {
        let first = self.pop();
        let TokenKind::Str(value) = first.kind else {
            return self.error_at(first.span, "Expected a string here");
        };
        if !matches!(self.top().kind, TokenKind::Str(_)) {
            return Some(Expr::Str(StrLit {
                value,
                span: first.span,
            }));
        }
        let mut buf = value.as_str().to_owned();
        let mut end = first.span;
        while let TokenKind::Str(next) = self.top().kind {
            buf.push_str(next.as_str());
            end = self.pop().span;
        }
        Some(Expr::Str(StrLit {
            value: Symbol::intern(&buf),
            span: first.span.to(end),
        }))
    }

    /// `#read "path"` substitutes the named file's contents as a string
    /// atom at parse time. A missing file is a fatal parse error.
    pub(crate) fn read_directive(&mut self) -> Option<Expr> {
        let start = self.pop().span;
        if !matches!(self.top().kind, TokenKind::Str(_)) {
            return self.error("Expected a file path string after #read");
        }
        let token = self.pop();
        let TokenKind::Str(path) = token.kind else {
            unreachable!();
        };
        match std::fs::read_to_string(path.as_str()) {
            Ok(contents) => Some(Expr::Str(StrLit {
                value: Symbol::intern(&contents),
                span: start.to(token.span),
            })),
            Err(err) => self.error_at(token.span, format!("Unable to read '{}': {}", path, err)),
        }
    }
}
