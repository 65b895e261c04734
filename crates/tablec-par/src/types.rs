//! Type parsing: a second Pratt engine with its own precedence table.

use tablec_lex::{Keyword, TokenKind};
use tablec_util::Span;

use crate::ast::*;
use crate::expr::prec;
use crate::Parser;

/// Type precedence levels.
pub mod type_prec {
    /// Prefix modifiers: `mut`, `!`, `opt`, `?`, `@`, and array shapes.
    pub const MODIFIER: i32 = 100;
    /// Union `|`.
    pub const UNION: i32 = 20;
    /// Function `=>`.
    pub const FUNC: i32 = 15;
}

impl<'a> Parser<'a> {
    /// Parses a type no looser than `min_prec`.
    pub(crate) fn type_expr(&mut self, min_prec: i32) -> Option<Type> {
        let mut sub_type: Option<Type> = None;
        loop {
            let top = self.top();
            match top.kind {
                TokenKind::Ident(_) => {
                    if sub_type.is_some() {
                        return self.error("Unexpected identifier in type");
                    }
                    let base = self.qualname()?;
                    let span = base.span;
                    sub_type = Some(Type::Simple(SimpleType { base, span }));
                },

                TokenKind::At => {
                    if sub_type.is_some() {
                        return self.error("Pointer designations must precede a type");
                    }
                    let start = self.pop().span;
                    sub_type = Some(self.pointer_type(start)?);
                },

                TokenKind::Keyword(Keyword::Mut) | TokenKind::Bang => {
                    if sub_type.is_some() {
                        return self.error("Type modifiers must precede a type");
                    }
                    let start = self.pop().span;
                    let inner = self.type_expr(type_prec::MODIFIER)?;
                    sub_type = Some(self.make_mutable(inner, start));
                },

                TokenKind::Keyword(Keyword::Opt) | TokenKind::Question => {
                    if sub_type.is_some() {
                        return self.error("Type modifiers must precede a type");
                    }
                    let start = self.pop().span;
                    let inner = self.type_expr(type_prec::MODIFIER)?;
                    sub_type = Some(self.make_optional(inner, start));
                },

                TokenKind::LSquare => {
                    if sub_type.is_some() {
                        return self.error("Array shapes must precede their element type");
                    }
                    sub_type = Some(self.array_type()?);
                },

                TokenKind::Bar => match sub_type.take() {
                    None => return self.error("Union type chain requires a type to the left"),
                    Some(first) => {
                        if type_prec::UNION <= min_prec {
                            return Some(first);
                        }
                        let start = first.span();
                        let mut variants = vec![first];
                        while self.at(TokenKind::Bar) {
                            self.pop();
                            variants.push(self.type_expr(type_prec::UNION)?);
                        }
                        let span = self.close_span(start);
                        sub_type = Some(Type::Union(UnionType { variants, span }));
                    },
                },

                TokenKind::Arrow => {
                    if type_prec::FUNC < min_prec {
                        return match sub_type.take() {
                            Some(done) => Some(done),
                            None => self.error("Expected a type here"),
                        };
                    }
                    let (params, start) = match sub_type.take() {
                        Some(param) => {
                            let span = param.span();
                            (vec![param], span)
                        },
                        None => (Vec::new(), top.span),
                    };
                    sub_type = Some(self.func_type_rhs(params, start)?);
                },

                TokenKind::LParen => match sub_type.take() {
                    Some(base) => {
                        sub_type = Some(self.template_type(base)?);
                    },
                    None => {
                        if self.lookahead(1).kind == TokenKind::RParen
                            && self.lookahead(2).kind == TokenKind::Arrow
                        {
                            // `() => ...`: the no-parameter function type.
                            let start = self.pop().span;
                            self.pop();
                            sub_type = Some(self.func_type_rhs(Vec::new(), start)?);
                            continue;
                        }
                        let start = self.pop().span;
                        let inner = self.type_expr(min_prec & 1)?;
                        if self.at(TokenKind::Comma) {
                            // A parenthesized comma list is a function
                            // parameter list.
                            let mut params = vec![inner];
                            while self.eat(TokenKind::Comma) {
                                params.push(self.type_expr(0)?);
                            }
                            self.consume(
                                TokenKind::RParen,
                                "Expected end of parameter type list here",
                            )?;
                            self.expect(TokenKind::Arrow, "Expected function arrow here")?;
                            sub_type = Some(self.func_type_rhs(params, start)?);
                        } else {
                            self.consume(
                                TokenKind::RParen,
                                "Expected matching parenthesis here",
                            )?;
                            sub_type = Some(inner);
                        }
                    },
                },

                _ => match sub_type.take() {
                    Some(done) => return Some(done),
                    None => return self.error("Expected a type here"),
                },
            }
        }
    }

    /// The type after a consumed `@`. A bare `@` at a terminator is the
    /// untyped pointer.
    fn pointer_type(&mut self, start: Span) -> Option<Type> {
        let base = match self.top().kind {
            TokenKind::Ident(_)
            | TokenKind::At
            | TokenKind::LSquare
            | TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Question
            | TokenKind::Keyword(Keyword::Mut)
            | TokenKind::Keyword(Keyword::Opt) => {
                Some(Box::new(self.type_expr(type_prec::MODIFIER)?))
            },
            _ => None,
        };
        let span = self.close_span(start);
        Some(Type::Pointer(PointerType { base, span }))
    }

    /// Wraps a type in `Mutable`, collapsing duplicates with a warning.
    fn make_mutable(&mut self, inner: Type, start: Span) -> Type {
        if matches!(inner, Type::Mutable(_)) {
            self.warning(start.to(inner.span()), "Duplicated mutability modifier");
            return inner;
        }
        let span = start.to(inner.span());
        Type::Mutable(MutableType {
            base: Box::new(inner),
            span,
        })
    }

    /// Wraps a type in `Optional`, collapsing duplicates and keeping
    /// `Mutable` outermost: `opt mut T` and `mut opt T` both become
    /// `mut (opt T)`.
    fn make_optional(&mut self, inner: Type, start: Span) -> Type {
        match inner {
            Type::Optional(_) => {
                self.warning(start.to(inner.span()), "Duplicated optional modifier");
                inner
            },
            Type::Mutable(mutable) => {
                let rewrapped = self.make_optional(*mutable.base, start);
                let span = start.to(rewrapped.span());
                Type::Mutable(MutableType {
                    base: Box::new(rewrapped),
                    span,
                })
            },
            _ => {
                let span = start.to(inner.span());
                Type::Optional(OptionalType {
                    base: Box::new(inner),
                    span,
                })
            },
        }
    }

    /// An array shape prefix; the cursor sits on `[`.
    ///
    /// `[]T` is the one-dimensional dynamic array; `[:N]T` has N
    /// dimensions of runtime extent; otherwise a comma list gives each
    /// dimension's extent, with `?` leaving one to run time.
    fn array_type(&mut self) -> Option<Type> {
        let start = self.pop().span;
        let mut shape: Vec<Option<Expr>> = Vec::new();
        let mut is_dynamic = false;
        match self.top().kind {
            TokenKind::Colon => {
                self.pop();
                let TokenKind::Int(dims) = self.top().kind else {
                    return self.error("Integer dimensionality required here");
                };
                let dims_span = self.pop().span;
                if dims == 0 {
                    self.error_nonfatal(dims_span, "Arrays cannot be zero-dimensional");
                } else if dims > 64 {
                    self.error_nonfatal(dims_span, "Too many array dimensions");
                }
                shape = vec![None; dims.clamp(0, 64) as usize];
            },
            TokenKind::RSquare => {
                is_dynamic = true;
            },
            _ => loop {
                if self.at(TokenKind::Question) {
                    self.pop();
                    shape.push(None);
                } else {
                    shape.push(Some(self.expression(prec::MIN)?));
                }
                if self.at(TokenKind::RSquare) {
                    break;
                }
                self.consume(TokenKind::Comma, "Expected comma or end of array dimensions")?;
                if self.at(TokenKind::RSquare) {
                    break;
                }
            },
        }
        self.consume(
            TokenKind::RSquare,
            "Expected right square bracket to end array dimensions",
        )?;
        let elem = self.type_expr(type_prec::MODIFIER)?;
        let span = self.close_span(start);
        Some(Type::Array(ArrayType {
            elem: Box::new(elem),
            shape,
            is_dynamic,
            span,
        }))
    }

    /// The return side of a function type; the cursor sits on `=>`.
    /// `() => ()` has no return type, as does a `=>` followed by
    /// something that cannot start a type.
    fn func_type_rhs(&mut self, params: Vec<Type>, start: Span) -> Option<Type> {
        self.pop();
        let ret = match self.top().kind {
            TokenKind::LParen
                if self.lookahead(1).kind == TokenKind::RParen
                    && self.lookahead(2).kind != TokenKind::Arrow =>
            {
                self.pop();
                self.pop();
                None
            },
            TokenKind::Ident(_)
            | TokenKind::At
            | TokenKind::LSquare
            | TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Question
            | TokenKind::Arrow
            | TokenKind::Keyword(Keyword::Mut)
            | TokenKind::Keyword(Keyword::Opt) => {
                Some(Box::new(self.type_expr(type_prec::FUNC)?))
            },
            _ => None,
        };
        let span = self.close_span(start);
        Some(Type::Func(FuncType { params, ret, span }))
    }

    /// `Base(arg, ...)` template instantiation; the cursor sits on `(`.
    fn template_type(&mut self, base: Type) -> Option<Type> {
        let start = base.span();
        self.pop();
        let mut args = Vec::new();
        while !self.at(TokenKind::RParen) {
            if self.at(TokenKind::Eof) {
                return self.error("Expected ')' at end of template arguments");
            }
            args.push(self.type_expr(0)?);
            if self.at(TokenKind::Comma) {
                self.pop();
            } else if !self.at(TokenKind::RParen) {
                return self.error("Expected a comma here.");
            }
        }
        self.pop();
        let span = self.close_span(start);
        Some(Type::Template(TemplateType {
            base: Box::new(base),
            args,
            span,
        }))
    }
}
