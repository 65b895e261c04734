//! Expression parsing: a Pratt loop with precedence encoded by level.
//!
//! Associativity rides on parity: odd levels are right-associative, even
//! levels left-associative. The recursion threshold is `precedence | 1`,
//! so a left-associative operator refuses equal-precedence binding from
//! the right while a right-associative one accepts it.

use indexmap::IndexMap;
use tablec_lex::{Keyword, TokenKind};

use crate::ast::*;
use crate::Parser;

/// Expression precedence levels. Odd = right-associative.
pub mod prec {
    /// Minimum level: the start of an expression.
    pub const MIN: i32 = 0;
    /// Reference prefix `@`.
    pub const REREF: i32 = 150;
    /// Exponentiation `^`.
    pub const EXP: i32 = 101;
    /// Unary `+ - ~` prefixes.
    pub const UNARY: i32 = 99;
    /// `* / % &`.
    pub const MULDIV: i32 = 80;
    /// `+ - ~`.
    pub const ADDSUB: i32 = 70;
    /// Word operators, `\name`.
    pub const WORD: i32 = 60;
    /// Or-else `?`.
    pub const ORELSE: i32 = 50;
    /// Ternary `value if cond else alt`; non-associative.
    pub const TERNARY: i32 = 40;
    /// Bar `|`.
    pub const BAR: i32 = 30;
    /// Lambda `=>` (reserved).
    pub const LAMBDA: i32 = 25;
    /// `async` / `await` prefixes.
    pub const ASYNC: i32 = 20;
    /// Comparison chains.
    pub const CMP: i32 = 10;
    /// Boolean `not`.
    pub const NOT: i32 = 8;
    /// Boolean `and`.
    pub const AND: i32 = 6;
    /// Boolean `or`.
    pub const OR: i32 = 4;
    /// Sequence `;`.
    pub const SEQUENCE: i32 = 2;
}

/// Precedence class of an operator, selected by its first character.
/// Custom operators with an unclassified leading character bind at word
/// precedence.
pub(crate) fn precedence_of(first_char: char) -> i32 {
    match first_char {
        '^' => prec::EXP,
        '*' | '/' | '%' | '&' => prec::MULDIV,
        '+' | '-' | '~' => prec::ADDSUB,
        '?' => prec::ORELSE,
        '|' => prec::BAR,
        ';' => prec::SEQUENCE,
        _ => prec::WORD,
    }
}

impl<'a> Parser<'a> {
    /// Parses an expression no looser than `min_prec`.
    ///
    /// The loop carries a single `sub_expr`: atoms and prefix operators
    /// fill it, infix operators of sufficient precedence fold it into a
    /// larger node, and terminators (or operators too loose to bind)
    /// return it.
    pub(crate) fn expression(&mut self, min_prec: i32) -> Option<Expr> {
        let mut sub_expr: Option<Expr> = None;
        // Makes the ternary non-associative: a second `if` at this level
        // is refused.
        let mut ternary_seen = min_prec == prec::TERNARY;
        loop {
            let top = self.top();
            match top.kind {
                TokenKind::Ident(_) => {
                    if sub_expr.is_some() {
                        return self.error("Unexpected atom in expression");
                    }
                    if self.lookahead(1).kind == TokenKind::Arrow {
                        return self.error("Lambdas are not implemented yet");
                    }
                    sub_expr = Some(self.atom()?);
                },

                TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Bool(_)
                | TokenKind::Str(_)
                | TokenKind::Char(_)
                | TokenKind::Null => {
                    if sub_expr.is_some() {
                        return self.error("Unexpected atom in expression");
                    }
                    sub_expr = Some(self.atom()?);
                },

                TokenKind::Directive(name) if name.as_str() == "read" => {
                    if sub_expr.is_some() {
                        return self.error("Unexpected atom in expression");
                    }
                    sub_expr = Some(self.read_directive()?);
                },

                TokenKind::Backslash => match sub_expr.take() {
                    Some(lhs) => {
                        self.pop();
                        if !matches!(self.top().kind, TokenKind::Ident(_)) {
                            return self
                                .error("Expected qualified name here (for word operator)");
                        }
                        sub_expr = Some(self.word_op(lhs)?);
                    },
                    None => return self.error("Unexpected backslash"),
                },

                kind if kind.is_operator() => {
                    let first_char = top.literal.as_str().chars().next().unwrap_or('\0');
                    match sub_expr.take() {
                        Some(lhs) => {
                            // An operator immediately followed by `=` is a
                            // compound assignment; yield so the statement
                            // layer can take over.
                            if self.lookahead(1).kind == TokenKind::Assign {
                                return Some(lhs);
                            }
                            let precedence = precedence_of(first_char);
                            if precedence < (min_prec | 1) {
                                return Some(lhs);
                            }
                            let op = self.pop().literal;
                            let rhs = self.expression(precedence)?;
                            let span = lhs.span().to(rhs.span());
                            sub_expr = Some(Expr::Binop(BinopExpr {
                                op,
                                lhs: Box::new(lhs),
                                rhs: Box::new(rhs),
                                span,
                            }));
                        },
                        None => {
                            let start = top.span;
                            let op = self.pop().literal;
                            let operand = self.expression(prec::UNARY)?;
                            let span = start.to(operand.span());
                            sub_expr = Some(Expr::Unary(UnaryExpr {
                                op,
                                expr: Box::new(operand),
                                span,
                            }));
                        },
                    }
                },

                TokenKind::At => {
                    if sub_expr.is_some() {
                        return self.error("Re-referencing must occur before a value");
                    }
                    let start = top.span;
                    let mut levels = 0u32;
                    while self.at(TokenKind::At) {
                        self.pop();
                        levels += 1;
                    }
                    let target = self.expression(prec::REREF)?;
                    let span = start.to(target.span());
                    sub_expr = Some(Expr::Reref(RerefExpr {
                        levels,
                        target: Box::new(target),
                        span,
                    }));
                },

                TokenKind::Keyword(Keyword::Not) => {
                    if sub_expr.is_some() {
                        return self.error("Boolean 'not' must precede a value");
                    }
                    let start = self.pop().span;
                    let operand = self.expression(prec::NOT)?;
                    let span = start.to(operand.span());
                    sub_expr = Some(Expr::Not(NotExpr {
                        expr: Box::new(operand),
                        span,
                    }));
                },

                TokenKind::Keyword(Keyword::And) => match sub_expr.take() {
                    None => {
                        return self.error("Boolean 'and' requires an expression to its left")
                    },
                    Some(lhs) => {
                        if prec::AND <= min_prec {
                            return Some(lhs);
                        }
                        self.pop();
                        let rhs = self.expression(prec::AND)?;
                        let span = lhs.span().to(rhs.span());
                        sub_expr = Some(Expr::And(AndExpr {
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                            span,
                        }));
                    },
                },

                TokenKind::Keyword(Keyword::Or) => match sub_expr.take() {
                    None => {
                        return self.error("Boolean 'or' requires an expression to its left")
                    },
                    Some(lhs) => {
                        if prec::OR <= min_prec {
                            return Some(lhs);
                        }
                        self.pop();
                        let rhs = self.expression(prec::OR)?;
                        let span = lhs.span().to(rhs.span());
                        sub_expr = Some(Expr::Or(OrExpr {
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                            span,
                        }));
                    },
                },

                kind if kind.is_comparison() => match sub_expr.take() {
                    None => {
                        return self.error("Comparison operator is missing left side expression")
                    },
                    Some(lhs) => {
                        if prec::CMP <= min_prec {
                            return Some(lhs);
                        }
                        let start = lhs.span();
                        let mut ops = Vec::new();
                        let mut operands = vec![lhs];
                        loop {
                            ops.push(self.pop().literal);
                            operands.push(self.expression(prec::CMP)?);
                            if !self.top().kind.is_comparison() {
                                break;
                            }
                        }
                        let span = start.to(operands.last().unwrap().span());
                        sub_expr = Some(Expr::Cmp(CmpChain {
                            ops,
                            operands,
                            span,
                        }));
                    },
                },

                TokenKind::Keyword(Keyword::If) => match sub_expr.take() {
                    None => {
                        return self.error(
                            "'if' requires a preceding sub-expression in an expression context",
                        )
                    },
                    Some(true_expr) => {
                        if prec::TERNARY <= min_prec {
                            return Some(true_expr);
                        }
                        if ternary_seen {
                            return self.error("ternary is non-associative");
                        }
                        self.pop();
                        let condition = self.expression(prec::MIN)?;
                        self.expect(
                            TokenKind::Keyword(Keyword::Else),
                            "Expected 'else' after ternary condition",
                        )?;
                        self.pop();
                        let false_expr = self.expression(prec::TERNARY)?;
                        let span = true_expr.span().to(false_expr.span());
                        sub_expr = Some(Expr::Ternary(TernaryExpr {
                            condition: Box::new(condition),
                            true_expr: Box::new(true_expr),
                            false_expr: Box::new(false_expr),
                            span,
                        }));
                        ternary_seen = true;
                    },
                },

                TokenKind::Keyword(Keyword::Else) => match sub_expr.take() {
                    Some(lhs) if prec::TERNARY >= min_prec => return Some(lhs),
                    _ => return self.error("Unexpected 'else' in expression"),
                },

                TokenKind::Keyword(Keyword::Async) => {
                    if sub_expr.is_some() {
                        return self.error("'async' must precede an expression");
                    }
                    let start = self.pop().span;
                    let operand = self.expression(prec::ASYNC)?;
                    let span = start.to(operand.span());
                    sub_expr = Some(Expr::Async(AsyncExpr {
                        expr: Box::new(operand),
                        span,
                    }));
                },

                TokenKind::Keyword(Keyword::Await) => {
                    if sub_expr.is_some() {
                        return self.error("'await' must precede an expression");
                    }
                    let start = self.pop().span;
                    let operand = self.expression(prec::ASYNC)?;
                    let span = start.to(operand.span());
                    sub_expr = Some(Expr::Await(AwaitExpr {
                        expr: Box::new(operand),
                        span,
                    }));
                },

                TokenKind::Keyword(Keyword::Type) => {
                    return self.error("Type matching is not implemented yet");
                },

                TokenKind::LParen => match sub_expr.take() {
                    Some(callee) => {
                        sub_expr = Some(self.func_call(callee)?);
                    },
                    None => {
                        self.pop();
                        let inner = self.expression(prec::MIN)?;
                        self.expect(
                            TokenKind::RParen,
                            "Expected ')' at end of parenthesized sub-expression",
                        )?;
                        self.pop();
                        sub_expr = Some(inner);
                    },
                },

                TokenKind::LSquare => match sub_expr.take() {
                    Some(base) => {
                        if self.lookahead(1).kind == TokenKind::RSquare {
                            // Postfix `[]` is an element-wise broadcast.
                            self.pop();
                            let close = self.pop();
                            let span = base.span().to(close.span);
                            sub_expr = Some(Expr::Broadcast(BroadcastExpr {
                                base: Box::new(base),
                                span,
                            }));
                        } else {
                            sub_expr = Some(self.subscript(base)?);
                        }
                    },
                    None => {
                        sub_expr = Some(self.array_literal()?);
                    },
                },

                TokenKind::Dot => match sub_expr.take() {
                    None => return self.error("Expected value before field access"),
                    Some(base) => {
                        self.pop();
                        let field = self.qualname()?;
                        let span = base.span().to(field.span);
                        sub_expr = Some(Expr::Field(FieldExpr {
                            base: Box::new(base),
                            field,
                            span,
                        }));
                    },
                },

                TokenKind::Error => {
                    let literal = top.literal;
                    return self.error(format!("Malformed token '{}'", literal));
                },

                // Terminators and anything unclassified: yield what we
                // have, or fail if there is nothing yet.
                _ => match sub_expr.take() {
                    Some(done) => return Some(done),
                    None => return self.error("Expected an expression here"),
                },
            }
        }
    }

    /// `lhs \name rhs` parses as a call of `name` with two positional
    /// arguments.
    fn word_op(&mut self, lhs: Expr) -> Option<Expr> {
        let start = lhs.span();
        let func = self.qualname()?;
        let mut pos_args = vec![lhs];
        pos_args.push(self.expression(prec::WORD)?);
        let span = self.close_span(start);
        Some(Expr::Call(CallExpr {
            callee: Box::new(Expr::Qualname(func)),
            pos_args,
            kw_args: IndexMap::new(),
            is_word_op: true,
            span,
        }))
    }

    /// Parses a call argument list; the cursor sits on `(`. Named
    /// arguments (`name = value`) may not precede positional ones.
    fn func_call(&mut self, callee: Expr) -> Option<Expr> {
        let start = callee.span();
        self.pop();
        let mut pos_args = Vec::new();
        let mut kw_args: IndexMap<tablec_util::Symbol, Expr> = IndexMap::new();
        let mut seen_kwarg = false;
        while !self.at(TokenKind::RParen) {
            match self.top().kind {
                TokenKind::Comma => {
                    return self.error("Expected an argument to be supplied here");
                },
                TokenKind::Eof => {
                    return self.error("Expected ')' at end of argument list");
                },
                TokenKind::Ident(key) if self.lookahead(1).kind == TokenKind::Assign => {
                    seen_kwarg = true;
                    let key_span = self.top().span;
                    if kw_args.contains_key(&key) {
                        self.error_nonfatal(
                            key_span,
                            format!("Repeated named argument '{}'", key),
                        );
                    }
                    self.pop();
                    self.pop();
                    let value = self.expression(prec::MIN)?;
                    kw_args.insert(key, value);
                },
                _ => {
                    if seen_kwarg {
                        let span = self.top().span;
                        self.error_nonfatal(
                            span,
                            "Positional arguments cannot be supplied after named arguments.",
                        );
                    }
                    pos_args.push(self.expression(prec::MIN)?);
                },
            }
            if self.at(TokenKind::Comma) {
                self.pop();
            } else if !self.at(TokenKind::RParen) {
                return self.error("Expected a comma here.");
            }
        }
        self.pop();
        let span = self.close_span(start);
        Some(Expr::Call(CallExpr {
            callee: Box::new(callee),
            pos_args,
            kw_args,
            is_word_op: false,
            span,
        }))
    }

    /// Parses a subscript list; the cursor sits on `[`. Each position is
    /// an expression or a slice.
    fn subscript(&mut self, base: Expr) -> Option<Expr> {
        let start = base.span();
        self.pop();
        let mut indices = Vec::new();
        loop {
            if self.at(TokenKind::Eof) {
                return self.error("Expected ']' at end of subscript");
            }
            indices.push(self.subscript_item()?);
            if self.at(TokenKind::Comma) {
                self.pop();
            } else if !self.at(TokenKind::RSquare) {
                return self.error("Expected a comma here.");
            }
            if self.at(TokenKind::RSquare) {
                break;
            }
        }
        self.pop();
        let span = self.close_span(start);
        Some(Expr::Subscript(SubscriptExpr {
            base: Box::new(base),
            indices,
            span,
        }))
    }

    /// One subscript position. A slice is recognized by a leading range
    /// or `:` token, or by a range token after the first expression.
    fn subscript_item(&mut self) -> Option<Index> {
        let start = self.top().span;
        let mut slice_start = None;
        match self.top().kind {
            TokenKind::Range | TokenKind::Ellipsis | TokenKind::Colon => {},
            _ => {
                let first = self.expression(prec::MIN)?;
                match self.top().kind {
                    TokenKind::Range | TokenKind::Ellipsis => slice_start = Some(first),
                    _ => return Some(Index::Expr(first)),
                }
            },
        }

        let mut end = None;
        let mut step = None;
        let mut inclusive = false;
        let mut had_range = false;
        if matches!(self.top().kind, TokenKind::Range | TokenKind::Ellipsis) {
            had_range = true;
            inclusive = self.pop().kind == TokenKind::Ellipsis;
            if !matches!(
                self.top().kind,
                TokenKind::Colon | TokenKind::Comma | TokenKind::RSquare
            ) {
                end = Some(self.expression(prec::MIN)?);
            }
        }
        if self.at(TokenKind::Colon) {
            self.pop();
            step = Some(self.expression(prec::MIN)?);
        }

        let span = self.close_span(start);
        if slice_start.is_none() && end.is_none() && step.is_none() {
            self.note(span, "This slice selects everything");
        } else if had_range && !inclusive && end.is_none() {
            self.error_nonfatal(span, "An exclusive slice requires an explicit end");
        }
        Some(Index::Slice(Slice {
            start: slice_start,
            end,
            step,
            inclusive,
            span,
        }))
    }

    /// Parses an array literal; the cursor sits on `[`.
    fn array_literal(&mut self) -> Option<Expr> {
        let start = self.top().span;
        self.pop();
        let mut elements = Vec::new();
        while !self.at(TokenKind::RSquare) {
            if self.at(TokenKind::Eof) {
                return self.error("Expected ']' at end of array literal");
            }
            elements.push(self.expression(prec::MIN)?);
            if self.at(TokenKind::Comma) {
                self.pop();
            } else if !self.at(TokenKind::RSquare) {
                return self.error("Expected a comma here.");
            }
        }
        self.pop();
        let span = self.close_span(start);
        Some(Expr::Array(ArrayLit { elements, span }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    fn binop(expr: &Expr) -> &BinopExpr {
        match expr {
            Expr::Binop(node) => node,
            other => panic!("expected binop, got {:?}", other),
        }
    }

    #[test]
    fn test_mul_binds_tighter_than_add() {
        let expr = parse_expr("1 + 2 * 3");
        let add = binop(&expr);
        assert_eq!(add.op.as_str(), "+");
        let mul = binop(&add.rhs);
        assert_eq!(mul.op.as_str(), "*");
    }

    #[test]
    fn test_left_associativity() {
        // Even precedence refuses equal binding from the right.
        let expr = parse_expr("10 - 4 - 3");
        let outer = binop(&expr);
        assert_eq!(outer.op.as_str(), "-");
        let inner = binop(&outer.lhs);
        assert_eq!(inner.op.as_str(), "-");
        assert!(matches!(&*outer.rhs, Expr::Int(lit) if lit.value == 3));
    }

    #[test]
    fn test_exponent_right_associativity() {
        // 2 ^ 3 ^ 2 groups to the right because 101 is odd.
        let expr = parse_expr("2 ^ 3 ^ 2");
        let outer = binop(&expr);
        assert_eq!(outer.op.as_str(), "^");
        assert!(matches!(&*outer.lhs, Expr::Int(lit) if lit.value == 2));
        let inner = binop(&outer.rhs);
        assert!(matches!(&*inner.lhs, Expr::Int(lit) if lit.value == 3));
        assert!(matches!(&*inner.rhs, Expr::Int(lit) if lit.value == 2));
    }

    #[test]
    fn test_parentheses_override() {
        let expr = parse_expr("(1 + 2) * 3");
        let mul = binop(&expr);
        assert_eq!(mul.op.as_str(), "*");
        assert_eq!(binop(&mul.lhs).op.as_str(), "+");
    }

    #[test]
    fn test_unary_prefix() {
        let Expr::Unary(neg) = parse_expr("-x") else {
            panic!("expected unary");
        };
        assert_eq!(neg.op.as_str(), "-");
        assert!(matches!(&*neg.expr, Expr::Qualname(_)));
    }

    #[test]
    fn test_unary_binds_tighter_than_binop() {
        let expr = parse_expr("-5 + 3");
        let add = binop(&expr);
        assert!(matches!(&*add.lhs, Expr::Unary(_)));
    }

    #[test]
    fn test_comparison_chain() {
        // a < b <= c == d is one chain node, not nested binops.
        let Expr::Cmp(chain) = parse_expr("a < b <= c == d") else {
            panic!("expected comparison chain");
        };
        let ops: Vec<_> = chain.ops.iter().map(|op| op.as_str()).collect();
        assert_eq!(ops, vec!["<", "<=", "=="]);
        assert_eq!(chain.operands.len(), 4);
        assert_eq!(chain.operands.len(), chain.ops.len() + 1);
    }

    #[test]
    fn test_comparison_binds_arithmetic_operands() {
        let Expr::Cmp(chain) = parse_expr("a + 1 < b * 2") else {
            panic!("expected comparison chain");
        };
        assert_eq!(chain.ops.len(), 1);
        assert!(matches!(chain.operands[0], Expr::Binop(_)));
        assert!(matches!(chain.operands[1], Expr::Binop(_)));
    }

    #[test]
    fn test_and_or_precedence() {
        // or is looser than and.
        let Expr::Or(or) = parse_expr("a and b or c") else {
            panic!("expected or");
        };
        assert!(matches!(&*or.lhs, Expr::And(_)));
    }

    #[test]
    fn test_not_tighter_than_and() {
        let Expr::And(and) = parse_expr("not a and b") else {
            panic!("expected and at the top");
        };
        assert!(matches!(&*and.lhs, Expr::Not(_)));
    }

    #[test]
    fn test_not_looser_than_comparison() {
        let Expr::Not(not) = parse_expr("not a == b") else {
            panic!("expected not at the top");
        };
        assert!(matches!(&*not.expr, Expr::Cmp(_)));
    }

    #[test]
    fn test_ternary() {
        let Expr::Ternary(ternary) = parse_expr("a if cond else b") else {
            panic!("expected ternary");
        };
        assert!(matches!(&*ternary.condition, Expr::Qualname(_)));
        assert!(matches!(&*ternary.true_expr, Expr::Qualname(_)));
        assert!(matches!(&*ternary.false_expr, Expr::Qualname(_)));
    }

    #[test]
    fn test_ternary_non_associative() {
        let handler = parse_expr_err("a if c1 else b if c2 else d");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("non-associative")));
    }

    #[test]
    fn test_reref_levels() {
        let Expr::Reref(reref) = parse_expr("@@@x") else {
            panic!("expected reref");
        };
        assert_eq!(reref.levels, 3);
        assert!(reref.levels >= 1);
    }

    #[test]
    fn test_reref_after_value_fails() {
        parse_expr_err("x @ y");
    }

    #[test]
    fn test_or_else_operator() {
        let expr = parse_expr("maybe ? fallback");
        let node = binop(&expr);
        assert_eq!(node.op.as_str(), "?");
    }

    #[test]
    fn test_custom_operator_precedence_by_first_char() {
        // `**` starts with `*`, so it binds at multiplicative level,
        // tighter than `+`.
        let expr = parse_expr("a + b ** c");
        let add = binop(&expr);
        assert_eq!(add.op.as_str(), "+");
        assert_eq!(binop(&add.rhs).op.as_str(), "**");
    }

    #[test]
    fn test_async_await_prefixes() {
        let Expr::Async(node) = parse_expr("async fetch(url)") else {
            panic!("expected async");
        };
        assert!(matches!(&*node.expr, Expr::Call(_)));

        let Expr::Await(node) = parse_expr("await handle") else {
            panic!("expected await");
        };
        assert!(matches!(&*node.expr, Expr::Qualname(_)));
    }

    #[test]
    fn test_function_call_positional() {
        let Expr::Call(call) = parse_expr("f(1, 2, 3)") else {
            panic!("expected call");
        };
        assert_eq!(call.pos_args.len(), 3);
        assert!(call.kw_args.is_empty());
        assert!(!call.is_word_op);
    }

    #[test]
    fn test_function_call_named() {
        let Expr::Call(call) = parse_expr("f(1, size = 2, depth = 3)") else {
            panic!("expected call");
        };
        assert_eq!(call.pos_args.len(), 1);
        let keys: Vec<_> = call.kw_args.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["size", "depth"]);
    }

    #[test]
    fn test_call_trailing_comma() {
        let Expr::Call(call) = parse_expr("f(1, 2,)") else {
            panic!("expected call");
        };
        assert_eq!(call.pos_args.len(), 2);
    }

    #[test]
    fn test_call_positional_after_named_is_diagnosed() {
        let handler = parse_expr_err("f(size = 1, 2)");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Positional arguments")));
    }

    #[test]
    fn test_call_repeated_named_is_diagnosed() {
        let handler = parse_expr_err("f(size = 1, size = 2)");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Repeated named argument")));
    }

    #[test]
    fn test_word_operator_is_call() {
        // `x \max y` calls max with both operands positional.
        let Expr::Call(call) = parse_expr("x \\max y") else {
            panic!("expected call");
        };
        assert!(call.is_word_op);
        assert_eq!(call.pos_args.len(), 2);
        let Expr::Qualname(callee) = &*call.callee else {
            panic!("expected qualname callee");
        };
        assert_eq!(callee.parts[0].as_str(), "max");
    }

    #[test]
    fn test_word_operator_precedence() {
        // Word operators bind looser than arithmetic.
        let Expr::Call(call) = parse_expr("a + 1 \\max b * 2") else {
            panic!("expected call at the top");
        };
        assert!(matches!(call.pos_args[0], Expr::Binop(_)));
        assert!(matches!(call.pos_args[1], Expr::Binop(_)));
    }

    #[test]
    fn test_subscript_single() {
        let Expr::Subscript(sub) = parse_expr("arr[0]") else {
            panic!("expected subscript");
        };
        assert_eq!(sub.indices.len(), 1);
        assert!(matches!(sub.indices[0], Index::Expr(_)));
    }

    #[test]
    fn test_subscript_multiple() {
        let Expr::Subscript(sub) = parse_expr("grid[i, j]") else {
            panic!("expected subscript");
        };
        assert_eq!(sub.indices.len(), 2);
    }

    #[test]
    fn test_slice_exclusive() {
        let Expr::Subscript(sub) = parse_expr("arr[1..5]") else {
            panic!("expected subscript");
        };
        let Index::Slice(slice) = &sub.indices[0] else {
            panic!("expected slice");
        };
        assert!(!slice.inclusive);
        assert!(slice.start.is_some());
        assert!(slice.end.is_some());
        assert!(slice.step.is_none());
    }

    #[test]
    fn test_slice_inclusive_open_end() {
        let Expr::Subscript(sub) = parse_expr("arr[1...]") else {
            panic!("expected subscript");
        };
        let Index::Slice(slice) = &sub.indices[0] else {
            panic!("expected slice");
        };
        assert!(slice.inclusive);
        assert!(slice.end.is_none());
    }

    #[test]
    fn test_slice_with_step() {
        let Expr::Subscript(sub) = parse_expr("arr[1..9:2]") else {
            panic!("expected subscript");
        };
        let Index::Slice(slice) = &sub.indices[0] else {
            panic!("expected slice");
        };
        assert!(slice.step.is_some());
    }

    #[test]
    fn test_slice_step_only() {
        let Expr::Subscript(sub) = parse_expr("arr[:2]") else {
            panic!("expected subscript");
        };
        let Index::Slice(slice) = &sub.indices[0] else {
            panic!("expected slice");
        };
        assert!(slice.start.is_none());
        assert!(slice.end.is_none());
        assert!(slice.step.is_some());
    }

    #[test]
    fn test_exclusive_slice_without_end_is_diagnosed() {
        let handler = parse_expr_err("arr[1..]");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("explicit end")));
    }

    #[test]
    fn test_empty_slice_is_a_note() {
        let file = tablec_util::SourceFile::from_source("test.tbl", "arr[..]");
        let handler = tablec_util::Handler::new();
        let mut parser = crate::Parser::new(&file, &handler);
        let expr = parser.expression(0);
        assert!(expr.is_some());
        assert_eq!(handler.error_count(), 0);
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.level == tablec_util::Level::Note));
    }

    #[test]
    fn test_broadcast() {
        let Expr::Broadcast(bc) = parse_expr("xs[]") else {
            panic!("expected broadcast");
        };
        assert!(matches!(&*bc.base, Expr::Qualname(_)));

        // Broadcast is postfix: it stays on the left of a binop.
        let expr = parse_expr("xs[] + 1");
        let add = binop(&expr);
        assert!(matches!(&*add.lhs, Expr::Broadcast(_)));
    }

    #[test]
    fn test_array_literal() {
        let Expr::Array(arr) = parse_expr("[1, 2, 3]") else {
            panic!("expected array");
        };
        assert_eq!(arr.elements.len(), 3);
    }

    #[test]
    fn test_empty_array_literal() {
        let Expr::Array(arr) = parse_expr("[]") else {
            panic!("expected array");
        };
        assert!(arr.elements.is_empty());
    }

    #[test]
    fn test_field_access_after_call() {
        let Expr::Field(field) = parse_expr("make().x") else {
            panic!("expected field access");
        };
        assert!(matches!(&*field.base, Expr::Call(_)));
        assert_eq!(field.field.parts[0].as_str(), "x");
    }

    #[test]
    fn test_sequence_operator() {
        let expr = parse_expr("a ; b");
        assert_eq!(binop(&expr).op.as_str(), ";");
    }

    #[test]
    fn test_double_atom_fails() {
        parse_expr_err("a b");
    }

    #[test]
    fn test_missing_operand_fails() {
        parse_expr_err("a +");
        parse_expr_err("-");
    }

    #[test]
    fn test_unmatched_paren_fails() {
        parse_expr_err("(a + b");
    }

    #[test]
    fn test_lambda_is_reserved() {
        let handler = parse_expr_err("x => x");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("not implemented")));
    }

    #[test]
    fn test_malformed_token_reported_at_parse() {
        let handler = parse_expr_err("\"unterminated");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("Malformed token")));
    }

    #[test]
    fn test_spans_are_ordered_across_tree() {
        fn check(expr: &Expr) {
            assert!(expr.span().is_ordered(), "unordered span on {:?}", expr);
        }
        let expr = parse_expr("f(a + b * c, key = [1, 2])[0..2] \\fold seed");
        check(&expr);
    }
}
