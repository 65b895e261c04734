//! Statement parsing and block-level error recovery.

use tablec_lex::{Keyword, TokenKind};

use crate::ast::*;
use crate::expr::prec;
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one statement. Returns `None` without a diagnostic for a
    /// blank line; the block loop distinguishes that from a failure by
    /// the error count.
    pub(crate) fn statement(&mut self) -> Option<Stmt> {
        match self.top().kind {
            TokenKind::Eol => {
                self.pop();
                None
            },
            TokenKind::Keyword(Keyword::If) => self.if_stmt().map(Stmt::If),
            TokenKind::Keyword(Keyword::While) => self.while_loop().map(Stmt::While),
            TokenKind::Keyword(Keyword::For) => self.for_loop().map(Stmt::For),
            TokenKind::Keyword(Keyword::Match) => self.match_stmt().map(Stmt::Match),
            TokenKind::Keyword(Keyword::With) => self.with_stmt().map(Stmt::With),
            TokenKind::Keyword(Keyword::Return) => self.return_stmt().map(Stmt::Return),
            TokenKind::Keyword(Keyword::Break) => {
                let span = self.pop().span;
                self.end_of_line("Expected end of line after 'break'")?;
                Some(Stmt::Break(BreakStmt { span }))
            },
            TokenKind::Keyword(Keyword::Skip) => {
                let span = self.pop().span;
                self.end_of_line("Expected end of line after 'skip'")?;
                Some(Stmt::Skip(SkipStmt { span }))
            },
            TokenKind::Keyword(Keyword::Fail) => self.fail_stmt().map(Stmt::Fail),
            TokenKind::Keyword(Keyword::Assert) => self.assert_stmt().map(Stmt::Assert),
            TokenKind::Keyword(Keyword::Defer) => self.defer_stmt().map(Stmt::Defer),
            TokenKind::Keyword(Keyword::Cancel) => self.cancel_stmt().map(Stmt::Cancel),
            TokenKind::LBrace => self.block().map(Stmt::Block),
            TokenKind::Ident(_) if self.lookahead(1).kind == TokenKind::Colon => {
                self.declaration().map(Stmt::VarDecl)
            },
            _ => {
                let expression = self.expression(prec::MIN)?;
                match self.top().kind {
                    TokenKind::Assign => self.assignment(expression),
                    TokenKind::Comma => {
                        self.error("Parallel assignment is not implemented yet")
                    },
                    kind if kind.is_operator() => self.op_assignment(expression),
                    TokenKind::Eol => {
                        self.pop();
                        Some(Stmt::Expr(expression))
                    },
                    TokenKind::RBrace | TokenKind::Eof => Some(Stmt::Expr(expression)),
                    _ => self.error("Expected end of line or assignment here"),
                }
            },
        }
    }

    /// Parses a brace-delimited block.
    ///
    /// When a statement fails, tokens are discarded while tracking brace
    /// depth until an end-of-line at depth zero or an unbalanced closing
    /// brace, and the block fails; the enclosing boundary resumes from
    /// the resynchronized stream.
    pub(crate) fn block(&mut self) -> Option<Block> {
        let start = self.top().span;
        self.pop();
        let mut body = Vec::new();
        let errors_before = self.handler.error_count();
        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return self.error("Expected end of block");
            }
            if let Some(statement) = self.statement() {
                body.push(statement);
            } else if self.handler.error_count() > errors_before {
                let mut depth = 0i32;
                loop {
                    let token = self.pop();
                    match token.kind {
                        TokenKind::LBrace => depth += 1,
                        TokenKind::RBrace => depth -= 1,
                        TokenKind::Eol if depth == 0 => return None,
                        TokenKind::Eof => return None,
                        _ => {},
                    }
                    if depth < 0 {
                        return None;
                    }
                }
            }
        }
        self.pop();
        let span = self.close_span(start);
        Some(Block { body, span })
    }

    /// Parses `name: [type] [= value]`.
    pub(crate) fn declaration(&mut self) -> Option<VarDecl> {
        let start = self.top().span;
        let name = self.declared_name()?;
        self.consume(TokenKind::Colon, "Expected colon in variable declaration")?;

        let ty = if self.at(TokenKind::Assign) || self.at(TokenKind::Eol) {
            None
        } else {
            Some(self.type_expr(0)?)
        };
        let value = if self.eat(TokenKind::Assign) {
            Some(self.expression(prec::MIN)?)
        } else {
            None
        };
        if ty.is_none() && value.is_none() {
            return self.error("A variable declaration needs a type or a value");
        }
        self.end_of_line("Expected end of line at end of variable declaration")?;
        let span = self.close_span(start);
        Some(VarDecl {
            name,
            ty,
            value,
            span,
        })
    }

    /// Parses the rest of an assignment, given the already-parsed first
    /// target. Chains (`a = b = value`) collect every target in order.
    fn assignment(&mut self, first: Expr) -> Option<Stmt> {
        let start = first.span();
        let mut targets = vec![first];
        self.pop();
        let mut value = self.expression(prec::MIN)?;
        loop {
            match self.top().kind {
                TokenKind::Assign => {
                    self.pop();
                    targets.push(value);
                    value = self.expression(prec::MIN)?;
                },
                kind if kind.is_operator() => {
                    return self
                        .error("Compound assignment operators cannot appear in an assignment chain");
                },
                _ => break,
            }
        }
        self.end_of_line("Expected end of line after assignment")?;
        let span = self.close_span(start);
        Some(Stmt::Assign(AssignChain {
            targets,
            value,
            span,
        }))
    }

    /// Parses `target op= value`; the expression layer has already
    /// yielded with the operator on top.
    fn op_assignment(&mut self, target: Expr) -> Option<Stmt> {
        let start = target.span();
        let op = self.pop().literal;
        self.consume(
            TokenKind::Assign,
            "Expected '=' after compound assignment operator",
        )?;
        let value = self.expression(prec::MIN)?;
        self.end_of_line("Expected end of line after assignment")?;
        let span = self.close_span(start);
        Some(Stmt::OpAssign(OpAssign {
            target,
            op,
            value,
            span,
        }))
    }

    fn if_stmt(&mut self) -> Option<IfStmt> {
        let start = self.pop().span;
        let condition = self.expression(prec::MIN)?;
        // Support all the brace styles.
        self.skip_eols();
        self.expect(
            TokenKind::LBrace,
            "Expected if condition to be followed by a block",
        )?;
        let body = self.block()?;
        self.skip_eols();
        let alternative = if self.eat_kw(Keyword::Else) {
            self.skip_eols();
            match self.top().kind {
                TokenKind::Keyword(Keyword::If) => Some(ElseArm::If(Box::new(self.if_stmt()?))),
                TokenKind::LBrace => Some(ElseArm::Block(self.block()?)),
                _ => return self.error("Expected 'if' or '{' after 'else'"),
            }
        } else {
            None
        };
        let span = self.close_span(start);
        Some(IfStmt {
            condition,
            body,
            alternative,
            span,
        })
    }

    fn while_loop(&mut self) -> Option<WhileLoop> {
        let start = self.pop().span;
        let condition = self.expression(prec::MIN)?;
        self.skip_eols();
        self.expect(
            TokenKind::LBrace,
            "Expected while condition to be followed by a block",
        )?;
        let body = self.block()?;
        let span = self.close_span(start);
        Some(WhileLoop {
            condition,
            body,
            span,
        })
    }

    /// `for [parallel|gpu] targets in iterables [: label] { body }`
    fn for_loop(&mut self) -> Option<ForLoop> {
        let start = self.pop().span;
        let mode = if self.eat_kw(Keyword::Parallel) {
            ForMode::Parallel
        } else if self.eat_kw(Keyword::Gpu) {
            ForMode::Gpu
        } else {
            ForMode::Normal
        };

        let mut targets = vec![self.declared_name()?];
        while self.eat(TokenKind::Comma) {
            targets.push(self.declared_name()?);
        }
        self.consume_kw(Keyword::In, "Expected 'in' after loop variables")?;

        let mut iterables = vec![self.expression(prec::MIN)?];
        while self.eat(TokenKind::Comma) {
            iterables.push(self.expression(prec::MIN)?);
        }

        let label = if self.eat(TokenKind::Colon) {
            Some(self.simple_name()?)
        } else {
            None
        };

        self.skip_eols();
        self.expect(TokenKind::LBrace, "Expected loop body")?;
        let body = self.block()?;
        let span = self.close_span(start);
        Some(ForLoop {
            targets,
            iterables,
            label,
            mode,
            body,
            span,
        })
    }

    /// `match scrutinee { case patterns => arm ... else => arm }`
    fn match_stmt(&mut self) -> Option<MatchStmt> {
        let start = self.pop().span;
        let scrutinee = self.expression(prec::MIN)?;
        self.skip_eols();
        self.consume(TokenKind::LBrace, "Expected match body")?;
        let mut cases = Vec::new();
        loop {
            self.skip_eols();
            match self.top().kind {
                TokenKind::RBrace => {
                    self.pop();
                    break;
                },
                TokenKind::Eof => return self.error("Expected end of match body"),
                TokenKind::Keyword(Keyword::Case) => {
                    let case_start = self.pop().span;
                    let mut patterns = vec![self.expression(prec::MIN)?];
                    while self.eat(TokenKind::Comma) {
                        patterns.push(self.expression(prec::MIN)?);
                    }
                    self.consume(TokenKind::Arrow, "Expected '=>' after case patterns")?;
                    let body = self.case_body()?;
                    let span = self.close_span(case_start);
                    cases.push(MatchCase {
                        patterns,
                        body,
                        span,
                    });
                },
                TokenKind::Keyword(Keyword::Else) => {
                    let case_start = self.pop().span;
                    self.consume(TokenKind::Arrow, "Expected '=>' after 'else'")?;
                    let body = self.case_body()?;
                    let span = self.close_span(case_start);
                    cases.push(MatchCase {
                        patterns: Vec::new(),
                        body,
                        span,
                    });
                },
                _ => return self.error("Expected 'case' or 'else' in match body"),
            }
        }
        let span = self.close_span(start);
        Some(MatchStmt {
            scrutinee,
            cases,
            span,
        })
    }

    /// A case arm: either a block or a single statement wrapped in one.
    fn case_body(&mut self) -> Option<Block> {
        if self.at(TokenKind::LBrace) {
            return self.block();
        }
        if self.at(TokenKind::Eol) || self.at(TokenKind::RBrace) {
            return self.error("Expected a statement or block after '=>'");
        }
        let start = self.top().span;
        let statement = self.statement()?;
        let span = self.close_span(start);
        Some(Block {
            body: vec![statement],
            span,
        })
    }

    /// `with context [as name] { body }`
    fn with_stmt(&mut self) -> Option<WithStmt> {
        let start = self.pop().span;
        let context = self.expression(prec::MIN)?;
        let binding = if self.eat_kw(Keyword::As) {
            Some(self.declared_name()?)
        } else {
            None
        };
        self.skip_eols();
        self.expect(TokenKind::LBrace, "Expected 'with' body")?;
        let body = self.block()?;
        let span = self.close_span(start);
        Some(WithStmt {
            context,
            binding,
            body,
            span,
        })
    }

    fn return_stmt(&mut self) -> Option<ReturnStmt> {
        let start = self.pop().span;
        let value = match self.top().kind {
            TokenKind::Eol | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(self.expression(prec::MIN)?),
        };
        self.end_of_line("Expected end of line after return")?;
        let span = self.close_span(start);
        Some(ReturnStmt { value, span })
    }

    fn fail_stmt(&mut self) -> Option<FailStmt> {
        let start = self.pop().span;
        let value = match self.top().kind {
            TokenKind::Eol | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(self.expression(prec::MIN)?),
        };
        self.end_of_line("Expected end of line after 'fail'")?;
        let span = self.close_span(start);
        Some(FailStmt { value, span })
    }

    fn assert_stmt(&mut self) -> Option<AssertStmt> {
        let start = self.pop().span;
        let condition = self.expression(prec::MIN)?;
        let message = if self.eat(TokenKind::Comma) {
            Some(self.expression(prec::MIN)?)
        } else {
            None
        };
        self.end_of_line("Expected end of line after assertion")?;
        let span = self.close_span(start);
        Some(AssertStmt {
            condition,
            message,
            span,
        })
    }

    fn defer_stmt(&mut self) -> Option<DeferStmt> {
        let start = self.pop().span;
        if self.at(TokenKind::Eol) || self.at(TokenKind::RBrace) {
            return self.error("Expected a statement after 'defer'");
        }
        let body = self.statement()?;
        let span = self.close_span(start);
        Some(DeferStmt {
            body: Box::new(body),
            span,
        })
    }

    fn cancel_stmt(&mut self) -> Option<CancelStmt> {
        let start = self.pop().span;
        let target = self.qualname()?;
        self.end_of_line("Expected end of line after 'cancel'")?;
        let span = self.close_span(start);
        Some(CancelStmt { target, span })
    }
}
