//! Statement parsing.
//!
//! Blocks are where error recovery happens: a broken statement is recorded,
//! the cursor skips to the next `;` or `}`, and an `Error` statement takes
//! its place so the rest of the block still parses.

use crate::recovery::{self, STMT_BOUNDARY};
use crate::{ParseError, Parser};
use rill_ir::{Expr, ExprKind, Span, Stmt, StmtId, StmtKind, TokenKind};
use rill_stack::ensure_sufficient_stack;

impl Parser<'_> {
    /// Parse a single statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<StmtId, ParseError> {
        match self.current_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => self.parse_loop_jump(StmtKind::Break),
            TokenKind::Continue => self.parse_loop_jump(StmtKind::Continue),
            TokenKind::LBrace => self.parse_block(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse a braced block into a [`StmtKind::Block`].
    ///
    /// A stray `fn` or end of input inside the block means the brace was
    /// never closed; that error propagates so the caller can resume at the
    /// next function.
    pub(crate) fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        let open_span = self.current_span();
        self.expect(&TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() || self.check(&TokenKind::Fn) {
                break;
            }
            let stmt_start = self.current_span();
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.record_error(err);
                    recovery::synchronize(&mut self.cursor, STMT_BOUNDARY);
                    if self.check(&TokenKind::Semicolon) {
                        self.advance();
                    }
                    let span = stmt_start.merge(self.previous_span());
                    stmts.push(self.alloc_stmt(Stmt::new(StmtKind::Error, span)));
                }
            }
        }

        let close_span = self.expect_closing('{')?;
        let stmts = self.alloc_stmt_list(stmts);
        Ok(self.alloc_stmt(Stmt::new(
            StmtKind::Block(stmts),
            open_span.merge(close_span),
        )))
    }

    /// Parse `let name [: type] [= init] ;`.
    ///
    /// A broken initializer does not lose the declaration: the error is
    /// recorded, tokens are skipped to the statement boundary, and the
    /// initializer becomes an error expression so the binder still sees
    /// `name` in scope.
    fn parse_let(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();

        let name_span = self.current_span();
        let name = self.expect_ident()?;

        let ty = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let mut init = None;
        if self.check(&TokenKind::Eq) {
            self.advance();
            match self.parse_expr() {
                Ok(expr) => init = Some(expr),
                Err(err) => {
                    let error_span = err.span;
                    self.record_error(err);
                    recovery::synchronize(&mut self.cursor, STMT_BOUNDARY);
                    if self.check(&TokenKind::Semicolon) {
                        self.advance();
                    }
                    let error_expr = self.alloc_expr(Expr::new(ExprKind::Error, error_span));
                    let span = start.merge(self.previous_span());
                    return Ok(self.alloc_stmt(Stmt::new(
                        StmtKind::Let {
                            name,
                            name_span,
                            ty,
                            init: Some(error_expr),
                        },
                        span,
                    )));
                }
            }
        }

        Ok(self.finish_stmt(
            start,
            StmtKind::Let {
                name,
                name_span,
                ty,
                init,
            },
        ))
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let else_branch = if self.check(&TokenKind::Else) {
            self.advance();
            if self.check(&TokenKind::If) {
                Some(self.parse_if()?)
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(Stmt::new(
            StmtKind::If {
                cond,
                then_block,
                else_branch,
            },
            span,
        )))
    }

    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        let cond = self.parse_expr()?;
        let body = self.parse_block()?;

        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(Stmt::new(StmtKind::While { cond, body }, span)))
    }

    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();

        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        Ok(self.finish_stmt(start, StmtKind::Return { value }))
    }

    fn parse_loop_jump(&mut self, kind: StmtKind) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.advance();
        Ok(self.finish_stmt(start, kind))
    }

    fn parse_expr_stmt(&mut self) -> Result<StmtId, ParseError> {
        let expr = self.parse_expr()?;
        let start = self.expr_span(expr);
        Ok(self.finish_stmt(start, StmtKind::Expr(expr)))
    }

    /// Consume the trailing `;` of a statement and allocate it.
    ///
    /// A missing semicolon is recorded rather than propagated so the
    /// statement itself survives; parsing resumes right where it stopped.
    fn finish_stmt(&mut self, start: Span, kind: StmtKind) -> StmtId {
        if let Err(err) = self.expect(&TokenKind::Semicolon) {
            self.record_error(err);
        }
        let span = start.merge(self.previous_span());
        self.alloc_stmt(Stmt::new(kind, span))
    }
}
