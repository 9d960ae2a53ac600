//! Expression parsing.
//!
//! One method per precedence level, from loosest to tightest binding:
//! assignment, ternary, `??`, `||`, `&&`, equality, relational, additive,
//! multiplicative, `as` casts, unary, and primary. Left-associative levels
//! loop; right-associative levels recurse into themselves.

use crate::{ParseError, Parser};
use rill_diagnostic::ErrorCode;
use rill_ir::{BinaryOp, Expr, ExprId, ExprKind, Name, Span, TokenKind, UnaryOp};
use rill_stack::ensure_sufficient_stack;

impl Parser<'_> {
    /// Parse a full expression.
    ///
    /// The stack guard lives here because every nested construct funnels
    /// through this entry point, so deeply nested input grows the stack
    /// instead of overflowing it.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    /// Assignment and compound assignment, right-associative.
    ///
    /// Any expression is accepted as the target; the binder rejects
    /// everything that is not a local or parameter reference.
    fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        let left = self.parse_ternary()?;

        if self.check(&TokenKind::Eq) {
            self.advance();
            let value = self.parse_assignment()?;
            let span = self.expr_span(left).merge(self.expr_span(value));
            return Ok(self.alloc_expr(Expr::new(
                ExprKind::Assign {
                    target: left,
                    value,
                },
                span,
            )));
        }

        if let Some(op) = self.match_compound_assign_op() {
            self.advance();
            let value = self.parse_assignment()?;
            let span = self.expr_span(left).merge(self.expr_span(value));
            return Ok(self.alloc_expr(Expr::new(
                ExprKind::CompoundAssign {
                    op,
                    target: left,
                    value,
                },
                span,
            )));
        }

        Ok(left)
    }

    /// Conditional expression `cond ? then : else`, right-associative.
    ///
    /// The middle operand is a full expression (assignment included); only
    /// the else operand re-enters at the ternary level.
    fn parse_ternary(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_coalesce()?;

        if self.check(&TokenKind::Question) {
            self.advance();
            let then_expr = self.parse_expr()?;
            self.expect(&TokenKind::Colon)?;
            let else_expr = self.parse_ternary()?;
            let span = self.expr_span(cond).merge(self.expr_span(else_expr));
            return Ok(self.alloc_expr(Expr::new(
                ExprKind::Ternary {
                    cond,
                    then_expr,
                    else_expr,
                },
                span,
            )));
        }

        Ok(cond)
    }

    /// Null-coalescing `a ?? b`, right-associative.
    fn parse_coalesce(&mut self) -> Result<ExprId, ParseError> {
        let lhs = self.parse_binary_or()?;

        if self.check(&TokenKind::DoubleQuestion) {
            self.advance();
            let rhs = self.parse_coalesce()?;
            let span = self.expr_span(lhs).merge(self.expr_span(rhs));
            return Ok(self.alloc_expr(Expr::new(ExprKind::Coalesce { lhs, rhs }, span)));
        }

        Ok(lhs)
    }

    fn parse_binary_or(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_binary_and()?;

        while self.check(&TokenKind::PipePipe) {
            self.advance();
            let rhs = self.parse_binary_and()?;
            lhs = self.alloc_binary(BinaryOp::Or, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_binary_and(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_equality()?;

        while self.check(&TokenKind::AmpAmp) {
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = self.alloc_binary(BinaryOp::And, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_relational()?;

        while let Some(op) = self.match_equality_op() {
            self.advance();
            let rhs = self.parse_relational()?;
            lhs = self.alloc_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_additive()?;

        while let Some(op) = self.match_relational_op() {
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = self.alloc_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_multiplicative()?;

        while let Some(op) = self.match_additive_op() {
            self.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = self.alloc_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_cast()?;

        while let Some(op) = self.match_multiplicative_op() {
            self.advance();
            let rhs = self.parse_cast()?;
            lhs = self.alloc_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Cast expression `operand as type`, left-associative so chains like
    /// `x as float as int` nest outward.
    ///
    /// A `?` after the type belongs to the type, so `x as int ? a : b`
    /// casts to `int?`; parenthesize the cast to get a ternary instead.
    fn parse_cast(&mut self) -> Result<ExprId, ParseError> {
        let mut operand = self.parse_unary()?;

        while self.check(&TokenKind::As) {
            self.advance();
            let ty = self.parse_type()?;
            let span = self.expr_span(operand).merge(ty.span);
            operand = self.alloc_expr(Expr::new(ExprKind::Cast { operand, ty }, span));
        }

        Ok(operand)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        if let Some(op) = self.match_unary_op() {
            let start = self.current_span();

            // Fold negation into integer literals so `-42` is one literal,
            // not a unary operator applied to `42`.
            if op == UnaryOp::Neg {
                if let TokenKind::Int(value) = *self.peek_next_kind() {
                    self.advance();
                    let lit_span = self.current_span();
                    self.advance();
                    return Ok(self.alloc_expr(Expr::new(
                        ExprKind::Int(-value),
                        start.merge(lit_span),
                    )));
                }
            }

            self.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(self.expr_span(operand));
            return Ok(self.alloc_expr(Expr::new(ExprKind::Unary { op, operand }, span)));
        }

        self.parse_primary()
    }

    /// Literals, identifiers, calls, and parenthesized expressions.
    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.current_span();
        match *self.current_kind() {
            TokenKind::Int(value) => {
                self.advance();
                Ok(self.alloc_expr(Expr::new(ExprKind::Int(value), span)))
            }
            TokenKind::Float(bits) => {
                self.advance();
                Ok(self.alloc_expr(Expr::new(ExprKind::Float(bits), span)))
            }
            TokenKind::Str(name) => {
                self.advance();
                Ok(self.alloc_expr(Expr::new(ExprKind::Str(name), span)))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.alloc_expr(Expr::new(ExprKind::Bool(true), span)))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.alloc_expr(Expr::new(ExprKind::Bool(false), span)))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.alloc_expr(Expr::new(ExprKind::Null, span)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.parse_call(name, span)
                } else {
                    Ok(self.alloc_expr(Expr::new(ExprKind::Ident(name), span)))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_closing('(')?;
                // Parentheses are purely syntactic; the inner expression
                // comes back unchanged, keeping its own span.
                Ok(inner)
            }
            other => Err(ParseError::new(
                ErrorCode::E1002,
                format!("expected expression, found {}", other.describe()),
                span,
            )),
        }
    }

    /// Parse a call's argument list. The callee name has already been
    /// consumed and the cursor sits on `(`.
    fn parse_call(&mut self, callee: Name, callee_span: Span) -> Result<ExprId, ParseError> {
        self.advance();

        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        let close_span = self.expect_closing('(')?;
        let args = self.alloc_expr_list(args);
        Ok(self.alloc_expr(Expr::new(
            ExprKind::Call {
                callee,
                callee_span,
                args,
            },
            callee_span.merge(close_span),
        )))
    }

    fn alloc_binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        let span = self.expr_span(lhs).merge(self.expr_span(rhs));
        self.alloc_expr(Expr::new(ExprKind::Binary { op, lhs, rhs }, span))
    }

    fn match_compound_assign_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::PlusEq => Some(BinaryOp::Add),
            TokenKind::MinusEq => Some(BinaryOp::Sub),
            TokenKind::StarEq => Some(BinaryOp::Mul),
            TokenKind::SlashEq => Some(BinaryOp::Div),
            TokenKind::PercentEq => Some(BinaryOp::Rem),
            _ => None,
        }
    }

    fn match_equality_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            _ => None,
        }
    }

    fn match_relational_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Rem),
            _ => None,
        }
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }
}
