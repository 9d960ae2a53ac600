//! Expression nodes.
//!
//! All children are indices into the arena, not boxes:
//! - No `Box<Expr>`, use `ExprId(u32)` indices
//! - Contiguous arrays for cache locality

use std::fmt;
use std::hash::{Hash, Hasher};

use super::operators::{BinaryOp, UnaryOp};
use super::ty::ParsedTy;
use crate::{ExprId, ExprRange, Name, Span, Spanned};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.span.hash(state);
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression variants.
///
/// Parenthesized expressions produce no node of their own; the parser
/// returns the inner expression's id, so `(a + b)` and `a + b` are the
/// same tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExprKind {
    /// Integer literal: 42, `1_000`
    Int(i64),

    /// Float literal: 3.14, 2.5e-8 (stored as bits for Hash)
    Float(u64),

    /// Boolean literal: true, false
    Bool(bool),

    /// String literal (interned, escapes decoded)
    Str(Name),

    /// Null literal
    Null,

    /// Variable or parameter reference
    Ident(Name),

    /// Unary operation: -x, !b
    Unary { op: UnaryOp, operand: ExprId },

    /// Binary operation: a + b, x < y, p && q
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },

    /// Null-coalescing: a ?? b
    Coalesce { lhs: ExprId, rhs: ExprId },

    /// Conditional expression: c ? x : y
    Ternary {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },

    /// Simple assignment: x = v
    Assign { target: ExprId, value: ExprId },

    /// Compound assignment: x += v
    CompoundAssign {
        op: BinaryOp,
        target: ExprId,
        value: ExprId,
    },

    /// Function call: f(a, b)
    Call {
        callee: Name,
        callee_span: Span,
        args: ExprRange,
    },

    /// Explicit conversion: e as int
    Cast { operand: ExprId, ty: ParsedTy },

    /// Placeholder after a parse error.
    Error,
}

impl fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Int(v) => write!(f, "Int({v})"),
            ExprKind::Float(bits) => write!(f, "Float({})", f64::from_bits(*bits)),
            ExprKind::Bool(v) => write!(f, "Bool({v})"),
            ExprKind::Str(name) => write!(f, "Str({name:?})"),
            ExprKind::Null => write!(f, "Null"),
            ExprKind::Ident(name) => write!(f, "Ident({name:?})"),
            ExprKind::Unary { op, operand } => write!(f, "Unary({op:?}, {operand:?})"),
            ExprKind::Binary { op, lhs, rhs } => write!(f, "Binary({op:?}, {lhs:?}, {rhs:?})"),
            ExprKind::Coalesce { lhs, rhs } => write!(f, "Coalesce({lhs:?}, {rhs:?})"),
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => write!(f, "Ternary({cond:?}, {then_expr:?}, {else_expr:?})"),
            ExprKind::Assign { target, value } => write!(f, "Assign({target:?}, {value:?})"),
            ExprKind::CompoundAssign { op, target, value } => {
                write!(f, "CompoundAssign({op:?}, {target:?}, {value:?})")
            }
            ExprKind::Call { callee, args, .. } => write!(f, "Call({callee:?}, {args:?})"),
            ExprKind::Cast { operand, ty } => write!(f, "Cast({operand:?}, {ty:?})"),
            ExprKind::Error => write!(f, "Error"),
        }
    }
}
