//! Statement nodes.

use std::fmt;

use super::ty::ParsedTy;
use crate::{ExprId, Name, Span, Spanned, StmtId, StmtRange};

/// Statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Local declaration: `let x: int = e;`
    ///
    /// Annotation and initializer are both optional, but not both absent
    /// in well-typed code (the binder reports the inference failure).
    Let {
        name: Name,
        name_span: Span,
        ty: Option<ParsedTy>,
        init: Option<ExprId>,
    },

    /// Expression statement: `e;`
    Expr(ExprId),

    /// Conditional: `if c { .. } else { .. }`
    ///
    /// `else_branch` is a nested `If` statement for `else if` chains,
    /// or a `Block`.
    If {
        cond: ExprId,
        then_block: StmtId,
        else_branch: Option<StmtId>,
    },

    /// Loop: `while c { .. }`
    While { cond: ExprId, body: StmtId },

    /// `return;` or `return e;`
    Return { value: Option<ExprId> },

    /// `break;`
    Break,

    /// `continue;`
    Continue,

    /// Braced block: `{ .. }`
    Block(StmtRange),

    /// Placeholder after a parse error.
    Error,
}
