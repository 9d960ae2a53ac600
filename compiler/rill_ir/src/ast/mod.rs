//! AST node types.
//!
//! The AST is flat: nodes refer to children through `ExprId`/`StmtId`
//! indices into an [`AstArena`](crate::AstArena), never through boxes.

mod expr;
mod item;
mod operators;
mod stmt;
mod ty;

pub use expr::{Expr, ExprKind};
pub use item::{Function, Module, Param, ParamRange};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Stmt, StmtKind};
pub use ty::{BaseTy, ParsedTy};
