//! Rill IR - Intermediate Representation Types
//!
//! This crate contains the core data structures for the Rill compiler:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - AST nodes (Expr, Stmt, Function, Module)
//! - Arena allocation for expressions and statements
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Flatten Everything**: No Box<Expr>, use ExprId(u32) indices
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.
//! Types that contain strings use interned Name for O(1) equality.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
mod span;
mod token;
mod traits;

pub use arena::AstArena;
pub use ast::{
    BaseTy, BinaryOp, Expr, ExprKind, Function, Module, Param, ParamRange, ParsedTy, Stmt,
    StmtKind, UnaryOp,
};
pub use ids::{ExprId, ExprRange, StmtId, StmtRange};
pub use interner::{InternError, StringInterner, StringLookup};
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use traits::Spanned;
