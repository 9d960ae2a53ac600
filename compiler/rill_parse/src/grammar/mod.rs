//! Grammar productions.
//!
//! Each submodule extends [`Parser`](crate::Parser) with the parse methods
//! for one syntactic category: items, statements, expressions, and type
//! annotations.

mod expr;
mod item;
mod stmt;
mod ty;
