//! Surface type annotations.
//!
//! The parser records annotations verbatim; the binder resolves them to
//! interned semantic types.

use crate::Span;
use std::fmt;

/// Base (non-optional) surface types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseTy {
    Int,
    Float,
    Bool,
    Str,
    Void,
    /// Placeholder after a parse error in type position.
    Error,
}

impl BaseTy {
    pub const fn as_str(self) -> &'static str {
        match self {
            BaseTy::Int => "int",
            BaseTy::Float => "float",
            BaseTy::Bool => "bool",
            BaseTy::Str => "str",
            BaseTy::Void => "void",
            BaseTy::Error => "?",
        }
    }
}

/// A surface type annotation: a base type with an optional `?` suffix.
///
/// `void?` is rejected by the parser, so `optional` implies a value base.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedTy {
    pub base: BaseTy,
    pub optional: bool,
    pub span: Span,
}

impl ParsedTy {
    pub const fn new(base: BaseTy, optional: bool, span: Span) -> Self {
        ParsedTy {
            base,
            optional,
            span,
        }
    }

    /// Placeholder annotation after a parse error.
    pub const fn error(span: Span) -> Self {
        ParsedTy {
            base: BaseTy::Error,
            optional: false,
            span,
        }
    }
}

impl fmt::Debug for ParsedTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{}? @ {:?}", self.base.as_str(), self.span)
        } else {
            write!(f, "{} @ {:?}", self.base.as_str(), self.span)
        }
    }
}
