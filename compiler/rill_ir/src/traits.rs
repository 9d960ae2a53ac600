//! Shared traits for IR nodes.

use crate::Span;

/// Anything that carries a source span.
pub trait Spanned {
    fn span(&self) -> Span;
}

impl Spanned for crate::Token {
    fn span(&self) -> Span {
        self.span
    }
}
