//! Type annotation parsing.

use crate::{ParseError, Parser};
use rill_diagnostic::ErrorCode;
use rill_ir::{BaseTy, ParsedTy, TokenKind};

impl Parser<'_> {
    /// Parse a type annotation: a base type keyword with an optional `?`.
    ///
    /// `void?` is rejected here since no value of it could ever exist;
    /// `void` itself parses and is left for the binder to judge by
    /// position.
    pub(crate) fn parse_type(&mut self) -> Result<ParsedTy, ParseError> {
        let start = self.current_span();
        let base = match self.current_kind() {
            TokenKind::IntType => BaseTy::Int,
            TokenKind::FloatType => BaseTy::Float,
            TokenKind::BoolType => BaseTy::Bool,
            TokenKind::StrType => BaseTy::Str,
            TokenKind::VoidType => BaseTy::Void,
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!("expected type, found {}", other.describe()),
                    start,
                ));
            }
        };
        self.advance();

        if self.check(&TokenKind::Question) {
            let question_span = self.current_span();
            self.advance();
            let span = start.merge(question_span);
            if matches!(base, BaseTy::Void) {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    "`void?` is not a valid type",
                    span,
                )
                .with_context("only value types can be optional"));
            }
            return Ok(ParsedTy::new(base, true, span));
        }

        Ok(ParsedTy::new(base, false, start))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::Parser;
    use rill_ir::{Span, StringInterner, TokenList};

    fn parse_type_source(source: &str) -> Result<ParsedTy, ParseError> {
        let interner: &'static StringInterner = Box::leak(Box::new(StringInterner::new()));
        let tokens: &'static TokenList =
            Box::leak(Box::new(rill_lexer::lex(source, interner).tokens));
        Parser::new(tokens, interner).parse_type()
    }

    #[test]
    fn base_types_parse_without_the_optional_flag() {
        for (source, base) in [
            ("int", BaseTy::Int),
            ("float", BaseTy::Float),
            ("bool", BaseTy::Bool),
            ("str", BaseTy::Str),
            ("void", BaseTy::Void),
        ] {
            let ty = parse_type_source(source).unwrap();
            assert_eq!(ty.base, base);
            assert!(!ty.optional);
        }
    }

    #[test]
    fn question_mark_marks_the_type_optional() {
        let ty = parse_type_source("float?").unwrap();
        assert_eq!(ty.base, BaseTy::Float);
        assert!(ty.optional);
        assert_eq!(ty.span, Span::new(0, 6));
    }

    #[test]
    fn void_cannot_be_optional() {
        let err = parse_type_source("void?").unwrap_err();
        assert_eq!(err.code, ErrorCode::E1005);
        assert_eq!(err.message, "`void?` is not a valid type");
        assert_eq!(err.span, Span::new(0, 5));
    }

    #[test]
    fn non_type_tokens_are_rejected() {
        let err = parse_type_source("42").unwrap_err();
        assert_eq!(err.code, ErrorCode::E1005);
        assert_eq!(err.message, "expected type, found integer literal");
    }
}
