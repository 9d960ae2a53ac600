//! Item parsing.
//!
//! The only item in the language is the function definition.

use crate::{ParseError, Parser};
use rill_ir::{Function, Param, ParamRange, TokenKind};
use tracing::trace;

impl Parser<'_> {
    /// Parse `fn name(params) [-> type] { .. }`.
    pub(crate) fn parse_function(&mut self) -> Result<Function, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Fn)?;

        let name_span = self.current_span();
        let name = self.expect_ident()?;

        trace!(
            function = self.cursor.interner().lookup(name),
            "parsing function"
        );

        self.expect(&TokenKind::LParen)?;
        let params = self.parse_params()?;

        let return_ty = if self.check(&TokenKind::Arrow) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        let span = start_span.merge(self.stmt_span(body));

        Ok(Function {
            name,
            name_span,
            params,
            return_ty,
            body,
            span,
        })
    }

    /// Parse the parameter list after `(`, through the closing `)`.
    ///
    /// Trailing commas are rejected: after a comma another parameter must
    /// follow, so `fn f(a: int,)` reports an expected identifier.
    fn parse_params(&mut self) -> Result<ParamRange, ParseError> {
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect_closing('(')?;
        Ok(self.alloc_params(params))
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let name_span = self.current_span();
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_type()?;

        Ok(Param {
            name,
            name_span,
            ty,
            span: name_span.merge(ty.span),
        })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use rill_diagnostic::ErrorCode;
    use rill_ir::{BaseTy, StringInterner, TokenList};

    fn parse_function_source(source: &str) -> (Parser<'static>, Result<Function, ParseError>) {
        let interner: &'static StringInterner = Box::leak(Box::new(StringInterner::new()));
        let tokens: &'static TokenList =
            Box::leak(Box::new(rill_lexer::lex(source, interner).tokens));
        let mut parser = Parser::new(tokens, interner);
        let result = parser.parse_function();
        (parser, result)
    }

    #[test]
    fn function_with_params_and_return_type() {
        let (parser, result) = parse_function_source("fn add(a: int, b: int) -> int { return a + b; }");

        let func = result.unwrap();
        assert_eq!(parser.cursor.interner().lookup(func.name), "add");

        let params = parser.arena.param_list(func.params);
        assert_eq!(params.len(), 2);
        assert_eq!(parser.cursor.interner().lookup(params[0].name), "a");
        assert_eq!(parser.cursor.interner().lookup(params[1].name), "b");
        assert_eq!(params[1].ty.base, BaseTy::Int);

        let return_ty = func.return_ty.unwrap();
        assert_eq!(return_ty.base, BaseTy::Int);
        assert!(!return_ty.optional);
    }

    #[test]
    fn omitted_return_type_is_none() {
        let (_, result) = parse_function_source("fn main() { }");

        let func = result.unwrap();
        assert!(func.return_ty.is_none());
    }

    #[test]
    fn function_span_covers_keyword_through_body() {
        let source = "fn f() { }";
        let (_, result) = parse_function_source(source);

        let func = result.unwrap();
        assert_eq!(func.span.to_range(), 0..source.len());
    }

    #[test]
    fn trailing_comma_in_params_is_rejected() {
        let (_, result) = parse_function_source("fn f(a: int,) { }");

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::E1004);
        assert_eq!(err.message, "expected identifier, found `)`");
    }

    #[test]
    fn param_without_annotation_is_rejected() {
        let (_, result) = parse_function_source("fn f(a) { }");

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::E1001);
        assert_eq!(err.message, "expected `:`, found `)`");
    }

    #[test]
    fn missing_function_name_is_rejected() {
        let (_, result) = parse_function_source("fn () { }");

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::E1004);
    }
}
