//! Recursive descent parser for Rill.
//!
//! Consumes the lexer's token stream and produces a flat AST in an
//! [`AstArena`] together with any [`ParseError`]s. Parsing never gives up:
//! a broken statement is replaced by an error node and parsing resumes at
//! the next `;` or `}`, a broken item skips ahead to the next `fn`, so
//! later phases always receive a complete [`Module`].
//!
//! The grammar is LL(1): every decision point commits on the current token
//! (with one token of lookahead for negative literals), so there is no
//! backtracking anywhere in the parser.

mod cursor;
mod grammar;
mod recovery;

pub use cursor::Cursor;
pub use recovery::{synchronize, TokenSet, FUNCTION_BOUNDARY, STMT_BOUNDARY};

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::{
    AstArena, ExprId, Module, Name, Span, StmtId, StringInterner, Token, TokenKind, TokenList,
};
use tracing::debug;

/// Parser state: a cursor over the tokens, the arena collecting AST nodes,
/// and the errors recovered from so far.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: AstArena,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Create a parser over a lexed token stream.
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            // The arena sizes itself from source bytes; tokens average
            // out to a handful of bytes each.
            arena: AstArena::with_capacity(tokens.len() * 8),
            errors: Vec::new(),
        }
    }

    /// Parse a whole module, consuming the parser.
    ///
    /// Never fails: errors are collected in the returned
    /// [`ParseResult::errors`] in source order.
    pub fn parse_module(mut self) -> ParseResult {
        let mut module = Module::new();

        while !self.is_at_end() {
            if self.check(&TokenKind::Fn) {
                match self.parse_function() {
                    Ok(function) => module.functions.push(function),
                    Err(err) => {
                        self.record_error(err);
                        self.recover_to_function();
                    }
                }
            } else {
                let err = ParseError::new(
                    ErrorCode::E1001,
                    format!("expected `fn`, found {}", self.current_kind().describe()),
                    self.current_span(),
                )
                .with_context("only function definitions can appear at the top level");
                self.record_error(err);
                self.recover_to_function();
            }
        }

        debug!(
            functions = module.functions.len(),
            errors = self.errors.len(),
            "parsed module"
        );

        ParseResult {
            module,
            arena: self.arena,
            errors: self.errors,
        }
    }

    /// Record an error and keep going.
    fn record_error(&mut self, err: ParseError) {
        self.errors.push(err);
    }

    /// Skip ahead to the next `fn` (or end of input).
    fn recover_to_function(&mut self) {
        recovery::synchronize(&mut self.cursor, FUNCTION_BOUNDARY);
    }

    // Cursor delegation so grammar code reads as `self.check(..)` instead
    // of `self.cursor.check(..)`.

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn peek_next_kind(&self) -> &'a TokenKind {
        self.cursor.peek_next_kind()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_ident()
    }

    #[inline]
    fn expect_closing(&mut self, open: char) -> Result<Span, ParseError> {
        self.cursor.expect_closing(open)
    }

    // Arena delegation.

    #[inline]
    fn alloc_expr(&mut self, expr: rill_ir::Expr) -> ExprId {
        self.arena.alloc_expr(expr)
    }

    #[inline]
    fn alloc_expr_list(&mut self, exprs: Vec<ExprId>) -> rill_ir::ExprRange {
        self.arena.alloc_expr_list(exprs)
    }

    #[inline]
    fn alloc_stmt(&mut self, stmt: rill_ir::Stmt) -> StmtId {
        self.arena.alloc_stmt(stmt)
    }

    #[inline]
    fn alloc_stmt_list(&mut self, stmts: Vec<StmtId>) -> rill_ir::StmtRange {
        self.arena.alloc_stmt_list(stmts)
    }

    #[inline]
    fn alloc_params(&mut self, params: Vec<rill_ir::Param>) -> rill_ir::ParamRange {
        self.arena.alloc_params(params)
    }

    #[inline]
    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.expr(id).span
    }

    #[inline]
    fn stmt_span(&self, id: StmtId) -> Span {
        self.arena.stmt(id).span
    }
}

/// Result of parsing a module.
///
/// The module is always structurally complete; error nodes stand in for
/// anything that failed to parse.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed module.
    pub module: Module,

    /// Arena holding every AST node the module refers to.
    pub arena: AstArena,

    /// Errors recovered from during parsing, in source order.
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Check whether any errors were recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A parse error: where it happened, what was wrong, and optionally what
/// the parser was looking for.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    /// Stable error code.
    pub code: ErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Where the error occurred.
    pub span: Span,

    /// What was expected here, for the diagnostic label.
    pub context: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Attach label context describing what was expected.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Convert into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, self.context.as_deref().unwrap_or("here"))
    }
}

/// Parse a token stream into a module.
///
/// The stream must come from [`rill_lexer::lex`] over the same interner,
/// which guarantees the trailing `Eof` token.
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseResult {
    Parser::new(tokens, interner).parse_module()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_ir::StmtKind;

    fn parse_source(source: &str) -> ParseResult {
        let interner = StringInterner::new();
        let tokens = rill_lexer::lex(source, &interner).tokens;
        parse(&tokens, &interner)
    }

    fn body_stmts(result: &ParseResult, func: usize) -> Vec<StmtId> {
        let body = result.module.functions[func].body;
        let StmtKind::Block(range) = result.arena.stmt(body).kind else {
            panic!("function body should be a block");
        };
        result.arena.stmt_list(range).to_vec()
    }

    #[test]
    fn empty_source_is_an_empty_module() {
        let result = parse_source("");
        assert!(result.module.functions.is_empty());
        assert!(!result.has_errors());
    }

    #[test]
    fn module_collects_functions_in_order() {
        let result = parse_source(
            "fn first() { }\n\
             fn second(x: int) -> int { return x; }\n\
             fn third() { }",
        );

        assert!(!result.has_errors());
        assert_eq!(result.module.functions.len(), 3);
        assert_eq!(body_stmts(&result, 1).len(), 1);
    }

    #[test]
    fn statement_errors_stay_inside_their_function() {
        let result = parse_source(
            "fn broken() { let = 1; ok(); }\n\
             fn fine() { }",
        );

        assert_eq!(result.module.functions.len(), 2);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::E1004);

        let stmts = body_stmts(&result, 0);
        assert_eq!(stmts.len(), 2);
        assert!(matches!(
            result.arena.stmt(stmts[0]).kind,
            StmtKind::Error
        ));
        assert!(matches!(
            result.arena.stmt(stmts[1]).kind,
            StmtKind::Expr(_)
        ));
    }

    #[test]
    fn item_errors_recover_at_the_next_function() {
        let result = parse_source("fn broken( fn ok() { }");

        assert_eq!(result.module.functions.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::E1004);
    }

    #[test]
    fn top_level_garbage_is_a_single_error() {
        let result = parse_source("let x = 1; fn main() { }");

        assert_eq!(result.module.functions.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::E1001);
        assert_eq!(result.errors[0].message, "expected `fn`, found `let`");
    }

    #[test]
    fn unclosed_body_loses_only_that_function() {
        let result = parse_source("fn f() { let x = 1;");

        assert!(result.module.functions.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::E1003);
    }

    #[test]
    fn errors_arrive_in_source_order() {
        let result = parse_source(
            "fn a() { let = 1; }\n\
             fn b() { 2 +; }",
        );

        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].code, ErrorCode::E1004);
        assert_eq!(result.errors[1].code, ErrorCode::E1002);
        assert!(result.errors[0].span.start < result.errors[1].span.start);
    }

    #[test]
    fn optional_param_and_return_types_parse() {
        let result = parse_source("fn pick(x: int?, y: float) -> str? { return null; }");

        assert!(!result.has_errors());
        let func = &result.module.functions[0];
        let params = result.arena.param_list(func.params);
        assert!(params[0].ty.optional);
        assert!(!params[1].ty.optional);
        assert!(func.return_ty.unwrap().optional);
    }

    #[test]
    fn void_optional_parameter_reports_a_type_error() {
        let result = parse_source("fn f(x: void?) { }");

        assert!(result.module.functions.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, ErrorCode::E1005);
    }

    #[test]
    fn parse_error_converts_to_a_labeled_diagnostic() {
        let err = ParseError::new(ErrorCode::E1001, "expected `;`, found `}`", Span::new(4, 5))
            .with_context("expected `;`");
        let diagnostic = err.to_diagnostic();

        assert_eq!(diagnostic.code, ErrorCode::E1001);
        assert_eq!(diagnostic.message, "expected `;`, found `}`");
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].span, Span::new(4, 5));
        assert_eq!(diagnostic.labels[0].message, "expected `;`");
    }

    #[test]
    fn plain_errors_get_a_default_label() {
        let err = ParseError::new(ErrorCode::E1002, "expected expression", Span::new(0, 1));
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.labels[0].message, "here");
    }
}
