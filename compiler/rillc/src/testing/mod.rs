//! Golden-text verification harness.
//!
//! Every semantics test feeds a small marked source snippet through the
//! pipeline and compares a rendering against an expected text:
//!
//! - [`verify_operation_tree`] binds the source and renders the smallest
//!   operation covering the `/*<bind>*/ ... /*</bind>*/` range.
//! - [`verify_flow_graph`] runs the full pipeline and renders the
//!   control-flow graph of the function containing the marked range.
//!
//! Both comparisons normalize first (leading/trailing blank lines
//! dropped, trailing whitespace stripped per line) and fail through
//! `pretty_assertions`, so a mismatch shows a line diff of the full
//! rendering. Diagnostics are compared as whole sorted vectors of
//! [`ExpectedDiagnostic`].

use pretty_assertions::assert_eq;
use rill_diagnostic::queue::DiagnosticConfig;
use rill_diagnostic::{Diagnostic, ErrorCode, LineIndex, Severity};
use rill_ir::{Span, StringInterner};
use rill_sema::{OpId, OperationRenderer, SemaResult};

use crate::{analyze_with_config, merge_diagnostics};

const BIND_OPEN: &str = "/*<bind>*/";
const BIND_CLOSE: &str = "/*</bind>*/";

/// A diagnostic a golden test expects, positioned at a 1-based
/// line/column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectedDiagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    pub line: u32,
    pub col: u32,
}

impl ExpectedDiagnostic {
    /// Pin the expected position (1-based line and column).
    #[must_use]
    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.line = line;
        self.col = col;
        self
    }
}

/// An expected error diagnostic. Position it with
/// [`ExpectedDiagnostic::at`].
pub fn error(code: ErrorCode, message: &str) -> ExpectedDiagnostic {
    ExpectedDiagnostic {
        severity: Severity::Error,
        code,
        message: message.to_owned(),
        line: 1,
        col: 1,
    }
}

/// An expected warning diagnostic.
pub fn warning(code: ErrorCode, message: &str) -> ExpectedDiagnostic {
    ExpectedDiagnostic {
        severity: Severity::Warning,
        code,
        message: message.to_owned(),
        line: 1,
        col: 1,
    }
}

/// Bind the marked source and compare the rendered operation tree.
/// Asserts the front end produced no diagnostics.
pub fn verify_operation_tree(source: &str, expected: &str) {
    verify_operation_tree_and_diagnostics(source, expected, &[]);
}

/// Bind the marked source, compare diagnostics, then compare the
/// rendered operation tree of the marked range.
pub fn verify_operation_tree_and_diagnostics(
    source: &str,
    expected: &str,
    expected_diagnostics: &[ExpectedDiagnostic],
) {
    let interner = StringInterner::new();
    let lexed = rill_lexer::lex(source, &interner);
    let parse = rill_parse::parse(&lexed.tokens, &interner);
    let sema = rill_sema::bind_module(&parse.module, &parse.arena, &interner);

    let diagnostics = merge_diagnostics(
        source,
        &lexed.errors,
        &parse,
        &sema,
        Vec::new(),
        DiagnosticConfig::unlimited(),
    );
    check_diagnostics(source, &diagnostics, expected_diagnostics);

    let range = marked_range(source);
    let function = function_containing(&sema, range);
    let root = select_operation(&sema, range);
    let rendered = OperationRenderer::new(
        &sema.arena,
        &sema.types,
        &sema.symbols,
        &sema.functions[function],
        &interner,
        source,
    )
    .render(root);
    assert_eq!(
        normalize(&rendered),
        normalize(expected),
        "operation tree mismatch"
    );
}

/// Run the full pipeline and compare the rendered flow graph of the
/// function containing the marked range. Asserts no diagnostics.
pub fn verify_flow_graph(source: &str, expected: &str) {
    verify_flow_graph_and_diagnostics(source, expected, &[]);
}

/// Run the full pipeline, compare diagnostics, then compare the
/// rendered flow graph.
pub fn verify_flow_graph_and_diagnostics(
    source: &str,
    expected: &str,
    expected_diagnostics: &[ExpectedDiagnostic],
) {
    let analysis = analyze_with_config(source, DiagnosticConfig::unlimited());
    check_diagnostics(source, &analysis.diagnostics, expected_diagnostics);

    let range = marked_range(source);
    let function = function_containing(&analysis.sema, range);
    let rendered = rill_flow::FlowGraphRenderer::new(
        &analysis.graphs[function],
        &analysis.sema.arena,
        &analysis.sema.types,
        &analysis.sema.symbols,
        &analysis.sema.functions[function],
        &analysis.interner,
        source,
    )
    .render();
    assert_eq!(
        normalize(&rendered),
        normalize(expected),
        "flow graph mismatch"
    );
}

/// The span between the bind markers, trimmed of whitespace.
///
/// Markers are block comments, so the lexer skips them and every span
/// in the pipeline refers to the marked source as-is.
#[expect(clippy::cast_possible_truncation, reason = "test sources fit in u32")]
fn marked_range(source: &str) -> Span {
    let open = source
        .find(BIND_OPEN)
        .unwrap_or_else(|| panic!("test source has no {BIND_OPEN} marker"));
    let close = source
        .find(BIND_CLOSE)
        .unwrap_or_else(|| panic!("test source has no {BIND_CLOSE} marker"));
    assert_eq!(
        source.rfind(BIND_OPEN),
        Some(open),
        "test source has more than one {BIND_OPEN} marker"
    );
    assert_eq!(
        source.rfind(BIND_CLOSE),
        Some(close),
        "test source has more than one {BIND_CLOSE} marker"
    );

    let mut start = open + BIND_OPEN.len();
    assert!(start <= close, "bind markers are out of order");
    let mut end = close;
    let bytes = source.as_bytes();
    while start < end && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    assert!(start < end, "the marked range is empty");
    Span::new(start as u32, end as u32)
}

/// Index of the function whose body covers the marked range.
fn function_containing(sema: &SemaResult, range: Span) -> usize {
    sema.functions
        .iter()
        .position(|f| sema.arena.op(f.body).span.contains_span(range))
        .unwrap_or_else(|| panic!("no function body contains the marked range {range:?}"))
}

/// The operation the marked range selects: smallest covering span;
/// among operations with that exact span, the outermost wins, so an
/// implicit conversion wrapping the marked expression beats its
/// operand. Children are allocated before their parents, so the later
/// arena slot is the outer operation.
#[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
fn select_operation(sema: &SemaResult, range: Span) -> OpId {
    let mut best: Option<(Span, OpId)> = None;
    for index in 0..sema.arena.op_count() {
        let id = OpId::new(index as u32);
        let span = sema.arena.op(id).span;
        if !span.contains_span(range) {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_span, _)) => span.len() < best_span.len() || span == best_span,
        };
        if better {
            best = Some((span, id));
        }
    }
    best.map(|(_, id)| id)
        .unwrap_or_else(|| panic!("no operation covers the marked range {range:?}"))
}

/// Project actual diagnostics to `(severity, code, message, line, col)`
/// and compare both sides as sorted vectors.
fn check_diagnostics(
    source: &str,
    actual: &[Diagnostic],
    expected: &[ExpectedDiagnostic],
) {
    let index = LineIndex::new(source);
    let mut actual: Vec<ExpectedDiagnostic> = actual
        .iter()
        .map(|diag| {
            let (line, col) = diag
                .primary_span()
                .map_or((1, 1), |span| index.line_col(source, span.start));
            ExpectedDiagnostic {
                severity: diag.severity,
                code: diag.code,
                message: diag.message.clone(),
                line,
                col,
            }
        })
        .collect();
    let mut expected = expected.to_vec();
    let key = |d: &ExpectedDiagnostic| (d.line, d.col, d.code.as_str(), d.message.clone());
    actual.sort_by_key(key);
    expected.sort_by_key(key);
    assert_eq!(actual, expected, "diagnostics mismatch");
}

/// Strip leading/trailing blank lines and trailing whitespace per line.
fn normalize(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |e| e + 1);
    lines[start..end].join("\n")
}

#[cfg(test)]
mod tests;
