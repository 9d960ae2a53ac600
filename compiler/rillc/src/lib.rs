//! The Rill compiler front end.
//!
//! [`analyze`] runs the whole pipeline over one source file: lex, parse,
//! bind, then a control-flow graph and flow analyses per function. The
//! result carries every intermediate product plus the combined,
//! span-sorted diagnostic list, so the CLI commands and the verification
//! harness all go through the same path.

pub mod commands;
pub mod testing;

use rill_diagnostic::queue::{too_many_errors, DiagnosticConfig, DiagnosticQueue};
use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_flow::ControlFlowGraph;
use rill_ir::{Span, StringInterner};
use rill_lexer::{LexError, LexErrorKind};
use rill_parse::ParseResult;
use rill_sema::SemaResult;

/// Everything the pipeline produced for one source file.
pub struct Analysis {
    /// Interner shared by every phase.
    pub interner: StringInterner,
    /// Parse products: the module, its AST arena, and parse errors.
    pub parse: ParseResult,
    /// Bind products: operation trees, symbols, types.
    pub sema: SemaResult,
    /// One control-flow graph per bound function, in function order.
    pub graphs: Vec<ControlFlowGraph>,
    /// All diagnostics, sorted by source position.
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Check whether any phase reported an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }
}

/// Run the full pipeline with the default diagnostic configuration.
pub fn analyze(source: &str) -> Analysis {
    analyze_with_config(source, DiagnosticConfig::default())
}

/// Run the full pipeline.
///
/// The verification harness passes [`DiagnosticConfig::unlimited`] so
/// every expected diagnostic survives the queue.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn analyze_with_config(source: &str, config: DiagnosticConfig) -> Analysis {
    let interner = StringInterner::new();
    let lexed = rill_lexer::lex(source, &interner);
    let parse = rill_parse::parse(&lexed.tokens, &interner);
    let mut sema = rill_sema::bind_module(&parse.module, &parse.arena, &interner);

    let mut graphs = Vec::with_capacity(sema.functions.len());
    let mut flow_diagnostics = Vec::new();
    for index in 0..sema.functions.len() {
        let graph = rill_flow::build_graph(&sema.functions[index], &mut sema.arena, &sema.types);
        let function = &sema.functions[index];
        // Poisoned bodies skip the flow analyses: a binding error
        // already told the story, and dataflow over invalid operations
        // would pile follow-ups on top of it.
        if !sema.arena.op(function.body).flags.is_invalid() {
            flow_diagnostics.extend(rill_flow::analyze_graph(
                &graph,
                function,
                sema.symbols.sig(function.func),
                &sema.arena,
                &interner,
            ));
        }
        graphs.push(graph);
    }

    let diagnostics = merge_diagnostics(source, &lexed.errors, &parse, &sema, flow_diagnostics, config);
    tracing::debug!(
        functions = sema.functions.len(),
        diagnostics = diagnostics.len(),
        "analysis finished"
    );

    Analysis {
        interner,
        parse,
        sema,
        graphs,
        diagnostics,
    }
}

/// Funnel every phase's diagnostics through one queue: sorted by
/// position, deduplicated, and cut off at the error limit with a final
/// E9002 marking where the limit was hit.
pub(crate) fn merge_diagnostics(
    source: &str,
    lex_errors: &[LexError],
    parse: &ParseResult,
    sema: &SemaResult,
    flow: Vec<Diagnostic>,
    config: DiagnosticConfig,
) -> Vec<Diagnostic> {
    let limit = config.error_limit;
    let mut queue = DiagnosticQueue::with_config(config);
    let mut dropped: Option<Span> = None;

    let all = lex_errors
        .iter()
        .map(lex_error_to_diagnostic)
        .chain(parse.errors.iter().map(rill_parse::ParseError::to_diagnostic))
        .chain(sema.diagnostics.iter().cloned())
        .chain(flow);
    for diag in all {
        let span = diag.primary_span();
        if !queue.add_with_source(diag, source) && queue.limit_reached() && dropped.is_none() {
            dropped = Some(span.unwrap_or(Span::DUMMY));
        }
    }

    let mut diagnostics = queue.flush();
    if let Some(span) = dropped {
        diagnostics.push(too_many_errors(limit, span));
    }
    diagnostics
}

/// Convert a lexer error into a renderable diagnostic.
fn lex_error_to_diagnostic(error: &LexError) -> Diagnostic {
    let (code, label) = match error.kind {
        LexErrorKind::UnterminatedString => (ErrorCode::E0001, "string starts here"),
        LexErrorKind::InvalidCharacter => (ErrorCode::E0002, "this character"),
        LexErrorKind::InvalidNumber => (ErrorCode::E0003, "this literal"),
        LexErrorKind::InvalidEscape { .. } => (ErrorCode::E0005, "unknown escape"),
        LexErrorKind::UnterminatedBlockComment => (ErrorCode::E0006, "comment starts here"),
    };
    Diagnostic::error(code)
        .with_message(error.message())
        .with_label(error.span, label)
}
