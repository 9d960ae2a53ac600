//! Flow analysis tests: missing return, definite assignment,
//! unreachable code.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::StringInterner;

use super::analyze_graph;
use crate::build::build_graph;

fn analyze(source: &str) -> Vec<Diagnostic> {
    let interner = StringInterner::new();
    let lexed = rill_lexer::lex(source, &interner);
    assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
    let parsed = rill_parse::parse(&lexed.tokens, &interner);
    assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
    let mut sema = rill_sema::bind_module(&parsed.module, &parsed.arena, &interner);
    assert!(
        sema.diagnostics.is_empty(),
        "bind diagnostics: {:?}",
        sema.diagnostics
    );

    let mut diagnostics = Vec::new();
    for index in 0..sema.functions.len() {
        let graph = build_graph(&sema.functions[index], &mut sema.arena, &sema.types);
        let function = &sema.functions[index];
        diagnostics.extend(analyze_graph(
            &graph,
            function,
            sema.symbols.sig(function.func),
            &sema.arena,
            &interner,
        ));
    }
    diagnostics
}

fn codes(source: &str) -> Vec<ErrorCode> {
    analyze(source).iter().map(|d| d.code).collect()
}

// ── Missing return ──────────────────────────────────────────────────

#[test]
fn function_returning_on_every_path_is_clean() {
    assert_eq!(
        codes("fn f(c: bool) -> int { if c { return 1; } else { return 2; } }"),
        vec![]
    );
}

#[test]
fn falling_off_a_non_void_function_reports_e4001() {
    let diagnostics = analyze("fn half(c: bool) -> int { if c { return 1; } }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E4001);
    assert_eq!(
        diagnostics[0].message,
        "not all paths in `half` return a value"
    );
}

#[test]
fn void_functions_may_fall_off_the_end() {
    assert_eq!(codes("fn f(c: bool) { if c { return; } }"), vec![]);
}

#[test]
fn constant_loop_conditions_do_not_prune_edges() {
    // Reachability is structural: the false edge of `while true`
    // still counts, so the fall-off path reports even though it can
    // never run.
    assert_eq!(
        codes("fn f() -> int { while true { return 1; } }"),
        vec![ErrorCode::E4001]
    );
}

// ── Definite assignment ─────────────────────────────────────────────

#[test]
fn reading_an_unassigned_local_reports_e4002() {
    let diagnostics = analyze("fn f() { let x: int; x; }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E4002);
    assert_eq!(
        diagnostics[0].message,
        "`x` may be used before it is assigned"
    );
}

#[test]
fn assignment_on_both_arms_satisfies_the_read() {
    assert_eq!(
        codes("fn f(c: bool) { let x: int; if c { x = 1; } else { x = 2; } x; }"),
        vec![]
    );
}

#[test]
fn assignment_on_one_arm_is_not_definite() {
    assert_eq!(
        codes("fn f(c: bool) { let x: int; if c { x = 1; } x; }"),
        vec![ErrorCode::E4002]
    );
}

#[test]
fn each_local_reports_once_at_its_earliest_read() {
    let diagnostics = analyze("fn f() { let x: int; x; x + x; }");

    assert_eq!(diagnostics.len(), 1);
    // The first bare `x;` is the reported read.
    let span = diagnostics[0].primary_span().unwrap();
    assert_eq!(span.start, 21);
}

#[test]
fn loop_body_assignment_is_not_definite_after_the_loop() {
    assert_eq!(
        codes("fn f(c: bool) { let x: int; while c { x = 1; } x; }"),
        vec![ErrorCode::E4002]
    );
}

#[test]
fn compound_assignment_reads_its_target() {
    assert_eq!(
        codes("fn f() { let x: int; x += 1; }"),
        vec![ErrorCode::E4002]
    );
}

#[test]
fn reads_inside_split_expressions_are_tracked() {
    // `x` is read inside a ternary arm, across the capture rewrite.
    assert_eq!(
        codes("fn f(c: bool) { let x: int; let y: int = c ? x : 0; y; }"),
        vec![ErrorCode::E4002]
    );
}

#[test]
fn captured_assignment_targets_do_not_count_as_reads() {
    // `x = c ? 1 : 2` captures the target reference before the split;
    // that capture is a location, not a read of `x`.
    assert_eq!(
        codes("fn f(c: bool) { let x: int; x = c ? 1 : 2; x; }"),
        vec![]
    );
}

#[test]
fn unreachable_reads_do_not_report() {
    // The dead read stays silent; only the unreachable-code warning
    // remains.
    assert_eq!(
        codes("fn f() { let x: int; return; x; }"),
        vec![ErrorCode::W4003]
    );
}

// ── Unreachable code ────────────────────────────────────────────────

#[test]
fn statements_after_return_warn_w4003() {
    let diagnostics = analyze("fn f() { return; 1; }");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::W4003);
    assert!(diagnostics[0].is_warning());
    assert_eq!(diagnostics[0].message, "unreachable code");
}

#[test]
fn consecutive_unreachable_statements_warn_once() {
    assert_eq!(
        codes("fn f() { return; 1; 2; 3; }"),
        vec![ErrorCode::W4003]
    );
}

#[test]
fn code_after_a_constant_loop_is_structurally_reachable() {
    // The deliberate divergence: `while true` keeps its false edge, so
    // nothing after the loop is unreachable.
    assert_eq!(codes("fn f() { while true { } 1; }"), vec![]);
}

#[test]
fn break_makes_the_rest_of_the_loop_body_unreachable() {
    assert_eq!(
        codes("fn f() { while true { break; 1; } }"),
        vec![ErrorCode::W4003]
    );
}
