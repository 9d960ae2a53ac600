//! Flow analysis diagnostics through the full pipeline.

use rill_diagnostic::ErrorCode;

fn codes(source: &str) -> Vec<ErrorCode> {
    rillc::analyze(source)
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.code)
        .collect()
}

#[test]
fn missing_return_on_one_path() {
    let analysis = rillc::analyze("fn half(c: bool) -> int { if c { return 1; } }");
    assert_eq!(analysis.diagnostics.len(), 1);
    let diagnostic = &analysis.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::E4001);
    assert_eq!(
        diagnostic.message,
        "not all paths in `half` return a value"
    );
}

#[test]
fn returns_on_every_path_are_clean() {
    assert_eq!(
        codes("fn f(c: bool) -> int { if c { return 1; } return 2; }"),
        vec![]
    );
}

#[test]
fn infinite_loops_still_require_a_return() {
    assert_eq!(
        codes("fn f() -> int { while true { } }"),
        vec![ErrorCode::E4001]
    );
}

#[test]
fn read_on_an_unassigned_path_is_reported() {
    let analysis = rillc::analyze("fn f(c: bool) { let x: int; if c { x = 1; } x; }");
    assert_eq!(analysis.diagnostics.len(), 1);
    let diagnostic = &analysis.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::E4002);
    assert_eq!(diagnostic.message, "`x` may be used before it is assigned");
}

#[test]
fn assignment_on_both_branches_is_clean() {
    assert_eq!(
        codes("fn f(c: bool) { let x: int; if c { x = 1; } else { x = 2; } x; }"),
        vec![]
    );
}

#[test]
fn split_assignment_targets_do_not_count_as_reads() {
    assert_eq!(
        codes("fn f(c: bool) { let x: int; x = c ? 1 : 2; x; }"),
        vec![]
    );
}

#[test]
fn compound_assignment_reads_its_target_first() {
    assert_eq!(
        codes("fn f() { let x: int; x += 1; }"),
        vec![ErrorCode::E4002]
    );
}

#[test]
fn consecutive_unreachable_statements_warn_once() {
    let analysis = rillc::analyze("fn f() -> int { return 1; 2; 3; }");
    assert_eq!(analysis.diagnostics.len(), 1);
    let diagnostic = &analysis.diagnostics[0];
    assert_eq!(diagnostic.code, ErrorCode::W4003);
    assert!(diagnostic.is_warning());
    assert_eq!(diagnostic.message, "unreachable code");
}
