//! Harness self-tests: marker extraction, normalization, selection.

use pretty_assertions::assert_eq;
use rill_diagnostic::ErrorCode;

use super::{
    error, marked_range, normalize, verify_operation_tree,
    verify_operation_tree_and_diagnostics,
};

#[test]
fn marked_range_trims_surrounding_whitespace() {
    let source = "fn f() { /*<bind>*/ 1 + 2 /*</bind>*/; }";
    let range = marked_range(source);
    assert_eq!(&source[range.to_range()], "1 + 2");
}

#[test]
fn marked_range_spans_whole_statements() {
    let source = "fn f() { /*<bind>*/let x: int = 1;/*</bind>*/ }";
    let range = marked_range(source);
    assert_eq!(&source[range.to_range()], "let x: int = 1;");
}

#[test]
#[should_panic(expected = "has no /*<bind>*/ marker")]
fn missing_marker_panics() {
    marked_range("fn f() { 1; }");
}

#[test]
fn normalize_strips_blank_edges_and_trailing_spaces() {
    assert_eq!(normalize("\n  a  \n\n b\n\n"), "  a\n\n b");
    assert_eq!(normalize("plain"), "plain");
    assert_eq!(normalize("\n\n"), "");
}

#[test]
fn selection_prefers_the_outer_implicit_conversion() {
    // The literal and its widening conversion share a span; the
    // conversion is the outer operation and wins.
    verify_operation_tree(
        "fn f() -> float { return /*<bind>*/1/*</bind>*/; }",
        "
Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
  Operand:
    Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn diagnostics_compare_by_position() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/missing/*</bind>*/; }",
        "
Invalid (Type: ?, Invalid) (Syntax: 'missing')
  Children(0)
",
        &[error(ErrorCode::E2003, "unknown identifier `missing`").at(1, 20)],
    );
}
