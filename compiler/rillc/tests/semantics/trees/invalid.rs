//! Trees that carry binding errors: the shape the rest of the
//! pipeline sees once a diagnostic has been reported.

use rill_diagnostic::ErrorCode;
use rillc::testing::{error, verify_operation_tree_and_diagnostics};

#[test]
fn unknown_callee_still_binds_its_arguments() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/g(1)/*</bind>*/; }",
        r"
Invalid (Type: ?, Invalid) (Syntax: 'g(1)')
  Children(1):
    Literal (Type: int, Constant: 1) (Syntax: '1')
",
        &[error(ErrorCode::E2003, "unknown identifier `g`").at(1, 20)],
    );
}

#[test]
fn constant_division_by_zero_poisons_the_node() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/1 / 0/*</bind>*/; }",
        r"
BinaryOperator (Divide) (Type: int, Invalid) (Syntax: '1 / 0')
  Left:
    Literal (Type: int, Constant: 1) (Syntax: '1')
  Right:
    Literal (Type: int, Constant: 0) (Syntax: '0')
",
        &[error(ErrorCode::E2014, "integer division by zero").at(1, 20)],
    );
}

#[test]
fn mismatched_initializer_wraps_in_an_invalid_conversion() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/let x: int = \"s\";/*</bind>*/ }",
        r#"
VariableDeclaration: x (Type: int, Invalid) (Syntax: 'let x: int = "s";')
  Initializer:
    Conversion (Invalid) (Type: int, Implicit, Invalid) (Syntax: '"s"')
      Operand:
        Literal (Type: str, Constant: "s") (Syntax: '"s"')
"#,
        &[error(ErrorCode::E2001, "type mismatch: expected `int`, found `str`").at(1, 33)],
    );
}

#[test]
fn undefined_cast_keeps_the_written_type() {
    verify_operation_tree_and_diagnostics(
        "fn f(s: str) { /*<bind>*/s as int/*</bind>*/; }",
        r"
Conversion (Invalid) (Type: int, Invalid) (Syntax: 's as int')
  Operand:
    ParameterReference: s (Type: str) (Syntax: 's')
",
        &[error(ErrorCode::E2011, "no conversion from `str` to `int`").at(1, 26)],
    );
}

#[test]
fn lifting_does_not_combine_with_widening() {
    verify_operation_tree_and_diagnostics(
        "fn f(a: int?) { /*<bind>*/a + 1.5/*</bind>*/; }",
        r"
BinaryOperator (Add) (Type: ?, Invalid) (Syntax: 'a + 1.5')
  Left:
    ParameterReference: a (Type: int?) (Syntax: 'a')
  Right:
    Literal (Type: float, Constant: 1.5) (Syntax: '1.5')
",
        &[error(
            ErrorCode::E2007,
            "operator `+` is not defined for `int?` and `float`",
        )
        .at(1, 27)],
    );
}
