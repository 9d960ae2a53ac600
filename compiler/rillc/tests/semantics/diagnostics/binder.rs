//! Binder diagnostics: exact codes, messages, and label positions,
//! alongside the trees the errors leave behind.

use rill_diagnostic::ErrorCode;
use rillc::testing::{error, verify_operation_tree_and_diagnostics};

#[test]
fn redeclaration_reports_the_second_name() {
    verify_operation_tree_and_diagnostics(
        "fn f() { let y = 1; /*<bind>*/let y = 2;/*</bind>*/ }",
        r"
VariableDeclaration: y (Type: int, Invalid) (Syntax: 'let y = 2;')
  Initializer:
    Literal (Type: int, Constant: 2) (Syntax: '2')
",
        &[error(ErrorCode::E2006, "`y` is already declared in this scope").at(1, 35)],
    );
}

#[test]
fn bare_let_cannot_infer_a_type() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/let x;/*</bind>*/ }",
        "VariableDeclaration: x (Type: ?, Invalid) (Syntax: 'let x;')",
        &[error(ErrorCode::E2005, "cannot infer a type for `x`").at(1, 24)],
    );
}

#[test]
fn null_initializer_cannot_infer_a_type() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/let x = null;/*</bind>*/ }",
        r"
VariableDeclaration: x (Type: ?, Invalid) (Syntax: 'let x = null;')
  Initializer:
    Literal (Type: null, Constant: null) (Syntax: 'null')
",
        &[error(ErrorCode::E2005, "cannot infer a type for `x`").at(1, 28)],
    );
}

#[test]
fn break_outside_a_loop_binds_to_invalid() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/break;/*</bind>*/ }",
        "Invalid (Invalid) (Syntax: 'break;')",
        &[error(ErrorCode::E2012, "`break` outside of a loop").at(1, 20)],
    );
}

#[test]
fn return_value_checks_run_against_the_signature() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/return 1;/*</bind>*/ }\nfn g() -> int { return; }",
        r"
Return (Invalid) (Syntax: 'return 1;')
  ReturnedValue:
    Literal (Type: int, Constant: 1) (Syntax: '1')
",
        &[
            error(
                ErrorCode::E2016,
                "cannot return a value from a `void` function",
            )
            .at(1, 27),
            error(ErrorCode::E2017, "missing return value").at(2, 17),
        ],
    );
}

#[test]
fn coalesce_requires_an_optional_left_operand() {
    verify_operation_tree_and_diagnostics(
        "fn f(a: int) { /*<bind>*/a ?? 0/*</bind>*/; }",
        r"
Coalesce (Type: ?, Invalid) (Syntax: 'a ?? 0')
  Operand:
    ParameterReference: a (Type: int) (Syntax: 'a')
  WhenNull:
    Literal (Type: int, Constant: 0) (Syntax: '0')
",
        &[error(
            ErrorCode::E2009,
            "the left operand of `??` must be optional, found `int`",
        )
        .at(1, 26)],
    );
}

#[test]
fn ternary_arms_without_a_common_type() {
    verify_operation_tree_and_diagnostics(
        "fn f(c: bool) { /*<bind>*/c ? 1 : \"s\"/*</bind>*/; }",
        r#"
Conditional (Type: ?, Invalid) (Syntax: 'c ? 1 : "s"')
  Condition:
    ParameterReference: c (Type: bool) (Syntax: 'c')
  WhenTrue:
    Literal (Type: int, Constant: 1) (Syntax: '1')
  WhenFalse:
    Literal (Type: str, Constant: "s") (Syntax: '"s"')
"#,
        &[error(
            ErrorCode::E2010,
            "ternary branches have incompatible types `int` and `str`",
        )
        .at(1, 27)],
    );
}

#[test]
fn wrong_arity_still_binds_every_argument() {
    verify_operation_tree_and_diagnostics(
        "fn g(x: int) { }\nfn f() { /*<bind>*/g(1, 2)/*</bind>*/; }",
        r"
Invocation: g (Type: void, Invalid) (Syntax: 'g(1, 2)')
  Arguments(2):
    Literal (Type: int, Constant: 1) (Syntax: '1')
    Literal (Type: int, Constant: 2) (Syntax: '2')
",
        &[error(ErrorCode::E2004, "function `g` takes 1 argument, found 2").at(2, 20)],
    );
}

#[test]
fn conditions_must_be_bool() {
    verify_operation_tree_and_diagnostics(
        "fn f() { /*<bind>*/if 1 { }/*</bind>*/ }",
        r"
Conditional (Invalid) (Syntax: 'if 1 { }')
  Condition:
    Literal (Type: int, Constant: 1) (Syntax: '1')
  WhenTrue:
    Block (0 statements) (Syntax: '{ }')
  WhenFalse:
    null
",
        &[error(ErrorCode::E2018, "condition must be `bool`, found `int`").at(1, 23)],
    );
}
