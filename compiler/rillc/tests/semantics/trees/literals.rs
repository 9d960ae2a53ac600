//! Literals and name references.

use rillc::testing::verify_operation_tree;

#[test]
fn integer_literal_carries_its_value() {
    verify_operation_tree(
        "fn f() { /*<bind>*/42/*</bind>*/; }",
        "Literal (Type: int, Constant: 42) (Syntax: '42')",
    );
}

#[test]
fn float_constant_drops_a_trailing_zero() {
    verify_operation_tree(
        "fn f() { /*<bind>*/1.0/*</bind>*/; }",
        "Literal (Type: float, Constant: 1) (Syntax: '1.0')",
    );
}

#[test]
fn bool_literal() {
    verify_operation_tree(
        "fn f() { /*<bind>*/true/*</bind>*/; }",
        "Literal (Type: bool, Constant: true) (Syntax: 'true')",
    );
}

#[test]
fn null_literal_has_the_null_type() {
    verify_operation_tree(
        "fn f() { /*<bind>*/null/*</bind>*/; }",
        "Literal (Type: null, Constant: null) (Syntax: 'null')",
    );
}

#[test]
fn string_constant_escapes_control_characters() {
    verify_operation_tree(
        "fn f() { /*<bind>*/\"a\\nb\"/*</bind>*/; }",
        r#"Literal (Type: str, Constant: "a\nb") (Syntax: '"a\nb"')"#,
    );
}

#[test]
fn parameter_reference() {
    verify_operation_tree(
        "fn f(p: int) { /*<bind>*/p/*</bind>*/; }",
        "ParameterReference: p (Type: int) (Syntax: 'p')",
    );
}

#[test]
fn local_reference() {
    verify_operation_tree(
        "fn f() { let x: bool = true; /*<bind>*/x/*</bind>*/; }",
        "LocalReference: x (Type: bool) (Syntax: 'x')",
    );
}

#[test]
fn optional_types_render_with_a_question_mark() {
    verify_operation_tree(
        "fn f(p: int?) { /*<bind>*/p/*</bind>*/; }",
        "ParameterReference: p (Type: int?) (Syntax: 'p')",
    );
}
