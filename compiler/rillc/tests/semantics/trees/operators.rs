//! Unary and binary operators: folding, widening, and lifting.

use rillc::testing::verify_operation_tree;

#[test]
fn constant_arithmetic_folds_at_every_node() {
    verify_operation_tree(
        "fn f() { /*<bind>*/1 + 2 * 3/*</bind>*/; }",
        r"
BinaryOperator (Add) (Type: int, Constant: 7) (Syntax: '1 + 2 * 3')
  Left:
    Literal (Type: int, Constant: 1) (Syntax: '1')
  Right:
    BinaryOperator (Multiply) (Type: int, Constant: 6) (Syntax: '2 * 3')
      Left:
        Literal (Type: int, Constant: 2) (Syntax: '2')
      Right:
        Literal (Type: int, Constant: 3) (Syntax: '3')
",
    );
}

#[test]
fn mixed_arithmetic_widens_the_int_side() {
    verify_operation_tree(
        "fn f(a: float) { /*<bind>*/a + 1/*</bind>*/; }",
        r"
BinaryOperator (Add) (Type: float) (Syntax: 'a + 1')
  Left:
    ParameterReference: a (Type: float) (Syntax: 'a')
  Right:
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn optional_operands_lift_the_operator() {
    verify_operation_tree(
        "fn f(a: int?) { /*<bind>*/a + 1/*</bind>*/; }",
        r"
BinaryOperator (Add, Lifted) (Type: int?) (Syntax: 'a + 1')
  Left:
    ParameterReference: a (Type: int?) (Syntax: 'a')
  Right:
    Conversion (Lifting) (Type: int?, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn equality_against_null_lifts_the_plain_side() {
    verify_operation_tree(
        "fn f(x: int) { /*<bind>*/x == null/*</bind>*/; }",
        r"
BinaryOperator (Equals, Lifted) (Type: bool) (Syntax: 'x == null')
  Left:
    Conversion (Lifting) (Type: int?, Implicit) (Syntax: 'x')
      Operand:
        ParameterReference: x (Type: int) (Syntax: 'x')
  Right:
    Conversion (NullToOptional) (Type: int?, Constant: null, Implicit) (Syntax: 'null')
      Operand:
        Literal (Type: null, Constant: null) (Syntax: 'null')
",
    );
}

#[test]
fn string_concatenation_folds_adjacent_literals() {
    verify_operation_tree(
        "fn f() { /*<bind>*/\"foo\" + \"bar\"/*</bind>*/; }",
        r#"
BinaryOperator (Concatenate) (Type: str, Constant: "foobar") (Syntax: '"foo" + "bar"')
  Left:
    Literal (Type: str, Constant: "foo") (Syntax: '"foo"')
  Right:
    Literal (Type: str, Constant: "bar") (Syntax: '"bar"')
"#,
    );
}

#[test]
fn negating_a_float_folds_the_constant() {
    verify_operation_tree(
        "fn f() { /*<bind>*/-2.5/*</bind>*/; }",
        r"
UnaryOperator (Negate) (Type: float, Constant: -2.5) (Syntax: '-2.5')
  Operand:
    Literal (Type: float, Constant: 2.5) (Syntax: '2.5')
",
    );
}

#[test]
fn negative_integer_literals_fold_in_the_parser() {
    verify_operation_tree(
        "fn f() { /*<bind>*/-42/*</bind>*/; }",
        "Literal (Type: int, Constant: -42) (Syntax: '-42')",
    );
}

#[test]
fn negating_an_optional_lifts_the_operator() {
    verify_operation_tree(
        "fn f(a: int?) { /*<bind>*/-a/*</bind>*/; }",
        r"
UnaryOperator (Negate, Lifted) (Type: int?) (Syntax: '-a')
  Operand:
    ParameterReference: a (Type: int?) (Syntax: 'a')
",
    );
}

#[test]
fn logical_not_over_a_parameter() {
    verify_operation_tree(
        "fn f(ok: bool) { /*<bind>*/!ok/*</bind>*/; }",
        r"
UnaryOperator (Not) (Type: bool) (Syntax: '!ok')
  Operand:
    ParameterReference: ok (Type: bool) (Syntax: 'ok')
",
    );
}

#[test]
fn logical_not_lifts_over_an_optional_bool() {
    verify_operation_tree(
        "fn f(b: bool?) { /*<bind>*/!b/*</bind>*/; }",
        r"
UnaryOperator (Not, Lifted) (Type: bool?) (Syntax: '!b')
  Operand:
    ParameterReference: b (Type: bool?) (Syntax: 'b')
",
    );
}

#[test]
fn short_circuit_operators_stay_binary_in_the_tree() {
    verify_operation_tree(
        "fn f(a: bool, b: bool) { /*<bind>*/a && b/*</bind>*/; }",
        r"
BinaryOperator (ConditionalAnd) (Type: bool) (Syntax: 'a && b')
  Left:
    ParameterReference: a (Type: bool) (Syntax: 'a')
  Right:
    ParameterReference: b (Type: bool) (Syntax: 'b')
",
    );
}

#[test]
fn overflowing_arithmetic_keeps_no_constant() {
    verify_operation_tree(
        "fn f() { /*<bind>*/9223372036854775807 + 1/*</bind>*/; }",
        r"
BinaryOperator (Add) (Type: int) (Syntax: '9223372036854775807 + 1')
  Left:
    Literal (Type: int, Constant: 9223372036854775807) (Syntax: '9223372036854775807')
  Right:
    Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}
