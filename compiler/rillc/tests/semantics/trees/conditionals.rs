//! Ternaries, `if` statements, and `??`.

use rillc::testing::verify_operation_tree;

#[test]
fn ternary_arms_meet_through_widening() {
    verify_operation_tree(
        "fn f(c: bool) { /*<bind>*/c ? 1 : 2.5/*</bind>*/; }",
        r"
Conditional (Type: float) (Syntax: 'c ? 1 : 2.5')
  Condition:
    ParameterReference: c (Type: bool) (Syntax: 'c')
  WhenTrue:
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
  WhenFalse:
    Literal (Type: float, Constant: 2.5) (Syntax: '2.5')
",
    );
}

#[test]
fn if_without_else_renders_a_null_arm() {
    verify_operation_tree(
        "fn f(c: bool) { /*<bind>*/if c { 1; }/*</bind>*/ }",
        r"
Conditional (Syntax: 'if c { 1; }')
  Condition:
    ParameterReference: c (Type: bool) (Syntax: 'c')
  WhenTrue:
    Block (1 statements) (Syntax: '{ 1; }')
      ExpressionStatement (Syntax: '1;')
        Expression:
          Literal (Type: int, Constant: 1) (Syntax: '1')
  WhenFalse:
    null
",
    );
}

#[test]
fn coalesce_unwraps_to_the_value_type() {
    verify_operation_tree(
        "fn f(a: int?) { /*<bind>*/a ?? 0/*</bind>*/; }",
        r"
Coalesce (Type: int) (Syntax: 'a ?? 0')
  Operand:
    ParameterReference: a (Type: int?) (Syntax: 'a')
  WhenNull:
    Literal (Type: int, Constant: 0) (Syntax: '0')
",
    );
}

#[test]
fn coalesce_with_optional_fallback_stays_optional() {
    verify_operation_tree(
        "fn f(a: int?, b: int?) { /*<bind>*/a ?? b/*</bind>*/; }",
        r"
Coalesce (Type: int?) (Syntax: 'a ?? b')
  Operand:
    ParameterReference: a (Type: int?) (Syntax: 'a')
  WhenNull:
    ParameterReference: b (Type: int?) (Syntax: 'b')
",
    );
}
