//! Implicit conversions and explicit casts.

use rillc::testing::verify_operation_tree;

#[test]
fn int_reaches_optional_float_by_widening_then_lifting() {
    verify_operation_tree(
        "fn f() { let x: float? = /*<bind>*/1/*</bind>*/; }",
        r"
Conversion (Lifting) (Type: float?, Implicit) (Syntax: '1')
  Operand:
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn float_to_int_cast_is_narrowing() {
    verify_operation_tree(
        "fn f(a: float) { /*<bind>*/a as int/*</bind>*/; }",
        r"
Conversion (Narrowing) (Type: int) (Syntax: 'a as int')
  Operand:
    ParameterReference: a (Type: float) (Syntax: 'a')
",
    );
}

#[test]
fn optional_to_plain_cast_is_unwrapping() {
    verify_operation_tree(
        "fn f(a: int?) { /*<bind>*/a as int/*</bind>*/; }",
        r"
Conversion (Unwrapping) (Type: int) (Syntax: 'a as int')
  Operand:
    ParameterReference: a (Type: int?) (Syntax: 'a')
",
    );
}

#[test]
fn identity_cast_keeps_the_constant() {
    verify_operation_tree(
        "fn f() { /*<bind>*/1 as int/*</bind>*/; }",
        r"
Conversion (Identity) (Type: int, Constant: 1) (Syntax: '1 as int')
  Operand:
    Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn explicit_widening_cast_folds_its_constant() {
    verify_operation_tree(
        "fn f() { /*<bind>*/2 as float/*</bind>*/; }",
        r"
Conversion (Widening) (Type: float, Constant: 2) (Syntax: '2 as float')
  Operand:
    Literal (Type: int, Constant: 2) (Syntax: '2')
",
    );
}

#[test]
fn cast_to_optional_float_keeps_the_inner_widening_implicit() {
    verify_operation_tree(
        "fn f() { /*<bind>*/1 as float?/*</bind>*/; }",
        r"
Conversion (Lifting) (Type: float?) (Syntax: '1 as float?')
  Operand:
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}
