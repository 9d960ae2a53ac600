//! Simple and compound assignments.

use rillc::testing::verify_operation_tree;

#[test]
fn assignment_converts_the_value_to_the_target_type() {
    verify_operation_tree(
        "fn f() { let x: float = 0.0; /*<bind>*/x = 1/*</bind>*/; }",
        r"
SimpleAssignment (Type: float) (Syntax: 'x = 1')
  Left:
    LocalReference: x (Type: float) (Syntax: 'x')
  Right:
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn compound_assignment_keeps_the_target_type() {
    verify_operation_tree(
        "fn f() { let x: int = 1; /*<bind>*/x += 2/*</bind>*/; }",
        r"
CompoundAssignment (Add) (Type: int) (Syntax: 'x += 2')
  Left:
    LocalReference: x (Type: int) (Syntax: 'x')
  Right:
    Literal (Type: int, Constant: 2) (Syntax: '2')
",
    );
}

#[test]
fn compound_assignment_on_an_optional_is_lifted() {
    verify_operation_tree(
        "fn f(a: int?) { /*<bind>*/a += 1/*</bind>*/; }",
        r"
CompoundAssignment (Add, Lifted) (Type: int?) (Syntax: 'a += 1')
  Left:
    ParameterReference: a (Type: int?) (Syntax: 'a')
  Right:
    Conversion (Lifting) (Type: int?, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}
