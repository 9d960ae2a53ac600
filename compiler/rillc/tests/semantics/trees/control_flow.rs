//! Loops, jumps, and returns as bound statements.

use rillc::testing::verify_operation_tree;

#[test]
fn while_loop_with_a_break() {
    verify_operation_tree(
        "fn f(n: int) { /*<bind>*/while n < 3 { break; }/*</bind>*/ }",
        r"
WhileLoop (Syntax: 'while n < 3 { break; }')
  Condition:
    BinaryOperator (LessThan) (Type: bool) (Syntax: 'n < 3')
      Left:
        ParameterReference: n (Type: int) (Syntax: 'n')
      Right:
        Literal (Type: int, Constant: 3) (Syntax: '3')
  Body:
    Block (1 statements) (Syntax: '{ break; }')
      Branch (Break) (Syntax: 'break;')
",
    );
}

#[test]
fn continue_inside_a_loop() {
    verify_operation_tree(
        "fn f() { while true { /*<bind>*/continue;/*</bind>*/ } }",
        "Branch (Continue) (Syntax: 'continue;')",
    );
}

#[test]
fn return_folds_its_value() {
    verify_operation_tree(
        "fn f() -> int { /*<bind>*/return 1 + 2;/*</bind>*/ }",
        r"
Return (Syntax: 'return 1 + 2;')
  ReturnedValue:
    BinaryOperator (Add) (Type: int, Constant: 3) (Syntax: '1 + 2')
      Left:
        Literal (Type: int, Constant: 1) (Syntax: '1')
      Right:
        Literal (Type: int, Constant: 2) (Syntax: '2')
",
    );
}
