//! `let` declarations and blocks.

use rillc::testing::verify_operation_tree;

#[test]
fn let_with_widening_initializer() {
    verify_operation_tree(
        "fn f() { /*<bind>*/let x: float = 1;/*</bind>*/ }",
        r"
VariableDeclaration: x (Type: float) (Syntax: 'let x: float = 1;')
  Initializer:
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn let_infers_the_type_from_its_initializer() {
    verify_operation_tree(
        "fn f() { /*<bind>*/let x = 1;/*</bind>*/ }",
        r"
VariableDeclaration: x (Type: int) (Syntax: 'let x = 1;')
  Initializer:
    Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn blocks_list_their_locals() {
    verify_operation_tree(
        "fn f() { /*<bind>*/{ let a: int = 1; a; }/*</bind>*/ }",
        r"
Block (2 statements, 1 locals) (Syntax: '{ let a: int = 1; a; }')
  Locals: [int a]
  VariableDeclaration: a (Type: int) (Syntax: 'let a: int = 1;')
    Initializer:
      Literal (Type: int, Constant: 1) (Syntax: '1')
  ExpressionStatement (Syntax: 'a;')
    Expression:
      LocalReference: a (Type: int) (Syntax: 'a')
",
    );
}
