//! Calls and argument conversion.

use rillc::testing::verify_operation_tree;

#[test]
fn arguments_convert_to_their_parameter_types() {
    verify_operation_tree(
        "fn g(x: float) -> float { return x; }\nfn f() { /*<bind>*/g(1)/*</bind>*/; }",
        r"
Invocation: g (Type: float) (Syntax: 'g(1)')
  Arguments(1):
    Conversion (Widening) (Type: float, Constant: 1, Implicit) (Syntax: '1')
      Operand:
        Literal (Type: int, Constant: 1) (Syntax: '1')
",
    );
}

#[test]
fn empty_argument_lists_render_without_a_colon() {
    verify_operation_tree(
        "fn ping() { }\nfn f() { /*<bind>*/ping()/*</bind>*/; }",
        r"
Invocation: ping (Type: void) (Syntax: 'ping()')
  Arguments(0)
",
    );
}
