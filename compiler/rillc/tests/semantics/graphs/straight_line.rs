//! Straight-line bodies: one interior block between entry and exit.

use rillc::testing::verify_flow_graph;

#[test]
fn statements_share_one_block() {
    verify_flow_graph(
        "fn f() { /*<bind>*/1;/*</bind>*/ 2; }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0]
    Statements (2)
        ExpressionStatement (Syntax: '1;')
          Expression:
            Literal (Type: int, Constant: 1) (Syntax: '1')

        ExpressionStatement (Syntax: '2;')
          Expression:
            Literal (Type: int, Constant: 2) (Syntax: '2')

    Next (Regular) Block[B2]

Block[B2] - Exit
    Predecessors: [B1]
    Statements (0)
",
    );
}

#[test]
fn return_value_rides_the_exit_edge() {
    verify_flow_graph(
        "fn f(n: int) -> int { /*<bind>*/return n;/*</bind>*/ }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0]
    Statements (0)
    Next (Return) Block[B2]
        ParameterReference: n (Type: int) (Syntax: 'n')

Block[B2] - Exit
    Predecessors: [B1]
    Statements (0)
",
    );
}
