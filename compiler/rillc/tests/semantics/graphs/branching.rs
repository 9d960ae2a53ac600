//! `if`/`else` diamonds.

use rillc::testing::verify_flow_graph;

#[test]
fn if_else_forms_a_diamond() {
    verify_flow_graph(
        "fn f(c: bool) { if c { /*<bind>*/1;/*</bind>*/ } else { 2; } 3; }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0]
    Statements (0)
    Jump if False (Regular) to Block[B3]
        ParameterReference: c (Type: bool) (Syntax: 'c')

    Next (Regular) Block[B2]

Block[B2] - Block
    Predecessors: [B1]
    Statements (1)
        ExpressionStatement (Syntax: '1;')
          Expression:
            Literal (Type: int, Constant: 1) (Syntax: '1')

    Next (Regular) Block[B4]

Block[B3] - Block
    Predecessors: [B1]
    Statements (1)
        ExpressionStatement (Syntax: '2;')
          Expression:
            Literal (Type: int, Constant: 2) (Syntax: '2')

    Next (Regular) Block[B4]

Block[B4] - Block
    Predecessors: [B2] [B3]
    Statements (1)
        ExpressionStatement (Syntax: '3;')
          Expression:
            Literal (Type: int, Constant: 3) (Syntax: '3')

    Next (Regular) Block[B5]

Block[B5] - Exit
    Predecessors: [B4]
    Statements (0)
",
    );
}
