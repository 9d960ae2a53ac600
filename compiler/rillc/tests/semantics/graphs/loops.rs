//! `while` loops: back edges, break and continue targets.

use rillc::testing::verify_flow_graph;

#[test]
fn while_loop_falls_back_to_its_head() {
    verify_flow_graph(
        "fn f(n: int) { while n < 3 { /*<bind>*/n;/*</bind>*/ } }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0] [B2]
    Statements (0)
    Jump if False (Regular) to Block[B3]
        BinaryOperator (LessThan) (Type: bool) (Syntax: 'n < 3')
          Left:
            ParameterReference: n (Type: int) (Syntax: 'n')
          Right:
            Literal (Type: int, Constant: 3) (Syntax: '3')

    Next (Regular) Block[B2]

Block[B2] - Block
    Predecessors: [B1]
    Statements (1)
        ExpressionStatement (Syntax: 'n;')
          Expression:
            ParameterReference: n (Type: int) (Syntax: 'n')

    Next (Regular) Block[B1]

Block[B3] - Exit
    Predecessors: [B1]
    Statements (0)
",
    );
}

#[test]
fn while_true_with_a_break_merges_both_edges() {
    verify_flow_graph(
        "fn f() { while true { /*<bind>*/break;/*</bind>*/ } 1; }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0]
    Statements (0)
    Jump if False (Regular) to Block[B2]
        Literal (Type: bool, Constant: true) (Syntax: 'true')

    Next (Regular) Block[B2]

Block[B2] - Block
    Predecessors: [B1*2]
    Statements (1)
        ExpressionStatement (Syntax: '1;')
          Expression:
            Literal (Type: int, Constant: 1) (Syntax: '1')

    Next (Regular) Block[B3]

Block[B3] - Exit
    Predecessors: [B2]
    Statements (0)
",
    );
}

#[test]
fn break_and_continue_jump_out_and_back() {
    verify_flow_graph(
        "fn f(n: int) { while true { if n < 1 { /*<bind>*/break;/*</bind>*/ } continue; } n; }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0] [B4]
    Statements (0)
    Jump if False (Regular) to Block[B5]
        Literal (Type: bool, Constant: true) (Syntax: 'true')

    Next (Regular) Block[B2]

Block[B2] - Block
    Predecessors: [B1]
    Statements (0)
    Jump if False (Regular) to Block[B4]
        BinaryOperator (LessThan) (Type: bool) (Syntax: 'n < 1')
          Left:
            ParameterReference: n (Type: int) (Syntax: 'n')
          Right:
            Literal (Type: int, Constant: 1) (Syntax: '1')

    Next (Regular) Block[B3]

Block[B3] - Block
    Predecessors: [B2]
    Statements (0)
    Next (Regular) Block[B5]

Block[B4] - Block
    Predecessors: [B2]
    Statements (0)
    Next (Regular) Block[B1]

Block[B5] - Block
    Predecessors: [B1] [B3]
    Statements (1)
        ExpressionStatement (Syntax: 'n;')
          Expression:
            ParameterReference: n (Type: int) (Syntax: 'n')

    Next (Regular) Block[B6]

Block[B6] - Exit
    Predecessors: [B5]
    Statements (0)
",
    );
}
