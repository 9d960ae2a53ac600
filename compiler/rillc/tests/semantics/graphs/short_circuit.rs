//! Short-circuit operators decomposed into branches and captures.

use rillc::testing::verify_flow_graph;

#[test]
fn logical_and_as_a_value_captures_both_outcomes() {
    verify_flow_graph(
        "fn f(a: bool, b: bool) -> bool { /*<bind>*/return a && b;/*</bind>*/ }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]
        Entering: {R1}

.locals {R1}
{
    CaptureIds: [0]
    Block[B1] - Block
        Predecessors: [B0]
        Statements (0)
        Jump if False (Regular) to Block[B3]
            ParameterReference: a (Type: bool) (Syntax: 'a')

        Next (Regular) Block[B2]

    Block[B2] - Block
        Predecessors: [B1]
        Statements (1)
            FlowCapture: 0 (Implicit) (Syntax: 'b')
              Value:
                ParameterReference: b (Type: bool) (Syntax: 'b')

        Next (Regular) Block[B4]

    Block[B3] - Block
        Predecessors: [B1]
        Statements (1)
            FlowCapture: 0 (Implicit) (Syntax: 'a')
              Value:
                Literal (Type: bool, Constant: false, Implicit) (Syntax: 'a')

        Next (Regular) Block[B4]

    Block[B4] - Block
        Predecessors: [B2] [B3]
        Statements (0)
        Next (Return) Block[B5]
            FlowCaptureReference: 0 (Type: bool, Implicit) (Syntax: 'a && b')
            Leaving: {R1}
}

Block[B5] - Exit
    Predecessors: [B4]
    Statements (0)
",
    );
}

#[test]
fn logical_or_in_a_condition_branches_without_captures() {
    verify_flow_graph(
        "fn f(a: bool, b: bool) { if a || b { /*<bind>*/1;/*</bind>*/ } }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0]
    Statements (0)
    Jump if True (Regular) to Block[B3]
        ParameterReference: a (Type: bool) (Syntax: 'a')

    Next (Regular) Block[B2]

Block[B2] - Block
    Predecessors: [B1]
    Statements (0)
    Jump if False (Regular) to Block[B4]
        ParameterReference: b (Type: bool) (Syntax: 'b')

    Next (Regular) Block[B3]

Block[B3] - Block
    Predecessors: [B1] [B2]
    Statements (1)
        ExpressionStatement (Syntax: '1;')
          Expression:
            Literal (Type: int, Constant: 1) (Syntax: '1')

    Next (Regular) Block[B4]

Block[B4] - Exit
    Predecessors: [B2] [B3]
    Statements (0)
",
    );
}
