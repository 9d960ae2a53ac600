//! Flow captures: coalesce operands and split assignment targets.

use rillc::testing::verify_flow_graph;

#[test]
fn coalesce_tests_its_captured_operand_for_null() {
    verify_flow_graph(
        "fn f(a: int?) -> int { /*<bind>*/return a ?? 0;/*</bind>*/ }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]
        Entering: {R1}

.locals {R1}
{
    CaptureIds: [0] [1]
    Block[B1] - Block
        Predecessors: [B0]
        Statements (1)
            FlowCapture: 0 (Implicit) (Syntax: 'a')
              Value:
                ParameterReference: a (Type: int?) (Syntax: 'a')

        Jump if True (Regular) to Block[B3]
            IsNull (Type: bool, Implicit) (Syntax: 'a')
              Operand:
                FlowCaptureReference: 0 (Type: int?, Implicit) (Syntax: 'a')

        Next (Regular) Block[B2]

    Block[B2] - Block
        Predecessors: [B1]
        Statements (1)
            FlowCapture: 1 (Implicit) (Syntax: 'a')
              Value:
                Conversion (Unwrapping) (Type: int, Implicit) (Syntax: 'a')
                  Operand:
                    FlowCaptureReference: 0 (Type: int?, Implicit) (Syntax: 'a')

        Next (Regular) Block[B4]

    Block[B3] - Block
        Predecessors: [B1]
        Statements (1)
            FlowCapture: 1 (Implicit) (Syntax: '0')
              Value:
                Literal (Type: int, Constant: 0) (Syntax: '0')

        Next (Regular) Block[B4]

    Block[B4] - Block
        Predecessors: [B2] [B3]
        Statements (0)
        Next (Return) Block[B5]
            FlowCaptureReference: 1 (Type: int, Implicit) (Syntax: 'a ?? 0')
            Leaving: {R1}
}

Block[B5] - Exit
    Predecessors: [B4]
    Statements (0)
",
    );
}

#[test]
fn split_assignment_captures_its_target_first() {
    verify_flow_graph(
        "fn f(c: bool) { let x: int = 0; /*<bind>*/x = c ? 1 : 2;/*</bind>*/ }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]
        Entering: {R1}

.locals {R1}
{
    CaptureIds: [0] [1]
    Locals: [int x]
    Block[B1] - Block
        Predecessors: [B0]
        Statements (2)
            VariableDeclaration: x (Type: int) (Syntax: 'let x: int = 0;')
              Initializer:
                Literal (Type: int, Constant: 0) (Syntax: '0')

            FlowCapture: 0 (Implicit) (Syntax: 'x')
              Value:
                LocalReference: x (Type: int) (Syntax: 'x')

        Jump if False (Regular) to Block[B3]
            ParameterReference: c (Type: bool) (Syntax: 'c')

        Next (Regular) Block[B2]

    Block[B2] - Block
        Predecessors: [B1]
        Statements (1)
            FlowCapture: 1 (Implicit) (Syntax: '1')
              Value:
                Literal (Type: int, Constant: 1) (Syntax: '1')

        Next (Regular) Block[B4]

    Block[B3] - Block
        Predecessors: [B1]
        Statements (1)
            FlowCapture: 1 (Implicit) (Syntax: '2')
              Value:
                Literal (Type: int, Constant: 2) (Syntax: '2')

        Next (Regular) Block[B4]

    Block[B4] - Block
        Predecessors: [B2] [B3]
        Statements (1)
            ExpressionStatement (Syntax: 'x = c ? 1 : 2;')
              Expression:
                SimpleAssignment (Type: int) (Syntax: 'x = c ? 1 : 2')
                  Left:
                    FlowCaptureReference: 0 (Type: int, Implicit) (Syntax: 'x')
                  Right:
                    FlowCaptureReference: 1 (Type: int, Implicit) (Syntax: 'c ? 1 : 2')

        Next (Regular) Block[B5]
            Leaving: {R1}
}

Block[B5] - Exit
    Predecessors: [B4]
    Statements (0)
",
    );
}
