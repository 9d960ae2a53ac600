//! Detached blocks after a terminator.

use rill_diagnostic::ErrorCode;
use rillc::testing::{verify_flow_graph_and_diagnostics, warning};

#[test]
fn code_after_return_keeps_its_block_and_warns() {
    verify_flow_graph_and_diagnostics(
        "fn f() { /*<bind>*/return;/*</bind>*/ 1; }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]

Block[B1] - Block
    Predecessors: [B0]
    Statements (0)
    Next (Return) Block[B3]

Block[B2] - Block
    Predecessors (0)
    Statements (1)
        ExpressionStatement (Syntax: '1;')
          Expression:
            Literal (Type: int, Constant: 1) (Syntax: '1')

    Next (Regular) Block[B3]

Block[B3] - Exit
    Predecessors: [B1] [B2]
    Statements (0)
",
        &[warning(ErrorCode::W4003, "unreachable code").at(1, 39)],
    );
}
