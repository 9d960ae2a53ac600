//! Scope regions as `.locals` sections.

use rillc::testing::verify_flow_graph;

#[test]
fn nested_scopes_nest_their_regions() {
    verify_flow_graph(
        "fn f() { let a: int = 1; { /*<bind>*/let b: int = 2;/*</bind>*/ b; } a; }",
        r"
Block[B0] - Entry
    Statements (0)
    Next (Regular) Block[B1]
        Entering: {R1}

.locals {R1}
{
    Locals: [int a]
    Block[B1] - Block
        Predecessors: [B0]
        Statements (1)
            VariableDeclaration: a (Type: int) (Syntax: 'let a: int = 1;')
              Initializer:
                Literal (Type: int, Constant: 1) (Syntax: '1')

        Next (Regular) Block[B2]
            Entering: {R2}

    .locals {R2}
    {
        Locals: [int b]
        Block[B2] - Block
            Predecessors: [B1]
            Statements (2)
                VariableDeclaration: b (Type: int) (Syntax: 'let b: int = 2;')
                  Initializer:
                    Literal (Type: int, Constant: 2) (Syntax: '2')

                ExpressionStatement (Syntax: 'b;')
                  Expression:
                    LocalReference: b (Type: int) (Syntax: 'b')

            Next (Regular) Block[B3]
                Leaving: {R2}
    }

    Block[B3] - Block
        Predecessors: [B2]
        Statements (1)
            ExpressionStatement (Syntax: 'a;')
              Expression:
                LocalReference: a (Type: int) (Syntax: 'a')

        Next (Regular) Block[B4]
            Leaving: {R1}
}

Block[B4] - Exit
    Predecessors: [B3]
    Statements (0)
",
    );
}
