//! Value-position lowering: captures, spills, and condition branching.
//!
//! An expression whose evaluation crosses a block boundary cannot stay
//! a single tree. Short-circuit operators, `?:`, and `??` in value
//! position store the value each path produces into a flow capture and
//! hand the surrounding expression a capture reference instead. When a
//! parent has operands evaluated before such an expression, those
//! operands are spilled into captures of their own so evaluation order
//! survives the split.

use rill_ir::Span;
use rill_sema::{
    BinaryOperatorKind, CaptureId, ConstValue, ConversionKind, OpId, Operation, OperationFlags,
    OperationKind, UnaryOperatorKind,
};
use rill_stack::ensure_sufficient_stack;
use rill_types::TypeId;

use super::{GraphBuilder, Label};

impl GraphBuilder<'_> {
    /// Does evaluating this expression split across blocks?
    pub(crate) fn needs_flow(&self, id: OpId) -> bool {
        ensure_sufficient_stack(|| self.needs_flow_inner(id))
    }

    fn needs_flow_inner(&self, id: OpId) -> bool {
        let op = self.arena.op(id);
        match op.kind {
            OperationKind::BinaryOperator {
                operator:
                    BinaryOperatorKind::ConditionalAnd | BinaryOperatorKind::ConditionalOr,
                ..
            }
            | OperationKind::Coalesce { .. } => true,

            // The expression form of `?:`; the statement form has no
            // type and never sits under a value.
            OperationKind::Conditional { .. } => op.ty.is_some(),

            OperationKind::Conversion { operand, .. }
            | OperationKind::UnaryOperator { operand, .. }
            | OperationKind::IsNull { operand } => self.needs_flow(operand),

            OperationKind::BinaryOperator { left, right, .. } => {
                self.needs_flow(left) || self.needs_flow(right)
            }

            OperationKind::SimpleAssignment { target, value }
            | OperationKind::CompoundAssignment { target, value, .. } => {
                self.needs_flow(target) || self.needs_flow(value)
            }

            OperationKind::Invocation { arguments, .. } => self
                .arena
                .op_list(arguments)
                .iter()
                .any(|&arg| self.needs_flow(arg)),

            OperationKind::Invalid { children } => self
                .arena
                .op_list(children)
                .iter()
                .any(|&child| self.needs_flow(child)),

            _ => false,
        }
    }

    /// Lower an expression for its value, returning the operation the
    /// parent should reference. Expressions that never split come back
    /// unchanged.
    pub(crate) fn lower_value(&mut self, id: OpId) -> OpId {
        ensure_sufficient_stack(|| self.lower_value_inner(id))
    }

    fn lower_value_inner(&mut self, id: OpId) -> OpId {
        let op = *self.arena.op(id);
        match op.kind {
            OperationKind::BinaryOperator {
                operator,
                left,
                right,
            } if matches!(
                operator,
                BinaryOperatorKind::ConditionalAnd | BinaryOperatorKind::ConditionalOr
            ) =>
            {
                self.lower_short_circuit(op, operator, left, right)
            }

            OperationKind::Coalesce { operand, when_null } => {
                self.lower_coalesce(op, operand, when_null)
            }

            OperationKind::Conditional {
                condition,
                when_true,
                when_false,
            } if op.ty.is_some() => self.lower_ternary(op, condition, when_true, when_false),

            _ if self.needs_flow(id) => self.rebuild_with_spills(id),

            _ => id,
        }
    }

    /// Lower a condition, branching to `target` when it evaluates to
    /// `on_true`. Only `&&`, `||`, and `!` decompose into chained
    /// branches; everything else, ternaries included, lowers to a value
    /// and a single conditional edge.
    pub(crate) fn lower_branch(&mut self, id: OpId, on_true: bool, target: Label) {
        ensure_sufficient_stack(|| self.lower_branch_inner(id, on_true, target));
    }

    fn lower_branch_inner(&mut self, id: OpId, on_true: bool, target: Label) {
        let op = *self.arena.op(id);
        match op.kind {
            OperationKind::UnaryOperator {
                operator: UnaryOperatorKind::Not,
                operand,
            } if !op.flags.is_lifted() => {
                self.lower_branch(operand, !on_true, target);
            }

            OperationKind::BinaryOperator {
                operator: BinaryOperatorKind::ConditionalAnd,
                left,
                right,
            } => {
                if on_true {
                    let skip = self.new_label();
                    self.lower_branch(left, false, skip);
                    self.lower_branch(right, true, target);
                    self.start_block(skip);
                } else {
                    self.lower_branch(left, false, target);
                    self.lower_branch(right, false, target);
                }
            }

            OperationKind::BinaryOperator {
                operator: BinaryOperatorKind::ConditionalOr,
                left,
                right,
            } => {
                if on_true {
                    self.lower_branch(left, true, target);
                    self.lower_branch(right, true, target);
                } else {
                    let skip = self.new_label();
                    self.lower_branch(left, true, skip);
                    self.lower_branch(right, false, target);
                    self.start_block(skip);
                }
            }

            _ => {
                let condition = self.lower_value(id);
                self.emit_conditional(on_true, condition, target);
            }
        }
    }

    // ── Splitting forms ─────────────────────────────────────────────

    /// `a && b` / `a || b` in value position: one capture, written with
    /// the right operand on the fall-through path and with the
    /// short-circuit constant on the branch path.
    fn lower_short_circuit(
        &mut self,
        op: Operation,
        operator: BinaryOperatorKind,
        left: OpId,
        right: OpId,
    ) -> OpId {
        let is_or = operator == BinaryOperatorKind::ConditionalOr;
        let capture = self.alloc_capture();
        let constant_arm = self.new_label();
        let join = self.new_label();

        self.lower_branch(left, is_or, constant_arm);
        let right = self.lower_value(right);
        self.emit_capture(capture, right);
        self.goto(join);

        self.start_block(constant_arm);
        let left_span = self.arena.op(left).span;
        let literal = self.arena.alloc(Operation {
            kind: OperationKind::Literal,
            ty: op.ty,
            constant: Some(ConstValue::Bool(is_or)),
            flags: OperationFlags::IMPLICIT,
            span: left_span,
        });
        self.emit_capture(capture, literal);

        self.start_block(join);
        self.capture_ref(capture, op.ty, op.span)
    }

    /// `c ? t : f` in value position: branch on the condition, write
    /// each converted arm into one result capture.
    fn lower_ternary(
        &mut self,
        op: Operation,
        condition: OpId,
        when_true: OpId,
        when_false: Option<OpId>,
    ) -> OpId {
        let capture = self.alloc_capture();
        let false_arm = self.new_label();
        let join = self.new_label();

        self.lower_branch(condition, false, false_arm);
        let when_true = self.lower_value(when_true);
        self.emit_capture(capture, when_true);
        self.goto(join);

        self.start_block(false_arm);
        if let Some(when_false) = when_false {
            let when_false = self.lower_value(when_false);
            self.emit_capture(capture, when_false);
        }

        self.start_block(join);
        self.capture_ref(capture, op.ty, op.span)
    }

    /// `a ?? b`: capture the operand, branch on an implicit null test
    /// of its reference, and write the result capture on both arms.
    /// The not-null arm unwraps when the result type drops the
    /// optional.
    fn lower_coalesce(&mut self, op: Operation, operand: OpId, when_null: OpId) -> OpId {
        let operand_op = *self.arena.op(operand);

        let operand_capture = self.alloc_capture();
        let value = self.lower_value(operand);
        self.emit_capture(operand_capture, value);

        let null_arm = self.new_label();
        let join = self.new_label();
        let test = {
            let read = self.capture_ref(operand_capture, operand_op.ty, operand_op.span);
            self.arena.alloc(Operation {
                kind: OperationKind::IsNull { operand: read },
                ty: Some(TypeId::BOOL),
                constant: None,
                flags: OperationFlags::IMPLICIT,
                span: operand_op.span,
            })
        };
        let result_capture = self.alloc_capture();
        self.emit_conditional(true, test, null_arm);

        let mut kept = self.capture_ref(operand_capture, operand_op.ty, operand_op.span);
        if let (Some(from), Some(to)) = (operand_op.ty, op.ty) {
            if self.types.is_optional(from) && !self.types.is_optional(to) {
                kept = self.arena.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion: ConversionKind::Unwrapping,
                        operand: kept,
                    },
                    ty: Some(to),
                    constant: None,
                    flags: OperationFlags::IMPLICIT,
                    span: operand_op.span,
                });
            }
        }
        self.emit_capture(result_capture, kept);
        self.goto(join);

        self.start_block(null_arm);
        let when_null = self.lower_value(when_null);
        self.emit_capture(result_capture, when_null);

        self.start_block(join);
        self.capture_ref(result_capture, op.ty, op.span)
    }

    // ── Spilling ────────────────────────────────────────────────────

    /// Rebuild a parent whose descendant splits, spilling the operands
    /// evaluated before the split so their order is preserved.
    fn rebuild_with_spills(&mut self, id: OpId) -> OpId {
        let op = *self.arena.op(id);
        match op.kind {
            OperationKind::Conversion {
                conversion,
                operand,
            } => {
                let operand = self.lower_value(operand);
                self.arena.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion,
                        operand,
                    },
                    ..op
                })
            }

            OperationKind::UnaryOperator { operator, operand } => {
                let operand = self.lower_value(operand);
                self.arena.alloc(Operation {
                    kind: OperationKind::UnaryOperator { operator, operand },
                    ..op
                })
            }

            OperationKind::IsNull { operand } => {
                let operand = self.lower_value(operand);
                self.arena.alloc(Operation {
                    kind: OperationKind::IsNull { operand },
                    ..op
                })
            }

            OperationKind::BinaryOperator {
                operator,
                left,
                right,
            } => {
                let left = if self.needs_flow(right) && !self.needs_flow(left) {
                    let left = self.lower_value(left);
                    self.spill(left)
                } else {
                    self.lower_value(left)
                };
                let right = self.lower_value(right);
                self.arena.alloc(Operation {
                    kind: OperationKind::BinaryOperator {
                        operator,
                        left,
                        right,
                    },
                    ..op
                })
            }

            OperationKind::Invocation { target, arguments } => {
                let args = self.arena.op_list(arguments).to_vec();
                let last_split = args.iter().rposition(|&arg| self.needs_flow(arg));
                let mut rebuilt = Vec::with_capacity(args.len());
                for (index, &arg) in args.iter().enumerate() {
                    let before_split =
                        matches!(last_split, Some(last) if index < last) && !self.needs_flow(arg);
                    let lowered = self.lower_value(arg);
                    rebuilt.push(if before_split {
                        self.spill(lowered)
                    } else {
                        lowered
                    });
                }
                let arguments = self.arena.alloc_op_list(rebuilt);
                self.arena.alloc(Operation {
                    kind: OperationKind::Invocation { target, arguments },
                    ..op
                })
            }

            OperationKind::SimpleAssignment { target, value } => {
                let target = self.capture_assignment_target(target);
                let value = self.lower_value(value);
                self.arena.alloc(Operation {
                    kind: OperationKind::SimpleAssignment { target, value },
                    ..op
                })
            }

            OperationKind::CompoundAssignment {
                operator,
                target,
                value,
            } => {
                let target = self.capture_assignment_target(target);
                let value = self.lower_value(value);
                self.arena.alloc(Operation {
                    kind: OperationKind::CompoundAssignment {
                        operator,
                        target,
                        value,
                    },
                    ..op
                })
            }

            OperationKind::Invalid { children } => {
                let children = self.arena.op_list(children).to_vec();
                let rebuilt: Vec<OpId> =
                    children.iter().map(|&child| self.lower_value(child)).collect();
                let children = self.arena.alloc_op_list(rebuilt);
                self.arena.alloc(Operation {
                    kind: OperationKind::Invalid { children },
                    ..op
                })
            }

            _ => id,
        }
    }

    /// Capture an assignment target reference before the right side
    /// splits. These captures designate a location, not a value read;
    /// the analyses treat them through
    /// [`target_captures`](crate::ControlFlowGraph::target_captures).
    fn capture_assignment_target(&mut self, target: OpId) -> OpId {
        let op = *self.arena.op(target);
        let capture = self.alloc_capture();
        if let OperationKind::LocalReference { local } = op.kind {
            self.target_captures.insert(capture, local);
        }
        self.emit_capture(capture, target);
        self.capture_ref(capture, op.ty, op.span)
    }

    /// Store an already-lowered value into a fresh capture and return
    /// the reference that reads it back.
    fn spill(&mut self, value: OpId) -> OpId {
        let op = *self.arena.op(value);
        if let OperationKind::FlowCaptureReference { .. } = op.kind {
            return value;
        }
        let capture = self.alloc_capture();
        self.emit_capture(capture, value);
        self.capture_ref(capture, op.ty, op.span)
    }

    fn emit_capture(&mut self, capture: CaptureId, value: OpId) {
        let span = self.arena.op(value).span;
        let stmt = self.arena.alloc(Operation {
            kind: OperationKind::FlowCapture { capture, value },
            ty: None,
            constant: None,
            flags: OperationFlags::IMPLICIT,
            span,
        });
        self.push_stmt(stmt);
    }

    fn capture_ref(&mut self, capture: CaptureId, ty: Option<TypeId>, span: Span) -> OpId {
        self.arena.alloc(Operation {
            kind: OperationKind::FlowCaptureReference { capture },
            ty,
            constant: None,
            flags: OperationFlags::IMPLICIT,
            span,
        })
    }
}
