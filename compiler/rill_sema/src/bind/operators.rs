//! Operator binding and constant folding.
//!
//! An operator is classified against its operand types before any node
//! is built: the classifier picks the semantic operator, the type both
//! operands convert to, and the result type. Operands over optionals
//! lift the operator instead of inserting conversions around it, with
//! one restriction: lifting never combines with widening, so `int?` and
//! `float` have no common operator.
//!
//! Folding runs over the converted operands, so a widened literal folds
//! at `float`. Lifted operators never fold.

use rill_diagnostic::{type_mismatch, Diagnostic, ErrorCode};
use rill_ir::{BinaryOp, ExprId, Name, Span, UnaryOp};
use rill_types::TypeId;

use crate::convert::implicit_fit;
use crate::operation::{
    BinaryOperatorKind, ConstValue, OpId, Operation, OperationFlags, OperationKind,
    UnaryOperatorKind,
};

use super::Binder;

/// How a binary operator applies to a pair of operand types.
struct OperatorSignature {
    operator: BinaryOperatorKind,
    /// Type both operands convert to before the operator applies.
    operand_ty: TypeId,
    result_ty: TypeId,
    lifted: bool,
}

impl Binder<'_> {
    pub(crate) fn bind_unary(&mut self, op: UnaryOp, operand: ExprId, span: Span) -> OpId {
        let operand = self.bind_expr(operand);
        let ty = self.op_ty(operand);
        let operator = match op {
            UnaryOp::Neg => UnaryOperatorKind::Negate,
            UnaryOp::Not => UnaryOperatorKind::Not,
        };

        if ty.is_error() {
            let flags = self.inherit([operand]);
            return self.ops.alloc(Operation {
                kind: OperationKind::UnaryOperator { operator, operand },
                ty: Some(TypeId::ERROR),
                constant: None,
                flags,
                span,
            });
        }

        let mut own_error = false;
        let fit = if ty.is_void() {
            self.report_void_use(self.ops.op(operand).span);
            own_error = true;
            None
        } else {
            // Optionals lift the operator over their base type.
            let base = self.types.optional_inner(ty);
            let lifted = base.is_some();
            let defined = match op {
                UnaryOp::Neg => base.unwrap_or(ty).is_numeric(),
                UnaryOp::Not => base.unwrap_or(ty) == TypeId::BOOL,
            };
            if defined {
                Some((ty, lifted))
            } else {
                self.report(
                    Diagnostic::error(ErrorCode::E2007)
                        .with_message(format!(
                            "operator `{}` is not defined for `{}`",
                            op.as_symbol(),
                            self.types.format_type(ty)
                        ))
                        .with_label(span, "invalid operand type"),
                );
                own_error = true;
                None
            }
        };
        let (result, lifted) = fit.unwrap_or((TypeId::ERROR, false));

        let constant = if lifted {
            None
        } else {
            self.ops
                .op(operand)
                .constant
                .and_then(|value| eval_unary(operator, value))
        };

        let mut flags = self.inherit([operand]);
        if lifted {
            flags |= OperationFlags::LIFTED;
        }
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::UnaryOperator { operator, operand },
            ty: Some(result),
            constant,
            flags,
            span,
        })
    }

    pub(crate) fn bind_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: Span,
    ) -> OpId {
        let left = self.bind_expr(lhs);
        let right = self.bind_expr(rhs);
        let left_ty = self.op_ty(left);
        let right_ty = self.op_ty(right);

        if left_ty.is_error() || right_ty.is_error() || left_ty.is_void() || right_ty.is_void() {
            return self.poisoned_binary(op, left, right, span);
        }

        let Some(sig) = self.classify_binary(op, left_ty, right_ty) else {
            self.report_undefined_operator(op, left_ty, right_ty, span);
            let flags = self.inherit([left, right]) | OperationFlags::INVALID;
            return self.ops.alloc(Operation {
                kind: OperationKind::BinaryOperator {
                    operator: map_operator(op),
                    left,
                    right,
                },
                ty: Some(TypeId::ERROR),
                constant: None,
                flags,
                span,
            });
        };

        let left = self.operand_to(left, sig.operand_ty);
        let right = self.operand_to(right, sig.operand_ty);

        let mut own_error = false;
        let constant = if sig.lifted {
            None
        } else {
            self.fold_binary(sig.operator, left, right, span, &mut own_error)
        };

        let mut flags = self.inherit([left, right]);
        if sig.lifted {
            flags |= OperationFlags::LIFTED;
        }
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::BinaryOperator {
                operator: sig.operator,
                left,
                right,
            },
            ty: Some(sig.result_ty),
            constant,
            flags,
            span,
        })
    }

    /// Bind `target op= value` against the same operator table as
    /// binary expressions.
    ///
    /// Only the value side materializes conversion nodes; the target
    /// stays a bare reference so the store site is visible. The operator
    /// result has to reach the target's type implicitly or the whole
    /// assignment is in error.
    pub(crate) fn bind_compound(
        &mut self,
        op: BinaryOp,
        target: ExprId,
        value: ExprId,
        span: Span,
    ) -> OpId {
        let target = self.bind_expr(target);
        let mut value = self.bind_expr(value);
        let mut own_error = false;

        let target_ty = self.op_ty(target);
        let value_ty = self.op_ty(value);
        let assignable = self.check_assignable(target, &mut own_error);

        let mut operator = map_operator(op);
        let mut lifted = false;
        if assignable && !target_ty.is_error() && !value_ty.is_error() {
            if value_ty.is_void() {
                self.report_void_use(self.ops.op(value).span);
                own_error = true;
            } else {
                match self.classify_binary(op, target_ty, value_ty) {
                    Some(sig) => {
                        operator = sig.operator;
                        lifted = sig.lifted;
                        value = self.operand_to(value, sig.operand_ty);
                        if implicit_fit(sig.result_ty, target_ty, self.types).is_none() {
                            let expected = self.types.format_type(target_ty);
                            let found = self.types.format_type(sig.result_ty);
                            self.report(type_mismatch(
                                span,
                                &expected,
                                &found,
                                "compound assignment result",
                            ));
                            own_error = true;
                        }
                    }
                    None => {
                        self.report_undefined_operator(op, target_ty, value_ty, span);
                        own_error = true;
                    }
                }
            }
        }

        let mut flags = self.inherit([target, value]);
        if lifted {
            flags |= OperationFlags::LIFTED;
        }
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::CompoundAssignment {
                operator,
                target,
                value,
            },
            ty: Some(target_ty),
            constant: None,
            flags,
            span,
        })
    }

    /// Pick the semantic operator and operand type for `op` over
    /// `left_ty` and `right_ty`, or `None` when the pairing is not
    /// defined.
    fn classify_binary(
        &mut self,
        op: BinaryOp,
        left_ty: TypeId,
        right_ty: TypeId,
    ) -> Option<OperatorSignature> {
        // && and || never lift.
        if op.is_logical() {
            if left_ty == TypeId::BOOL && right_ty == TypeId::BOOL {
                return Some(OperatorSignature {
                    operator: map_operator(op),
                    operand_ty: TypeId::BOOL,
                    result_ty: TypeId::BOOL,
                    lifted: false,
                });
            }
            return None;
        }

        // String concatenation, also never lifted.
        if op == BinaryOp::Add && left_ty == TypeId::STR && right_ty == TypeId::STR {
            return Some(OperatorSignature {
                operator: BinaryOperatorKind::Concatenate,
                operand_ty: TypeId::STR,
                result_ty: TypeId::STR,
                lifted: false,
            });
        }

        // `null` adapts to the other side, lifting a plain operand to
        // its optional.
        if left_ty == TypeId::NULL || right_ty == TypeId::NULL {
            let other = if left_ty == TypeId::NULL {
                right_ty
            } else {
                left_ty
            };
            let base = self.types.optional_inner(other).unwrap_or(other);
            return self.lifted_signature(op, base);
        }

        match (
            self.types.optional_inner(left_ty),
            self.types.optional_inner(right_ty),
        ) {
            (None, None) => plain_signature(op, left_ty, right_ty),
            // Lifting requires the bases to match exactly; an operand
            // cannot widen and lift in one step.
            (Some(base), None) if right_ty == base => self.lifted_signature(op, base),
            (None, Some(base)) if left_ty == base => self.lifted_signature(op, base),
            (Some(left), Some(right)) if left == right => self.lifted_signature(op, left),
            _ => None,
        }
    }

    /// Signature for a lifted operator over optionals of `base`.
    /// Arithmetic results lift with the operands; comparisons stay
    /// plain `bool`.
    fn lifted_signature(&mut self, op: BinaryOp, base: TypeId) -> Option<OperatorSignature> {
        if !operator_defined(op, base) {
            return None;
        }
        let operand_ty = self.types.optional(base);
        Some(OperatorSignature {
            operator: map_operator(op),
            operand_ty,
            result_ty: if op.is_arithmetic() {
                operand_ty
            } else {
                TypeId::BOOL
            },
            lifted: true,
        })
    }

    /// Convert an operand to the type its operator works at. The
    /// classifier only hands out operand types every side reaches
    /// implicitly.
    fn operand_to(&mut self, op: OpId, to: TypeId) -> OpId {
        let Some(fit) = implicit_fit(self.op_ty(op), to, self.types) else {
            debug_assert!(false, "operand does not reach its operator type");
            return op;
        };
        self.apply_implicit(op, fit, to)
    }

    /// Bind a binary node whose operand is `void` or already poisoned.
    /// Poison stays silent; `void` reports its use site.
    fn poisoned_binary(&mut self, op: BinaryOp, left: OpId, right: OpId, span: Span) -> OpId {
        let mut own_error = false;
        for operand in [left, right] {
            if self.op_ty(operand).is_void() {
                self.report_void_use(self.ops.op(operand).span);
                own_error = true;
            }
        }

        let mut flags = self.inherit([left, right]);
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::BinaryOperator {
                operator: map_operator(op),
                left,
                right,
            },
            ty: Some(TypeId::ERROR),
            constant: None,
            flags,
            span,
        })
    }

    fn report_undefined_operator(
        &mut self,
        op: BinaryOp,
        left_ty: TypeId,
        right_ty: TypeId,
        span: Span,
    ) {
        self.report(
            Diagnostic::error(ErrorCode::E2007)
                .with_message(format!(
                    "operator `{}` is not defined for `{}` and `{}`",
                    op.as_symbol(),
                    self.types.format_type(left_ty),
                    self.types.format_type(right_ty)
                ))
                .with_label(span, "invalid operand types"),
        );
    }

    /// Fold an operator over the constants of its converted operands.
    ///
    /// Constant integer division by zero reports here and poisons the
    /// node without a constant; the node keeps its integer type.
    fn fold_binary(
        &mut self,
        operator: BinaryOperatorKind,
        left: OpId,
        right: OpId,
        span: Span,
        own_error: &mut bool,
    ) -> Option<ConstValue> {
        let lhs = self.ops.op(left).constant?;
        let rhs = self.ops.op(right).constant?;

        // Concatenation folds into the interner.
        if operator == BinaryOperatorKind::Concatenate {
            let (ConstValue::Str(a), ConstValue::Str(b)) = (lhs, rhs) else {
                return None;
            };
            let text = format!("{}{}", self.interner.lookup(a), self.interner.lookup(b));
            return Some(ConstValue::Str(self.interner.intern_owned(text)));
        }

        match eval_binary(operator, lhs, rhs) {
            FoldOutcome::Value(value) => Some(value),
            FoldOutcome::DivisionByZero => {
                let verb = if operator == BinaryOperatorKind::Divide {
                    "division"
                } else {
                    "remainder"
                };
                self.report(
                    Diagnostic::error(ErrorCode::E2014)
                        .with_message(format!("integer {verb} by zero"))
                        .with_label(span, "evaluated as a constant"),
                );
                *own_error = true;
                None
            }
            FoldOutcome::NoFold => None,
        }
    }
}

/// The semantic operator an AST operator denotes over non-`str`
/// operands.
fn map_operator(op: BinaryOp) -> BinaryOperatorKind {
    match op {
        BinaryOp::Add => BinaryOperatorKind::Add,
        BinaryOp::Sub => BinaryOperatorKind::Subtract,
        BinaryOp::Mul => BinaryOperatorKind::Multiply,
        BinaryOp::Div => BinaryOperatorKind::Divide,
        BinaryOp::Rem => BinaryOperatorKind::Remainder,
        BinaryOp::Eq => BinaryOperatorKind::Equals,
        BinaryOp::NotEq => BinaryOperatorKind::NotEquals,
        BinaryOp::Lt => BinaryOperatorKind::LessThan,
        BinaryOp::LtEq => BinaryOperatorKind::LessThanOrEqual,
        BinaryOp::Gt => BinaryOperatorKind::GreaterThan,
        BinaryOp::GtEq => BinaryOperatorKind::GreaterThanOrEqual,
        BinaryOp::And => BinaryOperatorKind::ConditionalAnd,
        BinaryOp::Or => BinaryOperatorKind::ConditionalOr,
    }
}

fn plain_signature(op: BinaryOp, left: TypeId, right: TypeId) -> Option<OperatorSignature> {
    let operand_ty = if left == right {
        left
    } else if left.is_numeric() && right.is_numeric() {
        // Mixed int and float meet at float.
        TypeId::FLOAT
    } else {
        return None;
    };
    if !operator_defined(op, operand_ty) {
        return None;
    }
    Some(OperatorSignature {
        operator: map_operator(op),
        operand_ty,
        result_ty: if op.is_arithmetic() {
            operand_ty
        } else {
            TypeId::BOOL
        },
        lifted: false,
    })
}

/// Whether `op` is defined over plain operands of type `base`.
///
/// `%` stays integral. `+` over `str` concatenates and is classified
/// before bases are examined, so arithmetic here is numeric only.
fn operator_defined(op: BinaryOp, base: TypeId) -> bool {
    if op.is_arithmetic() {
        return base.is_numeric() && (op != BinaryOp::Rem || base == TypeId::INT);
    }
    if op.is_relational() {
        return base.is_numeric();
    }
    if op.is_equality() {
        return base == TypeId::INT
            || base == TypeId::FLOAT
            || base == TypeId::BOOL
            || base == TypeId::STR;
    }
    false
}

/// Outcome of evaluating an operator over two constants.
enum FoldOutcome {
    Value(ConstValue),
    /// Constant `/ 0` or `% 0` at `int`; a reportable error.
    DivisionByZero,
    /// Overflow, or a pairing folding does not cover. The node simply
    /// keeps no constant.
    NoFold,
}

fn eval_binary(operator: BinaryOperatorKind, lhs: ConstValue, rhs: ConstValue) -> FoldOutcome {
    match (lhs, rhs) {
        (ConstValue::Int(a), ConstValue::Int(b)) => eval_int(operator, a, b),
        (ConstValue::Float(a), ConstValue::Float(b)) => eval_float(operator, a, b),
        (ConstValue::Bool(a), ConstValue::Bool(b)) => eval_bool(operator, a, b),
        (ConstValue::Str(a), ConstValue::Str(b)) => eval_str(operator, a, b),
        _ => FoldOutcome::NoFold,
    }
}

fn eval_int(operator: BinaryOperatorKind, a: i64, b: i64) -> FoldOutcome {
    let value = match operator {
        BinaryOperatorKind::Add => return fold_checked(a.checked_add(b)),
        BinaryOperatorKind::Subtract => return fold_checked(a.checked_sub(b)),
        BinaryOperatorKind::Multiply => return fold_checked(a.checked_mul(b)),
        BinaryOperatorKind::Divide | BinaryOperatorKind::Remainder if b == 0 => {
            return FoldOutcome::DivisionByZero;
        }
        BinaryOperatorKind::Divide => return fold_checked(a.checked_div(b)),
        BinaryOperatorKind::Remainder => return fold_checked(a.checked_rem(b)),
        BinaryOperatorKind::Equals => ConstValue::Bool(a == b),
        BinaryOperatorKind::NotEquals => ConstValue::Bool(a != b),
        BinaryOperatorKind::LessThan => ConstValue::Bool(a < b),
        BinaryOperatorKind::LessThanOrEqual => ConstValue::Bool(a <= b),
        BinaryOperatorKind::GreaterThan => ConstValue::Bool(a > b),
        BinaryOperatorKind::GreaterThanOrEqual => ConstValue::Bool(a >= b),
        _ => return FoldOutcome::NoFold,
    };
    FoldOutcome::Value(value)
}

/// Overflowing integer arithmetic is left for runtime; the node keeps
/// no constant.
fn fold_checked(value: Option<i64>) -> FoldOutcome {
    match value {
        Some(v) => FoldOutcome::Value(ConstValue::Int(v)),
        None => FoldOutcome::NoFold,
    }
}

#[expect(clippy::float_cmp, reason = "folding follows runtime comparison semantics")]
fn eval_float(operator: BinaryOperatorKind, a: f64, b: f64) -> FoldOutcome {
    let value = match operator {
        BinaryOperatorKind::Add => ConstValue::Float(a + b),
        BinaryOperatorKind::Subtract => ConstValue::Float(a - b),
        BinaryOperatorKind::Multiply => ConstValue::Float(a * b),
        // Float division by zero folds to an infinity, like at runtime.
        BinaryOperatorKind::Divide => ConstValue::Float(a / b),
        BinaryOperatorKind::Equals => ConstValue::Bool(a == b),
        BinaryOperatorKind::NotEquals => ConstValue::Bool(a != b),
        BinaryOperatorKind::LessThan => ConstValue::Bool(a < b),
        BinaryOperatorKind::LessThanOrEqual => ConstValue::Bool(a <= b),
        BinaryOperatorKind::GreaterThan => ConstValue::Bool(a > b),
        BinaryOperatorKind::GreaterThanOrEqual => ConstValue::Bool(a >= b),
        _ => return FoldOutcome::NoFold,
    };
    FoldOutcome::Value(value)
}

fn eval_bool(operator: BinaryOperatorKind, a: bool, b: bool) -> FoldOutcome {
    let value = match operator {
        BinaryOperatorKind::Equals => a == b,
        BinaryOperatorKind::NotEquals => a != b,
        BinaryOperatorKind::ConditionalAnd => a && b,
        BinaryOperatorKind::ConditionalOr => a || b,
        _ => return FoldOutcome::NoFold,
    };
    FoldOutcome::Value(ConstValue::Bool(value))
}

/// Interned names compare equal exactly when their strings do.
fn eval_str(operator: BinaryOperatorKind, a: Name, b: Name) -> FoldOutcome {
    let value = match operator {
        BinaryOperatorKind::Equals => a == b,
        BinaryOperatorKind::NotEquals => a != b,
        _ => return FoldOutcome::NoFold,
    };
    FoldOutcome::Value(ConstValue::Bool(value))
}

fn eval_unary(operator: UnaryOperatorKind, value: ConstValue) -> Option<ConstValue> {
    match (operator, value) {
        // Negating i64::MIN overflows; the node keeps no constant.
        (UnaryOperatorKind::Negate, ConstValue::Int(v)) => v.checked_neg().map(ConstValue::Int),
        (UnaryOperatorKind::Negate, ConstValue::Float(v)) => Some(ConstValue::Float(-v)),
        (UnaryOperatorKind::Not, ConstValue::Bool(v)) => Some(ConstValue::Bool(!v)),
        _ => None,
    }
}
