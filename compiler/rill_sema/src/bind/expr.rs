//! Expression binding.
//!
//! One method per expression form. Every method allocates exactly one
//! operation for its own node (plus any implicit conversion nodes) and
//! returns its id; types, constants, and flags are filled in as the tree
//! comes back up.

use rill_diagnostic::{unknown_identifier, Diagnostic, ErrorCode};
use rill_ir::{ExprId, ExprKind, ExprRange, Name, ParsedTy, Span};
use rill_stack::ensure_sufficient_stack;
use rill_types::TypeId;

use crate::convert::{cast_fit, implicit_fit, CastFit, ConversionKind};
use crate::operation::{ConstValue, OpId, OpRange, Operation, OperationFlags, OperationKind};
use crate::symbols::resolve_parsed_ty;

use super::scope::Binding;
use super::{widen_const, Binder};

impl Binder<'_> {
    /// Bind an expression to a value operation.
    ///
    /// The stack guard lives here because every nested construct funnels
    /// through this entry point, so deeply nested input grows the stack
    /// instead of overflowing it.
    pub(crate) fn bind_expr(&mut self, id: ExprId) -> OpId {
        ensure_sufficient_stack(|| self.bind_expr_inner(id))
    }

    fn bind_expr_inner(&mut self, id: ExprId) -> OpId {
        let ast = self.ast;
        let expr = ast.expr(id);
        let span = expr.span;

        match expr.kind {
            ExprKind::Int(value) => self.literal(TypeId::INT, ConstValue::Int(value), span),
            ExprKind::Float(bits) => {
                self.literal(TypeId::FLOAT, ConstValue::Float(f64::from_bits(bits)), span)
            }
            ExprKind::Bool(value) => self.literal(TypeId::BOOL, ConstValue::Bool(value), span),
            ExprKind::Str(text) => self.literal(TypeId::STR, ConstValue::Str(text), span),
            ExprKind::Null => self.literal(TypeId::NULL, ConstValue::Null, span),

            ExprKind::Ident(name) => self.bind_ident(name, span),

            ExprKind::Unary { op, operand } => self.bind_unary(op, operand, span),
            ExprKind::Binary { op, lhs, rhs } => self.bind_binary(op, lhs, rhs, span),
            ExprKind::Coalesce { lhs, rhs } => self.bind_coalesce(lhs, rhs, span),
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.bind_ternary(cond, then_expr, else_expr, span),

            ExprKind::Assign { target, value } => self.bind_assign(target, value, span),
            ExprKind::CompoundAssign { op, target, value } => {
                self.bind_compound(op, target, value, span)
            }

            ExprKind::Call {
                callee,
                callee_span,
                args,
            } => self.bind_call(callee, callee_span, args, span),

            ExprKind::Cast { operand, ty } => self.bind_cast(operand, ty, span),

            // The parser already reported this region.
            ExprKind::Error => self.invalid_expr(span),
        }
    }

    fn literal(&mut self, ty: TypeId, constant: ConstValue, span: Span) -> OpId {
        self.ops.alloc(Operation {
            kind: OperationKind::Literal,
            ty: Some(ty),
            constant: Some(constant),
            flags: OperationFlags::empty(),
            span,
        })
    }

    /// An invalid value operation wrapping already-bound children.
    pub(crate) fn invalid_with(&mut self, children: OpRange, span: Span) -> OpId {
        self.ops.alloc(Operation {
            kind: OperationKind::Invalid { children },
            ty: Some(TypeId::ERROR),
            constant: None,
            flags: OperationFlags::INVALID,
            span,
        })
    }

    fn invalid_expr(&mut self, span: Span) -> OpId {
        self.invalid_with(OpRange::EMPTY, span)
    }

    /// Resolve a name against locals and parameters, innermost first.
    /// Function names are not values; calling is the only use for them.
    fn bind_ident(&mut self, name: Name, span: Span) -> OpId {
        if let Some(binding) = self.scope.lookup(name) {
            let (kind, ty) = match binding {
                Binding::Local(local) => (
                    OperationKind::LocalReference { local },
                    self.locals[local.index()].ty,
                ),
                Binding::Param(param) => (
                    OperationKind::ParameterReference { param },
                    self.symbols.sig(self.func).params[param.index()].ty,
                ),
            };
            return self.ops.alloc(Operation {
                kind,
                ty: Some(ty),
                constant: None,
                flags: OperationFlags::empty(),
                span,
            });
        }

        if self.symbols.lookup(name).is_some() {
            self.report(
                Diagnostic::error(ErrorCode::E2019)
                    .with_message(format!(
                        "function `{}` is not a value",
                        self.interner.lookup(name)
                    ))
                    .with_label(span, "functions can only be called"),
            );
        } else {
            self.report(unknown_identifier(span, self.interner.lookup(name)));
        }
        self.invalid_expr(span)
    }

    /// Bind `a ?? b`.
    ///
    /// The result is the left operand's value type when the fallback
    /// reaches it implicitly, or the optional type itself when the
    /// fallback is also optional (or `null`).
    fn bind_coalesce(&mut self, lhs: ExprId, rhs: ExprId, span: Span) -> OpId {
        let operand = self.bind_expr(lhs);
        let mut when_null = self.bind_expr(rhs);
        let left_ty = self.op_ty(operand);

        let result = if left_ty.is_error() {
            TypeId::ERROR
        } else if let Some(inner) = self.types.optional_inner(left_ty) {
            let right_ty = self.op_ty(when_null);
            if let Some(fit) = implicit_fit(right_ty, inner, self.types) {
                when_null = self.apply_implicit(when_null, fit, inner);
                inner
            } else if let Some(fit) = implicit_fit(right_ty, left_ty, self.types) {
                when_null = self.apply_implicit(when_null, fit, left_ty);
                left_ty
            } else {
                when_null = self.convert_to(when_null, inner, "coalesce fallback");
                inner
            }
        } else {
            self.report(
                Diagnostic::error(ErrorCode::E2009)
                    .with_message(format!(
                        "the left operand of `??` must be optional, found `{}`",
                        self.types.format_type(left_ty)
                    ))
                    .with_label(self.ops.op(operand).span, "expected an optional value"),
            );
            TypeId::ERROR
        };

        let mut flags = self.inherit([operand, when_null]);
        if result.is_error() && !left_ty.is_error() {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::Coalesce { operand, when_null },
            ty: Some(result),
            constant: None,
            flags,
            span,
        })
    }

    fn bind_ternary(
        &mut self,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        span: Span,
    ) -> OpId {
        let condition = self.bind_expr(cond);
        let cond_ok = self.require_bool(condition);
        let mut when_true = self.bind_expr(then_expr);
        let mut when_false = self.bind_expr(else_expr);

        let (result, arm_error) = self.merge_arms(&mut when_true, &mut when_false, span);

        let mut flags = self.inherit([condition, when_true, when_false]);
        if !cond_ok || arm_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::Conditional {
                condition,
                when_true,
                when_false: Some(when_false),
            },
            ty: Some(result),
            constant: None,
            flags,
            span,
        })
    }

    /// The common type of two ternary arms.
    ///
    /// Identical arm types win directly; otherwise the arm that converts
    /// into the other is wrapped. Returns the result type and whether a
    /// fresh error was reported.
    fn merge_arms(
        &mut self,
        when_true: &mut OpId,
        when_false: &mut OpId,
        span: Span,
    ) -> (TypeId, bool) {
        let true_ty = self.op_ty(*when_true);
        let false_ty = self.op_ty(*when_false);

        let mut void_arm = false;
        if true_ty.is_void() {
            self.report_void_use(self.ops.op(*when_true).span);
            void_arm = true;
        }
        if false_ty.is_void() {
            self.report_void_use(self.ops.op(*when_false).span);
            void_arm = true;
        }
        if void_arm {
            return (TypeId::ERROR, true);
        }
        if true_ty.is_error() || false_ty.is_error() {
            return (TypeId::ERROR, false);
        }
        if true_ty == false_ty {
            return (true_ty, false);
        }
        if let Some(fit) = implicit_fit(true_ty, false_ty, self.types) {
            *when_true = self.apply_implicit(*when_true, fit, false_ty);
            return (false_ty, false);
        }
        if let Some(fit) = implicit_fit(false_ty, true_ty, self.types) {
            *when_false = self.apply_implicit(*when_false, fit, true_ty);
            return (true_ty, false);
        }

        self.report(
            Diagnostic::error(ErrorCode::E2010)
                .with_message(format!(
                    "ternary branches have incompatible types `{}` and `{}`",
                    self.types.format_type(true_ty),
                    self.types.format_type(false_ty)
                ))
                .with_label(span, "no common type"),
        );
        (TypeId::ERROR, true)
    }

    fn bind_assign(&mut self, target: ExprId, value: ExprId, span: Span) -> OpId {
        let target = self.bind_expr(target);
        let mut value = self.bind_expr(value);
        let mut own_error = false;

        let target_ty = self.op_ty(target);
        if self.check_assignable(target, &mut own_error) {
            value = self.convert_to(value, target_ty, "assigned value");
        }

        let mut flags = self.inherit([target, value]);
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::SimpleAssignment { target, value },
            ty: Some(target_ty),
            constant: None,
            flags,
            span,
        })
    }

    /// Whether `target` can be assigned through.
    ///
    /// Only locals and parameters are storage. Targets that already
    /// failed to bind stay silent; everything else reports E2008.
    pub(crate) fn check_assignable(&mut self, target: OpId, own_error: &mut bool) -> bool {
        match self.ops.op(target).kind {
            OperationKind::LocalReference { .. } | OperationKind::ParameterReference { .. } => true,
            OperationKind::Invalid { .. } => false,
            _ => {
                let span = self.ops.op(target).span;
                self.report(
                    Diagnostic::error(ErrorCode::E2008)
                        .with_message("cannot assign to this expression")
                        .with_label(span, "not a variable"),
                );
                *own_error = true;
                false
            }
        }
    }

    /// Bind a call, converting each argument to its parameter type.
    ///
    /// Calls to unknown names still bind their arguments, wrapped in an
    /// invalid operation so later phases see the full tree.
    fn bind_call(&mut self, callee: Name, callee_span: Span, args: ExprRange, span: Span) -> OpId {
        let ast = self.ast;
        let arg_exprs = ast.expr_list(args);

        let Some(func) = self.symbols.lookup(callee) else {
            let bound: Vec<OpId> = arg_exprs.iter().map(|&arg| self.bind_expr(arg)).collect();
            self.report(unknown_identifier(callee_span, self.interner.lookup(callee)));
            let children = self.ops.alloc_op_list(bound);
            return self.invalid_with(children, span);
        };

        let symbols = self.symbols;
        let sig = symbols.sig(func);
        let expected = sig.params.len();
        let found = arg_exprs.len();

        let mut own_error = false;
        if found != expected {
            let plural = if expected == 1 { "" } else { "s" };
            self.report(
                Diagnostic::error(ErrorCode::E2004)
                    .with_message(format!(
                        "function `{}` takes {expected} argument{plural}, found {found}",
                        self.interner.lookup(callee)
                    ))
                    .with_label(callee_span, format!("expected {expected} argument{plural}"))
                    .with_secondary_label(sig.name_span, "function defined here"),
            );
            own_error = true;
        }

        let mut bound = Vec::with_capacity(found);
        for (index, &arg) in arg_exprs.iter().enumerate() {
            let op = self.bind_expr(arg);
            let op = match sig.params.get(index) {
                Some(param) => self.convert_to(op, param.ty, "argument"),
                // Excess arguments have no parameter type to meet.
                None => op,
            };
            bound.push(op);
        }

        let mut flags = self.inherit(bound.iter().copied());
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        let arguments = self.ops.alloc_op_list(bound);
        self.ops.alloc(Operation {
            kind: OperationKind::Invocation {
                target: func,
                arguments,
            },
            ty: Some(sig.return_ty),
            constant: None,
            flags,
            span,
        })
    }

    /// Bind `e as T`.
    ///
    /// Casts allow every implicit conversion plus narrowing and
    /// unwrapping, always one step: `int? as float` and `float as int?`
    /// would each need two and are not defined. The one composite is
    /// `int as float?`, whose inner widening stays implicit.
    fn bind_cast(&mut self, operand: ExprId, parsed: ParsedTy, span: Span) -> OpId {
        let operand = self.bind_expr(operand);
        let target = resolve_parsed_ty(parsed, self.types);
        let from = self.op_ty(operand);

        if from.is_error() || target.is_error() {
            return self.invalid_cast(operand, target, span);
        }
        if from.is_void() {
            self.report_void_use(self.ops.op(operand).span);
            return self.invalid_cast(operand, target, span);
        }

        match cast_fit(from, target, self.types) {
            Some(CastFit::Single(conversion)) => {
                let child = *self.ops.op(operand);
                let constant = match conversion {
                    ConversionKind::Identity => child.constant,
                    ConversionKind::Widening => child.constant.and_then(widen_const),
                    // The null type has exactly one value.
                    ConversionKind::NullToOptional => Some(ConstValue::Null),
                    _ => None,
                };
                self.ops.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion,
                        operand,
                    },
                    ty: Some(target),
                    constant,
                    flags: child.flags & OperationFlags::INVALID,
                    span,
                })
            }
            Some(CastFit::LiftedWidening) => {
                let child = *self.ops.op(operand);
                let invalid = child.flags & OperationFlags::INVALID;
                let widened = self.ops.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion: ConversionKind::Widening,
                        operand,
                    },
                    ty: Some(TypeId::FLOAT),
                    constant: child.constant.and_then(widen_const),
                    flags: OperationFlags::IMPLICIT | invalid,
                    span: child.span,
                });
                self.ops.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion: ConversionKind::Lifting,
                        operand: widened,
                    },
                    ty: Some(target),
                    constant: None,
                    flags: invalid,
                    span,
                })
            }
            None => {
                self.report(
                    Diagnostic::error(ErrorCode::E2011)
                        .with_message(format!(
                            "no conversion from `{}` to `{}`",
                            self.types.format_type(from),
                            self.types.format_type(target)
                        ))
                        .with_label(span, "this cast is not defined"),
                );
                self.invalid_cast(operand, target, span)
            }
        }
    }

    /// An explicit cast with no defined conversion. The node takes the
    /// written target type so the context does not cascade.
    fn invalid_cast(&mut self, operand: OpId, target: TypeId, span: Span) -> OpId {
        let flags = self.inherit([operand]) | OperationFlags::INVALID;
        self.ops.alloc(Operation {
            kind: OperationKind::Conversion {
                conversion: ConversionKind::Invalid,
                operand,
            },
            ty: Some(target),
            constant: None,
            flags,
            span,
        })
    }
}
