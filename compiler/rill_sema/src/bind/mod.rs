//! The binder: AST to operation trees.
//!
//! Binding runs in two passes. [`SymbolTable::collect`] resolves every
//! function signature first, so bodies can call functions defined later
//! in the file. Each body is then bound top-down into the module's
//! [`OperationArena`], resolving names against the scope stack, typing
//! every expression, inserting implicit conversions, and folding
//! constants as it goes.
//!
//! Binding never fails. Errors become diagnostics plus poisoned
//! operations: a node that could not be typed gets the poison type and
//! the invalid flag, and invalidity propagates to every ancestor, while
//! diagnostics are reported only at the point of failure.

mod expr;
mod operators;
mod scope;

use rill_diagnostic::{type_mismatch, Diagnostic, ErrorCode};
use rill_ir::{
    AstArena, ExprId, Function, Module, Name, ParsedTy, Span, StmtId, StmtKind, StringInterner,
};
use rill_stack::ensure_sufficient_stack;
use rill_types::{TypeId, TypeInterner};

use crate::convert::{implicit_fit, ConversionKind, ImplicitFit};
use crate::operation::{
    ConstValue, JumpKind, LocalId, OpId, OpRange, Operation, OperationArena, OperationFlags,
    OperationKind,
};
use crate::symbols::{resolve_parsed_ty, FuncId, ParamId, SymbolTable};
use scope::{Binding, ScopeStack};

/// A local variable of a bound function.
#[derive(Clone, Debug)]
pub struct LocalInfo {
    pub name: Name,
    pub name_span: Span,
    pub ty: TypeId,
}

/// One function after binding: the root block of its operation tree and
/// its locals in declaration order.
#[derive(Debug)]
pub struct BoundFunction {
    pub func: FuncId,
    pub body: OpId,
    pub locals: Vec<LocalInfo>,
}

/// Result of binding a module.
#[derive(Debug)]
pub struct SemaResult {
    /// Bound functions, indexed by [`FuncId`].
    pub functions: Vec<BoundFunction>,

    /// Arena holding every operation the functions refer to.
    pub arena: OperationArena,

    /// The module's function signatures.
    pub symbols: SymbolTable,

    /// Types interned while binding.
    pub types: TypeInterner,

    /// Diagnostics in bind order; callers sort by span when merging
    /// with other phases.
    pub diagnostics: Vec<Diagnostic>,
}

impl SemaResult {
    /// Check whether binding reported any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Get a bound function by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[track_caller]
    pub fn function(&self, id: FuncId) -> &BoundFunction {
        &self.functions[id.index()]
    }

    /// Look up a bound function by name. Duplicate names resolve to the
    /// first definition.
    pub fn function_named(&self, name: Name) -> Option<&BoundFunction> {
        self.symbols.lookup(name).map(|id| self.function(id))
    }
}

/// Bind a parsed module.
///
/// The AST may contain error nodes from parse recovery; they bind to
/// invalid operations without further diagnostics.
#[tracing::instrument(level = "debug", skip_all, fields(functions = module.functions.len()))]
#[expect(clippy::cast_possible_truncation, reason = "function counts fit in u32")]
pub fn bind_module(
    module: &Module,
    ast: &AstArena,
    interner: &StringInterner,
) -> SemaResult {
    let mut types = TypeInterner::new();
    let mut diagnostics = Vec::new();
    let symbols = SymbolTable::collect(module, ast, interner, &mut types, &mut diagnostics);

    let mut arena = OperationArena::with_capacity(ast.expr_count() + ast.stmt_count());
    let mut functions = Vec::with_capacity(module.functions.len());
    for (index, func) in module.functions.iter().enumerate() {
        let binder = Binder {
            ast,
            interner,
            symbols: &symbols,
            types: &mut types,
            ops: &mut arena,
            diagnostics: &mut diagnostics,
            func: FuncId::new(index as u32),
            scope: ScopeStack::new(),
            locals: Vec::new(),
            loop_depth: 0,
        };
        functions.push(binder.bind_function(func));
    }

    SemaResult {
        functions,
        arena,
        symbols,
        types,
        diagnostics,
    }
}

/// Per-function binding state.
struct Binder<'a> {
    ast: &'a AstArena,
    interner: &'a StringInterner,
    symbols: &'a SymbolTable,
    types: &'a mut TypeInterner,
    ops: &'a mut OperationArena,
    diagnostics: &'a mut Vec<Diagnostic>,

    /// The function being bound.
    func: FuncId,
    scope: ScopeStack,
    /// Locals declared so far, indexed by [`LocalId`].
    locals: Vec<LocalInfo>,
    /// Number of enclosing `while` bodies.
    loop_depth: u32,
}

impl Binder<'_> {
    // ── Function and statement binding ──────────────────────────────

    #[expect(clippy::cast_possible_truncation, reason = "parameter counts fit in u32")]
    fn bind_function(mut self, func: &Function) -> BoundFunction {
        let symbols = self.symbols;
        let sig = symbols.sig(self.func);

        self.scope.push();
        for (index, param) in sig.params.iter().enumerate() {
            self.scope
                .declare(param.name, Binding::Param(ParamId::new(index as u32)));
        }
        let body = self.bind_block(func.body);
        self.scope.pop();

        BoundFunction {
            func: self.func,
            body,
            locals: self.locals,
        }
    }

    /// Bind a block statement: a child scope, its statements, and the
    /// locals it declares.
    fn bind_block(&mut self, id: StmtId) -> OpId {
        let ast = self.ast;
        let stmt = ast.stmt(id);
        let StmtKind::Block(range) = stmt.kind else {
            // Parser invariant: this ID names a block. Recover by
            // binding whatever is there as a plain statement.
            let mut orphans = Vec::new();
            return self.bind_stmt(id, &mut orphans);
        };

        self.scope.push();
        let mut locals = Vec::new();
        let mut statements = Vec::with_capacity(range.len());
        for &child in ast.stmt_list(range) {
            statements.push(self.bind_stmt(child, &mut locals));
        }
        self.scope.pop();

        let flags = self.inherit(statements.iter().copied());
        let statements = self.ops.alloc_op_list(statements);
        let locals = self.ops.alloc_local_list(locals);
        self.ops.alloc(Operation {
            kind: OperationKind::Block { statements, locals },
            ty: None,
            constant: None,
            flags,
            span: stmt.span,
        })
    }

    fn bind_stmt(&mut self, id: StmtId, block_locals: &mut Vec<LocalId>) -> OpId {
        ensure_sufficient_stack(|| self.bind_stmt_inner(id, block_locals))
    }

    fn bind_stmt_inner(&mut self, id: StmtId, block_locals: &mut Vec<LocalId>) -> OpId {
        let ast = self.ast;
        let stmt = ast.stmt(id);
        let span = stmt.span;

        match stmt.kind {
            StmtKind::Let {
                name,
                name_span,
                ty,
                init,
            } => self.bind_let(name, name_span, ty, init, span, block_locals),

            StmtKind::Expr(expr) => {
                let expression = self.bind_expr(expr);
                let flags = self.inherit([expression]);
                self.ops.alloc(Operation {
                    kind: OperationKind::ExpressionStatement { expression },
                    ty: None,
                    constant: None,
                    flags,
                    span,
                })
            }

            StmtKind::If {
                cond,
                then_block,
                else_branch,
            } => {
                let condition = self.bind_expr(cond);
                let cond_ok = self.require_bool(condition);
                let when_true = self.bind_block(then_block);
                let when_false = else_branch.map(|branch| self.bind_stmt(branch, block_locals));

                let mut flags = self.inherit(
                    [Some(condition), Some(when_true), when_false]
                        .into_iter()
                        .flatten(),
                );
                if !cond_ok {
                    flags |= OperationFlags::INVALID;
                }
                self.ops.alloc(Operation {
                    kind: OperationKind::Conditional {
                        condition,
                        when_true,
                        when_false,
                    },
                    ty: None,
                    constant: None,
                    flags,
                    span,
                })
            }

            StmtKind::While { cond, body } => {
                let condition = self.bind_expr(cond);
                let cond_ok = self.require_bool(condition);
                self.loop_depth += 1;
                let body = self.bind_block(body);
                self.loop_depth -= 1;

                let mut flags = self.inherit([condition, body]);
                if !cond_ok {
                    flags |= OperationFlags::INVALID;
                }
                self.ops.alloc(Operation {
                    kind: OperationKind::WhileLoop { condition, body },
                    ty: None,
                    constant: None,
                    flags,
                    span,
                })
            }

            StmtKind::Return { value } => self.bind_return(value, span),

            StmtKind::Break => self.bind_jump(JumpKind::Break, span),
            StmtKind::Continue => self.bind_jump(JumpKind::Continue, span),

            StmtKind::Block(_) => self.bind_block(id),

            StmtKind::Error => {
                // The parser already reported this region.
                self.ops.alloc(Operation {
                    kind: OperationKind::Invalid {
                        children: OpRange::EMPTY,
                    },
                    ty: None,
                    constant: None,
                    flags: OperationFlags::INVALID,
                    span,
                })
            }
        }
    }

    fn bind_let(
        &mut self,
        name: Name,
        name_span: Span,
        annotation: Option<ParsedTy>,
        init: Option<ExprId>,
        span: Span,
        block_locals: &mut Vec<LocalId>,
    ) -> OpId {
        let mut own_error = false;

        let declared = annotation.map(|parsed| {
            let resolved = resolve_parsed_ty(parsed, self.types);
            if resolved.is_void() {
                self.report(
                    Diagnostic::error(ErrorCode::E2002)
                        .with_message("locals cannot have type `void`")
                        .with_label(parsed.span, "no value has this type"),
                );
                own_error = true;
                TypeId::ERROR
            } else {
                resolved
            }
        });
        let init_op = init.map(|expr| self.bind_expr(expr));

        let (local_ty, initializer) = match (declared, init_op) {
            (Some(ty), Some(op)) => (ty, Some(self.convert_to(op, ty, "initializer"))),
            (Some(ty), None) => (ty, None),
            (None, Some(op)) => {
                let ty = self.op_ty(op);
                if ty == TypeId::NULL {
                    self.report(
                        Diagnostic::error(ErrorCode::E2005)
                            .with_message(format!(
                                "cannot infer a type for `{}`",
                                self.interner.lookup(name)
                            ))
                            .with_label(
                                self.ops.op(op).span,
                                "`null` alone does not determine a type",
                            ),
                    );
                    own_error = true;
                    (TypeId::ERROR, Some(op))
                } else if ty.is_void() {
                    self.report_void_use(self.ops.op(op).span);
                    own_error = true;
                    (TypeId::ERROR, Some(op))
                } else {
                    (ty, Some(op))
                }
            }
            (None, None) => {
                self.report(
                    Diagnostic::error(ErrorCode::E2005)
                        .with_message(format!(
                            "cannot infer a type for `{}`",
                            self.interner.lookup(name)
                        ))
                        .with_label(name_span, "needs a type annotation or an initializer"),
                );
                own_error = true;
                (TypeId::ERROR, None)
            }
        };

        let local = self.declare_local(name, name_span, local_ty, &mut own_error);
        block_locals.push(local);

        let mut flags = self.inherit(initializer);
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::VariableDeclaration { local, initializer },
            ty: Some(local_ty),
            constant: None,
            flags,
            span,
        })
    }

    fn bind_return(&mut self, value: Option<ExprId>, span: Span) -> OpId {
        let return_ty = self.symbols.sig(self.func).return_ty;
        let mut own_error = false;

        let value = match value {
            Some(expr) => {
                let op = self.bind_expr(expr);
                if return_ty.is_void() {
                    self.report(
                        Diagnostic::error(ErrorCode::E2016)
                            .with_message("cannot return a value from a `void` function")
                            .with_label(self.ops.op(op).span, "unexpected return value"),
                    );
                    own_error = true;
                    Some(op)
                } else {
                    Some(self.convert_to(op, return_ty, "return value"))
                }
            }
            None => {
                if !return_ty.is_void() && !return_ty.is_error() {
                    self.report(
                        Diagnostic::error(ErrorCode::E2017)
                            .with_message("missing return value")
                            .with_label(
                                span,
                                format!(
                                    "this function returns `{}`",
                                    self.types.format_type(return_ty)
                                ),
                            ),
                    );
                    own_error = true;
                }
                None
            }
        };

        let mut flags = self.inherit(value);
        if own_error {
            flags |= OperationFlags::INVALID;
        }
        self.ops.alloc(Operation {
            kind: OperationKind::Return { value },
            ty: None,
            constant: None,
            flags,
            span,
        })
    }

    fn bind_jump(&mut self, jump: JumpKind, span: Span) -> OpId {
        if self.loop_depth == 0 {
            let (code, keyword) = match jump {
                JumpKind::Break => (ErrorCode::E2012, "break"),
                JumpKind::Continue => (ErrorCode::E2013, "continue"),
            };
            self.report(
                Diagnostic::error(code)
                    .with_message(format!("`{keyword}` outside of a loop"))
                    .with_label(span, "not inside a loop"),
            );
            return self.ops.alloc(Operation {
                kind: OperationKind::Invalid {
                    children: OpRange::EMPTY,
                },
                ty: None,
                constant: None,
                flags: OperationFlags::INVALID,
                span,
            });
        }

        self.ops.alloc(Operation {
            kind: OperationKind::Branch { jump },
            ty: None,
            constant: None,
            flags: OperationFlags::empty(),
            span,
        })
    }

    /// Record a local and bind its name, reporting a same-scope clash.
    #[expect(clippy::cast_possible_truncation, reason = "local counts fit in u32")]
    fn declare_local(
        &mut self,
        name: Name,
        name_span: Span,
        ty: TypeId,
        own_error: &mut bool,
    ) -> LocalId {
        let local = LocalId::new(self.locals.len() as u32);
        self.locals.push(LocalInfo {
            name,
            name_span,
            ty,
        });
        if let Some(prior) = self.scope.declare(name, Binding::Local(local)) {
            self.report(
                Diagnostic::error(ErrorCode::E2006)
                    .with_message(format!(
                        "`{}` is already declared in this scope",
                        self.interner.lookup(name)
                    ))
                    .with_label(name_span, "redeclared here")
                    .with_secondary_label(self.binding_span(prior), "first declared here"),
            );
            *own_error = true;
        }
        local
    }

    fn binding_span(&self, binding: Binding) -> Span {
        match binding {
            Binding::Local(local) => self.locals[local.index()].name_span,
            Binding::Param(param) => self.symbols.sig(self.func).params[param.index()].name_span,
        }
    }

    // ── Conversions ─────────────────────────────────────────────────

    /// Convert a value to `to`, inserting implicit conversion nodes.
    ///
    /// On failure the operand is wrapped in an invalid conversion to the
    /// target type, so the surrounding context keeps its declared type
    /// instead of cascading. `void` operands report the use site rather
    /// than a mismatch.
    fn convert_to(&mut self, op: OpId, to: TypeId, context: &str) -> OpId {
        let from = self.op_ty(op);
        if from.is_void() {
            self.report_void_use(self.ops.op(op).span);
            return self.invalid_conversion(op, to);
        }
        match implicit_fit(from, to, self.types) {
            Some(fit) => self.apply_implicit(op, fit, to),
            None => {
                let span = self.ops.op(op).span;
                let expected = self.types.format_type(to);
                let found = self.types.format_type(from);
                self.report(type_mismatch(span, &expected, &found, context));
                self.invalid_conversion(op, to)
            }
        }
    }

    /// Materialize an implicit conversion that is known to fit.
    fn apply_implicit(&mut self, op: OpId, fit: ImplicitFit, to: TypeId) -> OpId {
        match fit {
            ImplicitFit::Identity => op,
            ImplicitFit::Single(conversion) => {
                let child = *self.ops.op(op);
                let constant = match conversion {
                    ConversionKind::Widening => child.constant.and_then(widen_const),
                    // The null type has exactly one value.
                    ConversionKind::NullToOptional => Some(ConstValue::Null),
                    _ => None,
                };
                self.ops.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion,
                        operand: op,
                    },
                    ty: Some(to),
                    constant,
                    flags: OperationFlags::IMPLICIT | (child.flags & OperationFlags::INVALID),
                    span: child.span,
                })
            }
            ImplicitFit::LiftedWidening => {
                let child = *self.ops.op(op);
                let invalid = child.flags & OperationFlags::INVALID;
                let widened = self.ops.alloc(Operation {
                    kind: OperationKind::Conversion {
                        conversion: ConversionKind::Widening,
                        operand: op,
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
                    ty: Some(to),
                    constant: None,
                    flags: OperationFlags::IMPLICIT | invalid,
                    span: child.span,
                })
            }
        }
    }

    /// Wrap a value whose conversion failed. The wrapper takes the
    /// target type so the context does not cascade.
    fn invalid_conversion(&mut self, op: OpId, to: TypeId) -> OpId {
        let span = self.ops.op(op).span;
        self.ops.alloc(Operation {
            kind: OperationKind::Conversion {
                conversion: ConversionKind::Invalid,
                operand: op,
            },
            ty: Some(to),
            constant: None,
            flags: OperationFlags::IMPLICIT | OperationFlags::INVALID,
            span,
        })
    }

    // ── Shared helpers ──────────────────────────────────────────────

    /// Type of a value operation. Statements answer the poison type;
    /// nothing consumes them as values.
    fn op_ty(&self, op: OpId) -> TypeId {
        self.ops.op(op).ty.unwrap_or(TypeId::ERROR)
    }

    /// Invalid flag inherited from children.
    fn inherit(&self, children: impl IntoIterator<Item = OpId>) -> OperationFlags {
        let mut flags = OperationFlags::empty();
        for child in children {
            if self.ops.op(child).is_invalid() {
                flags |= OperationFlags::INVALID;
                break;
            }
        }
        flags
    }

    /// Require a `bool` condition; poisoned conditions pass silently.
    fn require_bool(&mut self, op: OpId) -> bool {
        let ty = self.op_ty(op);
        if ty == TypeId::BOOL || ty.is_error() {
            return true;
        }
        let span = self.ops.op(op).span;
        self.report(
            Diagnostic::error(ErrorCode::E2018)
                .with_message(format!(
                    "condition must be `bool`, found `{}`",
                    self.types.format_type(ty)
                ))
                .with_label(span, "expected `bool`"),
        );
        false
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn report_void_use(&mut self, span: Span) {
        self.report(
            Diagnostic::error(ErrorCode::E2015)
                .with_message("cannot use a `void` value")
                .with_label(span, "this expression has type `void`"),
        );
    }
}

/// Fold a constant across a widening conversion.
#[expect(clippy::cast_precision_loss, reason = "widening follows runtime semantics")]
fn widen_const(value: ConstValue) -> Option<ConstValue> {
    match value {
        ConstValue::Int(v) => Some(ConstValue::Float(v as f64)),
        _ => None,
    }
}
