//! The operation tree: the binder's typed intermediate form.
//!
//! Every expression and statement of a bound function becomes an
//! [`Operation`]: a kind plus the facts the binder established about it
//! (its type, a folded constant when one exists, implicit/invalid/lifted
//! flags, and the source span it covers). Operations live in a flat
//! [`OperationArena`] and reference their children by [`OpId`], the same
//! layout the AST uses.
//!
//! Two kinds never come out of the binder: [`OperationKind::FlowCapture`]
//! and [`OperationKind::FlowCaptureReference`] are introduced by graph
//! lowering when an expression's evaluation is split across basic blocks.

use std::fmt;

use rill_ir::{Name, Span};
use rill_types::TypeId;

use crate::symbols::{FuncId, ParamId};

// ── ID newtypes ─────────────────────────────────────────────────────

/// Index into the operation arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct OpId(u32);

impl OpId {
    /// Create a new `OpId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        OpId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpId({})", self.0)
    }
}

/// Range of operations in the flattened child lists.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(C)]
pub struct OpRange {
    pub start: u32,
    pub len: u16,
}

impl OpRange {
    /// Empty range.
    pub const EMPTY: OpRange = OpRange { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        OpRange { start, len }
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of operations.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for OpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpRange({}..{})", self.start, self.start + u32::from(self.len))
    }
}

impl Default for OpRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Index of a local variable within its function.
///
/// Locals are numbered in declaration order across the whole function
/// body; each [`OperationKind::Block`] records which of them it owns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct LocalId(u32);

impl LocalId {
    /// Create a new `LocalId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        LocalId(index)
    }

    /// Get the index into the function's local table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

/// Range of locals in the arena's flattened local lists.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(C)]
pub struct LocalRange {
    pub start: u32,
    pub len: u16,
}

impl LocalRange {
    /// Empty range.
    pub const EMPTY: LocalRange = LocalRange { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        LocalRange { start, len }
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of locals.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for LocalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LocalRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

impl Default for LocalRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A temporary introduced by graph lowering.
///
/// When control flow splits the evaluation of an expression (`&&`, `||`,
/// `?:`, `??`), the value produced on each path is stored into a capture
/// and the surrounding expression reads it back through a
/// [`OperationKind::FlowCaptureReference`]. Captures are numbered
/// sequentially from 0 within each function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CaptureId(u32);

impl CaptureId {
    /// Create a new `CaptureId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        CaptureId(index)
    }

    /// Get the index as `usize`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CaptureId({})", self.0)
    }
}

impl fmt::Display for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Constants ───────────────────────────────────────────────────────

/// A compile-time constant attached to an operation.
///
/// Produced by literal binding and constant folding. String constants
/// keep their interned [`Name`]; folding a concatenation interns the
/// combined string.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Name),
    Null,
}

// ── Flags ───────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Facts about an operation beyond its kind and type.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct OperationFlags: u8 {
        /// The node was synthesized by the compiler rather than written
        /// in source: implicit conversions, lowered literals, captures.
        const IMPLICIT = 1 << 0;
        /// This node or one of its children had a binding error.
        const INVALID = 1 << 1;
        /// An operator applied over optional operands. `null` operands
        /// propagate through the operation at runtime.
        const LIFTED = 1 << 2;
    }
}

impl OperationFlags {
    /// Check whether the invalid bit is set.
    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.contains(Self::INVALID)
    }

    /// Check whether the lifted bit is set.
    #[inline]
    pub const fn is_lifted(self) -> bool {
        self.contains(Self::LIFTED)
    }
}

impl Default for OperationFlags {
    fn default() -> Self {
        Self::empty()
    }
}

// ── Operator kinds ──────────────────────────────────────────────────

/// Binary operator as resolved by the binder.
///
/// Unlike the surface [`rill_ir::BinaryOp`], these name the operation
/// that was actually selected: `+` over strings becomes `Concatenate`,
/// not `Add`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOperatorKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Concatenate,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ConditionalAnd,
    ConditionalOr,
}

impl BinaryOperatorKind {
    /// Name used in rendered trees.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperatorKind::Add => "Add",
            BinaryOperatorKind::Subtract => "Subtract",
            BinaryOperatorKind::Multiply => "Multiply",
            BinaryOperatorKind::Divide => "Divide",
            BinaryOperatorKind::Remainder => "Remainder",
            BinaryOperatorKind::Concatenate => "Concatenate",
            BinaryOperatorKind::Equals => "Equals",
            BinaryOperatorKind::NotEquals => "NotEquals",
            BinaryOperatorKind::LessThan => "LessThan",
            BinaryOperatorKind::LessThanOrEqual => "LessThanOrEqual",
            BinaryOperatorKind::GreaterThan => "GreaterThan",
            BinaryOperatorKind::GreaterThanOrEqual => "GreaterThanOrEqual",
            BinaryOperatorKind::ConditionalAnd => "ConditionalAnd",
            BinaryOperatorKind::ConditionalOr => "ConditionalOr",
        }
    }
}

/// Unary operator as resolved by the binder.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnaryOperatorKind {
    Negate,
    Not,
}

impl UnaryOperatorKind {
    /// Name used in rendered trees.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperatorKind::Negate => "Negate",
            UnaryOperatorKind::Not => "Not",
        }
    }
}

/// Loop jump direction for a [`OperationKind::Branch`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum JumpKind {
    Break,
    Continue,
}

impl JumpKind {
    /// Name used in rendered trees.
    pub fn as_str(self) -> &'static str {
        match self {
            JumpKind::Break => "Break",
            JumpKind::Continue => "Continue",
        }
    }
}

// ── Operations ──────────────────────────────────────────────────────

/// What an operation does. Children are [`OpId`]s into the same arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Something the binder could not make sense of. Wraps whatever
    /// children were bound before the error.
    Invalid { children: OpRange },

    /// A `{ ... }` block: its statements plus the locals it declares.
    Block {
        statements: OpRange,
        locals: LocalRange,
    },

    /// A `let` statement declaring one local.
    VariableDeclaration {
        local: LocalId,
        initializer: Option<OpId>,
    },

    /// An expression evaluated for its effect, value discarded.
    ExpressionStatement { expression: OpId },

    /// An `if` statement or a `?:` expression. The statement form has no
    /// type and may lack a false branch; the expression form has both.
    Conditional {
        condition: OpId,
        when_true: OpId,
        when_false: Option<OpId>,
    },

    /// A `while` loop.
    WhileLoop { condition: OpId, body: OpId },

    /// `break` or `continue`.
    Branch { jump: JumpKind },

    /// A `return` statement, with the returned value when present.
    Return { value: Option<OpId> },

    /// A literal. The value lives in [`Operation::constant`].
    Literal,

    /// A read of a local variable.
    LocalReference { local: LocalId },

    /// A read of a parameter.
    ParameterReference { param: ParamId },

    /// A call to a module function.
    Invocation { target: FuncId, arguments: OpRange },

    /// A representation change applied to a value. Implicit conversions
    /// are synthesized by the binder; `as` casts are written in source.
    Conversion {
        conversion: crate::convert::ConversionKind,
        operand: OpId,
    },

    /// A unary operator application.
    UnaryOperator {
        operator: UnaryOperatorKind,
        operand: OpId,
    },

    /// A binary operator application.
    BinaryOperator {
        operator: BinaryOperatorKind,
        left: OpId,
        right: OpId,
    },

    /// `a ?? b`: the operand, and the value produced when it is null.
    Coalesce { operand: OpId, when_null: OpId },

    /// A plain assignment `x = v`.
    SimpleAssignment { target: OpId, value: OpId },

    /// A compound assignment `x op= v`.
    CompoundAssignment {
        operator: BinaryOperatorKind,
        target: OpId,
        value: OpId,
    },

    /// A null test synthesized by graph lowering for `??`.
    IsNull { operand: OpId },

    /// Store a value into a flow capture (graph lowering only).
    FlowCapture { capture: CaptureId, value: OpId },

    /// Read a flow capture back (graph lowering only).
    FlowCaptureReference { capture: CaptureId },
}

/// One node of the bound tree.
///
/// `ty` is `None` for operations in statement position; every operation
/// that produces a value carries `Some`, including `void` invocations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub ty: Option<TypeId>,
    pub constant: Option<ConstValue>,
    pub flags: OperationFlags,
    pub span: Span,
}

impl Operation {
    /// Check whether this node or a child had a binding error.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.flags.is_invalid()
    }
}

// ── Arena ───────────────────────────────────────────────────────────

/// Contiguous storage for the operations of one module.
///
/// The binder fills it function by function; graph lowering appends the
/// capture machinery for each function behind the bound trees.
#[derive(Clone, Default)]
pub struct OperationArena {
    /// All operations (indexed by `OpId`).
    ops: Vec<Operation>,

    /// Flattened child lists (block statements, call arguments).
    op_lists: Vec<OpId>,

    /// Flattened local lists (block-owned locals, in declaration order).
    local_lists: Vec<LocalId>,
}

impl OperationArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with capacity for roughly `nodes` operations.
    pub fn with_capacity(nodes: usize) -> Self {
        OperationArena {
            ops: Vec::with_capacity(nodes),
            op_lists: Vec::with_capacity(nodes / 4),
            local_lists: Vec::with_capacity(nodes / 8),
        }
    }

    /// Allocate an operation, return its ID.
    #[inline]
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc(&mut self, op: Operation) -> OpId {
        let id = OpId::new(self.ops.len() as u32);
        self.ops.push(op);
        id
    }

    /// Get an operation by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn op(&self, id: OpId) -> &Operation {
        &self.ops[id.index()]
    }

    /// Get the number of operations.
    #[inline]
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Allocate a child list, return its range.
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_op_list(&mut self, ops: impl IntoIterator<Item = OpId>) -> OpRange {
        let start = self.op_lists.len() as u32;
        self.op_lists.extend(ops);
        let len = (self.op_lists.len() as u32 - start) as u16;
        OpRange::new(start, len)
    }

    /// Get a child list by range.
    #[inline]
    pub fn op_list(&self, range: OpRange) -> &[OpId] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.op_lists[start..end]
    }

    /// Allocate a local list, return its range.
    #[expect(clippy::cast_possible_truncation, reason = "arena indices fit in u32")]
    pub fn alloc_local_list(&mut self, locals: impl IntoIterator<Item = LocalId>) -> LocalRange {
        let start = self.local_lists.len() as u32;
        self.local_lists.extend(locals);
        let len = (self.local_lists.len() as u32 - start) as u16;
        LocalRange::new(start, len)
    }

    /// Get a local list by range.
    #[inline]
    pub fn local_list(&self, range: LocalRange) -> &[LocalId] {
        let start = range.start as usize;
        let end = start + range.len as usize;
        &self.local_lists[start..end]
    }
}

impl fmt::Debug for OperationArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationArena")
            .field("ops", &self.ops.len())
            .field("op_lists", &self.op_lists.len())
            .field("local_lists", &self.local_lists.len())
            .finish()
    }
}
