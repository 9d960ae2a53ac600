//! Binder and operation trees for the Rill compiler.
//!
//! This crate turns the parsed AST into a typed **operation tree**: every
//! expression and statement becomes an [`Operation`] with a resolved type,
//! implicit conversions made explicit as nodes, constants folded, and
//! binding errors recorded as diagnostics plus poisoned operations.
//!
//! The entry point is [`bind_module`]; [`OperationRenderer`] produces the
//! textual tree form the golden tests and the `rill tree` command print.

mod bind;
mod convert;
mod operation;
mod render;
mod symbols;

pub use bind::{bind_module, BoundFunction, LocalInfo, SemaResult};
pub use convert::ConversionKind;
pub use operation::{
    BinaryOperatorKind, CaptureId, ConstValue, JumpKind, LocalId, LocalRange, OpId, OpRange,
    Operation, OperationArena, OperationFlags, OperationKind, UnaryOperatorKind,
};
pub use render::OperationRenderer;
pub use symbols::{FuncId, FunctionSig, ParamId, ParamSig, SymbolTable};
