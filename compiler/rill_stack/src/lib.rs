//! Dynamic stack growth for the recursive phases of the pipeline.
//!
//! The expression grammar, the binder, the flow lowering, and both text
//! renderers recurse once per level of nesting, so an input such as ten
//! thousand chained ternaries (`c ? c ? ... : 0 : 0`) walks that deep on
//! the call stack in every phase. Each recursive step wraps itself in
//! [`ensure_sufficient_stack`], which grows the stack whenever less than
//! the red zone remains:
//!
//! ```text
//! fn ternary(&mut self) -> ExprId {
//!     rill_stack::ensure_sufficient_stack(|| {
//!         // condition, then each arm, which may be another ternary
//!     })
//! }
//! ```
//!
//! On wasm32 the helper is a plain passthrough; the wasm runtime manages
//! its own stack.

/// Remaining stack below this threshold triggers a growth (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Stack allocated per growth (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, growing the stack first if less than the red zone remains.
///
/// Call this once per recursion level; consecutive calls within the
/// same grown segment are cheap checks against the current stack
/// pointer.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
