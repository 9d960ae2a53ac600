//! Lexical scopes for name resolution inside a function body.
//!
//! The function scope holds the parameters; every block pushes a child
//! scope for its locals. Lookup walks from the innermost scope outward,
//! so a nested `let` shadows anything above it, while redeclaring a name
//! in the same scope is the caller's error to report.

use rill_ir::Name;
use rustc_hash::FxHashMap;

use crate::operation::LocalId;
use crate::symbols::ParamId;

/// What a name resolves to inside a function body.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Binding {
    Local(LocalId),
    Param(ParamId),
}

/// A stack of lexical scopes.
#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<FxHashMap<Name, Binding>>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Enter a new innermost scope.
    pub(crate) fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Leave the innermost scope, dropping its bindings.
    pub(crate) fn pop(&mut self) {
        let popped = self.scopes.pop();
        debug_assert!(popped.is_some(), "popped an empty scope stack");
    }

    /// Declare a name in the innermost scope.
    ///
    /// Returns the binding this name already had in the same scope, if
    /// any. The new binding replaces it either way, so later references
    /// resolve to the latest declaration even after the error.
    pub(crate) fn declare(&mut self, name: Name, binding: Binding) -> Option<Binding> {
        debug_assert!(!self.scopes.is_empty(), "declared outside any scope");
        self.scopes.last_mut()?.insert(name, binding)
    }

    /// Resolve a name, innermost scope first.
    pub(crate) fn lookup(&self, name: Name) -> Option<Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }
}
