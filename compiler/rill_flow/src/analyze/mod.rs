//! Flow analyses over the packed graph.
//!
//! Three checks run after construction: missing return (E4001),
//! definite assignment (E4002), and unreachable code (W4003).
//! Reachability is structural throughout: a constant `true` condition
//! still has a false edge.

#[cfg(test)]
mod tests;

use rill_diagnostic::{Diagnostic, ErrorCode};
use rill_ir::{Span, StringInterner};
use rill_sema::{
    BoundFunction, FunctionSig, LocalId, OpId, OperationArena, OperationKind,
};
use rill_stack::ensure_sufficient_stack;
use smallvec::{smallvec, SmallVec};

use crate::ir::{BasicBlock, BlockKind, BranchKind, ControlFlowGraph};

/// Run the flow analyses for one function.
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze_graph(
    graph: &ControlFlowGraph,
    function: &BoundFunction,
    sig: &FunctionSig,
    arena: &OperationArena,
    interner: &StringInterner,
) -> Vec<Diagnostic> {
    let reachable = graph.reachable();
    let mut diagnostics = Vec::new();

    check_missing_return(graph, sig, &reachable, interner, &mut diagnostics);
    check_definite_assignment(graph, function, arena, &reachable, interner, &mut diagnostics);
    check_unreachable(graph, arena, &reachable, &mut diagnostics);

    tracing::debug!(count = diagnostics.len(), "flow analyses finished");
    diagnostics
}

// ── Missing return (E4001) ──────────────────────────────────────────

/// A non-void function must not have a reachable `Regular` edge into
/// the exit block.
fn check_missing_return(
    graph: &ControlFlowGraph,
    sig: &FunctionSig,
    reachable: &[bool],
    interner: &StringInterner,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if sig.return_ty.is_void() || sig.return_ty.is_error() {
        return;
    }
    let exit = graph.exit_id();
    let falls_off = graph.blocks.iter().enumerate().any(|(index, block)| {
        reachable[index]
            && matches!(
                block.fall_through,
                Some(fall) if fall.kind == BranchKind::Regular && fall.target == exit
            )
    });
    if falls_off {
        diagnostics.push(
            Diagnostic::error(ErrorCode::E4001)
                .with_message(format!(
                    "not all paths in `{}` return a value",
                    interner.lookup(sig.name)
                ))
                .with_label(
                    sig.name_span,
                    "this function can reach its end without returning",
                ),
        );
    }
}

// ── Definite assignment (E4002) ─────────────────────────────────────

/// Set of definitely-assigned locals.
#[derive(Clone, PartialEq, Eq)]
struct AssignSet {
    words: SmallVec<[u64; 2]>,
}

impl AssignSet {
    fn empty(locals: usize) -> Self {
        AssignSet {
            words: smallvec![0; locals.div_ceil(64)],
        }
    }

    fn contains(&self, local: LocalId) -> bool {
        let index = local.index();
        self.words[index / 64] & (1 << (index % 64)) != 0
    }

    fn insert(&mut self, local: LocalId) {
        let index = local.index();
        self.words[index / 64] |= 1 << (index % 64);
    }

    /// Intersect in place; the meet over incoming paths.
    fn intersect(&mut self, other: &AssignSet) {
        for (word, incoming) in self.words.iter_mut().zip(&other.words) {
            *word &= incoming;
        }
    }
}

/// Forward must-be-assigned dataflow: parameters start assigned (they
/// are not tracked at all), locals unassigned; the state at a join is
/// the intersection over predecessors. A read of a possibly-unassigned
/// local reports once per local, at its earliest read.
fn check_definite_assignment(
    graph: &ControlFlowGraph,
    function: &BoundFunction,
    arena: &OperationArena,
    reachable: &[bool],
    interner: &StringInterner,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let locals = function.locals.len();
    if locals == 0 {
        return;
    }

    let checker = Checker { graph, arena };
    let mut entry_states: Vec<Option<AssignSet>> = vec![None; graph.block_count()];
    entry_states[0] = Some(AssignSet::empty(locals));
    let mut worklist = vec![0usize];

    while let Some(index) = worklist.pop() {
        let Some(state) = entry_states[index].clone() else {
            continue;
        };
        let mut exit_state = state;
        checker.transfer(&graph.blocks[index], &mut exit_state, None);

        for succ in graph.blocks[index].successors() {
            let succ = succ.index();
            let merged = match &entry_states[succ] {
                None => exit_state.clone(),
                Some(prior) => {
                    let mut merged = prior.clone();
                    merged.intersect(&exit_state);
                    merged
                }
            };
            if entry_states[succ].as_ref() != Some(&merged) {
                entry_states[succ] = Some(merged);
                worklist.push(succ);
            }
        }
    }

    // Reporting pass over the settled states, reachable blocks only.
    let mut reads: Vec<(LocalId, Span)> = Vec::new();
    for (index, block) in graph.blocks.iter().enumerate() {
        if !reachable[index] {
            continue;
        }
        let Some(state) = entry_states[index].clone() else {
            continue;
        };
        let mut state = state;
        checker.transfer(block, &mut state, Some(&mut reads));
    }

    let mut earliest: Vec<Option<Span>> = vec![None; locals];
    for (local, span) in reads {
        let slot = &mut earliest[local.index()];
        if slot.is_none_or(|prior| span.start < prior.start) {
            *slot = Some(span);
        }
    }
    for (index, span) in earliest.into_iter().enumerate() {
        let Some(span) = span else { continue };
        let name = interner.lookup(function.locals[index].name);
        diagnostics.push(
            Diagnostic::error(ErrorCode::E4002)
                .with_message(format!("`{name}` may be used before it is assigned"))
                .with_label(span, "possibly unassigned here"),
        );
    }
}

struct Checker<'a> {
    graph: &'a ControlFlowGraph,
    arena: &'a OperationArena,
}

impl Checker<'_> {
    /// Apply one block to the state; with `reads` present, also record
    /// possibly-unassigned reads.
    fn transfer(
        &self,
        block: &BasicBlock,
        state: &mut AssignSet,
        mut reads: Option<&mut Vec<(LocalId, Span)>>,
    ) {
        for &stmt in &block.statements {
            self.visit(stmt, state, &mut reads);
        }
        if let Some(branch) = &block.conditional {
            self.visit(branch.condition, state, &mut reads);
        }
        if let Some(value) = block.fall_through.as_ref().and_then(|f| f.value) {
            self.visit(value, state, &mut reads);
        }
    }

    fn visit(
        &self,
        id: OpId,
        state: &mut AssignSet,
        reads: &mut Option<&mut Vec<(LocalId, Span)>>,
    ) {
        ensure_sufficient_stack(|| self.visit_inner(id, state, reads));
    }

    fn visit_inner(
        &self,
        id: OpId,
        state: &mut AssignSet,
        reads: &mut Option<&mut Vec<(LocalId, Span)>>,
    ) {
        let op = *self.arena.op(id);
        match op.kind {
            OperationKind::LocalReference { local } => {
                if !state.contains(local) {
                    if let Some(reads) = reads {
                        reads.push((local, op.span));
                    }
                }
            }

            OperationKind::VariableDeclaration { local, initializer } => {
                if let Some(initializer) = initializer {
                    self.visit(initializer, state, reads);
                    state.insert(local);
                }
            }

            OperationKind::SimpleAssignment { target, value } => {
                self.visit(value, state, reads);
                self.write_target(target, state, reads);
            }

            OperationKind::CompoundAssignment { target, value, .. } => {
                // A compound assignment reads the target before it
                // writes it.
                if let Some(local) = self.target_local(target) {
                    if !state.contains(local) {
                        if let Some(reads) = reads {
                            reads.push((local, self.arena.op(target).span));
                        }
                    }
                }
                self.visit(value, state, reads);
                self.write_target(target, state, reads);
            }

            // Captures of assignment targets designate a location;
            // they do not read the local.
            OperationKind::FlowCapture { capture, value } => {
                if !self.graph.target_captures.contains_key(&capture) {
                    self.visit(value, state, reads);
                }
            }

            OperationKind::ExpressionStatement { expression } => {
                self.visit(expression, state, reads);
            }

            OperationKind::Conversion { operand, .. }
            | OperationKind::UnaryOperator { operand, .. }
            | OperationKind::IsNull { operand } => {
                self.visit(operand, state, reads);
            }

            OperationKind::BinaryOperator { left, right, .. } => {
                self.visit(left, state, reads);
                self.visit(right, state, reads);
            }

            OperationKind::Coalesce { operand, when_null } => {
                self.visit(operand, state, reads);
                self.visit(when_null, state, reads);
            }

            OperationKind::Invocation { arguments, .. } => {
                for &argument in self.arena.op_list(arguments) {
                    self.visit(argument, state, reads);
                }
            }

            OperationKind::Invalid { children } => {
                for &child in self.arena.op_list(children) {
                    self.visit(child, state, reads);
                }
            }

            OperationKind::Return { value } => {
                if let Some(value) = value {
                    self.visit(value, state, reads);
                }
            }

            OperationKind::Block { statements, .. } => {
                for &stmt in self.arena.op_list(statements) {
                    self.visit(stmt, state, reads);
                }
            }

            OperationKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                self.visit(condition, state, reads);
                self.visit(when_true, state, reads);
                if let Some(when_false) = when_false {
                    self.visit(when_false, state, reads);
                }
            }

            OperationKind::WhileLoop { condition, body } => {
                self.visit(condition, state, reads);
                self.visit(body, state, reads);
            }

            OperationKind::Literal
            | OperationKind::ParameterReference { .. }
            | OperationKind::Branch { .. }
            | OperationKind::FlowCaptureReference { .. } => {}
        }
    }

    /// The local an assignment target designates, directly or through
    /// a target capture.
    fn target_local(&self, target: OpId) -> Option<LocalId> {
        match self.arena.op(target).kind {
            OperationKind::LocalReference { local } => Some(local),
            OperationKind::FlowCaptureReference { capture } => {
                self.graph.target_captures.get(&capture).copied()
            }
            _ => None,
        }
    }

    fn write_target(
        &self,
        target: OpId,
        state: &mut AssignSet,
        reads: &mut Option<&mut Vec<(LocalId, Span)>>,
    ) {
        match self.arena.op(target).kind {
            OperationKind::LocalReference { .. } | OperationKind::FlowCaptureReference { .. } => {
                if let Some(local) = self.target_local(target) {
                    state.insert(local);
                }
            }
            OperationKind::ParameterReference { .. } => {}
            // Poisoned targets: visit for reads, assign nothing.
            _ => self.visit(target, state, reads),
        }
    }
}

// ── Unreachable code (W4003) ────────────────────────────────────────

/// Blocks unreachable from the entry, grouped by consecutive block
/// numbering; each group with at least one statement warns once at its
/// first statement.
fn check_unreachable(
    graph: &ControlFlowGraph,
    arena: &OperationArena,
    reachable: &[bool],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut index = 0;
    while index < graph.block_count() {
        let block = &graph.blocks[index];
        if reachable[index] || block.kind != BlockKind::Block {
            index += 1;
            continue;
        }

        // The group: consecutive unreachable blocks.
        let mut first_span: Option<Span> = None;
        while index < graph.block_count()
            && !reachable[index]
            && graph.blocks[index].kind == BlockKind::Block
        {
            if first_span.is_none() {
                first_span = graph.blocks[index]
                    .statements
                    .first()
                    .map(|&stmt| arena.op(stmt).span);
            }
            index += 1;
        }

        if let Some(span) = first_span {
            diagnostics.push(
                Diagnostic::warning(ErrorCode::W4003)
                    .with_message("unreachable code")
                    .with_label(span, "this code is never executed"),
            );
        }
    }
}
