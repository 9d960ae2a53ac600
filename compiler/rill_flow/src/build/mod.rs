//! Graph construction: lowering bound operation trees into blocks.
//!
//! Lowering walks a function body statement by statement, appending
//! basic blocks in the order it first enters them. Forward targets are
//! labels resolved at the end, so `if`/`while`/short-circuit lowering
//! never has to patch block numbers. [`finish`](GraphBuilder::finish)
//! then packs away empty pass-through blocks, dissolves regions that
//! ended up owning nothing, and computes predecessors.
//!
//! Value-position lowering (captures and operand spilling) lives in the
//! [`value`] sibling module.

mod value;

use rill_sema::{
    BoundFunction, CaptureId, JumpKind, LocalId, OpId, Operation, OperationArena, OperationKind,
};
use rill_stack::ensure_sufficient_stack;
use rill_types::TypeInterner;
use rustc_hash::FxHashMap;

use crate::ir::{
    BasicBlock, BlockId, BlockKind, BranchKind, ConditionalBranch, ControlFlowGraph, FallThrough,
    Predecessor, Region, RegionId,
};

/// Lower a bound function body into its control-flow graph.
///
/// Capture machinery and rebuilt parent operations are appended to the
/// arena behind the bound trees; the original operations stay in place
/// for tree rendering.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_graph(
    function: &BoundFunction,
    arena: &mut OperationArena,
    types: &TypeInterner,
) -> ControlFlowGraph {
    let graph = GraphBuilder::new(function, arena, types).run();
    tracing::debug!(
        blocks = graph.block_count(),
        regions = graph.regions.len(),
        "built flow graph"
    );
    graph
}

/// A forward reference to a block that may not exist yet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Label(u32);

impl Label {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A block under construction. Successor targets are labels until
/// [`GraphBuilder::finish`] resolves them.
struct PendingBlock {
    kind: BlockKind,
    statements: Vec<OpId>,
    conditional: Option<(bool, OpId, Label)>,
    fall_through: Option<(BranchKind, Option<OpId>, Label)>,
    region: Option<usize>,
}

impl PendingBlock {
    fn new(kind: BlockKind, region: Option<usize>) -> Self {
        PendingBlock {
            kind,
            statements: Vec::new(),
            conditional: None,
            fall_through: None,
            region,
        }
    }
}

struct PendingRegion {
    parent: Option<usize>,
    locals: Vec<LocalId>,
    captures: Vec<CaptureId>,
}

/// Break and continue targets of the innermost enclosing loop.
#[derive(Copy, Clone)]
struct LoopLabels {
    break_to: Label,
    continue_to: Label,
}

pub(crate) struct GraphBuilder<'a> {
    pub(crate) arena: &'a mut OperationArena,
    pub(crate) types: &'a TypeInterner,
    function: &'a BoundFunction,

    blocks: Vec<PendingBlock>,
    /// Label bindings, filled as blocks start.
    labels: Vec<Option<usize>>,
    /// The block receiving statements, if any. `None` after a
    /// terminator until the next statement or label starts a block.
    current: Option<usize>,

    regions: Vec<PendingRegion>,
    region_stack: Vec<usize>,
    loops: Vec<LoopLabels>,

    pub(crate) next_capture: u32,
    pub(crate) target_captures: FxHashMap<CaptureId, LocalId>,

    exit: Label,
}

impl<'a> GraphBuilder<'a> {
    fn new(
        function: &'a BoundFunction,
        arena: &'a mut OperationArena,
        types: &'a TypeInterner,
    ) -> Self {
        GraphBuilder {
            arena,
            types,
            function,
            blocks: Vec::new(),
            labels: vec![None],
            current: None,
            regions: Vec::new(),
            region_stack: Vec::new(),
            loops: Vec::new(),
            next_capture: 0,
            target_captures: FxHashMap::default(),
            exit: Label(0),
        }
    }

    fn run(mut self) -> ControlFlowGraph {
        let body = *self.arena.op(self.function.body);
        let (statements, locals) = match body.kind {
            OperationKind::Block { statements, locals } => (
                self.arena.op_list(statements).to_vec(),
                self.arena.local_list(locals).to_vec(),
            ),
            _ => (vec![self.function.body], Vec::new()),
        };

        self.blocks.push(PendingBlock::new(BlockKind::Entry, None));
        self.current = Some(0);

        // The body's root region. It owns the body's locals and any
        // captures allocated outside nested scopes, and dissolves in
        // finish() like every other empty region.
        self.regions.push(PendingRegion {
            parent: None,
            locals,
            captures: Vec::new(),
        });
        self.region_stack.push(0);
        let first = self.new_label();
        self.start_block(first);

        for stmt in statements {
            self.lower_stmt(stmt);
        }
        if self.current.is_some() {
            self.goto(self.exit);
        }
        self.region_stack.pop();

        let exit = self.exit;
        self.start_block(exit);
        if let Some(index) = self.current {
            self.blocks[index].kind = BlockKind::Exit;
        }
        self.current = None;

        self.finish()
    }

    // ── Block plumbing ──────────────────────────────────────────────

    #[expect(clippy::cast_possible_truncation, reason = "label counts fit in u32")]
    pub(crate) fn new_label(&mut self) -> Label {
        let label = Label(self.labels.len() as u32);
        self.labels.push(None);
        label
    }

    /// Bind `label` to a fresh block and make it current. The previous
    /// current block, if still open, falls through to it.
    pub(crate) fn start_block(&mut self, label: Label) {
        let next = self.blocks.len();
        if let Some(index) = self.current {
            if self.blocks[index].fall_through.is_none() {
                self.blocks[index].fall_through = Some((BranchKind::Regular, None, label));
            }
        }
        self.blocks.push(PendingBlock::new(
            BlockKind::Block,
            self.region_stack.last().copied(),
        ));
        self.labels[label.index()] = Some(next);
        self.current = Some(next);
    }

    /// Index of the current block, starting a detached one when a
    /// terminator just closed the previous block. Detached blocks are
    /// the graph's unreachable code.
    fn current_index(&mut self) -> usize {
        match self.current {
            Some(index) => index,
            None => {
                let index = self.blocks.len();
                self.blocks.push(PendingBlock::new(
                    BlockKind::Block,
                    self.region_stack.last().copied(),
                ));
                self.current = Some(index);
                index
            }
        }
    }

    pub(crate) fn push_stmt(&mut self, op: OpId) {
        let index = self.current_index();
        self.blocks[index].statements.push(op);
    }

    /// Close the current block with an unconditional edge to `target`.
    pub(crate) fn goto(&mut self, target: Label) {
        let index = self.current_index();
        if self.blocks[index].fall_through.is_none() {
            self.blocks[index].fall_through = Some((BranchKind::Regular, None, target));
        }
        self.current = None;
    }

    /// Close the current block with a `Return` edge to the exit.
    fn emit_return(&mut self, value: Option<OpId>) {
        let index = self.current_index();
        if self.blocks[index].fall_through.is_none() {
            self.blocks[index].fall_through = Some((BranchKind::Return, value, self.exit));
        }
        self.current = None;
    }

    /// Attach a conditional edge to the current block and continue in a
    /// fresh fall-through block.
    pub(crate) fn emit_conditional(&mut self, jump_if: bool, condition: OpId, target: Label) {
        let index = self.current_index();
        debug_assert!(self.blocks[index].conditional.is_none());
        self.blocks[index].conditional = Some((jump_if, condition, target));
        let next = self.new_label();
        self.start_block(next);
    }

    /// Open a region for a lexical scope. Forces a block boundary so
    /// region membership stays exact.
    fn enter_region(&mut self, locals: Vec<LocalId>) {
        let parent = self.region_stack.last().copied();
        let index = self.regions.len();
        self.regions.push(PendingRegion {
            parent,
            locals,
            captures: Vec::new(),
        });
        self.region_stack.push(index);
        let label = self.new_label();
        self.start_block(label);
    }

    fn exit_region(&mut self) {
        self.region_stack.pop();
        let label = self.new_label();
        self.start_block(label);
    }

    /// Allocate the next capture, owned by the innermost open region.
    pub(crate) fn alloc_capture(&mut self) -> CaptureId {
        let id = CaptureId::new(self.next_capture);
        self.next_capture += 1;
        if let Some(&region) = self.region_stack.last() {
            self.regions[region].captures.push(id);
        }
        id
    }

    // ── Statement lowering ──────────────────────────────────────────

    fn lower_stmt(&mut self, id: OpId) {
        ensure_sufficient_stack(|| self.lower_stmt_inner(id));
    }

    fn lower_stmt_inner(&mut self, id: OpId) {
        let op = *self.arena.op(id);
        match op.kind {
            OperationKind::Block { statements, locals } => {
                let statements = self.arena.op_list(statements).to_vec();
                let locals = self.arena.local_list(locals).to_vec();
                let scoped = !locals.is_empty();
                if scoped {
                    self.enter_region(locals);
                }
                for stmt in statements {
                    self.lower_stmt(stmt);
                }
                if scoped {
                    self.exit_region();
                }
            }

            OperationKind::VariableDeclaration { local, initializer } => match initializer {
                Some(init) if self.needs_flow(init) => {
                    let initializer = Some(self.lower_value(init));
                    let rebuilt = self.arena.alloc(Operation {
                        kind: OperationKind::VariableDeclaration { local, initializer },
                        ..op
                    });
                    self.push_stmt(rebuilt);
                }
                Some(_) => self.push_stmt(id),
                // A bare declaration only affects the region's locals.
                None => {}
            },

            OperationKind::ExpressionStatement { expression } => {
                if self.needs_flow(expression) {
                    let expression = self.lower_value(expression);
                    let rebuilt = self.arena.alloc(Operation {
                        kind: OperationKind::ExpressionStatement { expression },
                        ..op
                    });
                    self.push_stmt(rebuilt);
                } else {
                    self.push_stmt(id);
                }
            }

            // The statement form of `if`. The expression form only
            // occurs under value lowering.
            OperationKind::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                let join = self.new_label();
                match when_false {
                    None => {
                        self.lower_branch(condition, false, join);
                        self.lower_stmt(when_true);
                        self.start_block(join);
                    }
                    Some(when_false) => {
                        let else_arm = self.new_label();
                        self.lower_branch(condition, false, else_arm);
                        self.lower_stmt(when_true);
                        self.goto(join);
                        self.start_block(else_arm);
                        self.lower_stmt(when_false);
                        self.start_block(join);
                    }
                }
            }

            OperationKind::WhileLoop { condition, body } => {
                let head = self.new_label();
                let after = self.new_label();
                self.start_block(head);
                self.lower_branch(condition, false, after);
                self.loops.push(LoopLabels {
                    break_to: after,
                    continue_to: head,
                });
                self.lower_stmt(body);
                self.loops.pop();
                self.goto(head);
                self.start_block(after);
            }

            OperationKind::Branch { jump } => {
                // The binder rejects jumps outside loops; a missing
                // loop here means the statement was poisoned.
                if let Some(labels) = self.loops.last().copied() {
                    let target = match jump {
                        JumpKind::Break => labels.break_to,
                        JumpKind::Continue => labels.continue_to,
                    };
                    self.goto(target);
                }
            }

            OperationKind::Return { value } => {
                let value = value.map(|v| self.lower_value(v));
                self.emit_return(value);
            }

            // Poisoned statements stay as block statements so that
            // unreachable-code grouping still sees them.
            _ => self.push_stmt(id),
        }
    }

    // ── Finishing: pack, regions, predecessors ──────────────────────

    #[expect(clippy::cast_possible_truncation, reason = "block and region counts fit in u32")]
    fn finish(self) -> ControlFlowGraph {
        let GraphBuilder {
            blocks,
            labels,
            regions,
            target_captures,
            ..
        } = self;
        let exit_index = blocks.len() - 1;
        let resolve = |label: Label| labels[label.index()].unwrap_or(exit_index);

        let mut resolved: Vec<Resolved> = blocks
            .into_iter()
            .map(|block| Resolved {
                kind: block.kind,
                statements: block.statements,
                conditional: block
                    .conditional
                    .map(|(jump_if, op, target)| (jump_if, op, resolve(target))),
                fall_through: block
                    .fall_through
                    .map(|(kind, value, target)| (kind, value, resolve(target))),
                region: block.region,
            })
            .collect();

        // Pack: drop blocks that only pass control along, rewiring
        // every edge that pointed at them.
        let mut removable: Vec<bool> = resolved
            .iter()
            .enumerate()
            .map(|(index, block)| {
                block.kind == BlockKind::Block
                    && block.statements.is_empty()
                    && block.conditional.is_none()
                    && matches!(
                        block.fall_through,
                        Some((BranchKind::Regular, None, target)) if target != index
                    )
            })
            .collect();

        for index in 0..resolved.len() {
            if removable[index] {
                continue;
            }
            if let Some((_, _, target)) = resolved[index].conditional {
                let target = chase(&resolved, &mut removable, target);
                if let Some((_, _, slot)) = &mut resolved[index].conditional {
                    *slot = target;
                }
            }
            if let Some((_, _, target)) = resolved[index].fall_through {
                let target = chase(&resolved, &mut removable, target);
                if let Some((_, _, slot)) = &mut resolved[index].fall_through {
                    *slot = target;
                }
            }
        }

        let mut index_map = vec![usize::MAX; resolved.len()];
        let mut kept: Vec<Resolved> = Vec::with_capacity(resolved.len());
        for (index, block) in resolved.into_iter().enumerate() {
            if removable[index] {
                continue;
            }
            index_map[index] = kept.len();
            kept.push(block);
        }
        for block in &mut kept {
            if let Some((_, _, target)) = &mut block.conditional {
                *target = index_map[*target];
            }
            if let Some((_, _, target)) = &mut block.fall_through {
                *target = index_map[*target];
            }
        }

        // Dissolve regions that own nothing or lost all their blocks.
        // Children sit behind their parents, so a reverse walk handles
        // nesting bottom-up.
        let mut parent: Vec<Option<usize>> = regions.iter().map(|r| r.parent).collect();
        let mut dead = vec![false; regions.len()];
        let mut has_blocks = vec![false; regions.len()];
        for index in (0..regions.len()).rev() {
            let direct = kept.iter().any(|b| b.region == Some(index));
            let nested = (index + 1..regions.len())
                .any(|c| !dead[c] && parent[c] == Some(index) && has_blocks[c]);
            has_blocks[index] = direct || nested;

            let empty = regions[index].locals.is_empty() && regions[index].captures.is_empty();
            if empty || !has_blocks[index] {
                dead[index] = true;
                for block in &mut kept {
                    if block.region == Some(index) {
                        block.region = parent[index];
                    }
                }
                for c in 0..regions.len() {
                    if c != index && parent[c] == Some(index) {
                        parent[c] = parent[index];
                    }
                }
            }
        }

        // Survivors keep creation order, which is preorder.
        let mut region_ids: Vec<Option<RegionId>> = vec![None; regions.len()];
        let mut final_regions: Vec<Region> = Vec::new();
        for (index, pending) in regions.iter().enumerate() {
            if dead[index] {
                continue;
            }
            let id = RegionId::new(final_regions.len() as u32);
            region_ids[index] = Some(id);
            final_regions.push(Region {
                parent: parent[index].and_then(|p| region_ids[p]),
                children: Vec::new(),
                locals: pending.locals.clone(),
                captures: pending.captures.clone(),
                number: final_regions.len() as u32 + 1,
                first_block: BlockId::new(0),
                last_block: BlockId::new(0),
            });
        }
        for index in 0..final_regions.len() {
            if let Some(p) = final_regions[index].parent {
                final_regions[p.index()]
                    .children
                    .push(RegionId::new(index as u32));
            }
        }

        let mut final_blocks: Vec<BasicBlock> = kept
            .into_iter()
            .map(|block| BasicBlock {
                kind: block.kind,
                statements: block.statements,
                conditional: block.conditional.map(|(jump_if, condition, target)| {
                    ConditionalBranch {
                        jump_if,
                        condition,
                        target: BlockId::new(target as u32),
                    }
                }),
                fall_through: block.fall_through.map(|(kind, value, target)| FallThrough {
                    kind,
                    value,
                    target: BlockId::new(target as u32),
                }),
                region: block.region.and_then(|r| region_ids[r]),
                predecessors: Vec::new(),
            })
            .collect();

        // Region block ranges: direct members first, then children
        // folded into parents.
        let mut ranges: Vec<Option<(u32, u32)>> = vec![None; final_regions.len()];
        for (index, block) in final_blocks.iter().enumerate() {
            if let Some(region) = block.region {
                let entry = ranges[region.index()].get_or_insert((index as u32, index as u32));
                entry.0 = entry.0.min(index as u32);
                entry.1 = entry.1.max(index as u32);
            }
        }
        for index in (0..final_regions.len()).rev() {
            if let (Some(p), Some((lo, hi))) = (final_regions[index].parent, ranges[index]) {
                let entry = ranges[p.index()].get_or_insert((lo, hi));
                entry.0 = entry.0.min(lo);
                entry.1 = entry.1.max(hi);
            }
        }
        for (index, range) in ranges.iter().enumerate() {
            if let Some((lo, hi)) = *range {
                final_regions[index].first_block = BlockId::new(lo);
                final_regions[index].last_block = BlockId::new(hi);
            }
        }

        // Predecessors, merged when both edges of a source target the
        // same block.
        let mut edges: Vec<(usize, Predecessor)> = Vec::new();
        for (index, block) in final_blocks.iter().enumerate() {
            let source = BlockId::new(index as u32);
            let cond = block.conditional.map(|c| c.target);
            let fall = block.fall_through.map(|f| f.target);
            match (cond, fall) {
                (Some(a), Some(b)) if a == b => edges.push((
                    a.index(),
                    Predecessor {
                        block: source,
                        both_edges: true,
                    },
                )),
                _ => {
                    for target in [cond, fall].into_iter().flatten() {
                        edges.push((
                            target.index(),
                            Predecessor {
                                block: source,
                                both_edges: false,
                            },
                        ));
                    }
                }
            }
        }
        for (target, pred) in edges {
            final_blocks[target].predecessors.push(pred);
        }
        for block in &mut final_blocks {
            block.predecessors.sort_by_key(|p| p.block);
        }

        ControlFlowGraph {
            blocks: final_blocks,
            regions: final_regions,
            target_captures,
        }
    }
}

/// A block with label targets resolved to indices, pre-pack.
struct Resolved {
    kind: BlockKind,
    statements: Vec<OpId>,
    conditional: Option<(bool, OpId, usize)>,
    fall_through: Option<(BranchKind, Option<OpId>, usize)>,
    region: Option<usize>,
}

/// Follow a chain of removable blocks to its surviving end. Cycles of
/// empty blocks cannot come out of lowering (every loop head carries a
/// conditional); the step bound keeps one member alive if a chain ever
/// fails to terminate.
fn chase(resolved: &[Resolved], removable: &mut [bool], start: usize) -> usize {
    let mut target = start;
    let mut steps = 0;
    while removable[target] {
        steps += 1;
        if steps > resolved.len() {
            removable[target] = false;
            break;
        }
        target = match resolved[target].fall_through {
            Some((_, _, next)) => next,
            None => break,
        };
    }
    target
}
