//! Flow graph rendering.
//!
//! Produces the textual graph format the golden tests compare against:
//! blocks in layout order, region nesting as brace-wrapped `.locals`
//! sections, and every edge with its condition or value operation
//! rendered through [`OperationRenderer`].

use std::fmt::Write;

use rill_ir::StringInterner;
use rill_sema::{BoundFunction, OperationArena, OperationRenderer, SymbolTable};
use rill_types::TypeInterner;
use smallvec::SmallVec;

use crate::ir::{BasicBlock, BlockId, BlockKind, ControlFlowGraph, Region, RegionId};

/// Renders one function's control-flow graph.
pub struct FlowGraphRenderer<'a> {
    graph: &'a ControlFlowGraph,
    function: &'a BoundFunction,
    types: &'a TypeInterner,
    interner: &'a StringInterner,
    ops: OperationRenderer<'a>,
}

impl<'a> FlowGraphRenderer<'a> {
    pub fn new(
        graph: &'a ControlFlowGraph,
        arena: &'a OperationArena,
        types: &'a TypeInterner,
        symbols: &'a SymbolTable,
        function: &'a BoundFunction,
        interner: &'a StringInterner,
        source: &'a str,
    ) -> Self {
        FlowGraphRenderer {
            graph,
            function,
            types,
            interner,
            ops: OperationRenderer::new(arena, types, symbols, function, interner, source),
        }
    }

    /// Render the whole graph.
    #[expect(clippy::cast_possible_truncation, reason = "block counts fit in u32")]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<RegionId> = Vec::new();
        let mut needs_gap = false;

        for (index, block) in self.graph.blocks.iter().enumerate() {
            let id = BlockId::new(index as u32);

            // Open regions starting at this block, outermost first
            // (the region list is in preorder).
            for (r, region) in self.graph.regions.iter().enumerate() {
                if region.first_block == id {
                    if needs_gap {
                        out.push('\n');
                    }
                    self.open_region(region, stack.len() * 4, &mut out);
                    stack.push(RegionId::new(r as u32));
                    needs_gap = false;
                }
            }

            if needs_gap {
                out.push('\n');
            }
            self.render_block(id, block, stack.len() * 4, &mut out);
            needs_gap = true;

            // Close regions ending here, innermost first.
            while let Some(&top) = stack.last() {
                if self.graph.region(top).last_block != id {
                    break;
                }
                stack.pop();
                pad(&mut out, stack.len() * 4);
                out.push_str("}\n");
            }
        }
        out
    }

    fn open_region(&self, region: &Region, indent: usize, out: &mut String) {
        pad(out, indent);
        let _ = writeln!(out, ".locals {{R{}}}", region.number);
        pad(out, indent);
        out.push_str("{\n");
        if !region.captures.is_empty() {
            pad(out, indent + 4);
            out.push_str("CaptureIds:");
            for capture in &region.captures {
                let _ = write!(out, " [{capture}]");
            }
            out.push('\n');
        }
        if !region.locals.is_empty() {
            pad(out, indent + 4);
            out.push_str("Locals:");
            for &local in &region.locals {
                let info = &self.function.locals[local.index()];
                let _ = write!(
                    out,
                    " [{} {}]",
                    self.types.format_type(info.ty),
                    self.interner.lookup(info.name)
                );
            }
            out.push('\n');
        }
    }

    fn render_block(&self, id: BlockId, block: &BasicBlock, indent: usize, out: &mut String) {
        pad(out, indent);
        let _ = writeln!(out, "Block[{id}] - {}", block.kind.as_str());

        if block.kind != BlockKind::Entry {
            pad(out, indent + 4);
            if block.predecessors.is_empty() {
                out.push_str("Predecessors (0)\n");
            } else {
                out.push_str("Predecessors:");
                for pred in &block.predecessors {
                    if pred.both_edges {
                        let _ = write!(out, " [{}*2]", pred.block);
                    } else {
                        let _ = write!(out, " [{}]", pred.block);
                    }
                }
                out.push('\n');
            }
        }

        pad(out, indent + 4);
        let _ = writeln!(out, "Statements ({})", block.statements.len());

        let has_jump = block.conditional.is_some();
        let has_next = block.fall_through.is_some();
        for (position, &stmt) in block.statements.iter().enumerate() {
            self.ops.render_op(stmt, indent + 8, out);
            if position + 1 < block.statements.len() || has_jump || has_next {
                out.push('\n');
            }
        }

        if let Some(branch) = &block.conditional {
            pad(out, indent + 4);
            let direction = if branch.jump_if { "True" } else { "False" };
            let _ = writeln!(out, "Jump if {direction} (Regular) to Block[{}]", branch.target);
            self.ops.render_op(branch.condition, indent + 8, out);
            self.edge_annotations(block.region, branch.target, indent + 8, out);
            if has_next {
                out.push('\n');
            }
        }

        if let Some(fall) = &block.fall_through {
            pad(out, indent + 4);
            let _ = writeln!(out, "Next ({}) Block[{}]", fall.kind.as_str(), fall.target);
            if let Some(value) = fall.value {
                self.ops.render_op(value, indent + 8, out);
            }
            self.edge_annotations(block.region, fall.target, indent + 8, out);
        }
    }

    /// `Leaving:`/`Entering:` lines for an edge crossing region
    /// boundaries. Leaving lists innermost first, entering outermost
    /// first.
    fn edge_annotations(
        &self,
        from: Option<RegionId>,
        target: BlockId,
        indent: usize,
        out: &mut String,
    ) {
        let to = self.graph.block(target).region;
        let from_path = self.graph.region_path(from);
        let to_path = self.graph.region_path(to);

        let leaving: SmallVec<[RegionId; 4]> = from_path
            .iter()
            .copied()
            .filter(|r| !to_path.contains(r))
            .collect();
        let entering: SmallVec<[RegionId; 4]> = to_path
            .iter()
            .copied()
            .filter(|r| !from_path.contains(r))
            .rev()
            .collect();

        if !leaving.is_empty() {
            pad(out, indent);
            out.push_str("Leaving:");
            for region in leaving {
                let _ = write!(out, " {{R{}}}", self.graph.region(region).number);
            }
            out.push('\n');
        }
        if !entering.is_empty() {
            pad(out, indent);
            out.push_str("Entering:");
            for region in entering {
                let _ = write!(out, " {{R{}}}", self.graph.region(region).number);
            }
            out.push('\n');
        }
    }
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}
