//! Control-flow graphs for bound functions.
//!
//! [`build_graph`] lowers a bound function body into basic blocks:
//! statements in source order, short-circuit operators decomposed into
//! conditional branches, and value-position control flow split out
//! through flow captures. [`analyze_graph`] runs the flow checks over
//! the finished graph, and [`FlowGraphRenderer`] prints the graph in
//! the textual format the golden tests compare against.

mod analyze;
mod build;
mod ir;
mod render;

pub use analyze::analyze_graph;
pub use build::build_graph;
pub use ir::{
    BasicBlock, BlockId, BlockKind, BranchKind, ConditionalBranch, ControlFlowGraph, FallThrough,
    Predecessor, Region, RegionId,
};
pub use render::FlowGraphRenderer;
