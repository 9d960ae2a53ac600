//! The control-flow graph.
//!
//! A [`ControlFlowGraph`] holds the lowered form of one function body:
//! basic blocks in final layout order, the region tree describing local
//! lifetimes, and the capture bookkeeping the flow analyses need.
//!
//! Block `B0` is always the [`BlockKind::Entry`] block and the last
//! block is always [`BlockKind::Exit`]. Every other block holds zero or
//! more statement operations, an optional conditional successor, and a
//! fall-through successor. `Return` fall-throughs carry the returned
//! value and always target the exit block.

use std::fmt;

use rill_sema::{CaptureId, LocalId, OpId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Index of a basic block in final layout order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// Create a new `BlockId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        BlockId(index)
    }

    /// Get the index into the block list.
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

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// Index into the graph's region list.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct RegionId(u32);

impl RegionId {
    /// Create a new `RegionId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        RegionId(index)
    }

    /// Get the index into the region list.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

// ── Blocks ──────────────────────────────────────────────────────────

/// What role a block plays in the graph.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BlockKind {
    Entry,
    Block,
    Exit,
}

impl BlockKind {
    /// Name used in rendered graphs.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Entry => "Entry",
            BlockKind::Block => "Block",
            BlockKind::Exit => "Exit",
        }
    }
}

/// How control reaches a fall-through successor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BranchKind {
    /// Ordinary sequential flow.
    Regular,
    /// A `return` edge. Always targets the exit block.
    Return,
}

impl BranchKind {
    /// Name used in rendered graphs.
    pub fn as_str(self) -> &'static str {
        match self {
            BranchKind::Regular => "Regular",
            BranchKind::Return => "Return",
        }
    }
}

/// A block's conditional successor: taken when `condition` evaluates to
/// `jump_if`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConditionalBranch {
    pub jump_if: bool,
    pub condition: OpId,
    pub target: BlockId,
}

/// A block's fall-through successor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FallThrough {
    pub kind: BranchKind,
    /// The returned value on `Return` edges, when the function returns
    /// one.
    pub value: Option<OpId>,
    pub target: BlockId,
}

/// One incoming edge source. `both_edges` is set when the predecessor's
/// conditional and fall-through successors both target this block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Predecessor {
    pub block: BlockId,
    pub both_edges: bool,
}

/// One basic block of the graph.
#[derive(Debug)]
pub struct BasicBlock {
    pub kind: BlockKind,

    /// Statement operations, in execution order. IDs point into the
    /// flow-extended operation arena.
    pub statements: Vec<OpId>,

    /// Conditional successor, evaluated after the statements.
    pub conditional: Option<ConditionalBranch>,

    /// Fall-through successor. Only the exit block has none.
    pub fall_through: Option<FallThrough>,

    /// The innermost region this block belongs to. Entry and exit
    /// blocks sit outside every region.
    pub region: Option<RegionId>,

    /// Incoming edges, sorted by predecessor block number.
    pub predecessors: Vec<Predecessor>,
}

impl BasicBlock {
    /// Successor block IDs, conditional edge first.
    pub fn successors(&self) -> SmallVec<[BlockId; 2]> {
        let mut out = SmallVec::new();
        if let Some(branch) = &self.conditional {
            out.push(branch.target);
        }
        if let Some(fall) = &self.fall_through {
            out.push(fall.target);
        }
        out
    }
}

// ── Regions ─────────────────────────────────────────────────────────

/// A local-lifetime region: a contiguous run of blocks owning the
/// locals of one lexical scope and the captures allocated while the
/// scope was current.
#[derive(Debug)]
pub struct Region {
    pub parent: Option<RegionId>,
    pub children: Vec<RegionId>,

    /// Locals scoped to this region, in declaration order.
    pub locals: Vec<LocalId>,

    /// Captures allocated while this region was innermost.
    pub captures: Vec<CaptureId>,

    /// Display number: regions render as `R1, R2, …` in preorder.
    pub number: u32,

    /// First and last member block, descendants included.
    pub first_block: BlockId,
    pub last_block: BlockId,
}

// ── The graph ───────────────────────────────────────────────────────

/// The control-flow graph of one function body.
#[derive(Debug)]
pub struct ControlFlowGraph {
    /// Blocks in layout order: entry first, exit last.
    pub blocks: Vec<BasicBlock>,

    /// Surviving regions in preorder. Possibly empty.
    pub regions: Vec<Region>,

    /// Captures that hold an assignment target rather than a value: an
    /// assignment whose target reads such a capture writes the mapped
    /// local, and the capturing statement is not a read of it.
    pub target_captures: FxHashMap<CaptureId, LocalId>,
}

impl ControlFlowGraph {
    /// Get a block by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    /// Get the number of blocks.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// ID of the exit block (always the last block).
    #[expect(clippy::cast_possible_truncation, reason = "block counts fit in u32")]
    pub fn exit_id(&self) -> BlockId {
        BlockId::new(self.blocks.len() as u32 - 1)
    }

    /// Get a region by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    /// Per-block reachability from the entry block, following both
    /// edges. Structural: constant conditions do not prune.
    pub fn reachable(&self) -> Vec<bool> {
        let mut seen = vec![false; self.blocks.len()];
        let mut work = vec![BlockId::new(0)];
        while let Some(id) = work.pop() {
            if std::mem::replace(&mut seen[id.index()], true) {
                continue;
            }
            for succ in self.block(id).successors() {
                if !seen[succ.index()] {
                    work.push(succ);
                }
            }
        }
        seen
    }

    /// Regions on the path from `region` to the root, innermost first.
    pub(crate) fn region_path(&self, region: Option<RegionId>) -> SmallVec<[RegionId; 4]> {
        let mut path = SmallVec::new();
        let mut cursor = region;
        while let Some(id) = cursor {
            path.push(id);
            cursor = self.region(id).parent;
        }
        path
    }
}
