//! The CFG node model (spec.md §3 "CFG Blocks").
//!
//! Blocks form a graph that is allowed to contain cycles (inside a
//! [`BlockData::Loop`]'s `body`, and nowhere else — invariant I2). Rust has no
//! safe way to build a cyclic structure of owned values directly, so, per the
//! design notes in spec.md §9 ("implement with an arena of blocks plus
//! indices"), a [`Cfg`] is an arena: a flat `Vec<BlockData>` addressed by
//! [`BlockIndex`]. A forward reference is simply an index that happens to be
//! filled in later in the `Vec` — no placeholder cells, no `Rc<RefCell<_>>`,
//! and no two-pass back-patching are needed, because index stability doesn't
//! depend on construction order. [`crate::cfg::materialize`] still performs
//! its allocate/wire passes in the shape spec.md §4.3 describes; arena
//! indexing just means the "wire" pass has nothing left to do for blocks
//! within the same arena (see that module's docs for the one exception:
//! wiring a [`BlockData::Loop`]'s nested sub-[`Cfg`]).

use std::fmt;

use crate::ast::{Exp, Stmt};
use crate::pretty::{doc, empty, intersperse, newline, nest, Doc, PrettyWith};

/// An index into a [`Cfg`]'s block arena. Only meaningful relative to the
/// `Cfg` that produced it — indices from a `Loop`'s nested body are a
/// separate address space from the arena that contains the `Loop` block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockIndex(pub(crate) usize);

impl BlockIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum BlockData {
    Terminal {
        body: Stmt,
    },
    Normal {
        body: Stmt,
        succ: BlockIndex,
    },
    Conditional {
        body: Stmt,
        cond: Exp,
        then_branch: BlockIndex,
        else_branch: BlockIndex,
    },
    Loop {
        cond: Exp,
        invs: Vec<Exp>,
        body: Cfg,
        succ: BlockIndex,
    },
}

/// An immutable, well-shaped control flow graph (spec.md §3 "CFG Blocks").
///
/// Produced only by [`crate::cfg::generator::Generator::to_cfg`]; once built,
/// a `Cfg`'s blocks are never mutated (§3 "Lifecycles").
#[derive(Clone, Debug)]
pub struct Cfg {
    pub(crate) blocks: Vec<BlockData>,
    pub(crate) entry: BlockIndex,
}

impl Cfg {
    pub fn entry(&self) -> BlockIndex {
        self.entry
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = BlockIndex> + '_ {
        (0..self.blocks.len()).map(BlockIndex)
    }

    /// A read-only, borrowing view of the block at `idx` (spec.md §3's four
    /// sealed `Block` variants, and §6's external-visualizer interface: "edge
    /// semantics ... are read-only attributes of the block variant").
    pub fn block(&self, idx: BlockIndex) -> Block<'_> {
        match &self.blocks[idx.0] {
            BlockData::Terminal { body } => Block::Terminal(body),
            BlockData::Normal { body, succ } => Block::Normal(body, *succ),
            BlockData::Conditional {
                body,
                cond,
                then_branch,
                else_branch,
            } => Block::Conditional(body, cond, *then_branch, *else_branch),
            BlockData::Loop {
                cond,
                invs,
                body,
                succ,
            } => Block::Loop(body, cond, invs, *succ),
        }
    }

    /// The outgoing successors of `idx`, in the fixed order the visualizer
    /// contract of spec.md §6 relies on: `[then, else]` for a conditional
    /// block, `[post-loop]` for a loop block (the loop's own internal body is
    /// a separate graph, not an edge of the outer one — invariant I2).
    pub fn successors(&self, idx: BlockIndex) -> Vec<BlockIndex> {
        match self.block(idx) {
            Block::Terminal(_) => vec![],
            Block::Normal(_, succ) => vec![succ],
            Block::Conditional(_, _, then_branch, else_branch) => vec![then_branch, else_branch],
            Block::Loop(_, _, _, succ) => vec![succ],
        }
    }
}

/// A borrowed, read-only view of one block (spec.md §3).
pub enum Block<'a> {
    Terminal(&'a Stmt),
    Normal(&'a Stmt, BlockIndex),
    Conditional(&'a Stmt, &'a Exp, BlockIndex, BlockIndex),
    Loop(&'a Cfg, &'a Exp, &'a [Exp], BlockIndex),
}

impl<'a> Block<'a> {
    pub fn body(&self) -> Option<&'a Stmt> {
        match self {
            Block::Terminal(s) | Block::Normal(s, _) | Block::Conditional(s, _, _, _) => Some(s),
            Block::Loop(..) => None,
        }
    }
}

impl PrettyWith<()> for Cfg {
    fn pretty_with(&self, _ctx: &()) -> Doc {
        let header = doc(format!("entry at {}", self.entry)) + newline() + newline();
        let block_docs = self.indices().map(|idx| {
            let header = doc(format!("{}:", idx));
            let content = match self.block(idx) {
                Block::Terminal(s) => doc(format!("{:?}", s)),
                Block::Normal(s, succ) => {
                    doc(format!("{:?}", s)) + newline() + doc(format!("goto {}", succ))
                }
                Block::Conditional(s, cond, then_branch, else_branch) => {
                    doc(format!("{:?}", s))
                        + newline()
                        + nest(
                            4,
                            doc(format!("if ({:?})", cond))
                                + newline()
                                + doc(format!("then => goto {}", then_branch))
                                + newline()
                                + doc(format!("else => goto {}", else_branch)),
                        )
                }
                Block::Loop(body, cond, invs, succ) => {
                    let invs_doc = if invs.is_empty() {
                        empty()
                    } else {
                        newline() + doc(format!("invariants: {:?}", invs))
                    };
                    doc(format!("while ({:?})", cond))
                        + invs_doc
                        + newline()
                        + nest(4, doc(body.pretty_with(&())))
                        + newline()
                        + doc(format!("goto {}", succ))
                }
            };
            header + newline() + nest(4, content)
        });
        header + intersperse(block_docs, newline() + newline())
    }
}

impl fmt::Display for Cfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty_with(&()).render_string(100))
    }
}
