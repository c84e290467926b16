//! Phase 2: partition the linearized node list into temporary basic blocks
//! and wire their (possibly forward-referencing) edges (spec.md §4.2).
//!
//! Produces a [`TmpGraph`] addressed by plain `usize` indices into its own
//! `blocks` vector — the same arena discipline [`super::block::Cfg`] uses for
//! the final graph, which is why [`super::materialize`] can map temporary
//! indices onto final ones one-for-one instead of back-patching placeholders.

use std::collections::HashMap;

use crate::ast::{Exp, ExpKind, Stmt, StmtKind, Typ};
use crate::error::CfgError;

use super::label::Label;
use super::linearize::ExtendedStmt;

#[derive(Clone, Debug)]
pub(crate) enum EdgeKind {
    Unconditional,
    /// A conditional successor; for a two-edge block the second edge's
    /// condition must be the logical negation of the first's (O3).
    Cond(Exp),
}

#[derive(Clone, Debug)]
pub(crate) enum TmpBlock {
    /// A straight-line run of regular statements, with 0, 1 or 2 outgoing
    /// edges — resolved into a Terminal/Normal/Conditional block at
    /// materialization time, depending on how many edges it ends up with.
    Var {
        stmts: Vec<Stmt>,
        edges: Vec<(EdgeKind, usize)>,
    },
    /// A loop scaffold: `inner` is the temporary graph for the loop's body,
    /// built over its own lexically-scoped sub-range of nodes.
    Loop {
        cond: Exp,
        invs: Vec<Exp>,
        inner: TmpGraph,
        succ: usize,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct TmpGraph {
    pub(crate) blocks: Vec<TmpBlock>,
    pub(crate) entry: usize,
}

struct Builder<'a> {
    nodes: &'a [ExtendedStmt],
    lblmap: &'a HashMap<Label, usize>,
    blocks: Vec<TmpBlock>,
    /// Maps a *linearized node index* that is a leader to the temp block
    /// that starts there.
    node_to_block: HashMap<usize, usize>,
    /// Deferred edges: a Jump/CondJump target may be a node further along
    /// (or, for a `Goto` to an earlier label, behind) that hasn't been
    /// visited yet, so we resolve these once the whole range has been walked.
    missing_edges: Vec<(usize, EdgeKind, usize)>, // (source block, kind, target node index)
}

impl<'a> Builder<'a> {
    fn new_block(&mut self, block: TmpBlock) -> usize {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    fn new_var_block(&mut self) -> usize {
        self.new_block(TmpBlock::Var {
            stmts: vec![],
            edges: vec![],
        })
    }

    fn push_stmt(&mut self, block: usize, stmt: Stmt) {
        match &mut self.blocks[block] {
            TmpBlock::Var { stmts, .. } => stmts.push(stmt),
            TmpBlock::Loop { .. } => unreachable!("a loop marker never becomes the open cursor"),
        }
    }

    fn add_local_edge(&mut self, from: usize, kind: EdgeKind, to: usize) {
        match &mut self.blocks[from] {
            TmpBlock::Var { edges, .. } => edges.push((kind, to)),
            TmpBlock::Loop { .. } => unreachable!("a loop block's only edge is its succ"),
        }
    }
}

/// Build the temporary graph for `nodes[start..end)`. `leaders` is the
/// lexically global leader set from Phase 1; `lblmap` is likewise global, but
/// a label resolved outside of `[start, end)` is rejected — a loop body must
/// be a self-contained sub-CFG (invariant I5), so a jump crossing its
/// boundary is a structural error, not something this pass silently patches
/// around.
pub(crate) fn build_range(
    nodes: &[ExtendedStmt],
    start: usize,
    end: usize,
    lblmap: &HashMap<Label, usize>,
    leaders: &std::collections::BTreeSet<usize>,
) -> Result<TmpGraph, CfgError> {
    let mut b = Builder {
        nodes,
        lblmap,
        blocks: vec![],
        node_to_block: HashMap::new(),
        missing_edges: vec![],
    };

    if start >= end {
        // An empty range (e.g. a `while` with an empty body): a single,
        // trivially-terminal block.
        let only = b.new_var_block();
        b.node_to_block.insert(start, only);
        return Ok(TmpGraph {
            blocks: b.blocks,
            entry: only,
        });
    }

    let mut cur: Option<usize> = None;
    // Set by the `Loop` case to the node index its freshly-made post-loop
    // block already represents, so the ordinary leader handling below
    // doesn't allocate a second, redundant block for that same position.
    let mut cur_preassigned_for: Option<usize> = None;

    let mut i = start;
    while i < end {
        // The first node of any range is always a leader, even a nested
        // loop-body range whose start wasn't itself bound to a label.
        if i == start || leaders.contains(&i) {
            if cur_preassigned_for != Some(i) {
                let new_block = b.new_var_block();
                if let Some(prev) = cur {
                    b.add_local_edge(prev, EdgeKind::Unconditional, new_block);
                }
                cur = Some(new_block);
            }
            cur_preassigned_for = None;
            b.node_to_block.insert(i, cur.expect("just assigned"));
        }

        match &nodes[i] {
            ExtendedStmt::Regular(stmt) => {
                let block = cur.expect("regular statement outside any block");
                b.push_stmt(block, stmt.clone());
            }
            ExtendedStmt::Jump(target) => {
                let source = cur.expect("jump outside any block");
                let target_idx = resolve_in_range(lblmap, target, start, end)?;
                b.missing_edges
                    .push((source, EdgeKind::Unconditional, target_idx));
                cur = None;
            }
            ExtendedStmt::CondJump(then_lbl, else_lbl, cond) => {
                let source = cur.expect("conditional jump outside any block");
                let then_idx = resolve_in_range(lblmap, then_lbl, start, end)?;
                let else_idx = resolve_in_range(lblmap, else_lbl, start, end)?;
                let negated = Exp::new(ExpKind::Not(Box::new(cond.clone())), Typ::Bool);
                b.missing_edges
                    .push((source, EdgeKind::Cond(cond.clone()), then_idx));
                b.missing_edges
                    .push((source, EdgeKind::Cond(negated), else_idx));
                cur = None;
            }
            ExtendedStmt::Loop(after, cond, invs) => {
                let after_idx = lblmap
                    .get(after)
                    .copied()
                    .ok_or_else(|| CfgError::UnboundLoopAfterLabel(after.clone()))?;
                let inner = build_range(nodes, i + 1, after_idx, lblmap, leaders)?;
                let loop_block = b.new_block(TmpBlock::Loop {
                    cond: cond.clone(),
                    invs: invs.clone(),
                    inner,
                    succ: usize::MAX, // filled in immediately below
                });
                if let Some(prev) = cur {
                    b.add_local_edge(prev, EdgeKind::Unconditional, loop_block);
                }
                let post_loop = b.new_var_block();
                if let TmpBlock::Loop { succ, .. } = &mut b.blocks[loop_block] {
                    *succ = post_loop;
                }
                cur = Some(post_loop);
                cur_preassigned_for = Some(after_idx);
                i = after_idx.saturating_sub(1);
            }
            ExtendedStmt::Empty => {}
        }
        i += 1;
    }

    for (source, kind, target_node) in std::mem::take(&mut b.missing_edges) {
        let target_block = *b
            .node_to_block
            .get(&target_node)
            .ok_or(CfgError::UnresolvedLabel(Label(format!("@node_{}", target_node))))?;
        b.add_local_edge(source, kind, target_block);
    }

    let entry = *b
        .node_to_block
        .get(&start)
        .expect("the first node of a range is always a leader");

    Ok(TmpGraph {
        blocks: b.blocks,
        entry,
    })
}

fn resolve_in_range(
    lblmap: &HashMap<Label, usize>,
    label: &Label,
    start: usize,
    end: usize,
) -> Result<usize, CfgError> {
    let idx = lblmap
        .get(label)
        .copied()
        .ok_or_else(|| CfgError::UnresolvedLabel(label.clone()))?;
    if idx < start || idx >= end {
        return Err(CfgError::UnresolvedLabel(label.clone()));
    }
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::cfg::generator::to_cfg;

    /// A `Goto` inside a `While` body targeting a label bound outside the
    /// loop's lexical range is a structural error (invariant I5: a loop body
    /// is a self-contained sub-CFG), not something `build_range` silently
    /// resolves across the boundary.
    #[test]
    fn goto_crossing_loop_boundary_is_rejected() {
        let stmt = seqn(vec![
            while_stmt(
                lt_cmp(local_var("i", crate::ast::Typ::Int), int_lit(10)),
                vec![],
                goto("OUT"),
            ),
            label("OUT"),
            local_var_assign("x", int_lit(0)),
        ]);
        let err = to_cfg(&stmt).unwrap_err();
        assert!(matches!(err, CfgError::UnresolvedLabel(_)));
    }

    /// `ExtendedStmt::Loop` carries an `after` label that must already be
    /// bound in `lblmap` by the time `build_range` reaches it (normal
    /// `linearize` output always binds it). Feeding `build_range` a `Loop`
    /// node whose label never got bound exercises that defensive check
    /// directly.
    #[test]
    fn loop_marker_with_unbound_after_label_is_a_structural_error() {
        let nodes = vec![
            ExtendedStmt::Loop(Label::user("missing"), true_lit(), vec![]),
            ExtendedStmt::Empty,
        ];
        let lblmap = HashMap::new();
        let leaders: std::collections::BTreeSet<usize> = [0].into_iter().collect();
        let err = build_range(&nodes, 0, nodes.len(), &lblmap, &leaders).unwrap_err();
        assert!(matches!(err, CfgError::UnboundLoopAfterLabel(_)));
    }
}
