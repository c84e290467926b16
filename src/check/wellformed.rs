use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;

use crate::cfg::block::Block;
use crate::cfg::{BlockIndex, Cfg};

/// Which of I1-I5 failed, surfaced by [`super::ConsistencyChecker::check_wellformed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WellformednessIssue {
    /// I1: the graph must have exactly one successor-less block.
    WrongTerminalCount(usize),
    /// I2/I5: the outer graph (or a loop body, treated the same way) has a
    /// cycle that isn't contained inside a `LoopBlock`.
    CyclicOuterGraph,
    /// I3: a conditional block's `cond` is not `Bool`-typed.
    NonBooleanCondition(BlockIndex),
    /// I3: a conditional block's two branches are the same block.
    DuplicateConditionalSuccessors(BlockIndex),
    /// I4: a block is not reachable from the entry.
    UnreachableBlock(BlockIndex),
}

/// Checks I1-I5 on `cfg`, recursing into every `LoopBlock`'s body (I5: "a
/// well-formed CFG with exactly one terminal" is exactly what this function
/// already checks, so the recursive call is the whole of I5).
pub(crate) fn check(cfg: &Cfg) -> Result<(), WellformednessIssue> {
    for idx in cfg.indices() {
        match cfg.block(idx) {
            Block::Conditional(_, cond, then_branch, else_branch) => {
                if !cond.is_bool_typed() {
                    return Err(WellformednessIssue::NonBooleanCondition(idx));
                }
                if then_branch == else_branch {
                    return Err(WellformednessIssue::DuplicateConditionalSuccessors(idx));
                }
            }
            Block::Loop(body, cond, _invs, _succ) => {
                if !cond.is_bool_typed() {
                    return Err(WellformednessIssue::NonBooleanCondition(idx));
                }
                check(body)?;
            }
            Block::Terminal(_) | Block::Normal(_, _) => {}
        }
    }

    // Checked before the terminal count: an unstructured cycle (I2) is the
    // more fundamental defect, and an outer graph with a back-edge outside
    // any `LoopBlock` will often also happen to have zero terminal blocks
    // (every block in the cycle always has somewhere to go) — report the
    // cycle, not the symptom.
    check_acyclic(cfg)?;

    let terminal_count = cfg
        .indices()
        .filter(|&idx| matches!(cfg.block(idx), Block::Terminal(_)))
        .count();
    if terminal_count != 1 {
        return Err(WellformednessIssue::WrongTerminalCount(terminal_count));
    }

    check_reachable(cfg)?;
    Ok(())
}

/// I4: every block is reachable from the entry, via the outer-graph
/// successor relation (a `LoopBlock`'s internal structure is irrelevant here
/// — it's addressed by the recursive `check` call on its own body).
fn check_reachable(cfg: &Cfg) -> Result<(), WellformednessIssue> {
    let mut visited = vec![false; cfg.len()];
    let mut stack = vec![cfg.entry()];
    while let Some(idx) = stack.pop() {
        if std::mem::replace(&mut visited[idx.index()], true) {
            continue;
        }
        stack.extend(cfg.successors(idx));
    }
    for idx in cfg.indices() {
        if !visited[idx.index()] {
            return Err(WellformednessIssue::UnreachableBlock(idx));
        }
    }
    Ok(())
}

/// I2: the outer graph is acyclic — back-edges must be hidden inside a
/// `LoopBlock`'s body, which `cfg.successors` never descends into.
fn check_acyclic(cfg: &Cfg) -> Result<(), WellformednessIssue> {
    let mut graph = DiGraph::<(), ()>::with_capacity(cfg.len(), cfg.len());
    for _ in cfg.indices() {
        graph.add_node(());
    }
    for idx in cfg.indices() {
        for succ in cfg.successors(idx) {
            graph.add_edge(
                petgraph::graph::NodeIndex::new(idx.index()),
                petgraph::graph::NodeIndex::new(succ.index()),
                (),
            );
        }
    }
    if is_cyclic_directed(&graph) {
        Err(WellformednessIssue::CyclicOuterGraph)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Typ;
    use crate::cfg::generator::to_cfg;

    #[test]
    fn unstructured_cycle_is_rejected_as_cyclic() {
        let stmt = seqn(vec![label("L"), local_var_assign("x", int_lit(1)), goto("L")]);
        let cfg = to_cfg(&stmt).unwrap();
        assert_eq!(check(&cfg), Err(WellformednessIssue::CyclicOuterGraph));
    }

    #[test]
    fn well_formed_if_passes() {
        let cfg = to_cfg(&if_stmt(
            gt_cmp(local_var("x", Typ::Int), int_lit(0)),
            local_var_assign("x", int_lit(1)),
            local_var_assign("x", int_lit(2)),
        ))
        .unwrap();
        assert_eq!(check(&cfg), Ok(()));
    }
}
