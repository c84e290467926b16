//! The public entry point: §6's `toCFG(stmt) -> Block`.

use crate::ast::Stmt;
use crate::error::CfgError;

use super::block::Cfg;
use super::build::build_range;
use super::label::LabelGenerator;
use super::linearize::linearize;
use super::materialize::materialize;

/// Owns the per-run state the lowering pipeline needs — currently just the
/// synthetic-label counter. spec.md §5/§9 call out the reference
/// implementation's process-wide label counter as a latent hazard for
/// concurrent use; scoping it to a `Generator` instance means two generators
/// (e.g. one per thread) never collide, and a `Generator` can lower as many
/// `Stmt`s as you like, each using fresh synthetic names layered on the last.
#[derive(Debug, Default)]
pub struct Generator {
    labelgen: LabelGenerator,
}

impl Generator {
    pub fn new() -> Generator {
        Generator {
            labelgen: LabelGenerator::new(),
        }
    }

    /// Lowers a structured [`Stmt`] into a well-formed [`Cfg`] (spec.md §4.1-§4.3).
    ///
    /// Returns a structural [`CfgError`] if construction hits a shape the
    /// pipeline cannot make sense of (an unresolved label, a block with the
    /// wrong number or kind of edges) — this is a bug in the generator or an
    /// out-of-range jump, not an ill-formed *input program*; a program that
    /// lowers successfully but describes nonsensical control flow (e.g. an
    /// unstructured cycle) still produces a `Cfg`, which [`crate::check`] can
    /// then reject.
    pub fn to_cfg(&mut self, stmt: &Stmt) -> Result<Cfg, CfgError> {
        log::trace!("linearizing statement into extended-statement list");
        let linearized = linearize(stmt, &mut self.labelgen);
        log::trace!(
            "linearized into {} nodes ({} leaders)",
            linearized.nodes.len(),
            linearized.leaders.len()
        );

        log::trace!("building temporary block graph");
        let tmp = build_range(
            &linearized.nodes,
            0,
            linearized.nodes.len(),
            &linearized.lblmap,
            &linearized.leaders,
        )?;
        log::trace!("built {} temporary blocks", tmp.blocks.len());

        log::trace!("materializing final CFG");
        let cfg = materialize(tmp)?;
        log::debug!("generated CFG with {} blocks", cfg.len());
        Ok(cfg)
    }
}

/// Convenience wrapper equivalent to `Generator::new().to_cfg(stmt)`, for
/// callers that only ever lower one `Stmt` and don't need to reuse a label
/// counter across calls.
pub fn to_cfg(stmt: &Stmt) -> Result<Cfg, CfgError> {
    Generator::new().to_cfg(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Typ;
    use crate::cfg::block::Block;
    use crate::check::ConsistencyChecker;

    fn x() -> crate::ast::Exp {
        local_var("x", Typ::Int)
    }

    /// S1: `If(x>0, x:=1, x:=2)`.
    #[test]
    fn if_produces_one_conditional_with_two_terminal_branches() {
        let stmt = if_stmt(
            gt_cmp(x(), int_lit(0)),
            local_var_assign("x", int_lit(1)),
            local_var_assign("x", int_lit(2)),
        );
        let cfg = to_cfg(&stmt).unwrap();

        let entry = cfg.entry();
        let (then_idx, else_idx) = match cfg.block(entry) {
            Block::Conditional(_, cond, t, e) => {
                assert!(cond.is_bool_typed());
                (t, e)
            }
            _ => panic!("expected a conditional entry block"),
        };
        assert_ne!(then_idx, else_idx, "I3: branches must be distinct blocks");
        assert!(matches!(cfg.block(then_idx), Block::Terminal(_)));
        assert!(matches!(cfg.block(else_idx), Block::Terminal(_)));

        let checker = ConsistencyChecker::default();
        assert!(checker.is_wellformed_cfg(&cfg));
    }

    /// S2: `While(i<10, [], i := i+1)`.
    #[test]
    fn while_produces_one_loop_block_with_acyclic_outer_graph() {
        let i = local_var("i", Typ::Int);
        let stmt = while_stmt(
            lt_cmp(i.clone(), int_lit(10)),
            vec![],
            local_var_assign("i", add(i, int_lit(1))),
        );
        let cfg = to_cfg(&stmt).unwrap();

        let entry = cfg.entry();
        match cfg.block(entry) {
            Block::Loop(body, _, _, _) => {
                assert_eq!(body.len() >= 1, true);
            }
            _ => panic!("expected a loop entry block"),
        }

        let checker = ConsistencyChecker::default();
        assert!(checker.is_wellformed_cfg(&cfg));
    }

    /// S3: `Seqn[Label("L"), x:=1, Goto("L")]` must produce a cycle that is
    /// *not* wrapped in a `LoopBlock`, so well-formedness must fail.
    #[test]
    fn goto_to_earlier_label_produces_an_unstructured_cycle() {
        let stmt = seqn(vec![label("L"), local_var_assign("x", int_lit(1)), goto("L")]);
        let cfg = to_cfg(&stmt).unwrap();

        let checker = ConsistencyChecker::default();
        assert!(!checker.is_wellformed_cfg(&cfg));
    }

    #[test]
    fn two_generators_never_collide_on_synthetic_labels() {
        let stmt = if_stmt(
            true_lit(),
            local_var_assign("x", int_lit(1)),
            local_var_assign("x", int_lit(2)),
        );
        let cfg1 = Generator::new().to_cfg(&stmt).unwrap();
        let cfg2 = Generator::new().to_cfg(&stmt).unwrap();
        assert_eq!(cfg1.len(), cfg2.len());
    }
}
