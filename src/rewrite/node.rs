//! The `Node` capability (spec.md §4.5): "an ordered sequence of child nodes,
//! and a way to reconstruct a node from a same-length ordered sequence of
//! replacement children." Everything else in this module is generic over
//! this trait and never looks at `Exp`/`Stmt` directly.

use crate::ast::{Exp, ExpKind, Stmt, StmtKind};

/// A tree shape the rewrite engine can traverse and rebuild.
///
/// `PartialEq` is required so the engine can detect whether a rule actually
/// changed a node (used by `Innermost`, `.repeat` and `<`'s "if the result
/// differs from the input" test) without every caller threading a separate
/// dirty flag through its rules.
pub trait Node: Clone + PartialEq {
    fn children(&self) -> Vec<Self>;
    fn with_children(&self, children: Vec<Self>) -> Self;
}

/// Builds the two-argument `Box<Exp>` variants found throughout `ExpKind`,
/// pulling both operands off the same drain iterator in order. Kept local to
/// this file: it only exists to de-duplicate `Node::with_children`'s match
/// arms, not as a reusable abstraction.
macro_rules! binexp {
    ($it:expr) => {
        (Box::new($it.next().unwrap()), Box::new($it.next().unwrap()))
    };
}

impl Node for Exp {
    fn children(&self) -> Vec<Exp> {
        match &self.kind {
            ExpKind::TrueLit | ExpKind::FalseLit | ExpKind::IntLit(_) | ExpKind::LocalVar(_) => {
                vec![]
            }
            ExpKind::Not(e) => vec![(**e).clone()],
            ExpKind::And(l, r)
            | ExpKind::Or(l, r)
            | ExpKind::Implies(l, r)
            | ExpKind::Add(l, r)
            | ExpKind::Sub(l, r)
            | ExpKind::Mul(l, r)
            | ExpKind::Div(l, r)
            | ExpKind::EqCmp(l, r)
            | ExpKind::NeCmp(l, r)
            | ExpKind::LtCmp(l, r)
            | ExpKind::LeCmp(l, r)
            | ExpKind::GtCmp(l, r)
            | ExpKind::GeCmp(l, r) => vec![(**l).clone(), (**r).clone()],
            ExpKind::Forall(_, body) | ExpKind::Exists(_, body) => vec![(**body).clone()],
            ExpKind::FuncApp(_, args) => args.clone(),
            ExpKind::CondExp(c, t, e) => vec![(**c).clone(), (**t).clone(), (**e).clone()],
        }
    }

    fn with_children(&self, children: Vec<Exp>) -> Exp {
        let mut it = children.into_iter();
        let kind = match &self.kind {
            ExpKind::TrueLit => ExpKind::TrueLit,
            ExpKind::FalseLit => ExpKind::FalseLit,
            ExpKind::IntLit(n) => ExpKind::IntLit(n.clone()),
            ExpKind::LocalVar(name) => ExpKind::LocalVar(name.clone()),
            ExpKind::Not(_) => ExpKind::Not(Box::new(it.next().unwrap())),
            ExpKind::And(..) => {
                let (l, r) = binexp!(it);
                ExpKind::And(l, r)
            }
            ExpKind::Or(..) => {
                let (l, r) = binexp!(it);
                ExpKind::Or(l, r)
            }
            ExpKind::Implies(..) => {
                let (l, r) = binexp!(it);
                ExpKind::Implies(l, r)
            }
            ExpKind::Add(..) => {
                let (l, r) = binexp!(it);
                ExpKind::Add(l, r)
            }
            ExpKind::Sub(..) => {
                let (l, r) = binexp!(it);
                ExpKind::Sub(l, r)
            }
            ExpKind::Mul(..) => {
                let (l, r) = binexp!(it);
                ExpKind::Mul(l, r)
            }
            ExpKind::Div(..) => {
                let (l, r) = binexp!(it);
                ExpKind::Div(l, r)
            }
            ExpKind::EqCmp(..) => {
                let (l, r) = binexp!(it);
                ExpKind::EqCmp(l, r)
            }
            ExpKind::NeCmp(..) => {
                let (l, r) = binexp!(it);
                ExpKind::NeCmp(l, r)
            }
            ExpKind::LtCmp(..) => {
                let (l, r) = binexp!(it);
                ExpKind::LtCmp(l, r)
            }
            ExpKind::LeCmp(..) => {
                let (l, r) = binexp!(it);
                ExpKind::LeCmp(l, r)
            }
            ExpKind::GtCmp(..) => {
                let (l, r) = binexp!(it);
                ExpKind::GtCmp(l, r)
            }
            ExpKind::GeCmp(..) => {
                let (l, r) = binexp!(it);
                ExpKind::GeCmp(l, r)
            }
            ExpKind::Forall(vars, _) => {
                ExpKind::Forall(vars.clone(), Box::new(it.next().unwrap()))
            }
            ExpKind::Exists(vars, _) => {
                ExpKind::Exists(vars.clone(), Box::new(it.next().unwrap()))
            }
            ExpKind::FuncApp(name, _) => ExpKind::FuncApp(name.clone(), it.collect()),
            ExpKind::CondExp(..) => ExpKind::CondExp(
                Box::new(it.next().unwrap()),
                Box::new(it.next().unwrap()),
                Box::new(it.next().unwrap()),
            ),
        };
        Exp {
            kind,
            typ: self.typ.clone(),
            pos: self.pos.clone(),
            info: self.info.clone(),
        }
    }
}

/// `Stmt`'s children are its *sub-statements* only — an `If`'s `cond` or a
/// `LocalVarAssign`'s right-hand side are `Exp`s, a different `Node` tree
/// entirely, so rewriting through them means running a separate `Exp`
/// strategy (e.g. inside the leaf-statement rules) rather than exposing them
/// as `Stmt` children here.
impl Node for Stmt {
    fn children(&self) -> Vec<Stmt> {
        match &self.kind {
            StmtKind::Seqn(stmts) => stmts.clone(),
            StmtKind::If(_, then, els) => vec![(**then).clone(), (**els).clone()],
            StmtKind::While(_, _, body) => vec![(**body).clone()],
            StmtKind::Label(_)
            | StmtKind::Goto(_)
            | StmtKind::LocalVarAssign(..)
            | StmtKind::FieldAssign { .. }
            | StmtKind::Inhale(_)
            | StmtKind::Exhale(_)
            | StmtKind::Fold(..)
            | StmtKind::Unfold(..)
            | StmtKind::MethodCall { .. } => vec![],
        }
    }

    fn with_children(&self, children: Vec<Stmt>) -> Stmt {
        let mut it = children.into_iter();
        let kind = match &self.kind {
            StmtKind::Seqn(_) => StmtKind::Seqn(it.collect()),
            StmtKind::If(cond, ..) => StmtKind::If(
                cond.clone(),
                Box::new(it.next().unwrap()),
                Box::new(it.next().unwrap()),
            ),
            StmtKind::While(cond, invs, _) => {
                StmtKind::While(cond.clone(), invs.clone(), Box::new(it.next().unwrap()))
            }
            other => other.clone(),
        };
        Stmt {
            kind,
            pos: self.pos.clone(),
            info: self.info.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Typ;

    #[test]
    fn exp_children_and_with_children_round_trip() {
        let e = add(int_lit(1), int_lit(2));
        let children = e.children();
        assert_eq!(children, vec![int_lit(1), int_lit(2)]);
        let rebuilt = e.with_children(vec![int_lit(10), int_lit(20)]);
        assert_eq!(rebuilt, add(int_lit(10), int_lit(20)));
    }

    #[test]
    fn stmt_children_only_cover_sub_statements() {
        let s = if_stmt(
            true_lit(),
            local_var_assign("x", int_lit(1)),
            local_var_assign("x", int_lit(2)),
        );
        assert_eq!(s.children().len(), 2);
        let leaf = local_var_assign("x", int_lit(1));
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn func_app_children_is_its_argument_list() {
        let e = func_app("f", vec![local_var("x", Typ::Int), int_lit(3)], Typ::Int);
        assert_eq!(e.children().len(), 2);
        let rebuilt = e.with_children(vec![int_lit(9), int_lit(3)]);
        assert_eq!(rebuilt, func_app("f", vec![int_lit(9), int_lit(3)], Typ::Int));
    }
}
