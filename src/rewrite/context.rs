//! `StrategyC` (spec.md §4.5): a rule parameterized additionally by a
//! caller-typed context threaded down the spine during descent.

use std::rc::Rc;

use super::node::Node;
use super::order::Order;

/// Context propagation (spec.md §4.5): "the context is threaded along the
/// path from the root; descent into a child uses `updateContext(current,
/// child-input)` first. ... parallel siblings do not see each other's
/// context." Each recursive call below receives its own owned `C` precisely
/// so that two sibling subtrees can never observe each other's update — the
/// context lives on the call stack, not behind a shared handle.
pub struct StrategyC<N: Node, C: Clone> {
    rule: Rc<dyn Fn(&N, &C) -> Option<N>>,
    update: Rc<dyn Fn(&N, &C) -> C>,
    init: C,
    order: Order,
}

impl<N: Node, C: Clone> Clone for StrategyC<N, C> {
    fn clone(&self) -> Self {
        StrategyC {
            rule: self.rule.clone(),
            update: self.update.clone(),
            init: self.init.clone(),
            order: self.order,
        }
    }
}

impl<N: Node + 'static, C: Clone + 'static> StrategyC<N, C> {
    /// `StrategyC(f)` with the given initial context and the default
    /// context-update function, identity.
    pub fn new(rule: impl Fn(&N, &C) -> Option<N> + 'static, init: C) -> Self {
        StrategyC {
            rule: Rc::new(rule),
            update: Rc::new(|_: &N, c: &C| c.clone()),
            init,
            order: Order::TopDown,
        }
    }

    pub fn update_context(mut self, update: impl Fn(&N, &C) -> C + 'static) -> Self {
        self.update = Rc::new(update);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn top_down(self) -> Self {
        self.order(Order::TopDown)
    }

    pub fn bottom_up(self) -> Self {
        self.order(Order::BottomUp)
    }

    pub fn innermost(self) -> Self {
        self.order(Order::Innermost)
    }

    pub fn execute(&self, node: &N) -> N {
        self.execute_with(node, &self.init)
    }

    fn execute_with(&self, node: &N, ctx: &C) -> N {
        match self.order {
            Order::TopDown => {
                let n1 = (self.rule)(node, ctx).unwrap_or_else(|| node.clone());
                let child_ctx = (self.update)(&n1, ctx);
                let children = n1
                    .children()
                    .iter()
                    .map(|c| self.execute_with(c, &child_ctx))
                    .collect();
                n1.with_children(children)
            }
            Order::BottomUp => {
                let child_ctx = (self.update)(node, ctx);
                let children = node
                    .children()
                    .iter()
                    .map(|c| self.execute_with(c, &child_ctx))
                    .collect();
                let rebuilt = node.with_children(children);
                (self.rule)(&rebuilt, ctx).unwrap_or(rebuilt)
            }
            Order::Innermost => {
                let mut cur = self.execute_with_bottom_up_pass(node, ctx);
                loop {
                    match (self.rule)(&cur, ctx) {
                        Some(next) if next != cur => {
                            cur = self.execute_with(&next, ctx);
                        }
                        _ => return cur,
                    }
                }
            }
        }
    }

    fn execute_with_bottom_up_pass(&self, node: &N, ctx: &C) -> N {
        let child_ctx = (self.update)(node, ctx);
        let children = node
            .children()
            .iter()
            .map(|c| self.execute_with(c, &child_ctx))
            .collect();
        let rebuilt = node.with_children(children);
        (self.rule)(&rebuilt, ctx).unwrap_or(rebuilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Exp;

    /// A rule that replaces any `LocalVar` with an `IntLit` counting how many
    /// `And`/`Or` ancestors it sits under — exercises both descent (context
    /// grows on the way down) and the default identity updater's absence.
    #[test]
    fn context_counts_boolean_connective_depth() {
        let strategy: StrategyC<Exp, i64> = StrategyC::new(
            |e: &Exp, depth: &i64| match &e.kind {
                crate::ast::ExpKind::LocalVar(_) => Some(int_lit(*depth)),
                _ => None,
            },
            0,
        )
        .update_context(|node: &Exp, depth: &i64| match &node.kind {
            crate::ast::ExpKind::And(..) | crate::ast::ExpKind::Or(..) => depth + 1,
            _ => *depth,
        })
        .top_down();

        let e = and(local_var("x", crate::ast::Typ::Bool), true_lit());
        let result = strategy.execute(&e);
        assert_eq!(result, and(int_lit(1), true_lit()));
    }
}
