//! `StrategyA` (spec.md §4.5): a rule parameterized by [`AncestorInfo`] — the
//! dynamic parent chain and positional siblings of the node being visited.

use std::rc::Rc;

use super::node::Node;
use super::order::Order;

/// "The `parent`, the full `ancestors` chain, the `siblings`, the `previous`
/// and `next` siblings, and the `successors` (suffix of siblings after the
/// current node)" (spec.md §4.5). `ancestors` runs root-first, nearest-parent
/// last; `siblings` is the full sibling list the current node sits in
/// (including the node itself), and `index` is its position within it.
pub struct AncestorInfo<N> {
    ancestors: Vec<N>,
    siblings: Vec<N>,
    index: usize,
}

impl<N> AncestorInfo<N> {
    pub fn parent(&self) -> Option<&N> {
        self.ancestors.last()
    }

    pub fn ancestors(&self) -> &[N] {
        &self.ancestors
    }

    pub fn siblings(&self) -> &[N] {
        &self.siblings
    }

    pub fn previous(&self) -> Option<&N> {
        if self.index == 0 {
            None
        } else {
            self.siblings.get(self.index - 1)
        }
    }

    pub fn next(&self) -> Option<&N> {
        self.siblings.get(self.index + 1)
    }

    /// The suffix of siblings after the current node.
    pub fn successors(&self) -> &[N] {
        &self.siblings[(self.index + 1).min(self.siblings.len())..]
    }
}

/// A configurable rewriter over a [`Node`] tree whose rule additionally sees
/// [`AncestorInfo`] (spec.md §4.5 "Ancestor Strategy").
pub struct StrategyA<N: Node> {
    rule: Rc<dyn Fn(&N, &AncestorInfo<N>) -> Option<N>>,
    order: Order,
}

impl<N: Node> Clone for StrategyA<N> {
    fn clone(&self) -> Self {
        StrategyA {
            rule: self.rule.clone(),
            order: self.order,
        }
    }
}

impl<N: Node + 'static> StrategyA<N> {
    pub fn new(rule: impl Fn(&N, &AncestorInfo<N>) -> Option<N> + 'static) -> Self {
        StrategyA {
            rule: Rc::new(rule),
            order: Order::TopDown,
        }
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
        let root_info = AncestorInfo {
            ancestors: vec![],
            siblings: vec![node.clone()],
            index: 0,
        };
        self.execute_with(node, &root_info)
    }

    fn execute_with(&self, node: &N, info: &AncestorInfo<N>) -> N {
        match self.order {
            Order::TopDown => {
                let n1 = (self.rule)(node, info).unwrap_or_else(|| node.clone());
                let children = n1.children();
                let new_children: Vec<N> = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| {
                        let child_info = self.child_info(info, &n1, &children, i);
                        self.execute_with(child, &child_info)
                    })
                    .collect();
                n1.with_children(new_children)
            }
            Order::BottomUp => {
                let children = node.children();
                let new_children: Vec<N> = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| {
                        let child_info = self.child_info(info, node, &children, i);
                        self.execute_with(child, &child_info)
                    })
                    .collect();
                let rebuilt = node.with_children(new_children);
                (self.rule)(&rebuilt, info).unwrap_or(rebuilt)
            }
            Order::Innermost => {
                let mut cur = {
                    let children = node.children();
                    let new_children: Vec<N> = children
                        .iter()
                        .enumerate()
                        .map(|(i, child)| {
                            let child_info = self.child_info(info, node, &children, i);
                            self.execute_with(child, &child_info)
                        })
                        .collect();
                    let rebuilt = node.with_children(new_children);
                    (self.rule)(&rebuilt, info).unwrap_or(rebuilt)
                };
                loop {
                    match (self.rule)(&cur, info) {
                        Some(next) if next != cur => {
                            cur = self.execute_with(&next, info);
                        }
                        _ => return cur,
                    }
                }
            }
        }
    }

    fn child_info(
        &self,
        parent_info: &AncestorInfo<N>,
        parent: &N,
        siblings: &[N],
        index: usize,
    ) -> AncestorInfo<N> {
        let mut ancestors = parent_info.ancestors.clone();
        ancestors.push(parent.clone());
        AncestorInfo {
            ancestors,
            siblings: siblings.to_vec(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Exp;

    /// A rule that replaces every `LocalVar` with an `IntLit` of how many
    /// siblings come after it — exercises `successors()`.
    #[test]
    fn successors_reports_the_sibling_suffix() {
        let strategy: StrategyA<Exp> = StrategyA::new(|e: &Exp, info: &AncestorInfo<Exp>| {
            match &e.kind {
                crate::ast::ExpKind::LocalVar(_) => Some(int_lit(info.successors().len() as i64)),
                _ => None,
            }
        })
        .bottom_up();

        let e = func_app(
            "f",
            vec![
                local_var("a", crate::ast::Typ::Int),
                local_var("b", crate::ast::Typ::Int),
                int_lit(1),
            ],
            crate::ast::Typ::Int,
        );
        let result = strategy.execute(&e);
        assert_eq!(
            result,
            func_app("f", vec![int_lit(2), int_lit(1), int_lit(1)], crate::ast::Typ::Int)
        );
    }

    #[test]
    fn parent_is_none_at_the_root() {
        let strategy: StrategyA<Exp> = StrategyA::new(|_e: &Exp, info: &AncestorInfo<Exp>| {
            info.parent().is_none().then(|| int_lit(0))
        })
        .top_down();
        assert_eq!(strategy.execute(&true_lit()), int_lit(0));
    }
}
