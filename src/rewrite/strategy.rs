//! The plain `Strategy` (spec.md §4.5) and its combinator algebra.
//!
//! Rust's `<` and `||` are not overloadable to return anything but `bool` (
//! `PartialOrd`'s `lt` and `Index`-free boolean `||` are hard-wired), so
//! `s1 < s2` and `s1 || s2` from spec.md §4.5 become named methods,
//! [`Strategy::then_if_changed`] and [`Strategy::then`]. `s1 + s2` genuinely
//! is `std::ops::Add::add`, since `Add::Output` can be any type — that one is
//! implemented as a real operator.

use std::rc::Rc;

use super::node::Node;
use super::order::Order;

type Rule<N> = Rc<dyn Fn(&N) -> Option<N>>;
type FilterFn<N> = dyn Fn(&N) -> Vec<bool>;
type Filter<N> = Rc<FilterFn<N>>;

/// A strategy is either a bare `(rule, order, filter)` triple — the shape
/// spec.md describes `Strategy(f)` as — or an opaque composition of other
/// strategies produced by a combinator. `+` needs access to the bare form (it
/// merges two partial rules into one rule, run under a single traversal);
/// `<`, `||` and `.repeat` only need `execute`, so they're expressed directly
/// as closures over other strategies' `execute`.
enum Repr<N: Node> {
    Basic {
        rule: Rule<N>,
        order: Order,
        filter: Option<Filter<N>>,
    },
    Composed(Rc<dyn Fn(&N) -> N>),
}

impl<N: Node> Clone for Repr<N> {
    fn clone(&self) -> Self {
        match self {
            Repr::Basic { rule, order, filter } => Repr::Basic {
                rule: rule.clone(),
                order: *order,
                filter: filter.clone(),
            },
            Repr::Composed(f) => Repr::Composed(f.clone()),
        }
    }
}

/// A configurable rewriter over a [`Node`] tree (spec.md §4.5 "Plain
/// Strategy").
pub struct Strategy<N: Node>(Repr<N>);

impl<N: Node> Clone for Strategy<N> {
    fn clone(&self) -> Self {
        Strategy(self.0.clone())
    }
}

impl<N: Node + 'static> Strategy<N> {
    /// `Strategy(f)`: `f` is the partial rewrite rule, `None` meaning "not
    /// defined at this node" (spec.md §4.5's "rewrite mismatch is silently a
    /// no-op"). Defaults to `TopDown` with no recursion filter.
    pub fn new(rule: impl Fn(&N) -> Option<N> + 'static) -> Self {
        Strategy(Repr::Basic {
            rule: Rc::new(rule),
            order: Order::TopDown,
            filter: None,
        })
    }

    pub fn order(mut self, order: Order) -> Self {
        if let Repr::Basic { order: o, .. } = &mut self.0 {
            *o = order;
        }
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

    /// Per-node recursion filter (spec.md §4.5): `Node -> list<Bool>`,
    /// selecting which children to recurse into. Default: recurse into all.
    pub fn recurse_filter(mut self, filter: impl Fn(&N) -> Vec<bool> + 'static) -> Self {
        if let Repr::Basic { filter: f, .. } = &mut self.0 {
            *f = Some(Rc::new(filter));
        }
        self
    }

    /// `execute(node) -> node` (spec.md §4.5).
    pub fn execute(&self, node: &N) -> N {
        match &self.0 {
            Repr::Basic { rule, order, filter } => {
                execute_traversal(*order, rule.as_ref(), filter.as_deref(), node)
            }
            Repr::Composed(f) => f(node),
        }
    }

    /// `s1 < s2`, "then-if-changed": run `self` to a result; if it differs
    /// from the input, run `other` on that result.
    pub fn then_if_changed(self, other: Strategy<N>) -> Strategy<N> {
        Strategy(Repr::Composed(Rc::new(move |n: &N| {
            let r = self.execute(n);
            if &r != n {
                other.execute(&r)
            } else {
                r
            }
        })))
    }

    /// `s1 || s2`, "sequential": `other.execute(self.execute(n))` (spec.md
    /// T8).
    pub fn then(self, other: Strategy<N>) -> Strategy<N> {
        Strategy(Repr::Composed(Rc::new(move |n: &N| {
            other.execute(&self.execute(n))
        })))
    }

    /// `s.repeat`: reapply until the tree stabilises.
    pub fn repeat(self) -> Strategy<N> {
        Strategy(Repr::Composed(Rc::new(move |n: &N| {
            let mut cur = self.execute(n);
            loop {
                let next = self.execute(&cur);
                if next == cur {
                    return cur;
                }
                cur = next;
            }
        })))
    }
}

/// `s1 + s2`, "parallel / choice at node": at each node, the first rule that
/// matches wins; children traversed once. When both sides are bare rules
/// this merges them into a single rule under one shared traversal, exactly
/// as spec.md describes. Combining an already-composed strategy (the result
/// of `<`, `||` or `.repeat`) falls back to whole-strategy choice: run `self`
/// fully, and if the tree didn't change, run `other` fully instead.
impl<N: Node + 'static> std::ops::Add for Strategy<N> {
    type Output = Strategy<N>;

    fn add(self, other: Strategy<N>) -> Strategy<N> {
        match (self.0, other.0) {
            (
                Repr::Basic {
                    rule: r1,
                    order,
                    filter,
                },
                Repr::Basic { rule: r2, .. },
            ) => Strategy(Repr::Basic {
                rule: Rc::new(move |n: &N| (r1)(n).or_else(|| (r2)(n))),
                order,
                filter,
            }),
            (a, b) => {
                let sa = Strategy(a);
                let sb = Strategy(b);
                Strategy(Repr::Composed(Rc::new(move |n: &N| {
                    let ra = sa.execute(n);
                    if &ra != n {
                        ra
                    } else {
                        sb.execute(n)
                    }
                })))
            }
        }
    }
}

fn selected_children<N: Node>(
    node: &N,
    filter: Option<&FilterFn<N>>,
) -> Vec<(N, bool)> {
    let children = node.children();
    let mask = match filter {
        Some(f) => f(node),
        None => vec![true; children.len()],
    };
    children.into_iter().zip(mask).collect()
}

fn execute_traversal<N: Node>(
    order: Order,
    rule: &dyn Fn(&N) -> Option<N>,
    filter: Option<&FilterFn<N>>,
    node: &N,
) -> N {
    match order {
        Order::TopDown => {
            let n1 = rule(node).unwrap_or_else(|| node.clone());
            let mut changed = false;
            let new_children: Vec<N> = selected_children(&n1, filter)
                .into_iter()
                .map(|(child, recurse)| {
                    if recurse {
                        let r = execute_traversal(order, rule, filter, &child);
                        if r != child {
                            changed = true;
                        }
                        r
                    } else {
                        child
                    }
                })
                .collect();
            if changed {
                n1.with_children(new_children)
            } else {
                n1
            }
        }
        Order::BottomUp => {
            let mut changed = false;
            let new_children: Vec<N> = selected_children(node, filter)
                .into_iter()
                .map(|(child, recurse)| {
                    if recurse {
                        let r = execute_traversal(order, rule, filter, &child);
                        if r != child {
                            changed = true;
                        }
                        r
                    } else {
                        child
                    }
                })
                .collect();
            let rebuilt = if changed {
                node.with_children(new_children)
            } else {
                node.clone()
            };
            rule(&rebuilt).unwrap_or(rebuilt)
        }
        Order::Innermost => {
            let mut cur = execute_traversal(Order::BottomUp, rule, filter, node);
            loop {
                match rule(&cur) {
                    Some(next) if next != cur => {
                        cur = execute_traversal(Order::Innermost, rule, filter, &next);
                    }
                    _ => return cur,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::{Exp, ExpKind};
    use num_bigint::BigInt;

    fn int_value(e: &Exp) -> Option<BigInt> {
        match &e.kind {
            ExpKind::IntLit(n) => Some(n.clone()),
            _ => None,
        }
    }

    fn fold_rule(e: &Exp) -> Option<Exp> {
        match &e.kind {
            ExpKind::Add(l, r) => {
                let (a, b) = (int_value(l)?, int_value(r)?);
                Some(int_lit(a + b))
            }
            _ => None,
        }
    }

    fn implies_to_or(e: &Exp) -> Option<Exp> {
        match &e.kind {
            ExpKind::Implies(l, r) => Some(or(not((**l).clone()), (**r).clone())),
            _ => None,
        }
    }

    /// T4: identity rule leaves the tree unchanged.
    #[test]
    fn identity_rule_is_a_no_op() {
        let strategy: Strategy<Exp> = Strategy::new(|_: &Exp| None);
        let e = add(int_lit(1), int_lit(2));
        assert_eq!(strategy.execute(&e), e);
    }

    /// T5 / S5: BottomUp folds `Add(Add(1,2),3)` to `IntLit(6)` in one pass;
    /// TopDown alone leaves it partially folded and needs `.repeat`.
    #[test]
    fn bottom_up_folds_in_one_pass_top_down_needs_repeat() {
        let e = add(add(int_lit(1), int_lit(2)), int_lit(3));

        let bottom_up = Strategy::new(fold_rule).bottom_up();
        assert_eq!(bottom_up.execute(&e), int_lit(6));

        let top_down = Strategy::new(fold_rule).top_down();
        assert_eq!(top_down.execute(&e), add(int_lit(3), int_lit(3)));

        let repeated = Strategy::new(fold_rule).top_down().repeat();
        assert_eq!(repeated.execute(&e), int_lit(6));
    }

    /// S4: `Implies(a, Implies(b,c))` under TopDown and BottomUp both reach
    /// `Or(Not(a), Or(Not(b), c))`.
    #[test]
    fn implies_rewrite_reaches_same_tree_both_orders() {
        let a = true_lit();
        let b = false_lit();
        let c = true_lit();
        let e = implies(a.clone(), implies(b.clone(), c.clone()));
        let expected = or(not(a), or(not(b), c));

        let top_down = Strategy::new(implies_to_or).top_down();
        assert_eq!(top_down.execute(&e), expected);

        let bottom_up = Strategy::new(implies_to_or).bottom_up();
        assert_eq!(bottom_up.execute(&e), expected);
    }

    /// T7: repeat is idempotent.
    #[test]
    fn repeat_applied_twice_equals_once() {
        let e = add(add(int_lit(1), int_lit(2)), int_lit(3));
        let once = Strategy::new(fold_rule).top_down().repeat();
        let twice = Strategy::new(fold_rule).top_down().repeat().repeat();
        assert_eq!(once.execute(&e), twice.execute(&e));
    }

    /// T8: `(s1 || s2).execute(n) == s2.execute(s1.execute(n))`.
    #[test]
    fn then_is_plain_sequential_composition() {
        let e = add(add(int_lit(1), int_lit(2)), int_lit(3));
        let s1 = Strategy::new(fold_rule).bottom_up();
        let s2: Strategy<Exp> = Strategy::new(|e: &Exp| match &e.kind {
            ExpKind::IntLit(n) => Some(int_lit(n.clone() * 2)),
            _ => None,
        })
        .top_down();

        let composed = s1.clone().then(s2.clone());
        let manual = s2.execute(&s1.execute(&e));
        assert_eq!(composed.execute(&e), manual);
    }

    /// `<`: only run the second stage if the first stage actually changed
    /// something.
    #[test]
    fn then_if_changed_skips_second_stage_when_nothing_changed() {
        let untouched = int_lit(5);
        let s1 = Strategy::new(fold_rule).bottom_up();
        let s2: Strategy<Exp> = Strategy::new(|_: &Exp| Some(int_lit(999)));
        let combined = s1.then_if_changed(s2);
        assert_eq!(combined.execute(&untouched), untouched);
    }

    /// `+`: node-local choice, first matching rule wins.
    #[test]
    fn choice_picks_first_matching_rule() {
        let fold: Strategy<Exp> = Strategy::new(fold_rule).bottom_up();
        let always_zero: Strategy<Exp> = Strategy::new(|e: &Exp| match &e.kind {
            ExpKind::LocalVar(_) => Some(int_lit(0)),
            _ => None,
        })
        .bottom_up();
        let combined = fold + always_zero;
        assert_eq!(
            combined.execute(&add(int_lit(2), int_lit(3))),
            int_lit(5),
            "fold_rule should win where it matches"
        );
    }
}
