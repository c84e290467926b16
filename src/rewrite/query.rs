//! `Query` (spec.md §4.5): a read-only fold, "identical traversal, but
//! instead of rebuilding, per-node results are gathered into a list and
//! folded with `accumulate` (seeded with `neutralElement`)."

use std::rc::Rc;

use super::node::Node;

/// `Query(f)` with a `neutralElement` and an `accumulate` aggregator
/// (spec.md §4.5). Pure and read-only: it never rebuilds the tree.
pub struct Query<N: Node, T: Clone> {
    rule: Rc<dyn Fn(&N) -> Option<T>>,
    neutral: T,
    accumulate: Rc<dyn Fn(Vec<T>) -> T>,
}

impl<N: Node, T: Clone> Clone for Query<N, T> {
    fn clone(&self) -> Self {
        Query {
            rule: self.rule.clone(),
            neutral: self.neutral.clone(),
            accumulate: self.accumulate.clone(),
        }
    }
}

impl<N: Node + 'static, T: Clone + 'static> Query<N, T> {
    pub fn new(
        rule: impl Fn(&N) -> Option<T> + 'static,
        neutral: T,
        accumulate: impl Fn(Vec<T>) -> T + 'static,
    ) -> Self {
        Query {
            rule: Rc::new(rule),
            neutral,
            accumulate: Rc::new(accumulate),
        }
    }

    /// `execute(node) -> T`: the node's own contribution (`neutralElement` if
    /// the rule isn't defined there) folded together with every child's
    /// recursively-computed result.
    pub fn execute(&self, node: &N) -> T {
        let own = (self.rule)(node).unwrap_or_else(|| self.neutral.clone());
        let mut results = Vec::with_capacity(1 + node.children().len());
        results.push(own);
        for child in node.children() {
            results.push(self.execute(&child));
        }
        (self.accumulate)(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::Exp;

    fn sum(values: Vec<i64>) -> i64 {
        values.into_iter().sum()
    }

    /// T6: `q.execute(Seqn([]))` is exactly the neutral element, since an
    /// empty `Seqn` has no children and the rule is undefined at it.
    #[test]
    fn query_on_empty_seqn_yields_the_neutral_element() {
        use crate::ast::Stmt;
        let q: Query<Stmt, i64> = Query::new(|_: &Stmt| None, 0, sum);
        assert_eq!(q.execute(&seqn(vec![])), 0);
    }

    /// S6: counting `Add` nodes over `And(Add(1,2), Add(Add(3,4),5))` yields 3.
    #[test]
    fn counts_add_nodes_across_the_tree() {
        let count_add: Query<Exp, i64> = Query::new(
            |e: &Exp| match &e.kind {
                crate::ast::ExpKind::Add(..) => Some(1),
                _ => None,
            },
            0,
            sum,
        );
        let tree = and(
            add(int_lit(1), int_lit(2)),
            add(add(int_lit(3), int_lit(4)), int_lit(5)),
        );
        assert_eq!(count_add.execute(&tree), 3);
    }
}
