/// Traversal order (spec.md §4.5): when a strategy's rule fires relative to
/// descending into children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    /// Apply to a node before descending into (the possibly-replaced) children.
    TopDown,
    /// Apply to children first, then to the rebuilt node.
    BottomUp,
    /// Apply bottom-up, then re-apply at the mutated node until stable.
    Innermost,
}
