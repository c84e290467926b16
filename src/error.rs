//! Structural errors raised by CFG construction (spec.md §7 "structural
//! error"). These indicate a bug in the generator itself, not in the program
//! being lowered — an ill-formed *program* (e.g. a jump to an undeclared
//! label that slips past this and produces a cyclic graph) is reported by
//! [`crate::check`] as a boolean, never as one of these.

use crate::cfg::label::Label;

#[derive(Debug, thiserror::Error)]
pub enum CfgError {
    #[error("jump to undeclared label `{0}`")]
    UnresolvedLabel(Label),

    #[error("basic block #{block} has {edges} outgoing edges; expected 0, 1 or 2")]
    MalformedBlockShape { block: usize, edges: usize },

    #[error(
        "basic block #{block} has two outgoing edges but they are not both conditional"
    )]
    NonConditionalPair { block: usize },

    #[error(
        "basic block #{block}'s second outgoing edge is not the logical negation of its first"
    )]
    NonComplementaryConditionalEdges { block: usize },

    #[error("loop marker for label `{0}` has no matching bound label")]
    UnboundLoopAfterLabel(Label),
}
