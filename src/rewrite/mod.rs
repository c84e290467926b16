//! The generic AST-rewriting engine (spec.md §4.5): tree-shape-agnostic
//! traversal over anything implementing [`Node`], in four flavours —
//! [`Strategy`] (rewrite), [`StrategyC`] (rewrite with threaded context),
//! [`StrategyA`] (rewrite with ancestor/sibling visibility) and [`Query`]
//! (read-only fold) — plus the combinator algebra that composes [`Strategy`]
//! values (spec.md §4.5 "Combinators").
//!
//! Independent of [`crate::cfg`]: any [`crate::ast::Exp`] or
//! [`crate::ast::Stmt`] tree can be run through this engine without ever
//! touching a [`crate::cfg::Cfg`].

mod ancestor;
mod context;
mod node;
mod order;
mod query;
mod strategy;

pub use ancestor::{AncestorInfo, StrategyA};
pub use context::StrategyC;
pub use node::Node;
pub use order::Order;
pub use query::Query;
pub use strategy::Strategy;
