//! The statement/expression tree lowered by [`crate::cfg`].
//!
//! Kept deliberately small: the concrete domain statements (inhale, exhale,
//! fold, unfold, method call, ...) are opaque leaves as far as this crate is
//! concerned (spec.md §3) — their fields exist so a real frontend can attach
//! them, but no component here inspects the fields, only the shape.

mod builders;
mod expr;
mod position;
mod stmt;

pub use builders::*;
pub use expr::{Exp, ExpKind, LocalVarDecl, Typ};
pub use position::{Info, Position};
pub use stmt::{Stmt, StmtKind};
