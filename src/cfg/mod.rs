//! The three-phase AST→CFG generator (spec.md §4.1-§4.3) and its block model.
//!
//! `linearize` (Phase 1) and `build` (Phase 2) are pipeline-internal; only
//! [`block`] (the result type), [`label`] and [`generator`] (the entry point)
//! are part of this crate's public surface.

pub(crate) mod build;
pub mod generator;
pub(crate) mod linearize;
pub mod block;
pub mod label;
pub(crate) mod materialize;

pub use block::{Block, Cfg};
pub use generator::Generator;
pub use label::Label;
