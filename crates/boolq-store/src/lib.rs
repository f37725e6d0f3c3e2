#![deny(missing_docs)]

//! Normalized store and mutation engine for boolean query expressions.
//!
//! The store is the flat, identifier-keyed source of truth; the flatten
//! and reconstruct transforms move between it and the portable wire tree,
//! and the mutation operations edit it in place while preserving the
//! structural invariants.

mod equation;
mod flatten;
mod mutate;
mod reconstruct;
mod store;

pub use equation::render_equation;
pub use store::{GroupRecord, QueryStore, RuleRecord};
