//! Selection subsystem
//!
//! Algebraic selections over a store's dimensions and their
//! resolution into oid-sets.
//!
//! # Design Principles
//!
//! - Pure: resolution never mutates the store
//! - Shape-checked: every leaf's dimension handle must carry the
//!   store's shape tag and the dimension's element type
//! - Short-circuiting: ALL and NONE collapse composites without
//!   materializing the full oid set

mod ast;
mod errors;
pub(crate) mod evaluator;

pub use ast::Selection;
pub use errors::{QueryError, QueryResult};
