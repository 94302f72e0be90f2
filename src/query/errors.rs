//! Query errors
//!
//! Rejections raised while resolving a selection. The store is never
//! mutated when resolution fails.

use thiserror::Error;

use crate::index::ElementType;
use crate::schema::ShapeId;

/// Result type for selection resolution
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while resolving a selection against a store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The selection was built from a different key specification
    #[error("selection was built for a different key specification (store shape {expected}, selection shape {got})")]
    ShapeMismatch {
        /// The store's shape tag
        expected: ShapeId,
        /// The selection leaf's shape tag
        got: ShapeId,
    },

    /// A predicate element does not match its dimension's type
    #[error("dimension {position} ({name}) holds {expected} elements, selection supplied {got}")]
    TypeMismatch {
        /// Dimension position
        position: usize,
        /// Dimension name
        name: String,
        /// Declared element type
        expected: ElementType,
        /// Supplied element type
        got: ElementType,
    },

    /// A dimension handle points outside the store's index vector;
    /// indicates an implementation bug
    #[error("dimension position {position} is outside the key specification (arity {arity})")]
    PositionOutOfRange {
        /// Offending position
        position: usize,
        /// Store arity
        arity: usize,
    },
}
