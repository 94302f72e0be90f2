//! Schema errors
//!
//! Shape violations detected before any store mutation.

use thiserror::Error;

use crate::index::ElementType;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Shape errors for spec construction and key validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A key specification must have at least one dimension
    #[error("key specification has no dimensions")]
    EmptySpec,

    /// Dimension names must be unique within a spec
    #[error("duplicate dimension name: {0}")]
    DuplicateDimension(String),

    /// Key has the wrong number of dimensions
    #[error("key arity mismatch: spec has {expected} dimensions, key has {got}")]
    ArityMismatch {
        /// Spec arity
        expected: usize,
        /// Key arity
        got: usize,
    },

    /// A user key supplied elements at an auto-assigned position
    #[error("dimension {position} ({name}) is auto-assigned; keys must leave it unset")]
    UnexpectedValues {
        /// Dimension position
        position: usize,
        /// Dimension name
        name: String,
    },

    /// A user key left a multi position unset
    #[error("dimension {position} ({name}) requires a value set")]
    MissingValues {
        /// Dimension position
        position: usize,
        /// Dimension name
        name: String,
    },

    /// A supplied element has the wrong type for its dimension
    #[error("dimension {position} ({name}) holds {expected} elements, got {got}")]
    ElementTypeMismatch {
        /// Dimension position
        position: usize,
        /// Dimension name
        name: String,
        /// Declared element type
        expected: ElementType,
        /// Supplied element type
        got: ElementType,
    },
}
