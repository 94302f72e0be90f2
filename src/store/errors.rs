//! Store errors
//!
//! Wraps shape and query rejections; `CorruptedEntry` reports a
//! stored key whose shape disagrees with the spec, which is an
//! implementation bug, not a caller error.

use thiserror::Error;

use crate::query::QueryError;
use crate::schema::SchemaError;

use super::oid::Oid;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Key rejected by the spec before any mutation
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Selection rejected during resolution
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A stored key's shape disagrees with the spec; the operation
    /// aborted without mutating the store
    #[error("stored key at oid {oid} disagrees with the key specification at dimension {position}")]
    CorruptedEntry {
        /// Affected oid
        oid: Oid,
        /// Dimension position of the disagreement
        position: usize,
    },
}
