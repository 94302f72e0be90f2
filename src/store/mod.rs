//! Store container subsystem
//!
//! The primary value table, the per-dimension index vector, and the
//! oid allocator, mutated together so no operation can observe an oid
//! in one and not the other.
//!
//! # Invariants
//!
//! - An oid is in `values` exactly when every index slot carries it
//!   under its stored elements (vacuous at a dimension whose stored
//!   set is empty)
//! - Auto elements are assigned once per oid and never change
//! - Oids allocate monotonically from 1 and are never reused

mod container;
mod errors;
mod key;
mod oid;

pub use container::{Store, UpdateAction};
pub use errors::{StoreError, StoreResult};
pub use key::{Key, KeyDim, StoredDim, StoredKey};
pub use oid::{Oid, OidSet};
