//! Oid - store-local object identity
//!
//! Oids totally order all inserts into a store instance. They are
//! allocated monotonically and never reused, including after deletion.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A store-local object identifier.
///
/// Allocated by `Store::insert` from a counter starting at 1; unique
/// for the lifetime of the store instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Oid(u64);

impl Oid {
    /// Creates an Oid with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    ///
    /// This accessor exists for diagnostics; application code should
    /// not depend on the internal representation.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deterministic, ascending set of oids.
pub type OidSet = BTreeSet<Oid>;
