//! Dimension index subsystem
//!
//! One ordered index per key dimension, kept in lock step with the
//! primary value table by the store container.
//!
//! # Design Principles
//!
//! - Derived state: indexes mirror the stored keys, never the source
//!   of truth for values
//! - Deterministic: BTreeMap iteration order, ascending oid-sets
//! - Empty buckets are dropped so range scans stay proportional to
//!   live data

mod btree;

pub use btree::{AutoSequence, DimensionIndex, Element, ElementType};
