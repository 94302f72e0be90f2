//! Key shape subsystem
//!
//! Runtime shape descriptors for composite keys, validated at every
//! store entry point.
//!
//! # Design Principles
//!
//! - Mandatory on all writes: every key is checked against the spec
//!   before any index edit
//! - Shape-tagged: each built spec carries a fresh `ShapeId`;
//!   dimension handles embed it, so selections cannot cross specs
//! - No coercion: element types must match the declared dimension type

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use types::{DimRef, DimensionMode, DimensionSpec, KeySpec, KeySpecBuilder, ShapeId};
pub use validator::validate_key;
