//! Key validation
//!
//! Validates a user-supplied key against a spec before the store
//! mutates anything: arity, mode alignment at every position, and
//! element types at multi positions. A key that validates cannot fail
//! mid-insert, which is what keeps index edits all-or-nothing.

use crate::store::{Key, KeyDim};

use super::errors::{SchemaError, SchemaResult};
use super::types::{DimensionMode, KeySpec};

/// Checks that `key` matches `spec` position by position.
pub fn validate_key(spec: &KeySpec, key: &Key) -> SchemaResult<()> {
    if key.arity() != spec.arity() {
        return Err(SchemaError::ArityMismatch {
            expected: spec.arity(),
            got: key.arity(),
        });
    }

    for (position, (dim_spec, dim_key)) in spec.dims().iter().zip(key.dims()).enumerate() {
        match (&dim_spec.mode, dim_key) {
            (DimensionMode::Auto { .. }, KeyDim::Assigned) => {}
            (DimensionMode::Auto { .. }, KeyDim::Values(_)) => {
                return Err(SchemaError::UnexpectedValues {
                    position,
                    name: dim_spec.name.clone(),
                });
            }
            (DimensionMode::Multi { .. }, KeyDim::Assigned) => {
                return Err(SchemaError::MissingValues {
                    position,
                    name: dim_spec.name.clone(),
                });
            }
            (DimensionMode::Multi { ty }, KeyDim::Values(elements)) => {
                for element in elements {
                    if element.element_type() != *ty {
                        return Err(SchemaError::ElementTypeMismatch {
                            position,
                            name: dim_spec.name.clone(),
                            expected: *ty,
                            got: element.element_type(),
                        });
                    }
                }
            }
        }
    }

    Ok(())
}
