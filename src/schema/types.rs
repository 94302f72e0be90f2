//! Key specification types
//!
//! A `KeySpec` is the runtime shape descriptor for a store's composite
//! key: a non-empty, ordered list of named dimensions, each either
//! multi (caller supplies a set of elements) or auto (the store
//! assigns an integer from a per-dimension counter).
//!
//! Every spec built carries a fresh `ShapeId`. Dimension handles
//! (`DimRef`) embed that tag, so a selection written against one spec
//! cannot resolve against a store built from a different one.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::index::ElementType;

use super::errors::{SchemaError, SchemaResult};

/// Tag identifying one built key specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a dimension's stored elements come to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum DimensionMode {
    /// Caller supplies an unordered set of elements of type `ty`.
    /// The set may be empty.
    Multi {
        /// Element type at this position
        ty: ElementType,
    },
    /// The store assigns a single integer element from a counter
    /// beginning at `start`.
    Auto {
        /// First value the counter assigns
        start: i64,
    },
}

/// One named position of a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSpec {
    /// Dimension name, unique within the spec
    pub name: String,
    /// Multi or auto
    pub mode: DimensionMode,
}

impl DimensionSpec {
    /// The element type stored at this position
    pub fn element_type(&self) -> ElementType {
        match self.mode {
            DimensionMode::Multi { ty } => ty,
            DimensionMode::Auto { .. } => ElementType::Int,
        }
    }

    /// Returns true for auto-assigned dimensions
    pub fn is_auto(&self) -> bool {
        matches!(self.mode, DimensionMode::Auto { .. })
    }
}

/// A typed handle to one dimension of one spec.
///
/// The only way to name a dimension in a selection. Carries the
/// spec's shape tag; the evaluator rejects handles minted by a
/// different spec before touching any index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimRef {
    shape: ShapeId,
    pos: usize,
    name: String,
    ty: ElementType,
}

impl DimRef {
    /// Shape tag of the spec this handle came from
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Positional index of the dimension
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Dimension name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element type at this dimension
    pub fn element_type(&self) -> ElementType {
        self.ty
    }
}

/// Complete key specification: named, ordered, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    name: String,
    shape: ShapeId,
    dims: Vec<DimensionSpec>,
}

impl KeySpec {
    /// Starts building a spec with the given name
    pub fn builder(name: impl Into<String>) -> KeySpecBuilder {
        KeySpecBuilder {
            name: name.into(),
            dims: Vec::new(),
        }
    }

    /// Spec name (diagnostic only)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape tag minted when this spec was built
    pub fn shape_id(&self) -> ShapeId {
        self.shape
    }

    /// Number of dimensions
    pub fn arity(&self) -> usize {
        self.dims.len()
    }

    /// The dimension specs in position order
    pub fn dims(&self) -> &[DimensionSpec] {
        &self.dims
    }

    /// Handle to the dimension with the given name
    pub fn dim(&self, name: &str) -> Option<DimRef> {
        self.dims
            .iter()
            .position(|d| d.name == name)
            .and_then(|pos| self.dim_at(pos))
    }

    /// Handle to the dimension at the given position
    pub fn dim_at(&self, pos: usize) -> Option<DimRef> {
        self.dims.get(pos).map(|d| DimRef {
            shape: self.shape,
            pos,
            name: d.name.clone(),
            ty: d.element_type(),
        })
    }

    /// Positions of the auto dimensions, ascending
    pub fn auto_positions(&self) -> Vec<usize> {
        self.dims
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_auto())
            .map(|(pos, _)| pos)
            .collect()
    }
}

/// Builder for `KeySpec`
#[derive(Debug)]
pub struct KeySpecBuilder {
    name: String,
    dims: Vec<DimensionSpec>,
}

impl KeySpecBuilder {
    /// Appends a multi dimension holding elements of type `ty`
    pub fn multi(mut self, name: impl Into<String>, ty: ElementType) -> Self {
        self.dims.push(DimensionSpec {
            name: name.into(),
            mode: DimensionMode::Multi { ty },
        });
        self
    }

    /// Appends an auto dimension whose counter begins at `start`
    pub fn auto(mut self, name: impl Into<String>, start: i64) -> Self {
        self.dims.push(DimensionSpec {
            name: name.into(),
            mode: DimensionMode::Auto { start },
        });
        self
    }

    /// Finishes the spec, minting its shape tag.
    ///
    /// Rejects empty specs and duplicate dimension names.
    pub fn build(self) -> SchemaResult<KeySpec> {
        if self.dims.is_empty() {
            return Err(SchemaError::EmptySpec);
        }

        let mut seen = HashSet::new();
        for dim in &self.dims {
            if !seen.insert(dim.name.as_str()) {
                return Err(SchemaError::DuplicateDimension(dim.name.clone()));
            }
        }

        Ok(KeySpec {
            name: self.name,
            shape: ShapeId::mint(),
            dims: self.dims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_spec() -> KeySpec {
        KeySpec::builder("articles")
            .auto("id", 1)
            .multi("name", ElementType::Text)
            .multi("tags", ElementType::Text)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_spec() {
        let spec = article_spec();
        assert_eq!(spec.arity(), 3);
        assert_eq!(spec.name(), "articles");
        assert_eq!(spec.auto_positions(), vec![0]);
        assert!(spec.dims()[0].is_auto());
        assert_eq!(spec.dims()[1].element_type(), ElementType::Text);
    }

    #[test]
    fn test_empty_spec_rejected() {
        let result = KeySpec::builder("empty").build();
        assert_eq!(result.unwrap_err(), SchemaError::EmptySpec);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = KeySpec::builder("dup")
            .multi("x", ElementType::Int)
            .multi("x", ElementType::Text)
            .build();
        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateDimension("x".into())
        );
    }

    #[test]
    fn test_dim_lookup() {
        let spec = article_spec();

        let name = spec.dim("name").unwrap();
        assert_eq!(name.pos(), 1);
        assert_eq!(name.name(), "name");
        assert_eq!(name.element_type(), ElementType::Text);
        assert_eq!(name.shape(), spec.shape_id());

        let id = spec.dim_at(0).unwrap();
        assert_eq!(id.element_type(), ElementType::Int);

        assert!(spec.dim("missing").is_none());
        assert!(spec.dim_at(9).is_none());
    }

    #[test]
    fn test_identical_specs_have_distinct_shapes() {
        let a = article_spec();
        let b = article_spec();
        assert_ne!(a.shape_id(), b.shape_id());
    }
}
