//! Selection resolution
//!
//! Folds a selection over a store's dimension indexes into a set of
//! oids. Resolution is a pure function of (indexes, selection) and
//! never mutates anything.
//!
//! `ALL` stays symbolic throughout the fold, so the identities
//! `AND(ALL, s) = s`, `OR(ALL, s) = ALL`, `AND(NONE, s) = NONE` and
//! `OR(NONE, s) = s` hold without ever materializing the full oid
//! set. Composite nodes evaluate their left side first and
//! short-circuit when the right side cannot change the result.

use crate::index::{DimensionIndex, Element};
use crate::query::ast::Selection;
use crate::schema::{DimRef, ShapeId};
use crate::store::OidSet;

use super::errors::{QueryError, QueryResult};

/// Outcome of resolving a selection: either a concrete oid-set or the
/// symbolic "everything" the caller materializes from the value table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResolvedSet {
    /// Every stored oid
    All,
    /// A concrete set
    Ids(OidSet),
}

impl ResolvedSet {
    fn is_all(&self) -> bool {
        matches!(self, ResolvedSet::All)
    }

    fn is_empty_ids(&self) -> bool {
        matches!(self, ResolvedSet::Ids(ids) if ids.is_empty())
    }

    fn union(self, other: ResolvedSet) -> ResolvedSet {
        match (self, other) {
            (ResolvedSet::All, _) | (_, ResolvedSet::All) => ResolvedSet::All,
            (ResolvedSet::Ids(a), ResolvedSet::Ids(b)) => ResolvedSet::Ids(&a | &b),
        }
    }

    fn intersect(self, other: ResolvedSet) -> ResolvedSet {
        match (self, other) {
            (ResolvedSet::All, rhs) => rhs,
            (lhs, ResolvedSet::All) => lhs,
            (ResolvedSet::Ids(a), ResolvedSet::Ids(b)) => ResolvedSet::Ids(&a & &b),
        }
    }
}

/// Resolves `selection` against the index vector of a store whose
/// spec carries `shape`.
pub(crate) fn resolve(
    selection: &Selection,
    shape: ShapeId,
    indices: &[DimensionIndex],
) -> QueryResult<ResolvedSet> {
    match selection {
        Selection::All => Ok(ResolvedSet::All),
        Selection::None => Ok(ResolvedSet::Ids(OidSet::new())),

        Selection::Eq(dim, element) => {
            let index = leaf_index(dim, element, shape, indices)?;
            Ok(ResolvedSet::Ids(index.lookup(element)))
        }
        Selection::Gt(dim, element) => {
            let index = leaf_index(dim, element, shape, indices)?;
            let (_, greater) = index.split(element);
            Ok(ResolvedSet::Ids(greater))
        }
        Selection::Lt(dim, element) => {
            let index = leaf_index(dim, element, shape, indices)?;
            let (less, _) = index.split(element);
            Ok(ResolvedSet::Ids(less))
        }
        Selection::Gte(dim, element) => {
            let index = leaf_index(dim, element, shape, indices)?;
            let (_, mut equal, greater) = index.split_lookup(element);
            equal.extend(greater);
            Ok(ResolvedSet::Ids(equal))
        }
        Selection::Lte(dim, element) => {
            let index = leaf_index(dim, element, shape, indices)?;
            let (less, mut equal, _) = index.split_lookup(element);
            equal.extend(less);
            Ok(ResolvedSet::Ids(equal))
        }

        Selection::And(left, right) => {
            let lhs = resolve(left, shape, indices)?;
            if lhs.is_empty_ids() {
                return Ok(lhs);
            }
            if lhs.is_all() {
                return resolve(right, shape, indices);
            }
            let rhs = resolve(right, shape, indices)?;
            Ok(lhs.intersect(rhs))
        }
        Selection::Or(left, right) => {
            let lhs = resolve(left, shape, indices)?;
            if lhs.is_all() {
                return Ok(ResolvedSet::All);
            }
            if lhs.is_empty_ids() {
                return resolve(right, shape, indices);
            }
            let rhs = resolve(right, shape, indices)?;
            Ok(lhs.union(rhs))
        }
    }
}

/// Checks a leaf's shape tag and element type, then returns its index.
fn leaf_index<'a>(
    dim: &DimRef,
    element: &Element,
    shape: ShapeId,
    indices: &'a [DimensionIndex],
) -> QueryResult<&'a DimensionIndex> {
    if dim.shape() != shape {
        return Err(QueryError::ShapeMismatch {
            expected: shape,
            got: dim.shape(),
        });
    }
    if element.element_type() != dim.element_type() {
        return Err(QueryError::TypeMismatch {
            position: dim.pos(),
            name: dim.name().to_string(),
            expected: dim.element_type(),
            got: element.element_type(),
        });
    }
    indices.get(dim.pos()).ok_or(QueryError::PositionOutOfRange {
        position: dim.pos(),
        arity: indices.len(),
    })
}
