//! Selection expressions
//!
//! A `Selection` is an algebraic predicate tree over dimension
//! handles: equality and range leaves, AND/OR composition, and the
//! ALL/NONE constants. Selections are plain data; resolution happens
//! in the evaluator.

use std::fmt;

use crate::index::Element;
use crate::schema::DimRef;

/// Algebraic predicate over a store's dimensions.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Oids whose key at the dimension contains the element
    Eq(DimRef, Element),
    /// Strictly greater than the element
    Gt(DimRef, Element),
    /// Strictly less than the element
    Lt(DimRef, Element),
    /// Greater than or equal
    Gte(DimRef, Element),
    /// Less than or equal
    Lte(DimRef, Element),
    /// Intersection of both resolutions
    And(Box<Selection>, Box<Selection>),
    /// Union of both resolutions
    Or(Box<Selection>, Box<Selection>),
    /// Every oid currently stored
    All,
    /// The empty set
    None,
}

impl Selection {
    /// Equality predicate on a dimension
    pub fn eq(dim: DimRef, element: impl Into<Element>) -> Self {
        Selection::Eq(dim, element.into())
    }

    /// Strictly-greater predicate
    pub fn gt(dim: DimRef, element: impl Into<Element>) -> Self {
        Selection::Gt(dim, element.into())
    }

    /// Strictly-less predicate
    pub fn lt(dim: DimRef, element: impl Into<Element>) -> Self {
        Selection::Lt(dim, element.into())
    }

    /// Greater-or-equal predicate
    pub fn gte(dim: DimRef, element: impl Into<Element>) -> Self {
        Selection::Gte(dim, element.into())
    }

    /// Less-or-equal predicate
    pub fn lte(dim: DimRef, element: impl Into<Element>) -> Self {
        Selection::Lte(dim, element.into())
    }

    /// The selection matching every stored oid
    pub fn all() -> Self {
        Selection::All
    }

    /// The selection matching nothing
    pub fn none() -> Self {
        Selection::None
    }

    /// Intersection with another selection
    pub fn and(self, rhs: Selection) -> Self {
        Selection::And(Box::new(self), Box::new(rhs))
    }

    /// Union with another selection
    pub fn or(self, rhs: Selection) -> Self {
        Selection::Or(Box::new(self), Box::new(rhs))
    }

    /// Returns the operator name of the root node
    pub fn op_name(&self) -> &'static str {
        match self {
            Selection::Eq(..) => "eq",
            Selection::Gt(..) => "gt",
            Selection::Lt(..) => "lt",
            Selection::Gte(..) => "gte",
            Selection::Lte(..) => "lte",
            Selection::And(..) => "and",
            Selection::Or(..) => "or",
            Selection::All => "all",
            Selection::None => "none",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Eq(dim, e) => write!(f, "{} = {}", dim.name(), e),
            Selection::Gt(dim, e) => write!(f, "{} > {}", dim.name(), e),
            Selection::Lt(dim, e) => write!(f, "{} < {}", dim.name(), e),
            Selection::Gte(dim, e) => write!(f, "{} >= {}", dim.name(), e),
            Selection::Lte(dim, e) => write!(f, "{} <= {}", dim.name(), e),
            Selection::And(l, r) => write!(f, "({} AND {})", l, r),
            Selection::Or(l, r) => write!(f, "({} OR {})", l, r),
            Selection::All => write!(f, "ALL"),
            Selection::None => write!(f, "NONE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ElementType;
    use crate::schema::KeySpec;

    fn spec() -> KeySpec {
        KeySpec::builder("articles")
            .auto("id", 1)
            .multi("name", ElementType::Text)
            .build()
            .unwrap()
    }

    #[test]
    fn test_constructors() {
        let spec = spec();
        let sel = Selection::eq(spec.dim("name").unwrap(), "Intro");
        assert_eq!(sel.op_name(), "eq");

        let sel = Selection::gte(spec.dim("id").unwrap(), 2);
        assert!(matches!(sel, Selection::Gte(_, Element::Int(2))));
    }

    #[test]
    fn test_combinators_nest() {
        let spec = spec();
        let sel = Selection::eq(spec.dim("name").unwrap(), "a")
            .or(Selection::eq(spec.dim("name").unwrap(), "b"))
            .and(Selection::all());
        assert_eq!(sel.op_name(), "and");
    }

    #[test]
    fn test_display() {
        let spec = spec();
        let sel = Selection::gte(spec.dim("id").unwrap(), 2)
            .and(Selection::lt(spec.dim("id").unwrap(), 5));
        assert_eq!(sel.to_string(), "(id >= 2 AND id < 5)");

        let sel = Selection::eq(spec.dim("name").unwrap(), "x").or(Selection::none());
        assert_eq!(sel.to_string(), "(name = \"x\" OR NONE)");
    }
}
