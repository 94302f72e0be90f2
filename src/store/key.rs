//! User-supplied and stored composite keys
//!
//! A `Key` is what the caller hands to `insert`: one entry per
//! dimension, either a set of elements (multi positions) or an
//! `Assigned` placeholder (auto positions). A `StoredKey` is the same
//! shape after the store has filled every auto position in.

use std::collections::BTreeSet;

use crate::index::Element;

/// One position of a user-supplied key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDim {
    /// Element set for a multi dimension; may be empty
    Values(BTreeSet<Element>),
    /// Placeholder for an auto dimension
    Assigned,
}

/// A user-supplied composite key, built positionally.
///
/// ```
/// use facetstore::store::Key;
///
/// let key = Key::new()
///     .auto()
///     .value("About Haskell")
///     .values(["Haskell", "Intro"]);
/// assert_eq!(key.arity(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Key {
    dims: Vec<KeyDim>,
}

impl Key {
    /// Starts an empty key
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an auto placeholder
    pub fn auto(mut self) -> Self {
        self.dims.push(KeyDim::Assigned);
        self
    }

    /// Appends a singleton element set
    pub fn value(self, element: impl Into<Element>) -> Self {
        self.values([element])
    }

    /// Appends a set of elements
    pub fn values<I, T>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Element>,
    {
        self.dims
            .push(KeyDim::Values(elements.into_iter().map(Into::into).collect()));
        self
    }

    /// Appends an empty element set
    pub fn empty(mut self) -> Self {
        self.dims.push(KeyDim::Values(BTreeSet::new()));
        self
    }

    /// Number of positions
    pub fn arity(&self) -> usize {
        self.dims.len()
    }

    /// The positions in order
    pub fn dims(&self) -> &[KeyDim] {
        &self.dims
    }

    pub(crate) fn into_dims(self) -> Vec<KeyDim> {
        self.dims
    }
}

/// One position of a stored key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredDim {
    /// Element set installed at a multi dimension
    Multi(BTreeSet<Element>),
    /// Element the store assigned at an auto dimension
    Auto(Element),
}

/// The key as recorded in the store, auto positions filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredKey {
    dims: Vec<StoredDim>,
}

impl StoredKey {
    pub(crate) fn new(dims: Vec<StoredDim>) -> Self {
        Self { dims }
    }

    /// The positions in order
    pub fn dims(&self) -> &[StoredDim] {
        &self.dims
    }

    /// Number of positions
    pub fn arity(&self) -> usize {
        self.dims.len()
    }

    /// The auto-assigned elements, in position order.
    ///
    /// Empty for specs with no auto positions. This is what `insert`
    /// returns to the caller.
    pub fn auto_projection(&self) -> Vec<Element> {
        self.dims
            .iter()
            .filter_map(|dim| match dim {
                StoredDim::Auto(element) => Some(element.clone()),
                StoredDim::Multi(_) => None,
            })
            .collect()
    }
}
