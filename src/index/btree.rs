//! BTreeMap-based dimension indexes
//!
//! Each key dimension owns one `DimensionIndex`: an ordered map from
//! element value to the set of oids stored under it. Oid sets are
//! `BTreeSet`s, so every lookup is deterministic and ascending.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::store::{Oid, OidSet};

/// Type tag for the element stored at a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Boolean value
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// UTF-8 text
    Text,
}

impl ElementType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::Int => "int",
            ElementType::Float => "float",
            ElementType::Text => "text",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// An element value at one key dimension.
///
/// Supports Bool, Int (i64), Float (f64 bits remapped for total
/// ordering), Text. Ordering is deterministic:
/// Bool < Int < Float < Text, then within-variant order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (stored as remapped bits for total ordering)
    Float(u64),
    /// Text value
    Text(String),
}

impl Element {
    /// Create an element from a boolean
    pub fn bool(v: bool) -> Self {
        Element::Bool(v)
    }

    /// Create an element from an integer
    pub fn int(v: i64) -> Self {
        Element::Int(v)
    }

    /// Create an element from a float.
    ///
    /// Uses bit representation for total ordering: negative floats
    /// have all bits flipped, positive floats only the sign bit.
    pub fn float(v: f64) -> Self {
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        Element::Float(ordered)
    }

    /// Create an element from text
    pub fn text(v: impl Into<String>) -> Self {
        Element::Text(v.into())
    }

    /// Decode a `Float` element back to the f64 it was built from.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Element::Float(ordered) => {
                let bits = if (ordered >> 63) == 1 {
                    ordered ^ (1 << 63)
                } else {
                    !ordered
                };
                Some(f64::from_bits(bits))
            }
            _ => None,
        }
    }

    /// Returns the type tag of this element
    pub fn element_type(&self) -> ElementType {
        match self {
            Element::Bool(_) => ElementType::Bool,
            Element::Int(_) => ElementType::Int,
            Element::Float(_) => ElementType::Float,
            Element::Text(_) => ElementType::Text,
        }
    }

    /// Create an element from a JSON value.
    ///
    /// Arrays, objects and null are not valid elements.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Element::bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Element::int(i))
                } else {
                    n.as_f64().map(Element::float)
                }
            }
            serde_json::Value::String(s) => Some(Element::text(s)),
            _ => None,
        }
    }

    /// Render this element as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Element::Bool(b) => serde_json::Value::Bool(*b),
            Element::Int(i) => serde_json::Value::from(*i),
            Element::Float(_) => {
                let f = self.as_float().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
            Element::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Bool(b) => write!(f, "{}", b),
            Element::Int(i) => write!(f, "{}", i),
            Element::Float(_) => write!(f, "{}", self.as_float().unwrap_or(f64::NAN)),
            Element::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for Element {
    fn from(v: bool) -> Self {
        Element::bool(v)
    }
}

impl From<i32> for Element {
    fn from(v: i32) -> Self {
        Element::int(i64::from(v))
    }
}

impl From<i64> for Element {
    fn from(v: i64) -> Self {
        Element::int(v)
    }
}

impl From<f64> for Element {
    fn from(v: f64) -> Self {
        Element::float(v)
    }
}

impl From<&str> for Element {
    fn from(v: &str) -> Self {
        Element::text(v)
    }
}

impl From<String> for Element {
    fn from(v: String) -> Self {
        Element::Text(v)
    }
}

/// Deterministic element generator for an auto-assigned dimension.
///
/// Returns the current counter value and advances by one. Identical
/// call sequences yield identical outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSequence {
    next: i64,
}

impl AutoSequence {
    /// Creates a sequence whose first assigned element is `start`
    pub fn new(start: i64) -> Self {
        Self { next: start }
    }

    /// Returns the current element and advances the sequence
    pub fn assign_next(&mut self) -> Element {
        let assigned = self.next;
        self.next += 1;
        Element::Int(assigned)
    }

    /// The value the next call to `assign_next` will return
    pub fn peek(&self) -> i64 {
        self.next
    }
}

/// A single dimension index: ordered map from element to oid-set.
///
/// Auto dimensions additionally own their `AutoSequence`. Buckets
/// emptied by removal are dropped from the tree so range scans never
/// walk dead keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionIndex {
    tree: BTreeMap<Element, OidSet>,
    seq: Option<AutoSequence>,
}

impl DimensionIndex {
    /// Creates an empty index for a multi dimension
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
            seq: None,
        }
    }

    /// Creates an empty index for an auto dimension whose generator
    /// starts at `start`
    pub fn with_sequence(start: i64) -> Self {
        Self {
            tree: BTreeMap::new(),
            seq: Some(AutoSequence::new(start)),
        }
    }

    /// Returns true if this index owns an auto generator
    pub fn is_auto(&self) -> bool {
        self.seq.is_some()
    }

    /// Returns the generator's current element and advances it.
    ///
    /// `None` on a multi-dimension index.
    pub fn assign_next(&mut self) -> Option<Element> {
        self.seq.as_mut().map(AutoSequence::assign_next)
    }

    /// Add an oid under a single element, creating the bucket if absent.
    pub fn insert(&mut self, element: Element, oid: Oid) {
        self.tree.entry(element).or_default().insert(oid);
    }

    /// Add an oid under every element of a set.
    ///
    /// An empty set leaves the tree untouched; such an oid is live at
    /// this dimension without occupying any bucket.
    pub fn insert_set(&mut self, elements: &BTreeSet<Element>, oid: Oid) {
        for element in elements {
            self.insert(element.clone(), oid);
        }
    }

    /// Remove an oid from the bucket at `element`.
    ///
    /// Drops the bucket when it becomes empty.
    pub fn remove(&mut self, element: &Element, oid: Oid) {
        if let Some(ids) = self.tree.get_mut(element) {
            ids.remove(&oid);
            if ids.is_empty() {
                self.tree.remove(element);
            }
        }
    }

    /// Remove an oid from the bucket of every element in a set.
    pub fn remove_set(&mut self, elements: &BTreeSet<Element>, oid: Oid) {
        for element in elements {
            self.remove(element, oid);
        }
    }

    /// The oid-set stored under `element`, or empty.
    pub fn lookup(&self, element: &Element) -> OidSet {
        self.tree.get(element).cloned().unwrap_or_default()
    }

    /// Returns true if `oid` is present in the bucket at `element`
    pub fn contains(&self, element: &Element, oid: Oid) -> bool {
        self.tree
            .get(element)
            .map(|ids| ids.contains(&oid))
            .unwrap_or(false)
    }

    /// Union of buckets strictly below `element` and strictly above it.
    ///
    /// The bucket at `element` itself, if present, is in neither half.
    pub fn split(&self, element: &Element) -> (OidSet, OidSet) {
        let mut less = OidSet::new();
        for ids in self
            .tree
            .range((Bound::Unbounded, Bound::Excluded(element)))
            .map(|(_, ids)| ids)
        {
            less.extend(ids.iter().copied());
        }

        let mut greater = OidSet::new();
        for ids in self
            .tree
            .range((Bound::Excluded(element), Bound::Unbounded))
            .map(|(_, ids)| ids)
        {
            greater.extend(ids.iter().copied());
        }

        (less, greater)
    }

    /// As `split`, plus the bucket at `element` itself (empty if absent).
    pub fn split_lookup(&self, element: &Element) -> (OidSet, OidSet, OidSet) {
        let (less, greater) = self.split(element);
        (less, self.lookup(element), greater)
    }

    /// Number of distinct elements with a live bucket
    pub fn bucket_count(&self) -> usize {
        self.tree.len()
    }

    /// Total number of (element, oid) entries
    pub fn entry_count(&self) -> usize {
        self.tree.values().map(BTreeSet::len).sum()
    }

    /// Iterate buckets in ascending element order
    pub fn iter(&self) -> impl Iterator<Item = (&Element, &OidSet)> {
        self.tree.iter()
    }
}

impl Default for DimensionIndex {
    fn default() -> Self {
        Self::new()
    }
}
