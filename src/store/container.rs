//! Store container
//!
//! Owns the primary oid → (value, stored key) table and one
//! `DimensionIndex` per key dimension, kept in lock step: an oid is
//! present in `values` exactly when every index slot carries it under
//! its stored elements. All key validation happens before any index
//! edit, so a failed operation leaves the store untouched.

use std::collections::BTreeMap;

use crate::index::{DimensionIndex, Element};
use crate::query::evaluator::{self, ResolvedSet};
use crate::query::Selection;
use crate::schema::{validate_key, DimensionMode, KeySpec};

use super::errors::{StoreError, StoreResult};
use super::key::{Key, KeyDim, StoredDim, StoredKey};
use super::oid::{Oid, OidSet};

/// What an update closure decides for one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction<V> {
    /// Remove the entry from the store and every index
    Delete,
    /// Replace the value; key and indexes untouched
    SetValue(V),
    /// Replace the value and the multi positions of the key.
    ///
    /// Auto positions keep the elements assigned at insert; the
    /// supplied key must carry `Assigned` placeholders there.
    SetValueAndKey(V, Key),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    value: V,
    key: StoredKey,
}

/// In-memory multi-key, multi-value store.
///
/// Every dimension of the composite key is independently indexed;
/// selections resolve against those indexes without privileging any
/// dimension as primary. Mutation requires `&mut self`; reads take
/// `&self`, so the one-writer/many-readers policy is enforced by the
/// borrow checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store<V> {
    spec: KeySpec,
    values: BTreeMap<Oid, Entry<V>>,
    indices: Vec<DimensionIndex>,
    next_oid: u64,
}

impl<V> Store<V> {
    /// Creates an empty store for the given spec.
    ///
    /// Every auto generator sits at its configured start; the first
    /// insert allocates oid 1.
    pub fn new(spec: KeySpec) -> Self {
        let indices = spec
            .dims()
            .iter()
            .map(|dim| match dim.mode {
                DimensionMode::Multi { .. } => DimensionIndex::new(),
                DimensionMode::Auto { start } => DimensionIndex::with_sequence(start),
            })
            .collect();

        Self {
            spec,
            values: BTreeMap::new(),
            indices,
            next_oid: 1,
        }
    }

    /// Builds a store by inserting each pair in order.
    ///
    /// The resulting oids are 1..=n in input order and auto elements
    /// follow each generator from its start.
    pub fn from_pairs<I>(spec: KeySpec, pairs: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (Key, V)>,
    {
        let mut store = Self::new(spec);
        for (key, value) in pairs {
            store.insert(key, value)?;
        }
        Ok(store)
    }

    /// The spec this store was built from
    pub fn spec(&self) -> &KeySpec {
        &self.spec
    }

    /// Number of stored values
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value and stored key at an oid, if live
    pub fn get(&self, oid: Oid) -> Option<(&V, &StoredKey)> {
        self.values.get(&oid).map(|entry| (&entry.value, &entry.key))
    }

    /// Returns true if the oid is live
    pub fn contains(&self, oid: Oid) -> bool {
        self.values.contains_key(&oid)
    }

    /// Live oids, ascending
    pub fn oids(&self) -> impl Iterator<Item = Oid> + '_ {
        self.values.keys().copied()
    }

    /// The index at a dimension position, for inspection
    pub fn index_at(&self, pos: usize) -> Option<&DimensionIndex> {
        self.indices.get(pos)
    }

    /// Stores `value` under `key`, allocating a fresh oid.
    ///
    /// Returns the auto-assigned elements in position order (empty
    /// for specs without auto dimensions). Callers that do not need
    /// them simply drop the result.
    pub fn insert(&mut self, key: Key, value: V) -> StoreResult<Vec<Element>> {
        validate_key(&self.spec, &key)?;

        let oid = Oid::new(self.next_oid);

        // Fill auto positions first; only generators advance here, so
        // nothing is half-indexed if the stored key cannot be built.
        let mut stored_dims = Vec::with_capacity(key.arity());
        for (position, dim) in key.into_dims().into_iter().enumerate() {
            match dim {
                KeyDim::Values(elements) => stored_dims.push(StoredDim::Multi(elements)),
                KeyDim::Assigned => {
                    // validate_key aligned modes, so this slot owns a generator
                    let element = self.indices[position]
                        .assign_next()
                        .ok_or(StoreError::CorruptedEntry { oid, position })?;
                    stored_dims.push(StoredDim::Auto(element));
                }
            }
        }

        let stored = StoredKey::new(stored_dims);
        self.index_stored(oid, &stored);
        let projection = stored.auto_projection();
        self.values.insert(oid, Entry { value, key: stored });
        self.next_oid += 1;

        tracing::debug!(oid = %oid, autos = projection.len(), "stored new value");
        Ok(projection)
    }

    /// Resolves a selection to the set of matching oids.
    pub fn select(&self, selection: &Selection) -> StoreResult<OidSet> {
        match evaluator::resolve(selection, self.spec.shape_id(), &self.indices)? {
            ResolvedSet::All => Ok(self.values.keys().copied().collect()),
            ResolvedSet::Ids(ids) => Ok(ids),
        }
    }

    /// Values matched by a selection, with their auto-assigned
    /// elements.
    ///
    /// Results come in ascending oid order; treat the order as an
    /// implementation detail, not a contract.
    pub fn lookup(&self, selection: &Selection) -> StoreResult<Vec<(&V, Vec<Element>)>> {
        let ids = self.select(selection)?;
        Ok(ids
            .iter()
            .filter_map(|oid| {
                self.values
                    .get(oid)
                    .map(|entry| (&entry.value, entry.key.auto_projection()))
            })
            .collect())
    }

    /// Values matched by a selection.
    pub fn lookup_values(&self, selection: &Selection) -> StoreResult<Vec<&V>> {
        let ids = self.select(selection)?;
        Ok(ids
            .iter()
            .filter_map(|oid| self.values.get(oid).map(|entry| &entry.value))
            .collect())
    }

    /// Applies `f` to every entry matched by the selection.
    ///
    /// The selection is resolved up front; `f` then decides per entry
    /// whether to delete it, replace its value, or replace its value
    /// and the multi positions of its key (auto elements never
    /// change). Index edits for each entry complete before the next
    /// entry is visited, and the final state does not depend on
    /// visiting order. Returns the number of entries visited.
    pub fn update<F>(&mut self, selection: &Selection, mut f: F) -> StoreResult<usize>
    where
        F: FnMut(&V, &StoredKey) -> UpdateAction<V>,
    {
        let ids = self.select(selection)?;
        let mut visited = 0;

        for oid in ids {
            let action = match self.values.get(&oid) {
                Some(entry) => f(&entry.value, &entry.key),
                None => continue,
            };

            match action {
                UpdateAction::Delete => {
                    if let Some(entry) = self.values.remove(&oid) {
                        self.unindex(oid, &entry.key);
                    }
                }
                UpdateAction::SetValue(value) => {
                    if let Some(entry) = self.values.get_mut(&oid) {
                        entry.value = value;
                    }
                }
                UpdateAction::SetValueAndKey(value, user_key) => {
                    validate_key(&self.spec, &user_key)?;
                    let old_key = match self.values.get(&oid) {
                        Some(entry) => entry.key.clone(),
                        None => continue,
                    };
                    let new_key = Self::merge_replacement(oid, &old_key, user_key)?;
                    self.unindex(oid, &old_key);
                    self.index_stored(oid, &new_key);
                    if let Some(entry) = self.values.get_mut(&oid) {
                        entry.value = value;
                        entry.key = new_key;
                    }
                }
            }
            visited += 1;
        }

        tracing::debug!(visited, remaining = self.values.len(), "update applied");
        Ok(visited)
    }

    /// Deletes every entry matched by the selection.
    ///
    /// Returns the number of entries deleted.
    pub fn delete(&mut self, selection: &Selection) -> StoreResult<usize> {
        self.update(selection, |_, _| UpdateAction::Delete)
    }

    /// Builds a replacement stored key: auto elements from the old
    /// key, multi sets from the validated user key.
    fn merge_replacement(oid: Oid, old: &StoredKey, user: Key) -> StoreResult<StoredKey> {
        if old.arity() != user.arity() {
            return Err(StoreError::CorruptedEntry {
                oid,
                position: old.arity().min(user.arity()),
            });
        }

        let mut dims = Vec::with_capacity(old.arity());
        for (position, (old_dim, user_dim)) in
            old.dims().iter().zip(user.into_dims()).enumerate()
        {
            match (old_dim, user_dim) {
                (StoredDim::Auto(element), KeyDim::Assigned) => {
                    dims.push(StoredDim::Auto(element.clone()));
                }
                (StoredDim::Multi(_), KeyDim::Values(elements)) => {
                    dims.push(StoredDim::Multi(elements));
                }
                _ => return Err(StoreError::CorruptedEntry { oid, position }),
            }
        }
        Ok(StoredKey::new(dims))
    }

    /// Adds an oid to every index slot under its stored key.
    fn index_stored(&mut self, oid: Oid, key: &StoredKey) {
        for (position, dim) in key.dims().iter().enumerate() {
            match dim {
                StoredDim::Multi(elements) => self.indices[position].insert_set(elements, oid),
                StoredDim::Auto(element) => self.indices[position].insert(element.clone(), oid),
            }
        }
    }

    /// Removes an oid from every index slot under its stored key.
    fn unindex(&mut self, oid: Oid, key: &StoredKey) {
        for (position, dim) in key.dims().iter().enumerate() {
            match dim {
                StoredDim::Multi(elements) => self.indices[position].remove_set(elements, oid),
                StoredDim::Auto(element) => self.indices[position].remove(element, oid),
            }
        }
    }
}
