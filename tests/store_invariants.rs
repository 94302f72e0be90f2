//! Store Invariant Tests
//!
//! Tests for the index/value lock-step invariants:
//! - Index buckets mirror stored keys exactly, per dimension
//! - Auto elements are unique over live oids
//! - Oids allocate monotonically and are never reused
//! - Size equals the value table cardinality

use std::collections::BTreeSet;

use facetstore::index::{DimensionIndex, Element, ElementType};
use facetstore::query::Selection;
use facetstore::schema::KeySpec;
use facetstore::store::{Key, Oid, Store, StoredDim, UpdateAction};

// =============================================================================
// Helper Functions
// =============================================================================

fn article_spec() -> KeySpec {
    KeySpec::builder("articles")
        .auto("id", 1)
        .multi("name", ElementType::Text)
        .multi("body", ElementType::Text)
        .multi("tags", ElementType::Text)
        .build()
        .unwrap()
}

fn article_key(name: &str, body: &str, tags: &[&str]) -> Key {
    Key::new()
        .auto()
        .value(name)
        .value(body)
        .values(tags.iter().copied())
}

/// Elements whose bucket contains the oid at one index.
fn elements_of(index: &DimensionIndex, oid: Oid) -> BTreeSet<Element> {
    index
        .iter()
        .filter(|(_, ids)| ids.contains(&oid))
        .map(|(element, _)| element.clone())
        .collect()
}

/// Asserts the lock-step invariant: for every live oid and every
/// dimension, the bucket membership equals the stored key.
fn assert_indexes_mirror_keys(store: &Store<String>) {
    for oid in store.oids() {
        let (_, key) = store.get(oid).unwrap();
        for (pos, dim) in key.dims().iter().enumerate() {
            let indexed = elements_of(store.index_at(pos).unwrap(), oid);
            match dim {
                StoredDim::Multi(elements) => assert_eq!(
                    &indexed, elements,
                    "multi dimension {} out of step for oid {}",
                    pos, oid
                ),
                StoredDim::Auto(element) => {
                    let expected: BTreeSet<Element> = [element.clone()].into_iter().collect();
                    assert_eq!(
                        indexed, expected,
                        "auto dimension {} out of step for oid {}",
                        pos, oid
                    );
                }
            }
        }
    }
}

fn populated_store() -> Store<String> {
    Store::from_pairs(
        article_spec(),
        vec![
            (
                article_key("About Haskell", "Haskell is great", &["haskell"]),
                "Article1".to_string(),
            ),
            (
                article_key("Intro", "Short intro", &["go", "haskell"]),
                "Article2".to_string(),
            ),
            (article_key("Notes", "Scratch", &[]), "Article3".to_string()),
        ],
    )
    .unwrap()
}

// =============================================================================
// Lock-Step Invariant Tests
// =============================================================================

/// Indexes mirror stored keys after inserts.
#[test]
fn test_indexes_mirror_keys_after_insert() {
    let store = populated_store();
    assert_indexes_mirror_keys(&store);
}

/// Indexes mirror stored keys after deletes.
#[test]
fn test_indexes_mirror_keys_after_delete() {
    let mut store = populated_store();
    let tags = store.spec().dim("tags").unwrap();

    store.delete(&Selection::eq(tags, "go")).unwrap();
    assert_eq!(store.size(), 2);
    assert_indexes_mirror_keys(&store);
}

/// Indexes mirror stored keys after a key-replacing update.
#[test]
fn test_indexes_mirror_keys_after_rekey() {
    let mut store = populated_store();
    let id = store.spec().dim("id").unwrap();

    store
        .update(&Selection::eq(id, 2), |_, _| {
            UpdateAction::SetValueAndKey(
                "Article2v2".to_string(),
                article_key("Renamed", "Short intro", &["go"]),
            )
        })
        .unwrap();
    assert_indexes_mirror_keys(&store);
}

/// An update that moves an oid between buckets of the same dimension
/// leaves no trace under the old element.
#[test]
fn test_rekey_moves_bucket_within_dimension() {
    let mut store = populated_store();
    let spec = store.spec().clone();
    let id = spec.dim("id").unwrap();
    let name = spec.dim("name").unwrap();

    store
        .update(&Selection::eq(id, 1), |_, _| {
            UpdateAction::SetValueAndKey(
                "Article1".to_string(),
                article_key("Retitled", "Haskell is great", &["haskell"]),
            )
        })
        .unwrap();

    let name_index = store.index_at(1).unwrap();
    assert!(name_index.lookup(&Element::text("About Haskell")).is_empty());
    assert!(name_index.contains(&Element::text("Retitled"), Oid::new(1)));
    assert_eq!(
        store
            .lookup_values(&Selection::eq(name, "Retitled"))
            .unwrap()
            .len(),
        1
    );
}

/// Deleting the only oid under an element drops the bucket entirely.
#[test]
fn test_last_delete_drops_bucket() {
    let mut store = populated_store();
    let id = store.spec().dim("id").unwrap();

    store.delete(&Selection::eq(id, 1)).unwrap();

    let name_index = store.index_at(1).unwrap();
    assert_eq!(
        elements_of(name_index, Oid::new(1)),
        BTreeSet::new(),
        "no residue under any element"
    );
    // bucket count only reflects live names
    assert_eq!(name_index.bucket_count(), 2);
}

// =============================================================================
// Auto Uniqueness and Oid Monotonicity
// =============================================================================

/// Auto elements are injective over live oids, and survive rekeying.
#[test]
fn test_auto_elements_unique_and_stable() {
    let mut store = populated_store();
    let id = store.spec().dim("id").unwrap();

    store
        .update(&Selection::eq(id, 2), |_, _| {
            UpdateAction::SetValueAndKey(
                "Article2".to_string(),
                article_key("Other", "Short intro", &["go"]),
            )
        })
        .unwrap();

    let mut assigned = BTreeSet::new();
    for oid in store.oids() {
        let (_, key) = store.get(oid).unwrap();
        let autos = key.auto_projection();
        assert_eq!(autos.len(), 1);
        assert!(assigned.insert(autos[0].clone()), "auto element reused");
    }
    let (_, key) = store.get(Oid::new(2)).unwrap();
    assert_eq!(key.auto_projection(), vec![Element::int(2)]);
}

/// Oids and auto elements are never reused after deletion.
#[test]
fn test_no_reuse_after_delete() {
    let mut store = Store::new(article_spec());
    let spec = store.spec().clone();
    let id = spec.dim("id").unwrap();

    store
        .insert(article_key("A", "a", &[]), "first".to_string())
        .unwrap();
    store.delete(&Selection::eq(id, 1)).unwrap();
    assert!(store.is_empty());

    let assigned = store
        .insert(article_key("B", "b", &[]), "second".to_string())
        .unwrap();

    // both the oid and the auto element move past the deleted ones
    assert_eq!(store.oids().map(|o| o.value()).collect::<Vec<_>>(), vec![2]);
    assert_eq!(assigned, vec![Element::int(2)]);
}

// =============================================================================
// Size Laws
// =============================================================================

/// Insert increments size by one.
#[test]
fn test_insert_increments_size() {
    let mut store = Store::new(article_spec());
    assert_eq!(store.size(), 0);

    for n in 1..=5 {
        store
            .insert(article_key("N", "b", &["t"]), format!("a{}", n))
            .unwrap();
        assert_eq!(store.size(), n);
    }
}

/// Deleting a selection shrinks size by the matched count and leaves
/// nothing for the same selection to find.
#[test]
fn test_delete_shrinks_size_by_matched() {
    let mut store = populated_store();
    let tags = store.spec().dim("tags").unwrap();
    let sel = Selection::eq(tags, "haskell");

    let matched = store.select(&sel).unwrap().len();
    assert_eq!(matched, 2);

    let deleted = store.delete(&sel).unwrap();
    assert_eq!(deleted, matched);
    assert_eq!(store.size(), 1);
    assert!(store.lookup_values(&sel).unwrap().is_empty());
}

/// An identity update over ALL preserves values and every bucket.
#[test]
fn test_identity_update_preserves_store() {
    let mut store = populated_store();
    let before = store.clone();

    store
        .update(&Selection::all(), |value, _| {
            UpdateAction::SetValue(value.clone())
        })
        .unwrap();

    assert_eq!(store, before);
}
