//! facetstore - an in-memory multi-key, multi-value store
//!
//! Associates each stored value with a composite key of several
//! independently-indexed dimensions and resolves equality/range
//! selections on any dimension, without privileging one as primary.
//!
//! ```
//! use facetstore::index::ElementType;
//! use facetstore::query::Selection;
//! use facetstore::schema::KeySpec;
//! use facetstore::store::{Key, Store};
//!
//! # fn main() -> Result<(), facetstore::store::StoreError> {
//! let spec = KeySpec::builder("articles")
//!     .auto("id", 1)
//!     .multi("name", ElementType::Text)
//!     .multi("tags", ElementType::Text)
//!     .build()?;
//! let name = spec.dim("name").unwrap();
//! let tags = spec.dim("tags").unwrap();
//!
//! let mut store = Store::new(spec);
//! store.insert(
//!     Key::new().auto().value("About Haskell").values(["haskell"]),
//!     "first article",
//! )?;
//!
//! let sel = Selection::eq(name, "About Haskell").or(Selection::eq(tags, "go"));
//! assert_eq!(store.lookup_values(&sel)?, vec![&"first article"]);
//! # Ok(())
//! # }
//! ```

pub mod index;
pub mod query;
pub mod schema;
pub mod store;
