//! Persistence for the storefront's JSON collections.
//!
//! # Storage: flat JSON files
//!
//! Each collection is one JSON array on disk:
//!
//! - `productos.json` - Product records, schema-free apart from `id`
//! - `carrito.json` - Carts with their line items
//!
//! Every operation loads the whole collection, mutates it in memory, and
//! writes the whole collection back. Records that do not decode are carried
//! through untouched. Writes are not atomic: a crash mid-write can leave a
//! truncated file, which later reads as an empty collection.
//!
//! Repositories serialize their own read-modify-write cycles, so concurrent
//! requests within one process do not lose updates. Separate processes
//! sharing the same files still can.

pub mod carts;
pub mod file_store;
pub mod memory;
pub mod products;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use jsonshop_core::Collection;

pub use carts::CartRepository;
pub use file_store::JsonFileStore;
pub use memory::MemoryStore;
pub use products::ProductRepository;

/// Errors raised when persisting a collection.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Writing the backing file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The collection could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Kind of record a repository looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Product,
    Cart,
}

impl Entity {
    /// Name shown to API clients.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Product => "Producto",
            Self::Cart => "Carrito",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => f.write_str("product"),
            Self::Cart => f.write_str("cart"),
        }
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The collection could not be persisted.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Requested entity was not found.
    #[error("{0} not found")]
    NotFound(Entity),
}

/// Whole-collection storage backend.
///
/// Implementations hand out raw JSON records; repositories decode them into
/// domain types.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Load every record of `collection`.
    ///
    /// Never fails: a missing, unreadable, or corrupt collection reads as
    /// empty. Implementations log which of those happened.
    async fn read(&self, collection: Collection) -> Vec<Value>;

    /// Replace the whole of `collection` with `records`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the records cannot be persisted.
    async fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError>;
}

/// One stored record, decoded when it has the expected shape.
#[derive(Debug, Clone)]
enum Entry<T> {
    Decoded(T),
    Raw(Value),
}

/// A collection as loaded from the store.
///
/// Records that do not decode as `T` are kept verbatim and written back in
/// place, so one odd record never costs the rest of the collection.
#[derive(Debug, Clone)]
pub(crate) struct Records<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Records<T> {
    /// Decoded records, in stored order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Decoded(record) => Some(record),
            Entry::Raw(_) => None,
        })
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            Entry::Decoded(record) => Some(record),
            Entry::Raw(_) => None,
        })
    }

    /// Append a record at the end of the collection.
    pub(crate) fn push(&mut self, record: T) {
        self.entries.push(Entry::Decoded(record));
    }

    /// Remove the first decoded record matching `predicate`.
    pub(crate) fn remove_first(&mut self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Decoded(record) if predicate(record)))?;
        match self.entries.remove(index) {
            Entry::Decoded(record) => Some(record),
            Entry::Raw(_) => None,
        }
    }

    /// Drop the undecodable records and keep the rest.
    pub(crate) fn into_decoded(self) -> Vec<T> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Decoded(record) => Some(record),
                Entry::Raw(_) => None,
            })
            .collect()
    }
}

impl<T: Clone> Records<T> {
    /// Copy out the decoded records.
    pub(crate) fn decoded(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Read `collection` and decode each record into `T`.
///
/// A record that does not match `T` is logged and kept as raw JSON.
pub(crate) async fn load<T: DeserializeOwned>(
    store: &dyn CollectionStore,
    collection: Collection,
) -> Records<T> {
    let entries = store
        .read(collection)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, value)| match T::deserialize(&value) {
            Ok(record) => Entry::Decoded(record),
            Err(e) => {
                warn!(%collection, index, error = %e, "Keeping record with an unexpected shape as-is");
                Entry::Raw(value)
            }
        })
        .collect();

    Records { entries }
}

/// Encode `records` and persist them as `collection`.
///
/// Raw records are written back unchanged at their original position.
pub(crate) async fn save<T: Serialize>(
    store: &dyn CollectionStore,
    collection: Collection,
    records: &Records<T>,
) -> Result<(), StoreError> {
    let values = records
        .entries
        .iter()
        .map(|entry| match entry {
            Entry::Decoded(record) => serde_json::to_value(record),
            Entry::Raw(value) => Ok(value.clone()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    store.write(collection, &values).await
}
