//! In-memory collection store for tests and local experiments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use jsonshop_core::Collection;

use super::{CollectionStore, StoreError};

/// Keeps each collection as a vector of JSON records.
///
/// Writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `collection` with `records`.
    #[must_use]
    pub fn with_records(mut self, collection: Collection, records: Vec<Value>) -> Self {
        self.collections.get_mut().insert(collection, records);
        self
    }

    /// Snapshot of the records currently stored for `collection`.
    pub async fn records(&self, collection: Collection) -> Vec<Value> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn read(&self, collection: Collection) -> Vec<Value> {
        self.records(collection).await
    }

    async fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other(format!(
                "writes to {collection} are disabled"
            ))));
        }
        self.collections
            .write()
            .await
            .insert(collection, records.to_vec());
        Ok(())
    }
}
