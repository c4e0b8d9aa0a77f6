//! Collection store backed by one JSON file per collection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use jsonshop_core::Collection;

use super::{CollectionStore, StoreError};
use crate::config::StorageConfig;

/// Production store: pretty-printed JSON arrays on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    products_file: PathBuf,
    carts_file: PathBuf,
}

impl JsonFileStore {
    /// Create a store for the files named in `config`.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            products_file: config.products_file.clone(),
            carts_file: config.carts_file.clone(),
        }
    }

    /// Backing file of `collection`.
    #[must_use]
    pub fn path(&self, collection: Collection) -> &Path {
        match collection {
            Collection::Products => &self.products_file,
            Collection::Carts => &self.carts_file,
        }
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    #[instrument(skip(self))]
    async fn read(&self, collection: Collection) -> Vec<Value> {
        let path = self.path(collection);
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Collection file missing, treating as empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read collection file, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Value>>(&contents) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Collection file is not a JSON array, treating as empty");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let path = self.path(collection);
        let json = serde_json::to_string_pretty(records)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;

        debug!(path = %path.display(), "Collection written");
        Ok(())
    }
}
