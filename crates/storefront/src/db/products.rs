//! Product repository.
//!
//! CRUD over the product collection. Every mutation rewrites the whole
//! collection and then broadcasts the new list to realtime clients.
//!
//! Ids are matched by exact string equality for get, update, and delete.
//! Numeric ids from older files are normalized to strings when read, so
//! `"1"` matches a stored `1`.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, instrument};

use jsonshop_core::{Collection, Product, ProductFields, ProductId, next_product_id};

use super::{CollectionStore, Entity, Records, RepositoryError, load, save};
use crate::services::ProductNotifier;

/// Repository for product operations.
pub struct ProductRepository {
    store: Arc<dyn CollectionStore>,
    notifier: ProductNotifier,
    writes: Mutex<()>,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>, notifier: ProductNotifier) -> Self {
        Self {
            store,
            notifier,
            writes: Mutex::new(()),
        }
    }

    /// Get every product, in stored order.
    pub async fn list_all(&self) -> Vec<Product> {
        self.load().await.into_decoded()
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.list_all()
            .await
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound(Entity::Product))
    }

    /// Create a product from caller-supplied fields.
    ///
    /// The id is one past the largest numeric id in the collection; any `id`
    /// in `fields` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the collection cannot be written.
    #[instrument(skip(self, fields))]
    pub async fn create(&self, fields: ProductFields) -> Result<Product, RepositoryError> {
        let _guard = self.writes.lock().await;
        let mut products = self.load().await;

        let product = Product::new(next_product_id(products.iter()), fields);
        products.push(product.clone());
        self.persist(&products).await?;

        info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    /// Overlay `fields` onto an existing product.
    ///
    /// Fields not present in `fields` are kept. The id stays `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    /// Returns `RepositoryError::Store` if the collection cannot be written.
    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: &ProductId,
        fields: ProductFields,
    ) -> Result<Product, RepositoryError> {
        let _guard = self.writes.lock().await;
        let mut products = self.load().await;

        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound(Entity::Product))?;
        product.merge(fields);
        product.id = id.clone();
        let updated = product.clone();

        self.persist(&products).await?;

        info!(product_id = %id, "Updated product");
        Ok(updated)
    }

    /// Delete a product, returning the removed record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    /// Returns `RepositoryError::Store` if the collection cannot be written.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let _guard = self.writes.lock().await;
        let mut products = self.load().await;

        let removed = products
            .remove_first(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound(Entity::Product))?;

        self.persist(&products).await?;

        info!(product_id = %id, "Deleted product");
        Ok(removed)
    }

    async fn load(&self) -> Records<Product> {
        load(self.store.as_ref(), Collection::Products).await
    }

    /// Write the collection, then tell realtime clients about it.
    async fn persist(&self, products: &Records<Product>) -> Result<(), RepositoryError> {
        save(self.store.as_ref(), Collection::Products, products).await?;
        self.notifier.broadcast_products(&products.decoded());
        Ok(())
    }
}
