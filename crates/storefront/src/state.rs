//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::{CartRepository, CollectionStore, JsonFileStore, ProductRepository};
use crate::services::ProductNotifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the repositories, the realtime notifier, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: ProductRepository,
    carts: CartRepository,
    notifier: ProductNotifier,
}

impl AppState {
    /// Create application state over an arbitrary collection store.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Backend holding both collections
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn CollectionStore>) -> Self {
        let notifier = ProductNotifier::new(config.broadcast_capacity);
        let products = ProductRepository::new(Arc::clone(&store), notifier.clone());
        let carts = CartRepository::new(store);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                carts,
                notifier,
            }),
        }
    }

    /// Create application state backed by the JSON files named in `config`.
    #[must_use]
    pub fn with_file_store(config: StorefrontConfig) -> Self {
        let store = Arc::new(JsonFileStore::new(&config.storage));
        Self::new(config, store)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the product repository.
    #[must_use]
    pub fn products(&self) -> &ProductRepository {
        &self.inner.products
    }

    /// Get the cart repository.
    #[must_use]
    pub fn carts(&self) -> &CartRepository {
        &self.inner.carts
    }

    /// Get the realtime product notifier.
    #[must_use]
    pub fn notifier(&self) -> &ProductNotifier {
        &self.inner.notifier
    }
}
