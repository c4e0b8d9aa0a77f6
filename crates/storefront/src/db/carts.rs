//! Cart repository.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use jsonshop_core::{Cart, CartId, CartItem, Collection, ProductId};

use super::{CollectionStore, Entity, Records, RepositoryError, load, save};

/// Repository for cart operations.
pub struct CartRepository {
    store: Arc<dyn CollectionStore>,
    writes: Mutex<()>,
}

impl CartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            writes: Mutex::new(()),
        }
    }

    async fn load(&self) -> Records<Cart> {
        load(self.store.as_ref(), Collection::Carts).await
    }

    /// Create an empty cart whose id is the current time in epoch milliseconds.
    ///
    /// If another cart already holds that millisecond, the next free one is used.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the collection cannot be written.
    #[instrument(skip(self))]
    pub async fn create(&self) -> Result<Cart, RepositoryError> {
        let _guard = self.writes.lock().await;
        let mut carts = self.load().await;

        let cart = Cart::new(unused_timestamp_id(carts.iter(), now_millis()));
        carts.push(cart.clone());
        save(self.store.as_ref(), Collection::Carts, &carts).await?;

        info!(cart_id = %cart.id, "Created cart");
        Ok(cart)
    }

    /// Line items of a cart.
    ///
    /// A cart that does not exist has no items; this is not an error.
    pub async fn get_products(&self, cart_id: &CartId) -> Vec<CartItem> {
        self.load()
            .await
            .into_decoded()
            .into_iter()
            .find(|c| &c.id == cart_id)
            .map(|c| c.products)
            .unwrap_or_default()
    }

    /// Add one unit of `product_id` to a cart.
    ///
    /// The product id is not checked against the product collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart does not exist.
    /// Returns `RepositoryError::Store` if the collection cannot be written.
    #[instrument(skip(self))]
    pub async fn add_product(
        &self,
        cart_id: &CartId,
        product_id: ProductId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let _guard = self.writes.lock().await;
        let mut carts = self.load().await;

        let cart = carts
            .iter_mut()
            .find(|c| &c.id == cart_id)
            .ok_or(RepositoryError::NotFound(Entity::Cart))?;
        let items = cart.add_product(product_id).to_vec();

        save(self.store.as_ref(), Collection::Carts, &carts).await?;

        info!(%cart_id, lines = items.len(), "Added product to cart");
        Ok(items)
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// First millisecond at or after `now` that no cart uses as its id.
fn unused_timestamp_id<'a>(carts: impl IntoIterator<Item = &'a Cart>, now: u64) -> CartId {
    let taken: HashSet<u64> = carts.into_iter().filter_map(|c| c.id.as_number()).collect();
    let mut candidate = now;
    while taken.contains(&candidate) {
        candidate = candidate.saturating_add(1);
    }
    CartId::from(candidate)
}
