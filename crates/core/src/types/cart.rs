//! Shopping carts and their line items.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CartId, ProductId};

/// One product reference inside a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Referenced product id. Not checked against the product collection.
    pub product: ProductId,
    pub quantity: u32,
}

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub products: Vec<CartItem>,
}

/// Read a `null` line-item list as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CartItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CartItem>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new(id: CartId) -> Self {
        Self {
            id,
            products: Vec::new(),
        }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line
    /// with quantity 1. Each product appears at most once per cart.
    pub fn add_product(&mut self, product: ProductId) -> &[CartItem] {
        if let Some(item) = self.products.iter_mut().find(|i| i.product == product) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.products.push(CartItem {
                product,
                quantity: 1,
            });
        }
        &self.products
    }
}
