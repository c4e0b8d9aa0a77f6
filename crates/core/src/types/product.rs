//! Schema-free product records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// Caller-supplied product fields, stored verbatim.
pub type ProductFields = Map<String, Value>;

/// A product in the catalog.
///
/// Only `id` is known to the server; every other field (name, price, ...)
/// is kept exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    /// Create a product from an id and caller-supplied fields.
    ///
    /// An `id` key inside `fields` is dropped; the explicit id always wins.
    #[must_use]
    pub fn new(id: ProductId, mut fields: ProductFields) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    /// Overlay `fields` onto this product, keeping fields that are not supplied.
    pub fn merge(&mut self, fields: ProductFields) {
        for (key, value) in fields {
            if key != "id" {
                self.fields.insert(key, value);
            }
        }
    }

    /// Look up a caller-supplied field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Compute the id for a new product: one past the largest numeric id.
///
/// Ids that are not non-negative integers are ignored. Returns `1` when no
/// numeric id exists.
#[must_use]
pub fn next_product_id<'a>(products: impl IntoIterator<Item = &'a Product>) -> ProductId {
    let next = products
        .into_iter()
        .filter_map(|p| p.id.as_number())
        .max()
        .map_or(1, |max| max.saturating_add(1));
    ProductId::from(next)
}
