//! Business logic services for storefront.
//!
//! # Services
//!
//! - `notifier` - Fan-out of the product list to realtime clients

pub mod notifier;

pub use notifier::{ProductList, ProductNotifier, ProductSubscription};
