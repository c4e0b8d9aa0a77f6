//! Core types for JSON Shop.
//!
//! This module provides type-safe wrappers for the two persisted collections.

pub mod cart;
pub mod collection;
pub mod id;
pub mod product;

pub use cart::{Cart, CartItem};
pub use collection::Collection;
pub use id::*;
pub use product::{Product, ProductFields, next_product_id};
