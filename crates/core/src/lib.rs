//! JSON Shop Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront server and
//! its test harness:
//! - `storefront` - REST API, realtime feed, and server-rendered pages
//! - `integration-tests` - Router-level and live-server tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure collection logic - no file
//! access, no HTTP. This keeps it lightweight and usable from tests and
//! tools alike.
//!
//! # Modules
//!
//! - [`types`] - String-backed ids, products, carts, and collection names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
