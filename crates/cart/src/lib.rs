//! RocketShoes Cart - Shopping cart state store.
//!
//! Keeps the shopper's cart in memory, validates quantity changes against the
//! live stock API, and persists the whole cart to a local key-value store
//! after every successful change.
//!
//! # Architecture
//!
//! - [`CartStore`] - Cloneable handle exposing the cart and its three mutations
//! - [`api`] - Stock and catalog API seams plus the `reqwest` client
//! - [`storage`] - Key-value stores (file-backed and in-memory)
//! - [`notify`] - User-facing notification sinks
//! - [`config`] - Environment-driven configuration
//!
//! # Error Handling
//!
//! Every mutation returns [`Result`]. Failures are reported to the configured
//! [`Notifier`] before they are returned, and never leave a partial change
//! behind: the cart and its stored copy are either both updated or both
//! untouched.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use api::{ApiClient, ApiError, ProductCatalog, StockQuery};
pub use config::{ApiConfig, CartConfig, ConfigError};
pub use error::{CartError, OUT_OF_STOCK_MESSAGE, Operation, Result};
pub use notify::{Notification, Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartServices, CartStore, MutationOutcome};

pub use rocketshoes_core::{CartLineItem, CartState, CurrencyCode, Price, ProductId, ProductMetadata, StockRecord};
