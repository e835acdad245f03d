//! Stock and catalog API access.
//!
//! # Architecture
//!
//! - [`StockQuery`] and [`ProductCatalog`] are the seams the cart store codes
//!   against; [`ApiClient`] implements both over REST with `reqwest`
//! - Stock is always fetched live, never cached
//! - Catalog metadata is cached in memory via `moka` (configurable TTL)
//! - [`memory`] holds in-process implementations for tests and local runs
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` -> `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` -> `{ "id": 1, "title": "...", "price": 139.9, "image": "..." }`

mod client;
pub mod memory;

pub use client::ApiClient;

use async_trait::async_trait;
use rocketshoes_core::{ProductId, ProductMetadata, StockRecord};
use thiserror::Error;

/// Errors that can occur when talking to the stock or catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Product does not exist in the API.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response described a different product than the one requested.
    #[error("Requested product {requested} but API returned product {returned}")]
    ProductMismatch {
        requested: ProductId,
        returned: ProductId,
    },

    /// Endpoint URL could not be built from the configured base URL.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Service is unreachable (used by in-process implementations).
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Source of live stock levels.
#[async_trait]
pub trait StockQuery: Send + Sync {
    /// Fetch the available amount for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, ApiError>;
}

/// Source of product metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the catalog entry for a product.
    async fn product(&self, product_id: ProductId) -> Result<ProductMetadata, ApiError>;
}
