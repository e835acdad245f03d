//! REST client for the stock and catalog API.
//!
//! Uses `reqwest` for HTTP. Catalog responses are cached using `moka`; stock
//! responses never are.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use rocketshoes_core::{ProductId, ProductMetadata, StockRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ProductCatalog, StockQuery};
use crate::config::ApiConfig;

const MAX_CACHED_PRODUCTS: u64 = 1000;

/// Stock endpoint payload.
#[derive(Debug, Deserialize)]
struct StockResponse {
    #[serde(default)]
    id: Option<ProductId>,
    amount: i64,
}

impl StockResponse {
    /// Units available; negative counts mean none.
    fn available(&self) -> u32 {
        u32::try_from(self.amount.max(0)).unwrap_or(u32::MAX)
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the stock and catalog REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_cache: Option<Cache<ProductId, ProductMetadata>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("catalog_cache", &self.inner.catalog_cache.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let catalog_cache = config.catalog_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(MAX_CACHED_PRODUCTS)
                .time_to_live(ttl)
                .build()
        });

        // Url::join replaces the last path segment unless the base ends in '/'
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                catalog_cache,
            }),
        })
    }

    /// The normalized base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// GET a JSON resource for a product.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        product_id: ProductId,
    ) -> Result<T, ApiError> {
        let url = self
            .inner
            .base_url
            .join(&format!("{resource}/{product_id}"))?;

        debug!(%url, "API request");
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(product_id));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

#[async_trait]
impl StockQuery for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, ApiError> {
        let response: StockResponse = self.get_json("stock", product_id).await?;

        if let Some(returned) = response.id
            && returned != product_id
        {
            return Err(ApiError::ProductMismatch {
                requested: product_id,
                returned,
            });
        }

        let available = response.available();
        debug!(available, reported = response.amount, "Stock fetched");
        Ok(StockRecord::new(product_id, available))
    }
}

#[async_trait]
impl ProductCatalog for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<ProductMetadata, ApiError> {
        if let Some(cache) = &self.inner.catalog_cache
            && let Some(product) = cache.get(&product_id).await
        {
            debug!("Catalog cache hit");
            return Ok(product);
        }

        let product: ProductMetadata = self.get_json("products", product_id).await?;
        if product.id != product_id {
            return Err(ApiError::ProductMismatch {
                requested: product_id,
                returned: product.id,
            });
        }

        if let Some(cache) = &self.inner.catalog_cache {
            cache.insert(product_id, product.clone()).await;
        }

        Ok(product)
    }
}
