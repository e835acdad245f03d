//! In-process stock and catalog implementations.
//!
//! Useful for tests and for running the cart without a live API.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rocketshoes_core::{ProductId, ProductMetadata, StockRecord};

use super::{ApiError, ProductCatalog, StockQuery};

/// In-memory stock and catalog backed by hash maps.
#[derive(Debug, Default)]
pub struct InMemoryApi {
    inner: Mutex<Inventory>,
    stock_calls: AtomicUsize,
    catalog_calls: AtomicUsize,
}

#[derive(Debug, Default)]
struct Inventory {
    stock: HashMap<ProductId, u32>,
    products: HashMap<ProductId, ProductMetadata>,
    offline: bool,
}

impl InMemoryApi {
    /// Create an empty API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with its available amount.
    #[must_use]
    pub fn with_product(self, product: ProductMetadata, available: u32) -> Self {
        self.put_product(product, available);
        self
    }

    /// Register or replace a product with its available amount.
    pub fn put_product(&self, product: ProductMetadata, available: u32) {
        if let Ok(mut inventory) = self.inner.lock() {
            inventory.stock.insert(product.id, available);
            inventory.products.insert(product.id, product);
        }
    }

    /// Change the available amount of a product.
    pub fn set_stock(&self, product_id: ProductId, available: u32) {
        if let Ok(mut inventory) = self.inner.lock() {
            inventory.stock.insert(product_id, available);
        }
    }

    /// Make every subsequent call fail with [`ApiError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut inventory) = self.inner.lock() {
            inventory.offline = offline;
        }
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    /// Number of catalog lookups served so far.
    #[must_use]
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    fn read<T>(&self, f: impl FnOnce(&Inventory) -> Option<T>, product_id: ProductId) -> Result<T, ApiError> {
        let inventory = self
            .inner
            .lock()
            .map_err(|_| ApiError::Unavailable("inventory lock poisoned".to_string()))?;
        if inventory.offline {
            return Err(ApiError::Unavailable("offline".to_string()));
        }
        f(&inventory).ok_or(ApiError::NotFound(product_id))
    }
}

#[async_trait]
impl StockQuery for InMemoryApi {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, ApiError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        let available = self.read(|inv| inv.stock.get(&product_id).copied(), product_id)?;
        Ok(StockRecord::new(product_id, available))
    }
}

#[async_trait]
impl ProductCatalog for InMemoryApi {
    async fn product(&self, product_id: ProductId) -> Result<ProductMetadata, ApiError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.read(|inv| inv.products.get(&product_id).cloned(), product_id)
    }
}
