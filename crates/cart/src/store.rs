//! The cart state store.
//!
//! [`CartStore`] holds the current [`CartState`] and applies the three cart
//! mutations. Each mutation follows the same shape:
//!
//! 1. Snapshot the current state
//! 2. Consult the stock (and, for new lines, catalog) API
//! 3. Compute the next state
//! 4. Persist it, then swap it in
//!
//! Failures never escape as panics; they are reported to the [`Notifier`]
//! and returned as [`CartError`] with the state left untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let store = CartStore::from_config(&config, Arc::new(TracingNotifier))?;
//!
//! store.add_product(ProductId::new(1)).await?;
//! store.update_product_amount(ProductId::new(1), 3).await?;
//! let cart = store.cart().await;
//! ```

use std::sync::Arc;

use rocketshoes_core::{CartLineItem, CartState, ProductId};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{ApiClient, ProductCatalog, StockQuery};
use crate::config::CartConfig;
use crate::error::{CartError, Operation, Result};
use crate::notify::{Notifier, Severity};
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// What a successful mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// A new state was persisted and is now current.
    Applied,
    /// Nothing to do; state and storage untouched.
    Skipped,
}

/// External collaborators of a [`CartStore`].
#[derive(Clone)]
pub struct CartServices {
    pub stock: Arc<dyn StockQuery>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub storage: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Shared handle to the cart.
///
/// This struct is cheaply cloneable via `Arc`; every clone sees and mutates
/// the same cart. Mutations are serialized so concurrent calls never
/// overwrite each other's result; reads never wait on network I/O.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    state: RwLock<CartState>,
    mutation: Mutex<()>,
    services: CartServices,
    cart_key: String,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart_key", &self.inner.cart_key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Open the cart stored under `cart_key`.
    ///
    /// The initial state is read from `services.storage`; a missing or
    /// unreadable entry yields an empty cart.
    #[must_use]
    pub fn open(cart_key: impl Into<String>, services: CartServices) -> Self {
        let cart_key = cart_key.into();
        let state = load_cart(services.storage.as_ref(), &cart_key);

        Self {
            inner: Arc::new(CartStoreInner {
                state: RwLock::new(state),
                mutation: Mutex::new(()),
                services,
                cart_key,
            }),
        }
    }

    /// Open the cart using the REST API and file storage from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &CartConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let api = Arc::new(ApiClient::new(&config.api)?);
        let storage = Arc::new(FileStore::new(&config.storage_path));

        Ok(Self::open(
            config.cart_key.clone(),
            CartServices {
                stock: api.clone(),
                catalog: api,
                storage,
                notifier,
            },
        ))
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> CartState {
        self.inner.state.read().await.clone()
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line in place, or appends a new line with
    /// amount 1 using catalog metadata.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if the new amount exceeds stock
    /// - [`CartError::Api`] / [`CartError::Storage`] on unexpected failures
    ///
    /// The error has already been reported to the notifier.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<MutationOutcome> {
        let _guard = self.inner.mutation.lock().await;
        let result = self.try_add_product(product_id).await;
        self.report(Operation::AddProduct, result)
    }

    /// Remove a product's line from the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotInCart`] if the product has no line
    /// - [`CartError::Storage`] if the new state cannot be persisted
    ///
    /// The error has already been reported to the notifier.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<MutationOutcome> {
        let _guard = self.inner.mutation.lock().await;
        let result = self.try_remove_product(product_id).await;
        self.report(Operation::RemoveProduct, result)
    }

    /// Set a product's amount.
    ///
    /// An amount of zero is ignored. Stock must strictly exceed `amount`: a
    /// request for exactly the available quantity is rejected.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockExceeded`] if `available - amount <= 0`
    /// - [`CartError::Api`] / [`CartError::Storage`] on unexpected failures
    ///
    /// The error has already been reported to the notifier.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<MutationOutcome> {
        if amount == 0 {
            debug!("Ignoring update to zero");
            return Ok(MutationOutcome::Skipped);
        }

        let _guard = self.inner.mutation.lock().await;
        let result = self.try_update_product_amount(product_id, amount).await;
        self.report(Operation::UpdateProductAmount, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<MutationOutcome> {
        let cart = self.cart().await;
        let stock = self.inner.services.stock.stock(product_id).await?;

        let current = cart.amount_of(product_id);
        let requested = current.saturating_add(1);
        if !stock.covers(requested) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.available_amount,
            });
        }

        let updated = if cart.contains(product_id) {
            cart.with_amount(product_id, requested)
        } else {
            let product = self.inner.services.catalog.product(product_id).await?;
            cart.with_item(CartLineItem::new(product, 1))
        };

        self.commit(updated).await?;
        info!(amount = requested, "Product added to cart");
        Ok(MutationOutcome::Applied)
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<MutationOutcome> {
        let cart = self.cart().await;
        if !cart.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }

        self.commit(cart.without(product_id)).await?;
        info!("Product removed from cart");
        Ok(MutationOutcome::Applied)
    }

    async fn try_update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<MutationOutcome> {
        let cart = self.cart().await;
        let stock = self.inner.services.stock.stock(product_id).await?;

        // available - amount <= 0, so amount == available is rejected too
        if stock.available_amount.saturating_sub(amount) == 0 {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.available_amount,
            });
        }

        if !cart.contains(product_id) {
            debug!("Product not in cart; persisting unchanged cart");
        }

        self.commit(cart.with_amount(product_id, amount)).await?;
        info!(amount, "Product amount updated");
        Ok(MutationOutcome::Applied)
    }

    /// Persist `updated`, then make it the current state.
    ///
    /// The key-value store is synchronous, so the write runs on the blocking
    /// pool rather than on the async worker.
    async fn commit(&self, updated: CartState) -> Result<()> {
        let json = updated.to_json()?;
        let storage = Arc::clone(&self.inner.services.storage);
        let key = self.inner.cart_key.clone();

        tokio::task::spawn_blocking(move || storage.set(&key, &json))
            .await
            .map_err(StorageError::from)??;

        *self.inner.state.write().await = updated;
        Ok(())
    }

    /// Send the user notification for a failed operation.
    fn report<T>(&self, operation: Operation, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_rejection() {
                warn!(%operation, error = %err, "Cart operation rejected");
            } else {
                error!(%operation, error = %err, "Cart operation failed");
            }
            self.inner
                .services
                .notifier
                .send(err.notification(operation), Severity::Error);
        }
        result
    }
}

/// Read the persisted cart, falling back to an empty one.
fn load_cart(storage: &dyn KeyValueStore, key: &str) -> CartState {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CartState::new(),
        Err(e) => {
            warn!(key, error = %e, "Could not read stored cart; starting empty");
            return CartState::new();
        }
    };

    match CartState::from_json(&raw) {
        Ok((cart, dropped)) => {
            if !dropped.is_empty() {
                warn!(
                    key,
                    dropped = dropped.len(),
                    "Dropped duplicate or empty lines from stored cart"
                );
            }
            debug!(key, items = cart.len(), "Loaded stored cart");
            cart
        }
        Err(e) => {
            warn!(key, error = %e, "Stored cart is malformed; starting empty");
            CartState::new()
        }
    }
}
