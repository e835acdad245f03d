//! Cart commands.
//!
//! Each mutating command prints any notifications the store raised, then the
//! resulting cart.
//!
//! # Environment Variables
//!
//! - `ROCKETSHOES_API_URL` - Stock and catalog API base URL
//! - `ROCKETSHOES_STORAGE_PATH` - Local storage file
//! - `ROCKETSHOES_CURRENCY` - Currency used for prices

mod render;

use std::sync::Arc;

use rocketshoes_cart::{
    CartConfig, CartError, CartStore, ConfigError, CurrencyCode, MutationOutcome, ProductId,
    RecordingNotifier,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart operation failed or was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),
}

/// An opened cart plus the notifier collecting its messages.
pub struct Session {
    store: CartStore,
    notifier: Arc<RecordingNotifier>,
    currency: CurrencyCode,
}

impl Session {
    /// Open the cart described by the environment.
    pub fn from_env() -> Result<Self, CommandError> {
        let config = CartConfig::from_env()?;
        let notifier = Arc::new(RecordingNotifier::new());
        let store = CartStore::from_config(&config, notifier.clone())?;

        tracing::debug!(
            api = %config.api.base_url,
            storage = %config.storage_path.display(),
            "Cart opened"
        );

        Ok(Self {
            store,
            notifier,
            currency: config.currency,
        })
    }

    /// Print the current cart.
    pub async fn show(&self, json: bool) -> Result<(), CommandError> {
        let cart = self.store.cart().await;
        let output = if json {
            cart.to_json().map_err(CartError::from)?
        } else {
            render::cart_table(&cart, self.currency)
        };
        emit(&output);
        Ok(())
    }

    pub async fn add(&self, product_id: ProductId) -> Result<(), CommandError> {
        let result = self.store.add_product(product_id).await;
        self.finish(result).await
    }

    pub async fn remove(&self, product_id: ProductId) -> Result<(), CommandError> {
        let result = self.store.remove_product(product_id).await;
        self.finish(result).await
    }

    pub async fn update(&self, product_id: ProductId, amount: u32) -> Result<(), CommandError> {
        let result = self.store.update_product_amount(product_id, amount).await;
        self.finish(result).await
    }

    /// Print notifications and the cart, then surface the operation result.
    async fn finish(&self, result: rocketshoes_cart::Result<MutationOutcome>) -> Result<(), CommandError> {
        for notification in self.notifier.take() {
            emit(&render::notification_line(&notification));
        }

        let cart = self.store.cart().await;
        emit(&render::cart_table(&cart, self.currency));

        result.map(|_| ()).map_err(CommandError::from)
    }
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{output}");
}
