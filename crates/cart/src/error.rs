//! Cart operation errors and their user-facing messages.
//!
//! Every failed operation produces a [`CartError`]. The store turns it into a
//! notification via [`CartError::notification`] before handing it back, so
//! callers may ignore the error without losing the user message.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

/// Message shown when a requested amount is not covered by stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// The three cart mutations, used to pick the generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl Operation {
    /// Generic message shown when the operation fails unexpectedly.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::AddProduct => "Failed to add product",
            Self::RemoveProduct => "Failed to remove product",
            Self::UpdateProductAmount => "Failed to update product amount",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddProduct => "add_product",
            Self::RemoveProduct => "remove_product",
            Self::UpdateProductAmount => "update_product_amount",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cart operation was aborted.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount is not covered by available stock.
    #[error("Product {product_id}: requested {requested}, {available} available")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Stock or catalog API failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Key-value store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CartError {
    /// User-facing message for this error raised by `operation`.
    #[must_use]
    pub const fn notification(&self, operation: Operation) -> &'static str {
        match self {
            Self::StockExceeded { .. } => OUT_OF_STOCK_MESSAGE,
            _ => operation.failure_message(),
        }
    }

    /// Whether the error is an expected business outcome rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::StockExceeded { .. } | Self::NotInCart(_))
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
