//! Stock levels reported by the stock API.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// Available stock for a single product.
///
/// Fetched on demand before every quantity change and never cached, so it is
/// only a point-in-time observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Product the stock level belongs to.
    pub product_id: ProductId,
    /// Maximum purchasable quantity.
    pub available_amount: u32,
}

impl StockRecord {
    /// Create a new stock record.
    #[must_use]
    pub const fn new(product_id: ProductId, available_amount: u32) -> Self {
        Self {
            product_id,
            available_amount,
        }
    }

    /// Whether a cart may hold `amount` units of this product.
    #[must_use]
    pub const fn covers(&self, amount: u32) -> bool {
        amount <= self.available_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_is_inclusive() {
        let stock = StockRecord::new(ProductId::new(1), 5);
        assert!(stock.covers(4));
        assert!(stock.covers(5));
        assert!(!stock.covers(6));
    }

    #[test]
    fn test_empty_stock_covers_nothing_positive() {
        let stock = StockRecord::new(ProductId::new(1), 0);
        assert!(!stock.covers(1));
    }
}
