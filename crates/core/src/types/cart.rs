//! The cart aggregate.
//!
//! [`CartState`] is an ordered list of line items, unique per product. It is
//! immutable in spirit: every mutation helper returns a new state so callers
//! can validate and persist it before it replaces the current one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CartLineItem, ProductId};

/// Ordered sequence of cart line items, in insertion order.
///
/// Serialized as a bare JSON array of flat line item objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<CartLineItem>,
}

impl CartState {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw line items, dropping entries that break the
    /// cart's shape.
    ///
    /// Items with a zero amount are dropped, and only the first line for a
    /// given product is kept. Returns the cart and the dropped items.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> (Self, Vec<CartLineItem>) {
        let mut kept: Vec<CartLineItem> = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();

        for item in items {
            let duplicate = kept.iter().any(|k| k.product_id() == item.product_id());
            if item.amount == 0 || duplicate {
                dropped.push(item);
            } else {
                kept.push(item);
            }
        }

        (Self { items: kept }, dropped)
    }

    /// Parse a cart from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON array of line items.
    pub fn from_json(json: &str) -> Result<(Self, Vec<CartLineItem>), serde_json::Error> {
        let items: Vec<CartLineItem> = serde_json::from_str(json)?;
        Ok(Self::from_items(items))
    }

    /// Serialize the cart to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if a line item's extra metadata cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Current amount of a product, zero if absent.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount)
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Return a cart with `item` appended.
    ///
    /// If the product is already present its line is replaced in place, so
    /// the cart stays unique per product.
    #[must_use]
    pub fn with_item(&self, item: CartLineItem) -> Self {
        let mut items = self.items.clone();
        match items
            .iter_mut()
            .find(|existing| existing.product_id() == item.product_id())
        {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Self { items }
    }

    /// Return a cart where the product's line has `amount`.
    ///
    /// Lines for other products are unchanged; if the product is absent the
    /// returned cart equals this one.
    #[must_use]
    pub fn with_amount(&self, product_id: ProductId, amount: u32) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.product_id() == product_id {
                    CartLineItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Return a cart without the product's line.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Self {
        let items = self
            .items
            .iter()
            .filter(|item| item.product_id() != product_id)
            .cloned()
            .collect();
        Self { items }
    }
}
