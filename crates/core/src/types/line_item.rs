//! Cart line items and the catalog metadata they capture.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ProductId;

/// Product metadata as returned by the catalog API.
///
/// The catalog may return fields beyond the ones the cart uses; those are
/// kept in `extra` so they survive a persistence round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductMetadata {
    /// Create metadata with no extra fields.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// One product's entry in the cart.
///
/// Serializes flat, i.e. the catalog fields and `amount` sit side by side in
/// a single JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: ProductMetadata,
    pub amount: u32,
}

impl CartLineItem {
    /// Create a line item from catalog metadata.
    ///
    /// An `amount` field returned by the catalog is dropped; the line's own
    /// amount is the only one serialized.
    #[must_use]
    pub fn new(mut product: ProductMetadata, amount: u32) -> Self {
        product.extra.remove("amount");
        Self { product, amount }
    }

    /// The product this line refers to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_serializes_flat() {
        let item = CartLineItem::new(
            ProductMetadata::new(ProductId::new(1), "Tênis", Decimal::new(1399, 1), "a.jpg"),
            2,
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Tênis");
        assert_eq!(json["amount"], 2);
    }

    #[test]
    fn test_catalog_extra_fields_are_kept() {
        let raw = r#"{"id":2,"title":"Bota","price":179.9,"image":"b.jpg","brand":"Acme","amount":1}"#;
        let item: CartLineItem = serde_json::from_str(raw).unwrap();

        assert_eq!(item.product_id(), ProductId::new(2));
        assert_eq!(item.product.price, Decimal::new(1799, 1));
        assert_eq!(item.product.extra.get("brand"), Some(&Value::from("Acme")));
        assert!(!item.product.extra.contains_key("amount"));
    }

    #[test]
    fn test_catalog_amount_does_not_shadow_line_amount() {
        let raw = r#"{"id":1,"title":"T","price":10,"image":"a.jpg","amount":7,"brand":"Acme"}"#;
        let product: ProductMetadata = serde_json::from_str(raw).unwrap();
        assert!(product.extra.contains_key("amount"));

        let item = CartLineItem::new(product, 1);
        assert!(!item.product.extra.contains_key("amount"));
        assert_eq!(item.product.extra.get("brand"), Some(&Value::from("Acme")));

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json.matches("\"amount\"").count(), 1);

        let restored: CartLineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, item);
        assert_eq!(restored.amount, 1);
    }

    #[test]
    fn test_subtotal() {
        let item = CartLineItem::new(
            ProductMetadata::new(ProductId::new(1), "Tênis", Decimal::new(1000, 2), "a.jpg"),
            3,
        );
        assert_eq!(item.subtotal(), Decimal::new(3000, 2));
    }
}
