//! Newtype ID for type-safe product references.

use serde::{Deserialize, Serialize};

/// Identifier of a product in the catalog and stock APIs.
///
/// Serialized transparently as the bare integer the APIs use.
///
/// # Example
///
/// ```rust
/// # use rocketshoes_core::ProductId;
/// let id = ProductId::new(3);
/// assert_eq!(id.as_i32(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Create a new ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_as_integer() {
        let json = serde_json::to_string(&ProductId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ProductId::new(7));
    }

    #[test]
    fn test_product_id_conversions() {
        let id = ProductId::from(5);
        assert_eq!(i32::from(id), 5);
    }
}
