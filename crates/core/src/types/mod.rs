//! Core types for the RocketShoes cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod line_item;
pub mod price;
pub mod stock;

pub use cart::CartState;
pub use id::ProductId;
pub use line_item::{CartLineItem, ProductMetadata};
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use stock::StockRecord;
