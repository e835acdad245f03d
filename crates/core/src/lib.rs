//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the data model used across the RocketShoes components:
//! - `cart` - Cart state store synchronized with the stock API and local storage
//! - `cli` - Command-line driver for inspecting and mutating the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Every cart mutation is expressed as a pure function from one
//! [`CartState`] to the next; the `cart` crate decides when to apply it.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, line items, stock records and cart state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
