//! Rocketshoes Core - Shared cart domain types.
//!
//! This crate provides the types used across all Rocketshoes components:
//! - `cart` - Cart manager library (lookups, persistence, notifications)
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, products, stock and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
