//! Rocketshoes cart library.
//!
//! A shopping-cart state manager: add, remove and update quantities with
//! per-item stock validation, persisted to a local key-value store.
//!
//! # Architecture
//!
//! - [`manager::CartManager`] owns the live cart and runs every mutation
//! - [`api`] defines the catalog and stock lookups and a `reqwest` client
//! - [`store`] defines the key-value store and its file/memory backends
//! - [`notify`] defines the fixed user-facing messages and their sinks
//! - [`config`] loads everything above from the environment

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod manager;
pub mod notify;
pub mod store;

pub use error::{CartError, CartOperation};
pub use manager::{CartManager, CartServices, SubscriptionId};
pub use notify::{Notification, Notifier};
