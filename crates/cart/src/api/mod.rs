//! Catalog and stock lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] and [`StockLookup`] are the seams the cart manager depends on
//! - [`ApiClient`] implements both against the storefront REST API
//!   (`GET /products/{id}`, `GET /stock/{id}`) using `reqwest`
//! - Catalog responses are cached via `moka`; stock is always fetched fresh
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::api::{ApiClient, Catalog, StockLookup};
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let product = client.product(ProductId::new(1)).await?;
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned a non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Product attribute lookup.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch a product by id.
    async fn product(&self, id: ProductId) -> Result<Product, ApiError>;
}

/// Available-quantity lookup.
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// Fetch current stock for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError>;
}
