//! Storefront REST API client.
//!
//! Uses `reqwest` for HTTP. Caches catalog products using `moka`
//! (TTL from [`ApiConfig::catalog_cache_ttl`]).

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, Catalog, StockLookup};
use crate::config::ApiConfig;

/// Upper bound on cached catalog entries.
const CATALOG_CACHE_CAPACITY: u64 = 1000;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront product and stock endpoints.
///
/// Cheap to clone; clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    catalog_cache: Option<Cache<ProductId, Product>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let catalog_cache = (!config.catalog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CATALOG_CACHE_CAPACITY)
                .time_to_live(config.catalog_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                catalog_cache,
            }),
        })
    }

    /// Fetch and decode a JSON resource relative to the base URL.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Parse(format!("Invalid request path {path}: {e}")))?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(200).collect::<String>(),
                "Storefront API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Reject a payload whose id differs from the one requested.
fn ensure_id(requested: ProductId, returned: ProductId) -> Result<(), ApiError> {
    if requested == returned {
        Ok(())
    } else {
        Err(ApiError::Parse(format!(
            "requested product {requested} but API returned {returned}"
        )))
    }
}

#[async_trait]
impl Catalog for ApiClient {
    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        if let Some(cache) = &self.inner.catalog_cache
            && let Some(product) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;
        ensure_id(id, product.id)?;

        if let Some(cache) = &self.inner.catalog_cache {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}

#[async_trait]
impl StockLookup for ApiClient {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        let stock: Stock = self.get_json(&format!("stock/{id}")).await?;
        ensure_id(id, stock.id)?;
        Ok(stock)
    }
}
