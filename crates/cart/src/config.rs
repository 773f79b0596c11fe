//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROCKETSHOES_API_URL` - Base URL of the storefront API (serves `/products` and `/stock`)
//!
//! ## Optional
//! - `ROCKETSHOES_STORAGE_PATH` - File backing the persistent store (default: .rocketshoes/storage.json)
//! - `ROCKETSHOES_STORAGE_KEY` - Key the cart is stored under (default: @RocketShoes:cart)
//! - `ROCKETSHOES_CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime, 0 disables (default: 300)
//! - `ROCKETSHOES_HTTP_TIMEOUT_SECS` - Per-request timeout (default: none)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default key the cart is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storefront API configuration
    pub api: ApiConfig,
    /// Persistent store configuration
    pub storage: StorageConfig,
}

/// Storefront API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; always ends with `/` so relative joins keep its path
    pub base_url: Url,
    /// How long catalog responses stay cached (`Duration::ZERO` disables)
    pub catalog_cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

/// Persistent store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// File backing the key-value store
    pub path: PathBuf,
    /// Key the serialized cart lives under
    pub key: String,
}

impl ApiConfig {
    /// Configuration with defaults for everything but the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("ROCKETSHOES_API_URL", base_url)?,
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_TTL_SECS),
            timeout: None,
        })
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("ROCKETSHOES_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("ROCKETSHOES_API_URL".to_string()))?;
        let base_url = parse_base_url("ROCKETSHOES_API_URL", &base_url)?;

        let catalog_cache_ttl = Duration::from_secs(parse_or_default(
            &lookup,
            "ROCKETSHOES_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )?);
        let timeout = lookup("ROCKETSHOES_HTTP_TIMEOUT_SECS")
            .map(|raw| parse_secs("ROCKETSHOES_HTTP_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let storage = StorageConfig {
            path: lookup("ROCKETSHOES_STORAGE_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from),
            key: lookup("ROCKETSHOES_STORAGE_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
        };

        Ok(Self {
            api: ApiConfig {
                base_url,
                catalog_cache_ttl,
                timeout,
            },
            storage,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, forcing a trailing slash on its path.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(key).map_or(Ok(default), |raw| parse_secs(key, &raw))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "ROCKETSHOES_API_URL"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ROCKETSHOES_API_URL", "http://localhost:3333")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.api.catalog_cache_ttl, Duration::from_secs(300));
        assert!(config.api.timeout.is_none());
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = load(&[("ROCKETSHOES_API_URL", "https://shop.example.com/api")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://shop.example.com/api/");
        let joined = config.api.base_url.join("products/1").unwrap();
        assert_eq!(joined.as_str(), "https://shop.example.com/api/products/1");
    }

    #[test]
    fn test_invalid_api_url() {
        let err = load(&[("ROCKETSHOES_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ROCKETSHOES_API_URL", "http://localhost:3333/"),
            ("ROCKETSHOES_STORAGE_PATH", "/tmp/cart.json"),
            ("ROCKETSHOES_STORAGE_KEY", "@Other:cart"),
            ("ROCKETSHOES_CATALOG_CACHE_TTL_SECS", "0"),
            ("ROCKETSHOES_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.storage.path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.storage.key, "@Other:cart");
        assert_eq!(config.api.catalog_cache_ttl, Duration::ZERO);
        assert_eq!(config.api.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[
            ("ROCKETSHOES_API_URL", "http://localhost:3333"),
            ("ROCKETSHOES_HTTP_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROCKETSHOES_HTTP_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_blank_storage_key_falls_back() {
        let config = load(&[
            ("ROCKETSHOES_API_URL", "http://localhost:3333"),
            ("ROCKETSHOES_STORAGE_KEY", "  "),
        ])
        .unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }
}
