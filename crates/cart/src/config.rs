//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROCKETSHOES_API_URL` - Base URL of the stock and catalog API (default: `http://localhost:3333`)
//! - `ROCKETSHOES_STORAGE_PATH` - File backing the local key-value store (default: `.rocketshoes/local-storage.json`)
//! - `ROCKETSHOES_CART_KEY` - Storage key holding the serialized cart (default: `@RocketShoes:cart`)
//! - `ROCKETSHOES_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: none)
//! - `ROCKETSHOES_CATALOG_CACHE_TTL_SECS` - Catalog cache TTL, `0` disables the cache (default: 0)
//! - `ROCKETSHOES_CURRENCY` - ISO 4217 code used to display prices (default: BRL)

use std::path::PathBuf;
use std::time::Duration;

use rocketshoes_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/local-storage.json";
const DEFAULT_CART_KEY: &str = "@RocketShoes:cart";
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Stock and catalog API settings
    pub api: ApiConfig,
    /// Path of the JSON file backing the key-value store
    pub storage_path: PathBuf,
    /// Key under which the cart is stored
    pub cart_key: String,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
}

/// Stock and catalog API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it
    pub base_url: Url,
    /// Per-request timeout, `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Catalog cache TTL, `None` fetches metadata on every new line
    pub catalog_cache_ttl: Option<Duration>,
}

impl ApiConfig {
    /// API configuration for `base_url` with no timeout and no catalog cache.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
            catalog_cache_ttl: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = env.or_default("ROCKETSHOES_API_URL", DEFAULT_API_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "ROCKETSHOES_API_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let timeout = env
            .parsed::<u64>("ROCKETSHOES_HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        let catalog_cache_ttl = env
            .parsed::<u64>("ROCKETSHOES_CATALOG_CACHE_TTL_SECS")?
            .unwrap_or(DEFAULT_CATALOG_CACHE_TTL_SECS);
        let catalog_cache_ttl = (catalog_cache_ttl > 0).then(|| Duration::from_secs(catalog_cache_ttl));

        let currency = env
            .parsed::<CurrencyCode>("ROCKETSHOES_CURRENCY")?
            .unwrap_or_default();

        let cart_key = env.or_default("ROCKETSHOES_CART_KEY", DEFAULT_CART_KEY);

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout,
                catalog_cache_ttl,
            },
            storage_path: PathBuf::from(env.or_default("ROCKETSHOES_STORAGE_PATH", DEFAULT_STORAGE_PATH)),
            cart_key,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get and parse an optional variable.
    fn parsed<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }
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
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3333/");
        assert_eq!(config.api.timeout, None);
        assert_eq!(config.api.catalog_cache_ttl, None);
        assert_eq!(config.storage_path, PathBuf::from(".rocketshoes/local-storage.json"));
        assert_eq!(config.cart_key, "@RocketShoes:cart");
        assert_eq!(config.currency, CurrencyCode::BRL);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ROCKETSHOES_API_URL", "https://api.rocketshoes.dev/v1/"),
            ("ROCKETSHOES_HTTP_TIMEOUT_SECS", "5"),
            ("ROCKETSHOES_CATALOG_CACHE_TTL_SECS", "300"),
            ("ROCKETSHOES_CART_KEY", "cart"),
            ("ROCKETSHOES_CURRENCY", "usd"),
        ])
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.rocketshoes.dev/v1/");
        assert_eq!(config.api.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.api.catalog_cache_ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_zero_ttl_disables_catalog_cache() {
        let config = load(&[("ROCKETSHOES_CATALOG_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.api.catalog_cache_ttl, None);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("ROCKETSHOES_CART_KEY", "  "), ("ROCKETSHOES_HTTP_TIMEOUT_SECS", "")]).unwrap();
        assert_eq!(config.cart_key, "@RocketShoes:cart");
        assert_eq!(config.api.timeout, None);
    }

    #[test]
    fn test_invalid_url() {
        let err = load(&[("ROCKETSHOES_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROCKETSHOES_API_URL"));
    }

    #[test]
    fn test_non_base_url_rejected() {
        let err = load(&[("ROCKETSHOES_API_URL", "mailto:stock@rocketshoes.dev")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[("ROCKETSHOES_HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROCKETSHOES_HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_currency() {
        let err = load(&[("ROCKETSHOES_CURRENCY", "doubloons")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable ROCKETSHOES_CURRENCY: unknown currency code: doubloons"
        );
    }
}
