//! # Configuration Module
//!
//! Runtime settings for the server, read from the environment (a `.env`
//! file is loaded first by `main`).

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_WOOLWORTHS_SEARCH_URL: &str =
    "https://www.woolworths.com.au/apis/ui/Search/products";
pub const WOOLWORTHS_PRODUCT_URL: &str = "https://www.woolworths.com.au/shop/productdetails/";

/// Circuit breaker settings for the live price backend
#[derive(Debug, Clone, PartialEq)]
pub struct BreakerConfig {
    /// Consecutive failures before the breaker opens
    pub failure_threshold: u32,
    /// Seconds the breaker stays open
    pub reset_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_secs: 60, // 1 minute
        }
    }
}

/// Settings for the two price backends
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Search endpoint of the live store backend
    pub woolworths_search_url: String,
    /// Base URL product links are built from
    pub woolworths_product_url: String,
    /// Transport timeout for live lookups in seconds
    pub http_timeout_secs: u64,
    pub breaker: BreakerConfig,
}

impl PricingConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            woolworths_search_url: DEFAULT_WOOLWORTHS_SEARCH_URL.to_string(),
            woolworths_product_url: WOOLWORTHS_PRODUCT_URL.to_string(),
            http_timeout_secs: 10,
            breaker: BreakerConfig::default(),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub pricing: PricingConfig,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// `DATABASE_URL` is required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        Self::from_lookup(database_url, |key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(database_url: String, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pricing_defaults = PricingConfig::default();

        let pricing = PricingConfig {
            woolworths_search_url: lookup("WOOLWORTHS_SEARCH_URL")
                .unwrap_or(pricing_defaults.woolworths_search_url),
            woolworths_product_url: pricing_defaults.woolworths_product_url,
            http_timeout_secs: parse_or(
                &lookup,
                "PRICE_HTTP_TIMEOUT_SECS",
                pricing_defaults.http_timeout_secs,
            )?,
            breaker: BreakerConfig {
                failure_threshold: parse_or(
                    &lookup,
                    "PRICE_BREAKER_THRESHOLD",
                    pricing_defaults.breaker.failure_threshold,
                )?,
                reset_secs: parse_or(
                    &lookup,
                    "PRICE_BREAKER_RESET_SECS",
                    pricing_defaults.breaker.reset_secs,
                )?,
            },
        };

        Ok(Self {
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            pricing,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup("postgres://localhost/meals".to_string(), |key| {
            vars.get(key).cloned()
        })
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.pricing.http_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("PRICE_HTTP_TIMEOUT_SECS", "3"),
            ("PRICE_BREAKER_THRESHOLD", " 2 "),
            ("WOOLWORTHS_SEARCH_URL", "http://localhost:9999/search"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.pricing.http_timeout_secs, 3);
        assert_eq!(config.pricing.breaker.failure_threshold, 2);
        assert_eq!(config.pricing.breaker.reset_secs, 60);
        assert_eq!(
            config.pricing.woolworths_search_url,
            "http://localhost:9999/search"
        );
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = config_from(&[("DATABASE_MAX_CONNECTIONS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }
}
