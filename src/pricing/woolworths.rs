//! Live Woolworths search backend.
//!
//! Uses the public product search endpoint and takes the first product of
//! the first result group, whatever its price.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{PriceBackend, PriceQuote, Store};
use crate::circuit_breaker::CircuitBreaker;
use crate::config::PricingConfig;

const USER_AGENT: &str = concat!("meal-planner/", env!("CARGO_PKG_VERSION"));

/// Search response; `Products` is `null` when nothing matched
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "Products")]
    pub products: Option<Vec<ProductGroup>>,
}

#[derive(Debug, Deserialize)]
pub struct ProductGroup {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Products", default)]
    pub products: Vec<ProductVariant>,
}

#[derive(Debug, Deserialize)]
pub struct ProductVariant {
    #[serde(rename = "Price")]
    pub price: Option<f64>,
    #[serde(rename = "Stockcode")]
    pub stockcode: Option<i64>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
}

/// Quote from a search response
pub fn quote_from_search(response: &SearchResponse, product_url: &str) -> Option<PriceQuote> {
    let group = response.products.as_ref()?.first()?;
    let variant = group.products.first();

    Some(PriceQuote {
        store: Store::Woolworths,
        product_name: group
            .name
            .clone()
            .or_else(|| variant.and_then(|v| v.name.clone())),
        price: variant.and_then(|v| v.price),
        link: variant
            .and_then(|v| v.stockcode)
            .map(|code| format!("{product_url}{code}")),
        category: None,
    })
}

/// Woolworths price backend
pub struct WoolworthsBackend {
    client: Client,
    search_url: String,
    product_url: String,
    breaker: CircuitBreaker,
}

impl WoolworthsBackend {
    pub fn new(config: &PricingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout())
            .build()
            .context("Failed to build Woolworths HTTP client")?;

        Ok(Self {
            client,
            search_url: config.woolworths_search_url.clone(),
            product_url: config.woolworths_product_url.clone(),
            breaker: CircuitBreaker::new(config.breaker.clone()),
        })
    }

    async fn search(&self, search_term: &str) -> Result<SearchResponse> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("searchTerm", search_term)])
            .send()
            .await
            .context("Woolworths search request failed")?
            .error_for_status()
            .context("Woolworths search returned an error status")?;

        response
            .json::<SearchResponse>()
            .await
            .context("Failed to decode Woolworths search response")
    }
}

#[async_trait]
impl PriceBackend for WoolworthsBackend {
    fn store(&self) -> Store {
        Store::Woolworths
    }

    async fn quote(&self, search_term: &str) -> Result<Option<PriceQuote>> {
        if self.breaker.is_open() {
            return Err(anyhow!(
                "Woolworths lookups suspended after {} failures",
                self.breaker.failure_count()
            ));
        }

        match self.search(search_term).await {
            Ok(response) => {
                self.breaker.record_success();
                let quote = quote_from_search(&response, &self.product_url);
                debug!("Woolworths quote for '{}': {:?}", search_term, quote);
                Ok(quote)
            }
            Err(e) => {
                self.breaker.record_failure();
                warn!("Woolworths lookup for '{}' failed: {:#}", search_term, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BreakerConfig, WOOLWORTHS_PRODUCT_URL};

    fn parse(json: &str) -> SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_first_product_is_quoted() {
        let response = parse(
            r#"{
                "Products": [
                    {"Name": "Woolworths White Sugar 1kg",
                     "Products": [{"Price": 1.7, "Stockcode": 123456, "Name": "White Sugar"}]},
                    {"Name": "CSR White Sugar 2kg",
                     "Products": [{"Price": 3.2, "Stockcode": 654321}]}
                ],
                "SearchResultsCount": 2
            }"#,
        );

        let quote = quote_from_search(&response, WOOLWORTHS_PRODUCT_URL).unwrap();
        assert_eq!(quote.store, Store::Woolworths);
        assert_eq!(quote.product_name.as_deref(), Some("Woolworths White Sugar 1kg"));
        assert_eq!(quote.price, Some(1.7));
        assert_eq!(
            quote.link.as_deref(),
            Some("https://www.woolworths.com.au/shop/productdetails/123456")
        );
    }

    #[test]
    fn test_null_products_is_no_quote() {
        let response = parse(r#"{"Products": null}"#);
        assert!(quote_from_search(&response, WOOLWORTHS_PRODUCT_URL).is_none());

        let response = parse(r#"{"Products": []}"#);
        assert!(quote_from_search(&response, WOOLWORTHS_PRODUCT_URL).is_none());
    }

    #[test]
    fn test_missing_price_is_kept_as_none() {
        let response = parse(r#"{"Products": [{"Name": "Rare Spice", "Products": [{"Price": null, "Stockcode": 1}]}]}"#);
        let quote = quote_from_search(&response, WOOLWORTHS_PRODUCT_URL).unwrap();
        assert_eq!(quote.price, None);
        assert_eq!(quote.in_stock_price(), None);
    }

    #[tokio::test]
    async fn test_unreachable_backend_trips_breaker() {
        let config = PricingConfig {
            // reserved port, nothing listens there
            woolworths_search_url: "http://127.0.0.1:9/search".to_string(),
            http_timeout_secs: 2,
            breaker: BreakerConfig {
                failure_threshold: 1,
                reset_secs: 60,
            },
            ..PricingConfig::default()
        };
        let backend = WoolworthsBackend::new(&config).unwrap();

        assert!(backend.quote("flour").await.is_err());
        let err = backend.quote("flour").await.unwrap_err();
        assert!(err.to_string().contains("suspended"));
    }
}
