//! # Price Resolver
//!
//! Finds the cheapest in-stock price for an ingredient across two stores.
//!
//! Coles prices come from the local product catalog
//! ([`catalog::CatalogBackend`]), Woolworths prices from its live search API
//! ([`woolworths::WoolworthsBackend`]). Both lookups for an ingredient run
//! concurrently; a failing backend only removes its own quote.
//!
//! ## Outcome per store
//!
//! | Coles | Woolworths | Result |
//! |---|---|---|
//! | > 0 | > 0 | cheaper one `Best`, other `Dimmed` (tie goes to Coles) |
//! | > 0 | none | Coles `Best`, Woolworths `Dead` |
//! | none | > 0 | Woolworths `Best`, Coles `Dead` |
//! | none | none | "Out of stock", both `Dead` |
//!
//! When both backends fail outright the result is "Price unavailable".

pub mod catalog;
pub mod substitutions;
pub mod woolworths;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::PricingConfig;

pub use substitutions::search_term;

pub const OUT_OF_STOCK: &str = "Out of stock";
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// Grocery retailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Store {
    Coles,
    Woolworths,
}

impl Store {
    pub fn as_str(&self) -> &'static str {
        match self {
            Store::Coles => "Coles",
            Store::Woolworths => "Woolworths",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price offered by one store for one search term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub store: Store,
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub category: Option<String>,
}

impl PriceQuote {
    /// Price, if the product is in stock
    pub fn in_stock_price(&self) -> Option<f64> {
        self.price.filter(|price| *price > 0.0)
    }
}

/// A source of store prices
#[async_trait]
pub trait PriceBackend: Send + Sync {
    fn store(&self) -> Store;

    /// Look up a search term. `Ok(None)` means the store has no match.
    async fn quote(&self, search_term: &str) -> Result<Option<PriceQuote>>;
}

/// Result of asking one backend
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(PriceQuote),
    Missing,
    Failed,
}

impl Lookup {
    fn settle(store: Store, search_term: &str, result: Result<Option<PriceQuote>>) -> Self {
        match result {
            Ok(Some(quote)) => Lookup::Found(quote),
            Ok(None) => {
                debug!("{} has no product for '{}'", store, search_term);
                Lookup::Missing
            }
            Err(e) => {
                warn!("{} price lookup failed for '{}': {:#}", store, search_term, e);
                Lookup::Failed
            }
        }
    }

    fn quote(&self) -> Option<&PriceQuote> {
        match self {
            Lookup::Found(quote) => Some(quote),
            _ => None,
        }
    }

    fn in_stock_price(&self) -> Option<f64> {
        self.quote().and_then(PriceQuote::in_stock_price)
    }
}

/// How a store should be presented next to an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    /// Cheapest in-stock offer
    Best,
    /// In stock but more expensive
    Dimmed,
    /// Nothing buyable; no link
    Dead,
    /// No comparison was possible
    Neutral,
}

/// One store's side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOutcome {
    pub store: Store,
    pub status: StoreStatus,
    pub quote: Option<PriceQuote>,
    pub link: Option<String>,
}

impl StoreOutcome {
    fn new(store: Store, lookup: &Lookup, status: StoreStatus) -> Self {
        let quote = lookup.quote().cloned();
        let link = match status {
            StoreStatus::Dead => None,
            _ => quote.as_ref().and_then(|q| q.link.clone()),
        };
        Self {
            store,
            status,
            quote,
            link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    InStock,
    OutOfStock,
    Unavailable,
}

/// Best price for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceResolution {
    pub ingredient: String,
    pub search_term: String,
    pub availability: Availability,
    pub best_store: Option<Store>,
    /// Winning price; `None` unless something is in stock
    pub price: Option<f64>,
    /// "$2.80", "Out of stock" or "Price unavailable"
    pub display: String,
    pub coles: StoreOutcome,
    pub woolworths: StoreOutcome,
}

/// Compare the two lookups for an ingredient
pub fn compare_quotes(
    ingredient: &str,
    search_term: &str,
    coles: Lookup,
    woolworths: Lookup,
) -> PriceResolution {
    use StoreStatus::*;

    let (availability, best_store, price, coles_status, woolworths_status) =
        if coles == Lookup::Failed && woolworths == Lookup::Failed {
            (Availability::Unavailable, None, None, Neutral, Neutral)
        } else {
            match (coles.in_stock_price(), woolworths.in_stock_price()) {
                (Some(c), Some(w)) if c <= w => {
                    (Availability::InStock, Some(Store::Coles), Some(c), Best, Dimmed)
                }
                (Some(_), Some(w)) => {
                    (Availability::InStock, Some(Store::Woolworths), Some(w), Dimmed, Best)
                }
                (Some(c), None) => (Availability::InStock, Some(Store::Coles), Some(c), Best, Dead),
                (None, Some(w)) => {
                    (Availability::InStock, Some(Store::Woolworths), Some(w), Dead, Best)
                }
                (None, None) => (Availability::OutOfStock, None, None, Dead, Dead),
            }
        };

    let display = match (availability, price) {
        (Availability::InStock, Some(price)) => format_price(price),
        (Availability::Unavailable, _) => PRICE_UNAVAILABLE.to_string(),
        _ => OUT_OF_STOCK.to_string(),
    };

    PriceResolution {
        ingredient: ingredient.to_string(),
        search_term: search_term.to_string(),
        availability,
        best_store,
        price,
        display,
        coles: StoreOutcome::new(Store::Coles, &coles, coles_status),
        woolworths: StoreOutcome::new(Store::Woolworths, &woolworths, woolworths_status),
    }
}

/// `$x.xx`
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Prices for a list of ingredients plus their total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePricing {
    pub lines: Vec<PriceResolution>,
    /// Sum of winning prices; unpriced lines count as 0
    pub total: f64,
    pub display_total: String,
}

impl RecipePricing {
    pub fn from_lines(lines: Vec<PriceResolution>) -> Self {
        let total: f64 = lines.iter().filter_map(|line| line.price).sum();
        Self {
            lines,
            total,
            display_total: format_price(total),
        }
    }
}

/// Resolves ingredient prices against a Coles and a Woolworths backend
#[derive(Clone)]
pub struct PriceResolver {
    coles: Arc<dyn PriceBackend>,
    woolworths: Arc<dyn PriceBackend>,
}

impl PriceResolver {
    pub fn new(coles: Arc<dyn PriceBackend>, woolworths: Arc<dyn PriceBackend>) -> Self {
        Self { coles, woolworths }
    }

    /// Catalog-backed Coles lookups and live Woolworths lookups
    pub fn from_config(pool: PgPool, config: &PricingConfig) -> Result<Self> {
        let coles = catalog::CatalogBackend::new(pool, Store::Coles);
        let woolworths = woolworths::WoolworthsBackend::new(config)?;
        Ok(Self::new(Arc::new(coles), Arc::new(woolworths)))
    }

    /// Best price for a single ingredient
    pub async fn resolve(&self, ingredient: &str) -> PriceResolution {
        let term = search_term(ingredient);

        let (coles, woolworths) =
            tokio::join!(self.coles.quote(&term), self.woolworths.quote(&term));

        let resolution = compare_quotes(
            ingredient.trim(),
            &term,
            Lookup::settle(self.coles.store(), &term, coles),
            Lookup::settle(self.woolworths.store(), &term, woolworths),
        );

        debug!(
            "Resolved '{}' (search '{}') to {}",
            ingredient, term, resolution.display
        );
        resolution
    }

    /// Resolve every ingredient concurrently and total the winning prices
    pub async fn price_ingredients(&self, ingredients: &[String]) -> RecipePricing {
        let lines = join_all(ingredients.iter().map(|name| self.resolve(name))).await;
        let pricing = RecipePricing::from_lines(lines);
        info!(
            "Priced {} ingredients, total {}",
            pricing.lines.len(),
            pricing.display_total
        );
        pricing
    }
}
