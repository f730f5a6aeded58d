//! Local product catalog backend.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;

use super::{PriceBackend, PriceQuote, Store};
use crate::db::{self, CatalogProduct};
use crate::errors::AppResult;

/// Prices from the `store_products` table for one store
pub struct CatalogBackend {
    pool: PgPool,
    store: Store,
}

impl CatalogBackend {
    pub fn new(pool: PgPool, store: Store) -> Self {
        Self { pool, store }
    }

    /// Cheapest in-stock product matching the term, or the cheapest
    /// out-of-stock one when nothing is in stock
    pub async fn best_product(&self, search_term: &str) -> AppResult<Option<CatalogProduct>> {
        let products = db::find_store_products(&self.pool, self.store, search_term).await?;
        let chosen = select_product(&products).cloned();

        info!(
            "{} catalog: {} matches for '{}', chose {:?}",
            self.store,
            products.len(),
            search_term,
            chosen.as_ref().map(|p| p.product_name.as_str())
        );
        Ok(chosen)
    }
}

/// Pick from products sorted by ascending price: the first one in stock,
/// else the first one at all.
pub fn select_product(products: &[CatalogProduct]) -> Option<&CatalogProduct> {
    products
        .iter()
        .find(|product| product.product_price > 0.0)
        .or_else(|| products.first())
}

impl From<CatalogProduct> for PriceQuote {
    fn from(product: CatalogProduct) -> Self {
        PriceQuote {
            store: product.store,
            product_name: Some(product.product_name),
            price: Some(product.product_price),
            link: product.product_link,
            category: product.product_category,
        }
    }
}

#[async_trait]
impl PriceBackend for CatalogBackend {
    fn store(&self) -> Store {
        self.store
    }

    async fn quote(&self, search_term: &str) -> Result<Option<PriceQuote>> {
        Ok(self.best_product(search_term).await?.map(PriceQuote::from))
    }
}
