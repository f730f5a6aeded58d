//! # Database Module
//!
//! Postgres persistence for saved recipes, their ingredients, the weekly
//! meal plan and the local store product catalog.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPool;
use sqlx::{FromRow, PgExecutor};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult, DbResultExt};
use crate::meal_plan::{DayOfWeek, MealPlanEntry, MealType, SlotChange};
use crate::pricing::Store;
use crate::shopping_list::IngredientLine;

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS saved_recipes (
            recipe_id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            external_id TEXT,
            recipe_name TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '',
            recipe_category TEXT NOT NULL DEFAULT '',
            recipe_region TEXT NOT NULL DEFAULT '',
            recipe_photo TEXT NOT NULL DEFAULT '',
            directions TEXT NOT NULL DEFAULT '',
            directions_video TEXT NOT NULL DEFAULT '',
            date_saved TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, recipe_name)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create saved_recipes table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS recipe_ingredients (
            id BIGSERIAL PRIMARY KEY,
            recipe_id BIGINT NOT NULL REFERENCES saved_recipes(recipe_id) ON DELETE CASCADE,
            ingredient_name TEXT NOT NULL,
            measure TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create recipe_ingredients table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS meal_plan (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            recipe_id BIGINT NOT NULL REFERENCES saved_recipes(recipe_id) ON DELETE CASCADE,
            day_of_week TEXT NOT NULL CHECK (day_of_week IN
                ('Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday', 'Saturday', 'Sunday')),
            meal_type TEXT NOT NULL CHECK (meal_type IN ('Breakfast', 'Lunch', 'Dinner')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (user_id, day_of_week, meal_type)
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create meal_plan table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS store_products (
            id BIGSERIAL PRIMARY KEY,
            store TEXT NOT NULL CHECK (store IN ('Coles', 'Woolworths')),
            product_name TEXT NOT NULL,
            product_price NUMERIC(8, 2) NOT NULL,
            product_link TEXT,
            product_category TEXT,
            last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create store_products table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)")
        .execute(pool)
        .await
        .context("Failed to create recipe_ingredients index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_store_products_store ON store_products(store)")
        .execute(pool)
        .await
        .context("Failed to create store_products index")?;

    info!("Database schema initialized successfully");
    Ok(())
}

// ---------------------------------------------------------------------------
// Saved recipes
// ---------------------------------------------------------------------------

/// Body of a save-recipe request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    #[serde(default)]
    pub external_id: Option<String>,
    pub recipe_name: String,
    #[serde(default, alias = "strTags")]
    pub tags: String,
    #[serde(default)]
    pub recipe_category: String,
    #[serde(default)]
    pub recipe_region: String,
    #[serde(default)]
    pub recipe_photo: String,
    #[serde(default)]
    pub directions: String,
    #[serde(default)]
    pub directions_video: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
}

/// Result of saving a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub recipe_id: i64,
    /// False when the user already had a recipe of that name
    pub created: bool,
}

impl SaveOutcome {
    pub fn message(&self) -> &'static str {
        if self.created {
            "Recipe saved successfully"
        } else {
            "Recipe already exists"
        }
    }
}

/// Row of the saved-recipe listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SavedRecipeSummary {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub recipe_category: String,
    pub recipe_region: String,
    pub recipe_photo: String,
    /// Every saved recipe is a favourite
    pub is_favorite: bool,
}

/// A saved recipe with its ingredients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SavedRecipe {
    pub recipe_id: i64,
    pub user_id: i64,
    pub external_id: Option<String>,
    pub recipe_name: String,
    pub tags: String,
    pub recipe_category: String,
    pub recipe_region: String,
    pub recipe_photo: String,
    pub directions: String,
    pub directions_video: String,
    pub date_saved: DateTime<Utc>,
    #[sqlx(skip)]
    pub ingredients: Vec<IngredientLine>,
}

/// Save a recipe and its ingredients for a user.
///
/// Recipe names are unique per user; saving a name twice returns the id of
/// the first save and writes nothing.
pub async fn save_recipe(pool: &PgPool, user_id: i64, recipe: &NewRecipe) -> AppResult<SaveOutcome> {
    info!("Saving recipe '{}' for user {}", recipe.recipe_name, user_id);

    let mut tx = pool.begin().await.db_context("Failed to save recipe")?;

    let inserted: Option<i64> = sqlx::query_scalar(
        "INSERT INTO saved_recipes
            (user_id, external_id, recipe_name, tags, recipe_category, recipe_region,
             recipe_photo, directions, directions_video)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         ON CONFLICT (user_id, recipe_name) DO NOTHING
         RETURNING recipe_id",
    )
    .bind(user_id)
    .bind(&recipe.external_id)
    .bind(&recipe.recipe_name)
    .bind(&recipe.tags)
    .bind(&recipe.recipe_category)
    .bind(&recipe.recipe_region)
    .bind(&recipe.recipe_photo)
    .bind(&recipe.directions)
    .bind(&recipe.directions_video)
    .fetch_optional(&mut *tx)
    .await
    .db_context("Failed to save recipe")?;

    let Some(recipe_id) = inserted else {
        let existing: i64 = sqlx::query_scalar(
            "SELECT recipe_id FROM saved_recipes WHERE user_id = $1 AND recipe_name = $2",
        )
        .bind(user_id)
        .bind(&recipe.recipe_name)
        .fetch_one(&mut *tx)
        .await
        .db_context("Failed to check existing recipe")?;

        tx.rollback().await.db_context("Failed to check existing recipe")?;
        info!("Recipe '{}' already saved with ID: {}", recipe.recipe_name, existing);
        return Ok(SaveOutcome {
            recipe_id: existing,
            created: false,
        });
    };

    for line in recipe
        .ingredients
        .iter()
        .filter(|line| !line.ingredient_name.trim().is_empty())
    {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_name, measure) VALUES ($1, $2, $3)",
        )
        .bind(recipe_id)
        .bind(line.ingredient_name.trim())
        .bind(line.measure.trim())
        .execute(&mut *tx)
        .await
        .db_context("Failed to save recipe ingredients")?;
    }

    tx.commit().await.db_context("Failed to save recipe")?;

    info!("Recipe saved with ID: {}", recipe_id);
    Ok(SaveOutcome {
        recipe_id,
        created: true,
    })
}

/// All recipes a user has saved
pub async fn list_saved_recipes(pool: &PgPool, user_id: i64) -> AppResult<Vec<SavedRecipeSummary>> {
    info!("Listing saved recipes for user {}", user_id);

    sqlx::query_as::<_, SavedRecipeSummary>(
        "SELECT recipe_id, recipe_name, recipe_category, recipe_region, recipe_photo,
                TRUE AS is_favorite
         FROM saved_recipes
         WHERE user_id = $1
         ORDER BY recipe_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .db_context("Failed to retrieve saved recipes")
}

/// Ingredients of a recipe in the order they were saved
pub async fn get_recipe_ingredients(pool: &PgPool, recipe_id: i64) -> AppResult<Vec<IngredientLine>> {
    sqlx::query_as::<_, IngredientLine>(
        "SELECT ingredient_name, measure FROM recipe_ingredients WHERE recipe_id = $1 ORDER BY id",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
    .db_context("Failed to retrieve recipe ingredients")
}

/// One of the user's saved recipes, with ingredients
pub async fn get_saved_recipe(
    pool: &PgPool,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<Option<SavedRecipe>> {
    info!("Reading saved recipe {} for user {}", recipe_id, user_id);

    let recipe = sqlx::query_as::<_, SavedRecipe>(
        "SELECT recipe_id, user_id, external_id, recipe_name, tags, recipe_category,
                recipe_region, recipe_photo, directions, directions_video, date_saved
         FROM saved_recipes
         WHERE recipe_id = $1 AND user_id = $2",
    )
    .bind(recipe_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .db_context("Error fetching recipe")?;

    let Some(mut recipe) = recipe else {
        info!("No saved recipe {} for user {}", recipe_id, user_id);
        return Ok(None);
    };

    recipe.ingredients = get_recipe_ingredients(pool, recipe_id).await?;
    Ok(Some(recipe))
}

/// Whether the recipe is one of the user's saved recipes
pub async fn is_recipe_saved(pool: &PgPool, user_id: i64, recipe_id: i64) -> AppResult<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM saved_recipes WHERE recipe_id = $1 AND user_id = $2)",
    )
    .bind(recipe_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .db_context("Failed to verify recipe")
}

/// Delete a saved recipe; its ingredients and meal-plan slots go with it
pub async fn delete_saved_recipe(pool: &PgPool, user_id: i64, recipe_id: i64) -> AppResult<bool> {
    info!("Deleting saved recipe {} for user {}", recipe_id, user_id);

    let rows_affected = sqlx::query("DELETE FROM saved_recipes WHERE recipe_id = $1 AND user_id = $2")
        .bind(recipe_id)
        .bind(user_id)
        .execute(pool)
        .await
        .db_context("Failed to remove recipe")?
        .rows_affected();

    if rows_affected > 0 {
        info!("Saved recipe {} deleted", recipe_id);
        Ok(true)
    } else {
        info!("No saved recipe {} for user {}", recipe_id, user_id);
        Ok(false)
    }
}

/// Flip the favourite state of a recipe and return the new state.
///
/// A favourite is a saved recipe: unfavouriting deletes it, favouriting
/// saves it under the given id with the details in `recipe`. Favouriting a
/// name the user already saved under another id leaves that recipe as the
/// favourite. An id held by another user's recipe is a conflict.
pub async fn toggle_favorite(
    pool: &PgPool,
    user_id: i64,
    recipe_id: i64,
    recipe: &NewRecipe,
) -> AppResult<bool> {
    if delete_saved_recipe(pool, user_id, recipe_id).await? {
        return Ok(false);
    }

    info!("Favoriting recipe {} for user {}", recipe_id, user_id);

    let mut tx = pool.begin().await.db_context("Failed to save recipe")?;

    let inserted = sqlx::query(
        "INSERT INTO saved_recipes
            (recipe_id, user_id, recipe_name, recipe_category, recipe_region, recipe_photo)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT DO NOTHING",
    )
    .bind(recipe_id)
    .bind(user_id)
    .bind(&recipe.recipe_name)
    .bind(&recipe.recipe_category)
    .bind(&recipe.recipe_region)
    .bind(&recipe.recipe_photo)
    .execute(&mut *tx)
    .await
    .db_context("Failed to save recipe")?
    .rows_affected()
        > 0;

    if !inserted {
        let same_name: Option<i64> = sqlx::query_scalar(
            "SELECT recipe_id FROM saved_recipes WHERE user_id = $1 AND recipe_name = $2",
        )
        .bind(user_id)
        .bind(&recipe.recipe_name)
        .fetch_optional(&mut *tx)
        .await
        .db_context("Failed to check existing recipe")?;

        tx.rollback().await.db_context("Failed to save recipe")?;

        return match same_name {
            Some(existing) => {
                info!(
                    "Recipe '{}' already saved by user {} with ID: {}",
                    recipe.recipe_name, user_id, existing
                );
                Ok(true)
            }
            None => Err(AppError::Conflict(format!(
                "Recipe id {recipe_id} is already used by another recipe"
            ))),
        };
    }

    // Explicit ids do not advance the serial sequence
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('saved_recipes', 'recipe_id'),
                       GREATEST((SELECT MAX(recipe_id) FROM saved_recipes), 1))",
    )
    .execute(&mut *tx)
    .await
    .db_context("Failed to save recipe")?;

    tx.commit().await.db_context("Failed to save recipe")?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// Meal plan
// ---------------------------------------------------------------------------

#[derive(FromRow)]
struct MealPlanRow {
    recipe_id: i64,
    day_of_week: String,
    meal_type: String,
    recipe_name: String,
    recipe_photo: String,
    recipe_category: String,
    recipe_region: String,
}

impl MealPlanRow {
    fn into_entry(self) -> AppResult<MealPlanEntry> {
        Ok(MealPlanEntry {
            recipe_id: self.recipe_id,
            day_of_week: self.day_of_week.parse()?,
            meal_type: self.meal_type.parse()?,
            recipe_name: self.recipe_name,
            recipe_photo: self.recipe_photo,
            recipe_category: self.recipe_category,
            recipe_region: self.recipe_region,
        })
    }
}

/// Every filled slot of the user's week, Monday breakfast first
pub async fn get_meal_plan(pool: &PgPool, user_id: i64) -> AppResult<Vec<MealPlanEntry>> {
    info!("Fetching meal plan for user {}", user_id);

    let rows = sqlx::query_as::<_, MealPlanRow>(
        "SELECT mp.recipe_id, mp.day_of_week, mp.meal_type,
                sr.recipe_name, sr.recipe_photo, sr.recipe_category, sr.recipe_region
         FROM meal_plan mp
         JOIN saved_recipes sr ON sr.recipe_id = mp.recipe_id
         WHERE mp.user_id = $1
         ORDER BY
            array_position(ARRAY['Monday', 'Tuesday', 'Wednesday', 'Thursday',
                                 'Friday', 'Saturday', 'Sunday']::TEXT[], mp.day_of_week),
            array_position(ARRAY['Breakfast', 'Lunch', 'Dinner']::TEXT[], mp.meal_type)",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .db_context("Failed to retrieve meal plan")?;

    rows.into_iter().map(MealPlanRow::into_entry).collect()
}

/// Insert or replace the recipe in one slot
pub async fn upsert_meal_plan_slot(
    pool: &PgPool,
    user_id: i64,
    recipe_id: i64,
    day: DayOfWeek,
    meal: MealType,
) -> AppResult<SlotChange> {
    info!(
        "Assigning recipe {} to {} {} for user {}",
        recipe_id, day, meal, user_id
    );

    let inserted: bool = sqlx::query_scalar(
        "INSERT INTO meal_plan (user_id, recipe_id, day_of_week, meal_type)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id, day_of_week, meal_type)
         DO UPDATE SET recipe_id = EXCLUDED.recipe_id, updated_at = NOW()
         RETURNING (xmax = 0) AS inserted",
    )
    .bind(user_id)
    .bind(recipe_id)
    .bind(day.as_str())
    .bind(meal.as_str())
    .fetch_one(pool)
    .await
    .db_context("Failed to save meal plan")?;

    let change = if inserted {
        SlotChange::Inserted
    } else {
        SlotChange::Updated
    };
    debug!("Slot {} {} for user {}: {:?}", day, meal, user_id, change);
    Ok(change)
}

/// Empty one slot; false when it was already empty
pub async fn delete_meal_plan_slot(
    pool: &PgPool,
    user_id: i64,
    day: DayOfWeek,
    meal: MealType,
) -> AppResult<bool> {
    info!("Removing {} {} for user {}", day, meal, user_id);

    let rows_affected = sqlx::query(
        "DELETE FROM meal_plan WHERE user_id = $1 AND day_of_week = $2 AND meal_type = $3",
    )
    .bind(user_id)
    .bind(day.as_str())
    .bind(meal.as_str())
    .execute(pool)
    .await
    .db_context("Failed to remove meal from plan")?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Empty every slot of the user's week and return how many were filled
pub async fn clear_meal_plan(pool: &PgPool, user_id: i64) -> AppResult<u64> {
    let rows_affected = sqlx::query("DELETE FROM meal_plan WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .db_context("Failed to clear meal plan")?
        .rows_affected();

    info!("Cleared {} meal plan slots for user {}", rows_affected, user_id);
    Ok(rows_affected)
}

/// Distinct ingredient lines of every recipe in the user's plan
pub async fn get_meal_plan_ingredients(pool: &PgPool, user_id: i64) -> AppResult<Vec<IngredientLine>> {
    info!("Collecting meal plan ingredients for user {}", user_id);

    sqlx::query_as::<_, IngredientLine>(
        "SELECT DISTINCT ri.ingredient_name, ri.measure
         FROM meal_plan mp
         JOIN saved_recipes sr ON sr.recipe_id = mp.recipe_id AND sr.user_id = mp.user_id
         JOIN recipe_ingredients ri ON ri.recipe_id = sr.recipe_id
         WHERE mp.user_id = $1
         ORDER BY ri.ingredient_name, ri.measure",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .db_context("Failed to retrieve meal plan ingredients")
}

// ---------------------------------------------------------------------------
// Store catalog
// ---------------------------------------------------------------------------

/// A catalog product as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProduct {
    #[serde(skip)]
    pub store: Store,
    pub product_name: String,
    pub product_price: f64,
    #[serde(rename = "product_website_link")]
    pub product_link: Option<String>,
    pub product_category: Option<String>,
}

#[derive(FromRow)]
struct CatalogRow {
    product_name: String,
    product_price: f64,
    product_link: Option<String>,
    product_category: Option<String>,
}

/// Product to load into the catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewCatalogProduct {
    pub store: Store,
    pub product_name: String,
    pub product_price: f64,
    pub product_link: Option<String>,
    pub product_category: Option<String>,
}

/// Escape LIKE wildcards so the term matches literally
fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Products of one store whose name contains the term, cheapest first
pub async fn find_store_products(
    pool: &PgPool,
    store: Store,
    term: &str,
) -> AppResult<Vec<CatalogProduct>> {
    debug!("Searching {} catalog for '{}'", store, term);

    let rows = sqlx::query_as::<_, CatalogRow>(
        "SELECT product_name, product_price::FLOAT8 AS product_price, product_link, product_category
         FROM store_products
         WHERE store = $1 AND product_name ILIKE $2
         ORDER BY product_price ASC, id ASC",
    )
    .bind(store.as_str())
    .bind(like_pattern(term))
    .fetch_all(pool)
    .await
    .db_context("Failed to retrieve ingredient prices")?;

    Ok(rows
        .into_iter()
        .map(|row| CatalogProduct {
            store,
            product_name: row.product_name,
            product_price: row.product_price,
            product_link: row.product_link,
            product_category: row.product_category,
        })
        .collect())
}

/// Add one product to the catalog
pub async fn insert_catalog_product<'e, E>(executor: E, product: &NewCatalogProduct) -> AppResult<i64>
where
    E: PgExecutor<'e>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO store_products (store, product_name, product_price, product_link, product_category)
         VALUES ($1, $2, $3::FLOAT8, $4, $5)
         RETURNING id",
    )
    .bind(product.store.as_str())
    .bind(&product.product_name)
    .bind(product.product_price)
    .bind(&product.product_link)
    .bind(&product.product_category)
    .fetch_one(executor)
    .await
    .db_context("Failed to insert catalog product")?;

    debug!("Catalog product '{}' stored with ID: {}", product.product_name, id);
    Ok(id)
}

/// Remove every catalog product of a store before a reload
pub async fn clear_catalog<'e, E>(executor: E, store: Store) -> AppResult<u64>
where
    E: PgExecutor<'e>,
{
    let rows_affected = sqlx::query("DELETE FROM store_products WHERE store = $1")
        .bind(store.as_str())
        .execute(executor)
        .await
        .db_context("Failed to clear catalog")?
        .rows_affected();

    info!("Cleared {} {} catalog products", rows_affected, store);
    Ok(rows_affected)
}

/// Counts reported after a catalog reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogLoad {
    pub total: usize,
    pub in_stock: usize,
}

/// Parse a JSON array of catalog products.
///
/// Names must be non-empty and prices must be finite and not negative; a
/// price of 0 marks the product out of stock.
pub fn parse_catalog(json: &str) -> Result<Vec<NewCatalogProduct>> {
    let products: Vec<NewCatalogProduct> =
        serde_json::from_str(json).context("Catalog file is not a JSON array of products")?;

    for (index, product) in products.iter().enumerate() {
        if product.product_name.trim().is_empty() {
            bail!("Catalog product {} has an empty name", index);
        }
        if !product.product_price.is_finite() || product.product_price < 0.0 {
            bail!(
                "Catalog product {} ('{}') has invalid price {}",
                index,
                product.product_name,
                product.product_price
            );
        }
    }

    Ok(products)
}

/// Replace the catalog of every store present in `products`.
///
/// Runs in one transaction, so lookups see either the old or the new
/// catalog.
pub async fn replace_catalog(pool: &PgPool, products: &[NewCatalogProduct]) -> AppResult<CatalogLoad> {
    let stores: BTreeSet<Store> = products.iter().map(|product| product.store).collect();
    info!(
        "Reloading catalog for {:?} with {} products",
        stores,
        products.len()
    );

    let mut tx = pool.begin().await.db_context("Failed to reload catalog")?;

    for store in &stores {
        clear_catalog(&mut *tx, *store).await?;
    }
    for product in products {
        insert_catalog_product(&mut *tx, product).await?;
    }

    tx.commit().await.db_context("Failed to reload catalog")?;

    let load = CatalogLoad {
        total: products.len(),
        in_stock: products.iter().filter(|p| p.product_price > 0.0).count(),
    };
    info!(
        "Catalog reloaded: {} products, {} in stock",
        load.total, load.in_stock
    );
    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("white sugar"), "%white sugar%");
        assert_eq!(like_pattern(" 100% juice "), "%100\\% juice%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_save_outcome_messages() {
        let created = SaveOutcome {
            recipe_id: 1,
            created: true,
        };
        let existing = SaveOutcome {
            recipe_id: 1,
            created: false,
        };
        assert_eq!(created.message(), "Recipe saved successfully");
        assert_eq!(existing.message(), "Recipe already exists");
    }

    #[test]
    fn test_new_recipe_defaults() {
        let recipe: NewRecipe = serde_json::from_str(
            r#"{"recipe_name": "Pancakes", "strTags": "Breakfast",
                "ingredients": [{"ingredient_name": "flour", "measure": "2 cups"}]}"#,
        )
        .unwrap();
        assert_eq!(recipe.tags, "Breakfast");
        assert_eq!(recipe.recipe_region, "");
        assert_eq!(recipe.external_id, None);
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn test_parse_catalog() {
        let products = parse_catalog(
            r#"[
                {"store": "Coles", "product_name": "Plain Flour 1kg", "product_price": 1.5,
                 "product_link": "https://www.coles.com.au/product/1", "product_category": "Pantry"},
                {"store": "Woolworths", "product_name": "Caster Sugar", "product_price": 0}
            ]"#,
        )
        .unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].store, Store::Coles);
        assert_eq!(products[1].product_link, None);
    }

    #[test]
    fn test_parse_catalog_rejects_bad_rows() {
        let err = parse_catalog(r#"[{"store": "Coles", "product_name": " ", "product_price": 1}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("empty name"));

        let err = parse_catalog(r#"[{"store": "Coles", "product_name": "Milk", "product_price": -2}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid price"));

        assert!(parse_catalog(r#"[{"store": "Aldi", "product_name": "Milk", "product_price": 2}]"#).is_err());
        assert!(parse_catalog("{}").is_err());
    }

    #[test]
    fn test_catalog_product_json_names() {
        let product = CatalogProduct {
            store: Store::Coles,
            product_name: "Plain Flour 1kg".to_string(),
            product_price: 2.4,
            product_link: Some("https://coles.example/flour".to_string()),
            product_category: None,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["product_website_link"], "https://coles.example/flour");
        assert!(json.get("store").is_none());
    }
}
