//! # HTTP API
//!
//! axum router over the recipe, meal-plan, shopping-list and pricing
//! operations. Every `/api` route except the two ingredient price lookups
//! needs the session user in the `X-User-Id` header.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::postgres::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::db::{self, NewRecipe, SavedRecipe, SavedRecipeSummary};
use crate::errors::{AppError, AppResult};
use crate::meal_plan::{self, DayOfWeek, MealPlanEntry, MealType};
use crate::pricing::catalog::CatalogBackend;
use crate::pricing::{PriceResolution, PriceResolver, RecipePricing, Store};
use crate::shopping_list::{IngredientLine, ShoppingList};

pub const USER_HEADER: &str = "x-user-id";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resolver: PriceResolver,
    pub coles_catalog: Arc<CatalogBackend>,
}

impl AppState {
    pub fn new(pool: PgPool, resolver: PriceResolver) -> Self {
        let coles_catalog = Arc::new(CatalogBackend::new(pool.clone(), Store::Coles));
        Self {
            pool,
            resolver,
            coles_catalog,
        }
    }
}

/// The session user, taken from the `X-User-Id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))?;

        raw.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized(format!("Invalid user id: '{raw}'")))
    }
}

/// Unwrap a JSON body, reporting malformed or incomplete bodies as 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/saved-recipes",
            get(list_saved_recipes).post(save_recipe),
        )
        .route("/api/saved-recipes/:id", get(get_saved_recipe))
        .route("/api/saved-recipes/:id/prices", get(get_recipe_prices))
        .route(
            "/api/recipes/:id/favorite",
            get(favorite_status).post(toggle_favorite),
        )
        .route(
            "/api/meal-plan",
            get(get_meal_plan)
                .post(assign_meal)
                .put(assign_meal)
                .delete(remove_meal),
        )
        .route(
            "/api/meal-plan/clear-week",
            axum::routing::delete(clear_week),
        )
        .route("/api/meal-plan/ingredients", get(meal_plan_ingredients))
        .route("/api/meal-plan/shopping-list", get(shopping_list))
        .route("/api/ingredients/prices/:ingredient", get(coles_price))
        .route("/api/ingredients/best-price/:ingredient", get(best_price))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Saved recipes
// ---------------------------------------------------------------------------

async fn list_saved_recipes(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<SavedRecipeSummary>>> {
    Ok(Json(db::list_saved_recipes(&state.pool, user_id).await?))
}

async fn save_recipe(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let recipe = json_body(payload)?;
    if recipe.recipe_name.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required field: recipe_name".to_string()));
    }

    let outcome = db::save_recipe(&state.pool, user_id, &recipe).await?;
    Ok(Json(json!({
        "recipe_id": outcome.recipe_id,
        "message": outcome.message(),
    })))
}

async fn load_saved_recipe(state: &AppState, user_id: i64, recipe_id: i64) -> AppResult<SavedRecipe> {
    db::get_saved_recipe(&state.pool, user_id, recipe_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".to_string()))
}

async fn get_saved_recipe(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<Json<SavedRecipe>> {
    Ok(Json(load_saved_recipe(&state, user_id, recipe_id).await?))
}

async fn get_recipe_prices(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<Json<RecipePricing>> {
    let recipe = load_saved_recipe(&state, user_id, recipe_id).await?;
    let names: Vec<String> = recipe
        .ingredients
        .into_iter()
        .map(|line| line.ingredient_name)
        .collect();

    Ok(Json(state.resolver.price_ingredients(&names).await))
}

/// Recipe details sent along with a favourite toggle
#[derive(Debug, Default, Deserialize)]
struct FavoriteRequest {
    #[serde(default)]
    recipe_name: String,
    #[serde(default)]
    recipe_category: String,
    #[serde(default)]
    recipe_region: String,
    #[serde(default)]
    recipe_photo: String,
}

async fn favorite_status(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(recipe_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let saved = db::is_recipe_saved(&state.pool, user_id, recipe_id).await?;
    Ok(Json(json!({ "isFavorited": saved })))
}

async fn toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(recipe_id): Path<i64>,
    payload: Option<Json<FavoriteRequest>>,
) -> AppResult<Json<Value>> {
    let details = payload.map(|Json(body)| body).unwrap_or_default();
    let recipe = NewRecipe {
        recipe_name: details.recipe_name,
        recipe_category: details.recipe_category,
        recipe_region: details.recipe_region,
        recipe_photo: details.recipe_photo,
        ..NewRecipe::default()
    };

    let favorited = db::toggle_favorite(&state.pool, user_id, recipe_id, &recipe).await?;
    let message = if favorited {
        "Recipe favorited successfully"
    } else {
        "Recipe unfavorited successfully"
    };
    Ok(Json(json!({ "message": message, "isFavorited": favorited })))
}

// ---------------------------------------------------------------------------
// Meal plan
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AssignMealRequest {
    recipe_id: i64,
    day_of_week: String,
    meal_type: String,
}

#[derive(Debug, Deserialize)]
struct SlotRequest {
    day_of_week: String,
    meal_type: String,
}

async fn get_meal_plan(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<MealPlanEntry>>> {
    Ok(Json(db::get_meal_plan(&state.pool, user_id).await?))
}

async fn assign_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<AssignMealRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let request = json_body(payload)?;
    let day: DayOfWeek = request.day_of_week.parse()?;
    let meal: MealType = request.meal_type.parse()?;

    let change = meal_plan::assign_recipe(&state.pool, user_id, request.recipe_id, day, meal).await?;
    Ok(Json(json!({ "message": change.message(), "change": change })))
}

async fn remove_meal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<SlotRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let request = json_body(payload)?;
    let day: DayOfWeek = request.day_of_week.parse()?;
    let meal: MealType = request.meal_type.parse()?;

    meal_plan::remove_slot(&state.pool, user_id, day, meal).await?;
    Ok(Json(json!({ "message": "Meal removed successfully" })))
}

async fn clear_week(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Value>> {
    let removed = db::clear_meal_plan(&state.pool, user_id).await?;
    Ok(Json(json!({
        "message": "Meal plan cleared successfully",
        "removed": removed,
    })))
}

async fn meal_plan_ingredients(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<IngredientLine>>> {
    Ok(Json(db::get_meal_plan_ingredients(&state.pool, user_id).await?))
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingListQuery {
    format: Option<String>,
}

async fn shopping_list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ShoppingListQuery>,
) -> AppResult<Response> {
    let lines = db::get_meal_plan_ingredients(&state.pool, user_id).await?;
    let list = ShoppingList::from_lines(&lines);
    info!(
        "Built shopping list for user {}: {} items from {} lines",
        user_id,
        list.item_count(),
        lines.len()
    );

    match query.format.as_deref() {
        Some("text") => Ok((
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            )],
            list.render_text(),
        )
            .into_response()),
        Some("json") | None => Ok(Json(list).into_response()),
        Some(other) => Err(AppError::BadRequest(format!("Unknown format: '{other}'"))),
    }
}

// ---------------------------------------------------------------------------
// Ingredient prices
// ---------------------------------------------------------------------------

async fn coles_price(
    State(state): State<AppState>,
    Path(ingredient): Path<String>,
) -> AppResult<Json<Value>> {
    debug!("Coles catalog price for '{}'", ingredient);
    let product = state.coles_catalog.best_product(&ingredient).await?;
    Ok(Json(json!({ "Coles": product })))
}

async fn best_price(
    State(state): State<AppState>,
    Path(ingredient): Path<String>,
) -> AppResult<Json<PriceResolution>> {
    if ingredient.trim().is_empty() {
        return Err(AppError::BadRequest("Missing ingredient name".to_string()));
    }
    Ok(Json(state.resolver.resolve(&ingredient).await))
}
