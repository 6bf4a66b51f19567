use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use super::AppState;
use crate::models::{FoodRecord, NewFood, NutritionReport};
use crate::store::DEFAULT_MIN_PROTEIN;

/// Maximum suggestions returned when a name lookup has no exact match.
pub const SUGGESTION_LIMIT: usize = 10;
/// Maximum results returned by search.
pub const SEARCH_LIMIT: usize = 20;

/// Treats absent and empty parameters alike.
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    foods: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        foods: state.store.len(),
    })
}

#[derive(Debug, Deserialize)]
pub struct FoodQuery {
    name: Option<String>,
}

/// Exact match, or suggestions when there is none.
#[derive(Debug, Serialize, Deserialize)]
pub struct FoodLookup {
    pub exact: Option<FoodRecord>,
    pub suggestions: Vec<FoodRecord>,
}

pub async fn get_food(
    State(state): State<AppState>,
    Query(query): Query<FoodQuery>,
) -> Result<Json<FoodLookup>, ApiError> {
    let name = required(query.name).ok_or_else(|| ApiError::bad_request("Food name is required"))?;

    let lookup = match state.store.get_food_by_name(&name) {
        Some(food) => FoodLookup {
            exact: Some(food),
            suggestions: Vec::new(),
        },
        None => {
            let mut suggestions = state.store.search_foods(&name);
            suggestions.truncate(SUGGESTION_LIMIT);
            FoodLookup {
                exact: None,
                suggestions,
            }
        }
    };

    Ok(Json(lookup))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FoodRecord>>, ApiError> {
    let query =
        required(query.query).ok_or_else(|| ApiError::bad_request("Search query is required"))?;

    let mut results = state.store.search_foods(&query);
    results.truncate(SEARCH_LIMIT);
    Ok(Json(results))
}

pub async fn category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<FoodRecord>> {
    Json(state.store.get_foods_by_category(&category))
}

#[derive(Debug, Deserialize)]
pub struct HighProteinQuery {
    min: Option<String>,
}

pub async fn high_protein(
    State(state): State<AppState>,
    Query(query): Query<HighProteinQuery>,
) -> Result<Json<Vec<FoodRecord>>, ApiError> {
    let min_protein = match required(query.min) {
        Some(min) => min
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|min| min.is_finite())
            .ok_or_else(|| ApiError::bad_request("min must be a number"))?,
        None => DEFAULT_MIN_PROTEIN,
    };

    Ok(Json(state.store.get_high_protein_foods(min_protein)))
}

#[derive(Debug, Deserialize)]
pub struct CalculateQuery {
    #[serde(rename = "foodId")]
    food_id: Option<String>,
    grams: Option<String>,
}

pub async fn calculate(
    State(state): State<AppState>,
    Query(query): Query<CalculateQuery>,
) -> Result<Json<NutritionReport>, ApiError> {
    let (food_id, grams) = match (required(query.food_id), required(query.grams)) {
        (Some(food_id), Some(grams)) => (food_id, grams),
        _ => return Err(ApiError::bad_request("Food ID and grams are required")),
    };

    let grams = grams
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|grams| grams.is_finite())
        .ok_or_else(|| ApiError::bad_request("grams must be a number"))?;

    state
        .store
        .calculate_nutrition(&food_id, grams)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Food not found"))
}

pub async fn add_food(
    State(state): State<AppState>,
    payload: Result<Json<NewFood>, JsonRejection>,
) -> Result<(StatusCode, Json<FoodRecord>), ApiError> {
    let Json(new_food) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    // File writes are blocking
    let store = Arc::clone(&state.store);
    let created = tokio::task::spawn_blocking(move || store.add_food(new_food))
        .await
        .map_err(|e| ApiError::Internal(format!("add food task failed: {}", e)))??;

    Ok((StatusCode::CREATED, Json(created)))
}
