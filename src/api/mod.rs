//! HTTP API over the food store.
//!
//! # Endpoints
//!
//! - `GET /health`: service status and record count
//! - `GET /api/food?name=`: exact lookup, with up to 10 suggestions on a miss
//! - `POST /api/food`: create a food (201)
//! - `GET /api/search?query=`: substring search, up to 20 results
//! - `GET /api/category/{category}`: foods in a category
//! - `GET /api/high-protein?min=`: foods with at least `min` g protein (default 15)
//! - `GET /api/calculate?foodId=&grams=`: nutrition scaled to a quantity
//!
//! Any other path is served from the public asset directory when one is
//! configured.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{FoodLookup, SEARCH_LIMIT, SUGGESTION_LIMIT};

use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::store::FoodStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FoodStore>,
}

impl AppState {
    pub fn new(store: FoodStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Builds the application router. Static assets are served from
/// `public_dir` for any path no API route matches.
pub fn router(state: AppState, public_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/food", get(handlers::get_food).post(handlers::add_food))
        .route("/api/search", get(handlers::search))
        .route("/api/category/{category}", get(handlers::category))
        .route("/api/high-protein", get(handlers::high_protein))
        .route("/api/calculate", get(handlers::calculate))
        .with_state(state);

    let app = match public_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}
