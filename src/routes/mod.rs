pub mod auth;
pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod products;

use axum::response::IntoResponse;
use http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(products::routes())
        .merge(cart::routes())
        .merge(favorites::routes())
        .merge(checkout::routes())
        .route("/health", get(health_check))
        .fallback(not_found)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
