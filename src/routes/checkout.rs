use axum::{middleware, routing::get, Router};

use crate::handlers::checkout::{create_order, get_orders};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/checkout", get(get_orders).post(create_order))
        .layer(middleware::from_fn(require_auth))
}
