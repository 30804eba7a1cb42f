use axum::{middleware, routing::{get, patch}, Router};

use crate::handlers::cart::{add_to_cart, get_cart, remove_from_cart, update_quantity};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(get_cart).post(add_to_cart))
        .route("/api/cart/{id}", patch(update_quantity).delete(remove_from_cart))
        .layer(middleware::from_fn(require_auth))
}
