use axum::{middleware, routing::{delete, get}, Router};

use crate::handlers::favorite::{add_favorite, get_favorites, remove_favorite};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/favorites", get(get_favorites).post(add_favorite))
        .route("/api/favorites/{id}", delete(remove_favorite))
        .layer(middleware::from_fn(require_auth))
}
