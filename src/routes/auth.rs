use axum::{middleware, routing::{get, post}, Router};

use crate::handlers::auth::{login, profile, register};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let open = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let protected = Router::new()
        .route("/api/auth/profile", get(profile))
        .layer(middleware::from_fn(require_auth));

    open.merge(protected)
}
