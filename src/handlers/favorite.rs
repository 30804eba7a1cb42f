// src/handlers/favorite.rs
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::dtos::favorite::{AddToFavoritesRequest, FavoriteResponse};
use crate::dtos::{Envelope, MessageResponse};
use crate::error::AppError;
use crate::handlers::map_unique_violation;
use crate::handlers::product::find_product;
use crate::middleware::auth::AuthContext;
use crate::models::favorite::Favorite;
use crate::state::AppState;

const FAVORITE_COLUMNS: &str = "id, user_id, product_id, created_at";

// GET /api/favorites
pub async fn get_favorites(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Envelope<Vec<FavoriteResponse>>>, AppError> {
    let favorites = sqlx::query_as::<_, Favorite>(&format!(
        "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(&auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    let mut entries = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        let product = find_product(&db_pool, &favorite.product_id)
            .await?
            .ok_or_else(|| AppError::internal("Favorite references a missing product"))?;
        entries.push(FavoriteResponse::from_parts(favorite, product));
    }

    Ok(Json(Envelope::new(entries)))
}

// POST /api/favorites - set semantics, a repeat add is a conflict
pub async fn add_favorite(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<AddToFavoritesRequest>,
) -> Result<(StatusCode, Json<Envelope<FavoriteResponse>>), AppError> {
    let product = find_product(&db_pool, &payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let favorite = sqlx::query_as::<_, Favorite>(&format!(
        "INSERT INTO favorites (id, user_id, product_id, created_at) \
         VALUES (?, ?, ?, ?) RETURNING {FAVORITE_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(&auth.user_id)
    .bind(&payload.product_id)
    .bind(Utc::now())
    .fetch_one(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Product already in favorites"))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            FavoriteResponse::from_parts(favorite, product),
            "Item added to favorites successfully",
        )),
    ))
}

// DELETE /api/favorites/:id
pub async fn remove_favorite(
    Path(id): Path<String>,
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = sqlx::query("DELETE FROM favorites WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&auth.user_id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Favorite not found"));
    }

    Ok(Json(MessageResponse { message: "Item removed from favorites successfully" }))
}
