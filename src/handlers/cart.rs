// src/handlers/cart.rs
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::dtos::cart::{AddToCartRequest, CartItemResponse, UpdateQuantityRequest};
use crate::dtos::{Envelope, MessageResponse};
use crate::error::AppError;
use crate::handlers::product::find_product;
use crate::middleware::auth::AuthContext;
use crate::models::cart::CartItem;
use crate::state::AppState;

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, created_at";

// GET /api/cart - the caller's cart, most recent first
pub async fn get_cart(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Envelope<Vec<CartItemResponse>>>, AppError> {
    let items = sqlx::query_as::<_, CartItem>(&format!(
        "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(&auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = find_product(&db_pool, &item.product_id)
            .await?
            .ok_or_else(|| AppError::internal("Cart references a missing product"))?;
        lines.push(CartItemResponse::from_parts(item, product));
    }

    Ok(Json(Envelope::new(lines)))
}

// POST /api/cart - add a product; repeated adds increment the existing line
pub async fn add_to_cart(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<(StatusCode, Json<Envelope<CartItemResponse>>), AppError> {
    if payload.quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    let product = find_product(&db_pool, &payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    if !product.in_stock {
        return Err(AppError::validation("Product is out of stock"));
    }

    // Single conditional upsert; UNIQUE(user_id, product_id) makes the
    // read-modify-write atomic instead of a find-then-update pair.
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "INSERT INTO cart_items (id, user_id, product_id, quantity, created_at) \
         VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT (user_id, product_id) \
         DO UPDATE SET quantity = quantity + excluded.quantity \
         RETURNING {CART_COLUMNS}"
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(&auth.user_id)
    .bind(&payload.product_id)
    .bind(payload.quantity)
    .bind(Utc::now())
    .fetch_one(&db_pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            CartItemResponse::from_parts(item, product),
            "Item added to cart successfully",
        )),
    ))
}

// PATCH /api/cart/:id - replace the quantity of an owned line
pub async fn update_quantity(
    Path(id): Path<String>,
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<Envelope<CartItemResponse>>, AppError> {
    if payload.quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }

    // Ownership check lives in the WHERE clause; a foreign line is a 404
    let item = sqlx::query_as::<_, CartItem>(&format!(
        "UPDATE cart_items SET quantity = ? WHERE id = ? AND user_id = ? RETURNING {CART_COLUMNS}"
    ))
    .bind(payload.quantity)
    .bind(&id)
    .bind(&auth.user_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Cart item not found"))?;

    let product = find_product(&db_pool, &item.product_id)
        .await?
        .ok_or_else(|| AppError::internal("Cart references a missing product"))?;

    Ok(Json(Envelope::with_message(
        CartItemResponse::from_parts(item, product),
        "Cart item updated successfully",
    )))
}

// DELETE /api/cart/:id
pub async fn remove_from_cart(
    Path(id): Path<String>,
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&auth.user_id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Cart item not found"));
    }

    Ok(Json(MessageResponse { message: "Item removed from cart successfully" }))
}
