// src/handlers/checkout.rs
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::dtos::order::{CheckoutRequest, OrderCreatedResponse, OrderItemResponse, OrderResponse};
use crate::dtos::product::ProductResponse;
use crate::dtos::Envelope;
use crate::error::AppError;
use crate::handlers::product::{find_product, PRODUCT_COLUMNS};
use crate::middleware::auth::AuthContext;
use crate::models::cart::CartItem;
use crate::models::order::{Order, OrderItem};
use crate::models::product::Product;
use crate::state::AppState;

// POST /api/checkout - snapshot the cart into an immutable order
//
// The request body is the client's snapshot but every price comes from the
// products table as of this transaction; the cart is cleared on commit.
pub async fn create_order(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(_payload): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Envelope<OrderCreatedResponse>>), AppError> {
    let mut tx = db_pool.begin().await?;

    let cart_items = sqlx::query_as::<_, CartItem>(
        "SELECT id, user_id, product_id, quantity, created_at \
         FROM cart_items WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&auth.user_id)
    .fetch_all(&mut *tx)
    .await?;

    if cart_items.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    let mut total = 0.0_f64;
    let mut order_lines = Vec::with_capacity(cart_items.len());
    for item in &cart_items {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(&item.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

        let price = product.effective_price();
        total += price * item.quantity as f64;
        order_lines.push((item.product_id.clone(), item.quantity, price));
    }

    let order_id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO orders (id, user_id, total, status, created_at) VALUES (?, ?, ?, 'pending', ?)",
    )
    .bind(&order_id)
    .bind(&auth.user_id)
    .bind(total)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    for (product_id, quantity, price) in order_lines {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, quantity, price) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&order_id)
        .bind(&product_id)
        .bind(quantity)
        .bind(price)
        .execute(&mut *tx)
        .await?;
    }

    // Clearing the cart is part of the same transaction as the order
    sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
        .bind(&auth.user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(order_id = %order_id, total, "Order created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            OrderCreatedResponse { order_id },
            "Order created successfully",
        )),
    ))
}

// GET /api/checkout - the caller's order history, most recent first
pub async fn get_orders(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Envelope<Vec<OrderResponse>>>, AppError> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, total, status, created_at \
         FROM orders WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&auth.user_id)
    .fetch_all(&db_pool)
    .await?;

    let mut response = Vec::with_capacity(orders.len());
    for order in orders {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price \
             FROM order_items WHERE order_id = ?",
        )
        .bind(&order.id)
        .fetch_all(&db_pool)
        .await?;

        let mut item_responses = Vec::with_capacity(items.len());
        for item in items {
            let product = find_product(&db_pool, &item.product_id)
                .await?
                .ok_or_else(|| AppError::internal("Order references a missing product"))?;
            item_responses.push(OrderItemResponse {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
                product: ProductResponse::from(product),
            });
        }

        response.push(OrderResponse {
            id: order.id,
            total: order.total,
            status: order.status,
            items: item_responses,
            created_at: order.created_at.to_rfc3339(),
        });
    }

    Ok(Json(Envelope::new(response)))
}
