// src/handlers/product.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use sqlx::SqlitePool;
use tracing::{error, instrument};

use crate::dtos::product::{ProductListQuery, ProductListResponse, ProductResponse};
use crate::dtos::Envelope;
use crate::error::AppError;
use crate::models::product::Product;
use crate::state::AppState;

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, title, description, price, discount_price, images, category, rating, \
     review_count, in_stock, specifications, installment_months, created_at";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 40;

/// Shared single-product lookup used by the cart, favorites and checkout
/// handlers as well as the detail route.
pub(crate) async fn find_product(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

// Escape LIKE wildcards so a query never acts as a pattern.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// GET /api/products - List with filter, pagination and sorting
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>, AppError> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let offset = (page - 1) * limit;

    // Empty query params mean "not filtered"
    let q = query.q.filter(|s| !s.is_empty());
    let category = query.category.filter(|s| !s.is_empty());
    let pattern = q.as_deref().map(|q| format!("%{}%", escape_like(q)));

    // Sort column is whitelisted; anything else falls back to created_at
    let sort_column = match query.sort_by.as_deref() {
        Some("price") => "price",
        Some("rating") => "rating",
        Some("title") => "title",
        _ => "created_at",
    };
    let sort_dir = if query.sort_order.as_deref() == Some("asc") { "ASC" } else { "DESC" };

    let mut clauses: Vec<&str> = Vec::new();
    if pattern.is_some() {
        clauses.push("(title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')");
    }
    if category.is_some() {
        clauses.push("category = ?");
    }
    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM products{where_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(p) = &pattern {
        count_query = count_query.bind(p).bind(p);
    }
    if let Some(c) = &category {
        count_query = count_query.bind(c);
    }
    let total = count_query.fetch_one(&state.db_pool).await?;

    let page_sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products{where_sql} \
         ORDER BY {sort_column} {sort_dir} LIMIT ? OFFSET ?"
    );
    let mut page_query = sqlx::query_as::<_, Product>(&page_sql);
    if let Some(p) = &pattern {
        page_query = page_query.bind(p).bind(p);
    }
    if let Some(c) = &category {
        page_query = page_query.bind(c);
    }
    let products = page_query
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db_pool)
        .await
        .map_err(|e| {
            error!(?e, "Failed to fetch products");
            AppError::from(e)
        })?;

    Ok(Json(ProductListResponse {
        data: products.into_iter().map(ProductResponse::from).collect(),
        page,
        limit,
        total,
        total_pages: (total + limit - 1) / limit,
    }))
}

// GET /api/products/:id - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Envelope<ProductResponse>>, AppError> {
    let product = find_product(&state.db_pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(Envelope::new(ProductResponse::from(product))))
}
