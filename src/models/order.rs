use chrono::{DateTime, Utc};

/// Immutable once created; the total and line prices are snapshots taken
/// from the cart rows at checkout time.
#[derive(Debug, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub total: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
}
