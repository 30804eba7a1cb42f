use chrono::{DateTime, Utc};

/// One row of a user's cart. UNIQUE(user_id, product_id) keeps at most one
/// row per product; adds go through a conditional upsert.
#[derive(Debug, sqlx::FromRow)]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}
