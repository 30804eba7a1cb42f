use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
}
