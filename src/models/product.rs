use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;

#[derive(Debug, FromRow)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub images: Json<Vec<String>>,
    pub category: String,
    pub rating: f64,
    pub review_count: i64,
    pub in_stock: bool,
    pub specifications: Json<HashMap<String, String>>,
    pub installment_months: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price used for cart totals and order lines.
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }
}
