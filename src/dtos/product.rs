// src/dtos/product.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(default, rename = "sortOrder")]
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub images: Vec<String>,
    pub category: String,
    pub rating: f64,
    pub review_count: i64,
    pub in_stock: bool,
    pub specifications: HashMap<String, String>,
    pub installment_months: Option<i64>,
    pub created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub data: Vec<ProductResponse>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

// Convert from Model to Response DTO
impl From<crate::models::product::Product> for ProductResponse {
    fn from(product: crate::models::product::Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            discount_price: product.discount_price,
            images: product.images.0,
            category: product.category,
            rating: product.rating,
            review_count: product.review_count,
            in_stock: product.in_stock,
            specifications: product.specifications.0,
            installment_months: product.installment_months,
            created_at: product.created_at.to_rfc3339(),
        }
    }
}
