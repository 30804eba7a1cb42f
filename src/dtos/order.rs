use serde::{Deserialize, Serialize};

use super::product::ProductResponse;

/// Checkout body. The item list is the client's cart snapshot; it is accepted
/// for shape compatibility but pricing always derives from the server-side
/// cart rows, so a stale or tampered client total can never be persisted.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: String,
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub order_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub total: f64,
    pub status: String,
    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: i64,
    pub price: f64,
    pub product: ProductResponse,
}
