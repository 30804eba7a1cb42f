use serde::{Deserialize, Serialize};

use super::product::ProductResponse;
use crate::models::cart::CartItem;
use crate::models::product::Product;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub product: ProductResponse,
    pub created_at: String,
}

impl CartItemResponse {
    pub fn from_parts(item: CartItem, product: Product) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
            product: ProductResponse::from(product),
            created_at: item.created_at.to_rfc3339(),
        }
    }
}
