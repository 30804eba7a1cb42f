use serde::{Deserialize, Serialize};

use super::product::ProductResponse;
use crate::models::favorite::Favorite;
use crate::models::product::Product;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToFavoritesRequest {
    pub product_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub id: String,
    pub product_id: String,
    pub product: ProductResponse,
    pub created_at: String,
}

impl FavoriteResponse {
    pub fn from_parts(favorite: Favorite, product: Product) -> Self {
        Self {
            id: favorite.id,
            product_id: favorite.product_id,
            product: ProductResponse::from(product),
            created_at: favorite.created_at.to_rfc3339(),
        }
    }
}
