use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::products::ProductSummary;

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteToggle {
    pub product_id: Uuid,
    pub is_favorite: bool,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteProductList {
    pub items: Vec<ProductSummary>,
    pub count: usize,
}
