use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    currency::Currency,
    dto::products::ProductSummary,
    models::Category,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct Home {
    pub categories: Vec<Category>,
    pub latest_products: Vec<ProductSummary>,
    pub cart_count: u32,
    pub favorites_count: usize,
    pub currency: Currency,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrencyRate {
    pub code: Currency,
    /// Units per one USD, as a decimal string.
    pub rate: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrencySettings {
    pub selected: Currency,
    pub available: Vec<CurrencyRate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Deleted {
    pub id: Uuid,
}
