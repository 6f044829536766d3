use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::currency::Currency;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub line_total: i64,
    pub display_price: String,
    pub display_line_total: String,
}

/// Cart priced from live product rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub total: i64,
    pub display_total: String,
    pub count: u32,
    pub currency: Currency,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartUpdate {
    pub product_id: Uuid,
    pub quantity: u32,
    pub cart_count: u32,
}
