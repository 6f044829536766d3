use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Query structs repeat `page`/`per_page` instead of flattening `Pagination`:
// flattened numeric fields do not deserialize from urlencoded queries.

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Requested pages past this are clamped.
pub const MAX_PAGE: i64 = 1_000_000;

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Free-text match on name or description.
    pub query: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CartAddQuery {
    pub quantity: Option<u32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LowStockQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub threshold: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReviewListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ActivityQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub admin_id: Option<Uuid>,
    /// Substring match on the action text.
    pub action: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

macro_rules! paginated {
    ($($query:ty),* $(,)?) => {
        $(
            impl $query {
                pub fn pagination(&self) -> Pagination {
                    Pagination {
                        page: self.page,
                        per_page: self.per_page,
                    }
                }
            }
        )*
    };
}

paginated!(
    ProductQuery,
    OrderListQuery,
    LowStockQuery,
    ReviewListQuery,
    ActivityQuery,
);
