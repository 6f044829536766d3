use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::reviews::RatingSummary,
    models::{Category, Product, Review},
};

/// Product as shown in the storefront, priced in the session currency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSummary {
    #[serde(flatten)]
    pub product: Product,
    pub display_price: String,
    pub rating: RatingSummary,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductSummary>)]
    pub items: Vec<ProductSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: ProductSummary,
    pub category: Option<Category>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProductList {
    pub items: Vec<Product>,
}

/// Fields of the multipart product form. Every field is optional so the same
/// form serves creation (name and price required) and partial edits.
#[derive(Debug, Default, Clone)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub image: Option<ImageUpload>,
}

/// Multipart layout accepted by the add and edit product endpoints.
#[derive(Debug, ToSchema)]
pub struct ProductUpload {
    pub name: Option<String>,
    /// Decimal amount in the base currency, e.g. `12.50`.
    pub price: Option<String>,
    pub description: Option<String>,
    pub stock: Option<i32>,
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<CategoryWithCount>)]
    pub items: Vec<CategoryWithCount>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
}

/// Data behind the product edit form.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductEditor {
    pub product: Product,
    pub categories: Vec<Category>,
}
