use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{AdminUser, Category, Order, Permissions, Product};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(min = 3, max = 80, message = "username must be 3-80 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub permissions: Permissions,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminList {
    pub items: Vec<AdminUser>,
}

/// Activity row joined with the acting admin's username.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub admin_username: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityList {
    pub items: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub product_count: usize,
    pub order_count: usize,
    pub new_order_count: usize,
    pub low_stock_count: usize,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub admin: String,
    pub permissions: Permissions,
    pub stats: DashboardStats,
    pub products: Vec<Product>,
    pub low_stock: Vec<Product>,
    pub orders: Vec<Order>,
    pub categories: Vec<Category>,
}
