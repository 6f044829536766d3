use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog product. `price` is in minor units of the base currency (USD cents).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub reviewer_name: String,
    pub date_posted: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub total_price: i64,
    pub date_placed: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_name: String,
    pub price: i64,
    pub quantity: i32,
    pub line_total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    pub permissions: Permissions,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Products,
    Orders,
    Reviews,
    Admins,
}

/// The four capability flags an admin account carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Permissions {
    #[serde(default)]
    pub can_manage_products: bool,
    #[serde(default)]
    pub can_manage_orders: bool,
    #[serde(default)]
    pub can_manage_reviews: bool,
    #[serde(default)]
    pub can_manage_admins: bool,
}

impl Permissions {
    pub fn all() -> Self {
        Self {
            can_manage_products: true,
            can_manage_orders: true,
            can_manage_reviews: true,
            can_manage_admins: true,
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::Products => self.can_manage_products,
            Permission::Orders => self.can_manage_orders,
            Permission::Reviews => self.can_manage_reviews,
            Permission::Admins => self.can_manage_admins,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    New,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status '{s}'"))
    }
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
            stock: model.stock,
            image_url: model.image_url,
            category_id: model.category_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::reviews::Model> for Review {
    fn from(model: entity::reviews::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            rating: model.rating,
            comment: model.comment,
            reviewer_name: model.reviewer_name,
            date_posted: model.date_posted.with_timezone(&Utc),
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            customer_name: model.customer_name,
            customer_email: model.customer_email,
            total_price: model.total_price,
            date_placed: model.date_placed.with_timezone(&Utc),
            status: model.status,
        }
    }
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            line_total: model.price * i64::from(model.quantity),
            product_name: model.product_name,
            price: model.price,
            quantity: model.quantity,
        }
    }
}

impl From<&entity::admin_users::Model> for Permissions {
    fn from(model: &entity::admin_users::Model) -> Self {
        Self {
            can_manage_products: model.can_manage_products,
            can_manage_orders: model.can_manage_orders,
            can_manage_reviews: model.can_manage_reviews,
            can_manage_admins: model.can_manage_admins,
        }
    }
}

impl From<entity::admin_users::Model> for AdminUser {
    fn from(model: entity::admin_users::Model) -> Self {
        Self {
            permissions: Permissions::from(&model),
            id: model.id,
            username: model.username,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_parses_only_known_values() {
        assert_eq!("Shipped".parse::<OrderStatus>(), Ok(OrderStatus::Shipped));
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!("Cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn permissions_gate_each_capability_independently() {
        let perms = Permissions {
            can_manage_orders: true,
            ..Permissions::default()
        };
        assert!(perms.allows(Permission::Orders));
        assert!(!perms.allows(Permission::Products));
        assert!(!perms.allows(Permission::Reviews));
        assert!(!perms.allows(Permission::Admins));
        assert!(Permissions::all().allows(Permission::Admins));
    }
}
