use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub customer_name: String,
    #[validate(email(message = "a valid email is required"))]
    pub customer_email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
