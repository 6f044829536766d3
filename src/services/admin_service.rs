use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    dto::admins::{Dashboard, DashboardStats},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        orders::{Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::CurrentAdmin,
    models::{Category, Order, OrderStatus, Product},
    response::{ApiResponse, Meta},
    services::product_service::LOW_STOCK_THRESHOLD,
    state::AppState,
};

/// Back office landing data, visible to every signed-in admin.
pub async fn dashboard(
    state: &AppState,
    admin: &CurrentAdmin,
) -> AppResult<ApiResponse<Dashboard>> {
    let products: Vec<Product> = Products::find()
        .order_by_asc(ProdCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let orders: Vec<Order> = Orders::find()
        .order_by_desc(OrderCol::DatePlaced)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let categories = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let mut low_stock: Vec<Product> = products
        .iter()
        .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
        .cloned()
        .collect();
    low_stock.sort_by_key(|p| p.stock);

    let revenue = orders
        .iter()
        .try_fold(0_i64, |sum, o| sum.checked_add(o.total_price))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("revenue total overflowed")))?;

    let new_status = OrderStatus::New.as_str();
    let stats = DashboardStats {
        product_count: products.len(),
        order_count: orders.len(),
        new_order_count: orders.iter().filter(|o| o.status == new_status).count(),
        low_stock_count: low_stock.len(),
        revenue,
    };

    let CurrentAdmin(identity) = admin;
    let data = Dashboard {
        admin: identity.username.clone(),
        permissions: identity.permissions,
        stats,
        products,
        low_stock,
        orders,
        categories,
    };
    Ok(ApiResponse::success("Dashboard", data, Some(Meta::empty())))
}
