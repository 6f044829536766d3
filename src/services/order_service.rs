use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::record_activity,
    dto::{
        cart::CartSummary,
        orders::{CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    },
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{Authorized, ManageOrders},
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service::cart_summary,
    session::Session,
    state::AppState,
};

#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Nothing to buy; the caller is sent back to the storefront.
    EmptyCart,
    Placed(OrderWithItems),
}

/// Turns the session cart into an order.
///
/// Every line is checked against stock before anything is written. Stock is
/// decremented with a guarded update (`stock >= quantity`) in the same
/// transaction; if any decrement misses, the whole order is rolled back.
pub async fn checkout(
    state: &AppState,
    session: &Session,
    payload: CheckoutRequest,
) -> AppResult<CheckoutOutcome> {
    let data = session.snapshot();
    if data.cart.is_empty() {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    payload.validate()?;
    let customer_name = payload.customer_name.trim().to_owned();
    if customer_name.is_empty() {
        return Err(AppError::BadRequest("customer_name is required".into()));
    }

    let summary = cart_summary(&state.orm, &data).await?;
    if summary.items.is_empty() {
        // every product in the cart has been removed from the catalog
        session.update(|data| data.cart.clear());
        return Ok(CheckoutOutcome::EmptyCart);
    }

    let txn = state.orm.begin().await?;
    let placed = place_order(&txn, &summary, customer_name, &payload.customer_email).await;
    let (order, items) = match placed {
        Ok(placed) => {
            txn.commit().await?;
            placed
        }
        Err(err) => {
            txn.rollback().await?;
            return Err(err);
        }
    };

    session.update(|data| {
        data.cart.clear();
        data.placed_orders.push(order.id);
    });

    tracing::info!(
        order_id = %order.id,
        total = order.total_price,
        lines = items.len(),
        "order placed"
    );
    Ok(CheckoutOutcome::Placed(OrderWithItems {
        order: Order::from(order),
        items,
    }))
}

/// Confirmation page data. Only orders placed from this session are visible.
pub async fn order_success(
    state: &AppState,
    session: &Session,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if !session.snapshot().placed_orders.contains(&id) {
        return Err(AppError::NotFound);
    }
    let order = load_order(&state.orm, id).await?;
    Ok(ApiResponse::success("Order placed", order, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    _admin: &Authorized<ManageOrders>,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse().map_err(AppError::BadRequest)?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::DatePlaced),
        SortOrder::Desc => finder.order_by_desc(OrderCol::DatePlaced),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items: orders }, Some(meta)))
}

pub async fn order_details(
    state: &AppState,
    _admin: &Authorized<ManageOrders>,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = load_order(&state.orm, id).await?;
    Ok(ApiResponse::success("Order", order, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    admin: &Authorized<ManageOrders>,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let status: OrderStatus = payload.status.trim().parse().map_err(AppError::BadRequest)?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous = order.status.clone();

    let mut active: OrderActive = order.into();
    active.status = Set(status.to_string());
    let order = active.update(&state.orm).await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Updated order {} status from {previous} to {status}", order.id),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Order status updated to {status}"),
        Order::from(order),
        Some(Meta::empty()),
    ))
}

async fn place_order(
    txn: &DatabaseTransaction,
    summary: &CartSummary,
    customer_name: String,
    customer_email: &str,
) -> AppResult<(OrderModel, Vec<OrderItem>)> {
    let ids: Vec<Uuid> = summary.items.iter().map(|line| line.product_id).collect();
    let products = Products::find()
        .filter(ProdCol::Id.is_in(ids))
        .all(txn)
        .await?;

    for line in &summary.items {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| AppError::BadRequest(format!("{} is no longer available", line.name)))?;
        if product.stock < line.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}: {} left",
                product.name, product.stock
            )));
        }
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_name: Set(customer_name),
        customer_email: Set(customer_email.trim().to_owned()),
        total_price: Set(summary.total),
        date_placed: Set(Utc::now().into()),
        status: Set(OrderStatus::New.to_string()),
    }
    .insert(txn)
    .await?;

    let mut items = Vec::with_capacity(summary.items.len());
    for line in &summary.items {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_name: Set(line.name.clone()),
            price: Set(line.price),
            quantity: Set(line.quantity),
        }
        .insert(txn)
        .await?;
        items.push(OrderItem::from(item));

        let result = Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(line.quantity))
            .filter(ProdCol::Id.eq(line.product_id))
            .filter(ProdCol::Stock.gte(line.quantity))
            .exec(txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                line.name
            )));
        }
    }

    Ok((order, items))
}

async fn load_order<C>(conn: &C, id: Uuid) -> AppResult<OrderWithItems>
where
    C: ConnectionTrait,
{
    let order = Orders::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::ProductName)
        .all(conn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(OrderWithItems {
        order: Order::from(order),
        items,
    })
}
