use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        admins::Dashboard,
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
        products::{AdminProductList, CategoryRequest, ProductEditor, ProductUpload},
        reviews::ReviewList,
        storefront::Deleted,
    },
    error::AppResult,
    middleware::auth::{Authorized, CurrentAdmin, ManageOrders, ManageProducts, ManageReviews},
    models::{Category, Order, Product},
    response::ApiResponse,
    routes::params::{LowStockQuery, OrderListQuery, ReviewListQuery},
    services::{admin_service, order_service, product_service, review_service, upload_service},
    state::AppState,
};

/// Room for one maximum-size image plus the text fields.
const UPLOAD_BODY_LIMIT: usize = upload_service::MAX_IMAGE_BYTES + 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route(
            "/add_product",
            post(add_product).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/edit_product/{id}",
            get(edit_product_form)
                .post(edit_product)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/delete_product/{id}", post(delete_product))
        .route("/admin/inventory/low-stock", get(low_stock))
        .route("/add_category", post(add_category))
        .route("/edit_category/{id}", post(edit_category))
        .route("/delete_category/{id}", post(delete_category))
        .route("/admin/orders", get(list_orders))
        .route("/order_details/{id}", get(order_details))
        .route("/update_order_status/{id}", post(update_order_status))
        .route("/admin/reviews", get(list_reviews))
        .route("/delete_review/{id}", post(delete_review))
}

#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Back office overview", body = ApiResponse<Dashboard>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    admin: CurrentAdmin,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let resp = admin_service::dashboard(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/add_product",
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Missing name or price, bad number, unknown category or bad image"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Products permission required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn add_product(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let form = upload_service::read_product_form(multipart).await?;
    let resp = product_service::create_product(&state, &admin, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/edit_product/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product and the category choices", body = ApiResponse<ProductEditor>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn edit_product_form(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductEditor>>> {
    let resp = product_service::edit_form(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/edit_product/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body(content = ProductUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 400, description = "Bad number, unknown category or bad image"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn edit_product(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Product>>> {
    let form = upload_service::read_product_form(multipart).await?;
    let resp = product_service::update_product(&state, &admin, id, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/delete_product/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = product_service::delete_product(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/inventory/low-stock",
    params(
        ("threshold" = Option<i32>, Query, description = "Stock below this value, default 5"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Products running low", body = ApiResponse<AdminProductList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn low_stock(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<AdminProductList>>> {
    let resp = product_service::low_stock(&state, &admin, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/add_category",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Empty or duplicate name"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn add_category(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = product_service::create_category(&state, &admin, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/edit_category/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = ApiResponse<Category>),
        (status = 400, description = "Empty or duplicate name"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn edit_category(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = product_service::update_category(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/delete_category/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Products"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    admin: Authorized<ManageProducts>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = product_service::delete_category(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "New, Processing, Shipped or Delivered"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Orders permission required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    admin: Authorized<ManageOrders>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &admin, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/order_details/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Orders"
)]
pub async fn order_details(
    State(state): State<AppState>,
    admin: Authorized<ManageOrders>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::order_details(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/update_order_status/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    admin: Authorized<ManageOrders>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/reviews",
    params(
        ("product_id" = Option<Uuid>, Query, description = "Only reviews of this product"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Reviews, newest first", body = ApiResponse<ReviewList>),
        (status = 403, description = "Reviews permission required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    admin: Authorized<ManageReviews>,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, &admin, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/delete_review/{id}",
    params(
        ("id" = Uuid, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse<Deleted>),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    admin: Authorized<ManageReviews>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = review_service::delete_review(&state, &admin, id).await?;
    Ok(Json(resp))
}
