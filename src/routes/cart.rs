use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::cart::{CartSummary, CartUpdate},
    error::AppResult,
    response::ApiResponse,
    routes::params::CartAddQuery,
    services::cart_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart))
        .route("/add/{id}", get(add_to_cart))
        .route("/remove/{id}", get(remove_from_cart))
        .route("/clear", get(clear_cart))
}

#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Session cart priced in the session currency", body = ApiResponse<CartSummary>)
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::view_cart(&state, &session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/cart/add/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("quantity" = Option<u32>, Query, description = "Units to add, default 1"),
    ),
    responses(
        (status = 200, description = "Product added", body = ApiResponse<CartUpdate>),
        (status = 400, description = "Zero quantity or not enough stock"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Query(query): Query<CartAddQuery>,
) -> AppResult<Json<ApiResponse<CartUpdate>>> {
    let quantity = query.quantity.unwrap_or(1);
    let resp = cart_service::add_to_cart(&state, &session, id, quantity).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/cart/remove/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartSummary>)
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::remove_from_cart(&state, &session, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/cart/clear",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartSummary>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::clear_cart(&state, &session).await?;
    Ok(Json(resp))
}
