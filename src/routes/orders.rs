use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        cart::CartSummary,
        orders::{CheckoutRequest, OrderWithItems},
    },
    error::AppResult,
    response::{ApiResponse, Meta},
    services::{
        cart_service,
        order_service::{self, CheckoutOutcome},
    },
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout_page).post(checkout))
        .route("/order_success/{id}", get(order_success))
}

#[utoipa::path(
    get,
    path = "/checkout",
    responses(
        (status = 200, description = "Cart about to be ordered", body = ApiResponse<CartSummary>),
        (status = 303, description = "Cart is empty, redirected to /"),
    ),
    tag = "Checkout"
)]
pub async fn checkout_page(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    let summary = cart_service::cart_summary(&state.orm, &session.snapshot()).await?;
    if summary.items.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Json(ApiResponse::success("Checkout", summary, Some(Meta::empty()))).into_response())
}

#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderWithItems>),
        (status = 303, description = "Cart is empty, redirected to /"),
        (status = 400, description = "Invalid customer details or not enough stock"),
    ),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Response> {
    match order_service::checkout(&state, &session, payload).await? {
        CheckoutOutcome::EmptyCart => Ok(Redirect::to("/").into_response()),
        CheckoutOutcome::Placed(placed) => {
            let location = format!("/order_success/{}", placed.order.id);
            let body = ApiResponse::success("Order placed", placed, Some(Meta::empty()));
            Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/order_success/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Placed order with its items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not placed from this session"),
    ),
    tag = "Checkout"
)]
pub async fn order_success(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::order_success(&state, &session, id).await?;
    Ok(Json(resp))
}
