use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        products::{CategoryList, ProductDetail, ProductList},
        reviews::SubmitReviewRequest,
    },
    error::AppResult,
    models::Review,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::{catalog_service, review_service},
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/categories", get(list_categories))
        .route("/products/{id}", get(get_product))
        .route("/review/submit/{id}", post(submit_review))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("query" = Option<String>, Query, description = "Case-insensitive match on name or description"),
        ("category_id" = Option<Uuid>, Query, description = "Only products in this category"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>)
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, &session.snapshot(), query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Categories with product counts", body = ApiResponse<CategoryList>)
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with its reviews", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = catalog_service::get_product(&state, &session.snapshot(), id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/review/submit/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ApiResponse<Review>),
        (status = 400, description = "Rating outside 1-5 or missing reviewer name"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Catalog"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Review>>)> {
    let resp = review_service::submit_review(&state, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
