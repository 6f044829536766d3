use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::favorites::{FavoriteProductList, FavoriteToggle},
    error::AppResult,
    response::ApiResponse,
    services::favorite_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/toggle/{id}", get(toggle_favorite))
}

#[utoipa::path(
    get,
    path = "/favorites",
    responses(
        (status = 200, description = "Favorite products of this session", body = ApiResponse<FavoriteProductList>)
    ),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<FavoriteProductList>>> {
    let resp = favorite_service::list_favorites(&state, &session).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/favorites/toggle/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Favorite flipped", body = ApiResponse<FavoriteToggle>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FavoriteToggle>>> {
    let resp = favorite_service::toggle_favorite(&state, &session, id).await?;
    Ok(Json(resp))
}
