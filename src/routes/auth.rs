use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::AppResult,
    response::ApiResponse,
    services::auth_service::login_admin,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/login", post(login))
}

#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin signed in", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or inactive account")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_admin(&state, payload).await?;
    Ok(Json(resp))
}
