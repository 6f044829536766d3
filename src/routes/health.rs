use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    status: String,
    database: String,
    active_sessions: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
        (status = 503, description = "Database unreachable", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthData>>) {
    let (status, database) = match state.orm.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(err) => {
            tracing::error!(error = %err, "database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    let data = HealthData {
        status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
        database: database.to_string(),
        active_sessions: state.sessions.len(),
    };

    (
        status,
        Json(ApiResponse::success("Health check", data, Some(Meta::empty()))),
    )
}
