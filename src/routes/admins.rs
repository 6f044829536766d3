use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        admins::{ActivityList, AdminList, CreateAdminRequest},
        storefront::Deleted,
    },
    error::AppResult,
    middleware::auth::{Authorized, ManageAdmins},
    models::{AdminUser, Permissions},
    response::ApiResponse,
    routes::params::ActivityQuery,
    services::admin_user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/{id}/permissions", post(update_permissions))
        .route("/{id}/toggle_active", post(toggle_active))
        .route("/{id}/delete", post(delete_admin))
        .route("/activity", get(list_activity))
        .route("/export", get(export_activity))
}

#[utoipa::path(
    get,
    path = "/manage_admins",
    responses(
        (status = 200, description = "All admin accounts", body = ApiResponse<AdminList>),
        (status = 403, description = "Admins permission required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn list_admins(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
) -> AppResult<Json<ApiResponse<AdminList>>> {
    let resp = admin_user_service::list_admins(&state, &admin).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/manage_admins",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<AdminUser>),
        (status = 400, description = "Invalid or taken username, short password"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn create_admin(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AdminUser>>)> {
    let resp = admin_user_service::create_admin(&state, &admin, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/manage_admins/{id}/permissions",
    params(
        ("id" = Uuid, Path, description = "Admin ID")
    ),
    request_body = Permissions,
    responses(
        (status = 200, description = "Permissions replaced", body = ApiResponse<AdminUser>),
        (status = 404, description = "Admin not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn update_permissions(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Permissions>,
) -> AppResult<Json<ApiResponse<AdminUser>>> {
    let resp = admin_user_service::update_permissions(&state, &admin, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/manage_admins/{id}/toggle_active",
    params(
        ("id" = Uuid, Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Account activated or deactivated", body = ApiResponse<AdminUser>),
        (status = 400, description = "Own account"),
        (status = 404, description = "Admin not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn toggle_active(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AdminUser>>> {
    let resp = admin_user_service::toggle_active(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/manage_admins/{id}/delete",
    params(
        ("id" = Uuid, Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse<Deleted>),
        (status = 400, description = "Own account"),
        (status = 404, description = "Admin not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Deleted>>> {
    let resp = admin_user_service::delete_admin(&state, &admin, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/manage_admins/activity",
    params(
        ("admin_id" = Option<Uuid>, Query, description = "Only this admin's actions"),
        ("action" = Option<String>, Query, description = "Case-insensitive match on the action text"),
        ("from" = Option<String>, Query, description = "RFC 3339 lower bound, inclusive"),
        ("to" = Option<String>, Query, description = "RFC 3339 upper bound, inclusive"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Activity log, newest first", body = ApiResponse<ActivityList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn list_activity(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<ApiResponse<ActivityList>>> {
    let resp = admin_user_service::list_activity(&state, &admin, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/manage_admins/export",
    params(
        ("admin_id" = Option<Uuid>, Query, description = "Only this admin's actions"),
        ("action" = Option<String>, Query, description = "Case-insensitive match on the action text"),
        ("from" = Option<String>, Query, description = "RFC 3339 lower bound, inclusive"),
        ("to" = Option<String>, Query, description = "RFC 3339 upper bound, inclusive"),
    ),
    responses(
        (status = 200, description = "Filtered activity log as CSV", content_type = "text/csv", body = String),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin Accounts"
)]
pub async fn export_activity(
    State(state): State<AppState>,
    admin: Authorized<ManageAdmins>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<impl IntoResponse> {
    let csv = admin_user_service::export_activity(&state, &admin, query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"admin_activity.csv\"",
            ),
        ],
        csv,
    ))
}
