//! Admin accounts and the activity log.

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::record_activity,
    db::contains_pattern,
    dto::{
        admins::{ActivityEntry, ActivityList, AdminList, CreateAdminRequest},
        storefront::Deleted,
    },
    entity::{
        admin_activities::{Column as ActivityCol, Entity as AdminActivities, Model as ActivityModel},
        admin_users::{
            ActiveModel as AdminActive, Column as AdminCol, Entity as AdminUsers, Model as AdminModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{Authorized, ManageAdmins},
    models::{AdminUser, Permissions},
    response::{ApiResponse, Meta},
    routes::params::ActivityQuery,
    services::auth_service::hash_password,
    state::AppState,
};

pub async fn list_admins(
    state: &AppState,
    _admin: &Authorized<ManageAdmins>,
) -> AppResult<ApiResponse<AdminList>> {
    let items = AdminUsers::find()
        .order_by_asc(AdminCol::Username)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AdminUser::from)
        .collect();

    Ok(ApiResponse::success("Admins", AdminList { items }, Some(Meta::empty())))
}

pub async fn create_admin(
    state: &AppState,
    admin: &Authorized<ManageAdmins>,
    payload: CreateAdminRequest,
) -> AppResult<ApiResponse<AdminUser>> {
    payload.validate()?;
    let username = payload.username.trim().to_owned();

    let existing = AdminUsers::find()
        .filter(AdminCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest(format!("username '{username}' is taken")));
    }

    let password_hash = hash_password(&payload.password)?;
    let Permissions {
        can_manage_products,
        can_manage_orders,
        can_manage_reviews,
        can_manage_admins,
    } = payload.permissions;

    let created = AdminActive {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        password_hash: Set(password_hash),
        can_manage_products: Set(can_manage_products),
        can_manage_orders: Set(can_manage_orders),
        can_manage_reviews: Set(can_manage_reviews),
        can_manage_admins: Set(can_manage_admins),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Created admin '{}'", created.username),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Admin {} created", created.username),
        AdminUser::from(created),
        Some(Meta::empty()),
    ))
}

pub async fn update_permissions(
    state: &AppState,
    admin: &Authorized<ManageAdmins>,
    id: Uuid,
    permissions: Permissions,
) -> AppResult<ApiResponse<AdminUser>> {
    let target = AdminUsers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: AdminActive = target.into();
    active.can_manage_products = Set(permissions.can_manage_products);
    active.can_manage_orders = Set(permissions.can_manage_orders);
    active.can_manage_reviews = Set(permissions.can_manage_reviews);
    active.can_manage_admins = Set(permissions.can_manage_admins);
    let updated = active.update(&state.orm).await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Updated permissions of admin '{}'", updated.username),
    )
    .await;

    Ok(ApiResponse::success(
        "Permissions updated",
        AdminUser::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn toggle_active(
    state: &AppState,
    admin: &Authorized<ManageAdmins>,
    id: Uuid,
) -> AppResult<ApiResponse<AdminUser>> {
    if id == admin.admin_id() {
        return Err(AppError::BadRequest("you cannot deactivate your own account".into()));
    }

    let target = AdminUsers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let now_active = !target.is_active;

    let mut active: AdminActive = target.into();
    active.is_active = Set(now_active);
    let updated = active.update(&state.orm).await?;

    let verb = if now_active { "Activated" } else { "Deactivated" };
    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("{verb} admin '{}'", updated.username),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Admin {} {}", updated.username, verb.to_lowercase()),
        AdminUser::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_admin(
    state: &AppState,
    admin: &Authorized<ManageAdmins>,
    id: Uuid,
) -> AppResult<ApiResponse<Deleted>> {
    if id == admin.admin_id() {
        return Err(AppError::BadRequest("you cannot delete your own account".into()));
    }

    let target = AdminUsers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    AdminUsers::delete_by_id(target.id).exec(&state.orm).await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!("Deleted admin '{}'", target.username),
    )
    .await;

    Ok(ApiResponse::success(
        format!("Admin {} deleted", target.username),
        Deleted { id },
        Some(Meta::empty()),
    ))
}

/// Activity log, newest first.
pub async fn list_activity(
    state: &AppState,
    _admin: &Authorized<ManageAdmins>,
    query: ActivityQuery,
) -> AppResult<ApiResponse<ActivityList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = activity_finder(&query);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .find_also_related(AdminUsers)
        .all(&state.orm)
        .await?;
    let items = rows.into_iter().map(activity_entry).collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Activity", ActivityList { items }, Some(meta)))
}

/// Every activity row matching the filters, rendered as CSV.
pub async fn export_activity(
    state: &AppState,
    admin: &Authorized<ManageAdmins>,
    query: ActivityQuery,
) -> AppResult<String> {
    let rows = activity_finder(&query)
        .find_also_related(AdminUsers)
        .all(&state.orm)
        .await?;
    let entries: Vec<ActivityEntry> = rows.into_iter().map(activity_entry).collect();

    tracing::info!(admin_id = %admin.admin_id(), rows = entries.len(), "activity exported");
    activity_csv(&entries)
}

pub fn activity_csv(entries: &[ActivityEntry]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "admin_id", "admin_username", "action", "timestamp"])
        .map_err(|e| AppError::Internal(e.into()))?;
    for entry in entries {
        writer
            .write_record([
                entry.id.to_string(),
                entry.admin_id.to_string(),
                entry.admin_username.clone(),
                entry.action.clone(),
                entry.timestamp.to_rfc3339(),
            ])
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.into()))
}

fn activity_finder(query: &ActivityQuery) -> Select<AdminActivities> {
    let mut condition = Condition::all();
    if let Some(admin_id) = query.admin_id {
        condition = condition.add(ActivityCol::AdminId.eq(admin_id));
    }
    if let Some(action) = query.action.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col((AdminActivities, ActivityCol::Action))))
                .like(contains_pattern(action)),
        );
    }
    if let Some(from) = query.from {
        condition = condition.add(ActivityCol::Timestamp.gte(from.fixed_offset()));
    }
    if let Some(to) = query.to {
        condition = condition.add(ActivityCol::Timestamp.lte(to.fixed_offset()));
    }

    AdminActivities::find()
        .filter(condition)
        .order_by_desc(ActivityCol::Timestamp)
}

fn activity_entry((activity, admin): (ActivityModel, Option<AdminModel>)) -> ActivityEntry {
    ActivityEntry {
        id: activity.id,
        admin_id: activity.admin_id,
        admin_username: admin.map(|a| a.username).unwrap_or_default(),
        action: activity.action,
        timestamp: activity.timestamp.with_timezone(&Utc),
    }
}
