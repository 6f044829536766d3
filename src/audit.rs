use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use uuid::Uuid;

use crate::{entity::admin_activities::ActiveModel as ActivityActive, error::AppResult};

/// Appends one row to the admin activity log.
pub async fn log_activity<C>(conn: &C, admin_id: Uuid, action: impl Into<String>) -> AppResult<()>
where
    C: ConnectionTrait,
{
    ActivityActive {
        id: Set(Uuid::new_v4()),
        admin_id: Set(admin_id),
        action: Set(action.into()),
        timestamp: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    Ok(())
}

/// Like [`log_activity`], but a failed write only produces a warning.
pub async fn record_activity<C>(conn: &C, admin_id: Uuid, action: impl Into<String>)
where
    C: ConnectionTrait,
{
    let action = action.into();
    if let Err(err) = log_activity(conn, admin_id, action.clone()).await {
        tracing::warn!(error = %err, %admin_id, %action, "activity log failed");
    }
}
