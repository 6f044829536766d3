use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use validator::Validate;

use crate::{
    audit::record_activity,
    config::AppConfig,
    dto::auth::{Claims, LoginRequest, LoginResponse},
    entity::admin_users::{self, Column as AdminCol, Entity as AdminUsers},
    error::{AppError, AppResult},
    models::{AdminUser, Permissions},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn login_admin(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let LoginRequest { username, password } = payload;

    let admin = AdminUsers::find()
        .filter(AdminCol::Username.eq(username.trim()))
        .one(&state.orm)
        .await?;

    let Some(admin) = admin else {
        tracing::warn!(username = %username, "login for unknown admin");
        return Err(AppError::Unauthorized);
    };

    if !verify_password(&password, &admin.password_hash)? {
        tracing::warn!(admin_id = %admin.id, "login with wrong password");
        return Err(AppError::Unauthorized);
    }

    if !admin.is_active {
        tracing::warn!(admin_id = %admin.id, "login for deactivated admin");
        return Err(AppError::Unauthorized);
    }

    let token = issue_token(&state.config, &admin)?;

    record_activity(&state.orm, admin.id, "Logged in").await;
    tracing::info!(admin_id = %admin.id, "admin logged in");

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        admin: AdminUser::from(admin),
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

/// Signs a token carrying the admin's identity and permission flags.
pub fn issue_token(config: &AppConfig, admin: &admin_users::Model) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.jwt_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: admin.id.to_string(),
        username: admin.username.clone(),
        permissions: Permissions::from(admin),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}
