use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::admin_users::Entity as AdminUsers,
    error::AppError,
    models::{Permission, Permissions},
    state::AppState,
};

/// Admin identity and permission flags as granted at login.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub admin_id: Uuid,
    pub username: String,
    pub permissions: Permissions,
}

/// Any authenticated admin, regardless of permissions. The account must
/// still exist and be active; permission flags come from the token.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub AdminIdentity);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let identity = decode_identity(token, &state.config.jwt_secret)?;

        let account = AdminUsers::find_by_id(identity.admin_id)
            .one(&state.orm)
            .await?;
        match account {
            Some(account) if account.is_active => Ok(CurrentAdmin(identity)),
            Some(_) => {
                tracing::warn!(admin_id = %identity.admin_id, "token of deactivated admin");
                Err(AppError::Unauthorized)
            }
            None => {
                tracing::warn!(admin_id = %identity.admin_id, "token of deleted admin");
                Err(AppError::Unauthorized)
            }
        }
    }
}

/// A capability an admin route requires.
pub trait Capability: Send + Sync + 'static {
    const PERMISSION: Permission;
}

#[derive(Debug, Clone, Copy)]
pub struct ManageProducts;
#[derive(Debug, Clone, Copy)]
pub struct ManageOrders;
#[derive(Debug, Clone, Copy)]
pub struct ManageReviews;
#[derive(Debug, Clone, Copy)]
pub struct ManageAdmins;

impl Capability for ManageProducts {
    const PERMISSION: Permission = Permission::Products;
}

impl Capability for ManageOrders {
    const PERMISSION: Permission = Permission::Orders;
}

impl Capability for ManageReviews {
    const PERMISSION: Permission = Permission::Reviews;
}

impl Capability for ManageAdmins {
    const PERMISSION: Permission = Permission::Admins;
}

/// Proof that the caller holds capability `C`. Routes take this as an
/// extractor; services take it by reference so they cannot be reached
/// without the check.
#[derive(Debug, Clone)]
pub struct Authorized<C> {
    pub admin: AdminIdentity,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability> Authorized<C> {
    pub fn check(admin: AdminIdentity) -> Result<Self, AppError> {
        if !admin.permissions.allows(C::PERMISSION) {
            tracing::warn!(
                admin_id = %admin.admin_id,
                permission = ?C::PERMISSION,
                "admin lacks permission"
            );
            return Err(AppError::Forbidden);
        }
        Ok(Self {
            admin,
            _capability: PhantomData,
        })
    }

    pub fn admin_id(&self) -> Uuid {
        self.admin.admin_id
    }
}

impl<C: Capability> FromRequestParts<AppState> for Authorized<C> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentAdmin(identity) = CurrentAdmin::from_request_parts(parts, state).await?;
        Authorized::check(identity)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| AppError::Unauthorized)?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

pub fn decode_identity(token: &str, secret: &str) -> Result<AdminIdentity, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let admin_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

    Ok(AdminIdentity {
        admin_id,
        username: decoded.claims.username,
        permissions: decoded.claims.permissions,
    })
}
