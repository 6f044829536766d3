#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use storefront::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{admin_users, categories, products},
    middleware::auth::{AdminIdentity, Authorized, Capability},
    models::Permissions,
    services::auth_service::hash_password,
    state::AppState,
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Fresh in-memory database with the schema applied.
pub async fn test_state() -> anyhow::Result<AppState> {
    let database_url = "sqlite::memory:";
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_ttl_hours: 1,
        static_dir: std::env::temp_dir().join(format!("storefront-test-{}", Uuid::new_v4())),
        session_idle_minutes: 30,
    };
    Ok(AppState::new(orm, config))
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<categories::Model> {
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(category)
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    price: i64,
    stock: i32,
    category_id: Option<Uuid>,
) -> anyhow::Result<products::Model> {
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        price: Set(price),
        description: Set(Some(format!("{name} description"))),
        stock: Set(stock),
        image_url: Set(None),
        category_id: Set(category_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}

pub async fn create_admin(
    state: &AppState,
    username: &str,
    password: &str,
    permissions: Permissions,
) -> anyhow::Result<admin_users::Model> {
    let admin = admin_users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        can_manage_products: Set(permissions.can_manage_products),
        can_manage_orders: Set(permissions.can_manage_orders),
        can_manage_reviews: Set(permissions.can_manage_reviews),
        can_manage_admins: Set(permissions.can_manage_admins),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(admin)
}

pub fn identity(admin: &admin_users::Model) -> AdminIdentity {
    AdminIdentity {
        admin_id: admin.id,
        username: admin.username.clone(),
        permissions: Permissions::from(admin),
    }
}

pub fn authorized<C: Capability>(admin: &admin_users::Model) -> Authorized<C> {
    Authorized::check(identity(admin)).expect("admin holds the capability")
}
