use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use storefront::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{admin_users, categories, products},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_super_admin(&orm, "admin", "admin123").await?;
    let electronics = ensure_category(&orm, "Electronics").await?;
    let accessories = ensure_category(&orm, "Accessories").await?;
    seed_products(&orm, electronics, accessories).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_super_admin(orm: &OrmConn, username: &str, password: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = admin_users::Entity::find()
        .filter(admin_users::Column::Username.eq(username))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let password_hash = hash_password(password)?;
    let admin = admin_users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_owned()),
        password_hash: Set(password_hash),
        can_manage_products: Set(true),
        can_manage_orders: Set(true),
        can_manage_reviews: Set(true),
        can_manage_admins: Set(true),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    Ok(admin.id)
}

async fn ensure_category(orm: &OrmConn, name: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = categories::Entity::find()
        .filter(categories::Column::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_owned()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}

async fn seed_products(orm: &OrmConn, electronics: Uuid, accessories: Uuid) -> anyhow::Result<()> {
    if products::Entity::find().count(orm).await? > 0 {
        return Ok(());
    }

    let demo = [
        ("Laptop Pro", 120_000_i64, "Powerful machine.", 10, electronics),
        ("Wireless Mouse", 2_500_i64, "Ergonomic design.", 50, accessories),
    ];
    for (name, price, description, stock, category_id) in demo {
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_owned()),
            price: Set(price),
            description: Set(Some(description.to_owned())),
            stock: Set(stock),
            image_url: Set(None),
            category_id: Set(Some(category_id)),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    Ok(())
}
