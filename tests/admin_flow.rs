mod common;

use sea_orm::{EntityTrait, PaginatorTrait};
use storefront::{
    dto::{
        admins::CreateAdminRequest,
        auth::LoginRequest,
        orders::UpdateOrderStatusRequest,
        products::{CategoryRequest, ProductForm},
    },
    entity::{admin_activities::Entity as AdminActivities, products::Entity as Products},
    error::AppError,
    middleware::auth::{
        Authorized, CurrentAdmin, ManageAdmins, ManageOrders, ManageProducts, decode_identity,
    },
    models::Permissions,
    routes::params::{ActivityQuery, LowStockQuery},
    services::{
        admin_service, admin_user_service, auth_service, cart_service,
        order_service::{self, CheckoutOutcome},
        product_service,
        upload_service::MAX_PRICE,
    },
};

fn name_only(name: &str) -> CategoryRequest {
    CategoryRequest {
        name: name.to_string(),
    }
}

#[tokio::test]
async fn category_with_products_cannot_be_deleted() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageProducts>(&admin);

    let category = product_service::create_category(&state, &gate, name_only("Books"))
        .await?
        .data
        .unwrap();
    let product = common::create_product(&state, "Novel", 1_500, 4, Some(category.id)).await?;

    let err = product_service::delete_category(&state, &gate, category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    product_service::delete_product(&state, &gate, product.id).await?;
    product_service::delete_category(&state, &gate, category.id).await?;
    Ok(())
}

#[tokio::test]
async fn category_names_are_unique() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageProducts>(&admin);

    product_service::create_category(&state, &gate, name_only("Books")).await?;
    let err = product_service::create_category(&state, &gate, name_only(" Books "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn product_creation_requires_name_price_and_known_category() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageProducts>(&admin);

    let missing_price = ProductForm {
        name: Some("Chair".into()),
        ..ProductForm::default()
    };
    let err = product_service::create_product(&state, &gate, missing_price)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let unknown_category = ProductForm {
        name: Some("Chair".into()),
        price: Some(4_999),
        category_id: Some(uuid::Uuid::new_v4()),
        ..ProductForm::default()
    };
    let err = product_service::create_product(&state, &gate, unknown_category)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let ok = ProductForm {
        name: Some("Chair".into()),
        price: Some(4_999),
        stock: Some(2),
        ..ProductForm::default()
    };
    let created = product_service::create_product(&state, &gate, ok).await?.data.unwrap();
    assert_eq!(created.stock, 2);
    assert_eq!(Products::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn product_prices_are_bounded() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageProducts>(&admin);

    let too_expensive = ProductForm {
        name: Some("Island".into()),
        price: Some(MAX_PRICE + 1),
        ..ProductForm::default()
    };
    let err = product_service::create_product(&state, &gate, too_expensive)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let product = common::create_product(&state, "Chair", 4_999, 2, None).await?;
    let negative = ProductForm {
        price: Some(-1),
        ..ProductForm::default()
    };
    let err = product_service::update_product(&state, &gate, product.id, negative)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let stored = Products::find_by_id(product.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.price, 4_999);
    Ok(())
}

#[tokio::test]
async fn product_edit_is_partial_and_rolls_back_on_error() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageProducts>(&admin);
    let product = common::create_product(&state, "Chair", 4_999, 2, None).await?;

    let edit = ProductForm {
        stock: Some(12),
        ..ProductForm::default()
    };
    let updated = product_service::update_product(&state, &gate, product.id, edit)
        .await?
        .data
        .unwrap();
    assert_eq!(updated.name, "Chair");
    assert_eq!(updated.price, 4_999);
    assert_eq!(updated.stock, 12);

    let bad = ProductForm {
        name: Some("Stool".into()),
        category_id: Some(uuid::Uuid::new_v4()),
        ..ProductForm::default()
    };
    let err = product_service::update_product(&state, &gate, product.id, bad)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let stored = Products::find_by_id(product.id).one(&state.orm).await?.unwrap();
    assert_eq!(stored.name, "Chair");

    let err = product_service::update_product(&state, &gate, uuid::Uuid::new_v4(), ProductForm::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn low_stock_uses_default_threshold() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageProducts>(&admin);
    common::create_product(&state, "Rare", 100, 4, None).await?;
    common::create_product(&state, "Edge", 100, 5, None).await?;
    common::create_product(&state, "Common", 100, 40, None).await?;

    let low = product_service::low_stock(&state, &gate, LowStockQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(low.items.len(), 1);
    assert_eq!(low.items[0].name, "Rare");

    let dashboard = admin_service::dashboard(&state, &CurrentAdmin(common::identity(&admin)))
        .await?
        .data
        .unwrap();
    assert_eq!(dashboard.stats.product_count, 3);
    assert_eq!(dashboard.stats.low_stock_count, 1);
    Ok(())
}

#[tokio::test]
async fn order_status_accepts_only_known_values() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let admin = common::create_admin(&state, "clerk", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageOrders>(&admin);
    let product = common::create_product(&state, "Pen", 150, 10, None).await?;

    let session = state.sessions.open();
    cart_service::add_to_cart(&state, &session, product.id, 2).await?;
    let CheckoutOutcome::Placed(placed) = order_service::checkout(
        &state,
        &session,
        storefront::dto::orders::CheckoutRequest {
            customer_name: "Ali".into(),
            customer_email: "ali@example.com".into(),
        },
    )
    .await?
    else {
        panic!("expected an order");
    };

    let err = order_service::update_order_status(
        &state,
        &gate,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "Cancelled".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = order_service::update_order_status(
        &state,
        &gate,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "Shipped".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status, "Shipped");

    let dashboard = admin_service::dashboard(&state, &CurrentAdmin(common::identity(&admin)))
        .await?
        .data
        .unwrap();
    assert_eq!(dashboard.stats.order_count, 1);
    assert_eq!(dashboard.stats.new_order_count, 0);
    assert_eq!(dashboard.stats.revenue, 300);

    assert_eq!(AdminActivities::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn login_checks_password_and_active_flag() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let perms = Permissions {
        can_manage_orders: true,
        ..Permissions::default()
    };
    let admin = common::create_admin(&state, "clerk", "password1", perms).await?;

    let resp = auth_service::login_admin(
        &state,
        LoginRequest {
            username: "clerk".into(),
            password: "password1".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let token = resp.token.strip_prefix("Bearer ").unwrap();
    let identity = decode_identity(token, common::TEST_JWT_SECRET)?;
    assert_eq!(identity.admin_id, admin.id);
    assert_eq!(identity.permissions, perms);

    let err = auth_service::login_admin(
        &state,
        LoginRequest {
            username: "clerk".into(),
            password: "password2".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));

    let root = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageAdmins>(&root);
    admin_user_service::toggle_active(&state, &gate, admin.id).await?;

    let err = auth_service::login_admin(
        &state,
        LoginRequest {
            username: "clerk".into(),
            password: "password1".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized));
    Ok(())
}

#[tokio::test]
async fn admins_cannot_deactivate_or_delete_themselves() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let root = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let gate = common::authorized::<ManageAdmins>(&root);

    let err = admin_user_service::toggle_active(&state, &gate, root.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let err = admin_user_service::delete_admin(&state, &gate, root.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let created = admin_user_service::create_admin(
        &state,
        &gate,
        CreateAdminRequest {
            username: "helper".into(),
            password: "password1".into(),
            permissions: Permissions {
                can_manage_reviews: true,
                ..Permissions::default()
            },
        },
    )
    .await?
    .data
    .unwrap();
    assert!(created.is_active);
    assert!(created.permissions.can_manage_reviews);
    assert!(!created.permissions.can_manage_admins);

    let granted = admin_user_service::update_permissions(&state, &gate, created.id, Permissions::all())
        .await?
        .data
        .unwrap();
    assert!(granted.permissions.can_manage_admins);

    admin_user_service::delete_admin(&state, &gate, created.id).await?;
    let admins = admin_user_service::list_admins(&state, &gate).await?.data.unwrap();
    assert_eq!(admins.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn activity_log_filters_and_exports() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let root = common::create_admin(&state, "root", "password1", Permissions::all()).await?;
    let other = common::create_admin(&state, "other", "password1", Permissions::all()).await?;
    let root_products = common::authorized::<ManageProducts>(&root);
    let other_products = common::authorized::<ManageProducts>(&other);
    let root_admins = common::authorized::<ManageAdmins>(&root);

    product_service::create_category(&state, &root_products, name_only("Books")).await?;
    product_service::create_category(&state, &root_products, name_only("Games")).await?;
    product_service::create_category(&state, &other_products, name_only("Toys")).await?;

    let all = admin_user_service::list_activity(&state, &root_admins, ActivityQuery::default()).await?;
    assert_eq!(all.meta.unwrap().total, Some(3));

    let by_root = admin_user_service::list_activity(
        &state,
        &root_admins,
        ActivityQuery {
            admin_id: Some(root.id),
            ..ActivityQuery::default()
        },
    )
    .await?;
    let entries = by_root.data.unwrap().items;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.admin_username == "root"));

    let toys = admin_user_service::list_activity(
        &state,
        &root_admins,
        ActivityQuery {
            action: Some("TOYS".into()),
            ..ActivityQuery::default()
        },
    )
    .await?;
    assert_eq!(toys.data.unwrap().items.len(), 1);

    let paged = admin_user_service::list_activity(
        &state,
        &root_admins,
        ActivityQuery {
            page: Some(2),
            per_page: Some(2),
            ..ActivityQuery::default()
        },
    )
    .await?;
    assert_eq!(paged.data.unwrap().items.len(), 1);

    let csv = admin_user_service::export_activity(
        &state,
        &root_admins,
        ActivityQuery {
            admin_id: Some(other.id),
            ..ActivityQuery::default()
        },
    )
    .await?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,admin_id,admin_username,action,timestamp");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("other"));
    assert!(lines[1].contains("Toys"));
    Ok(())
}

#[test]
fn gates_reject_missing_permissions() {
    let identity = storefront::middleware::auth::AdminIdentity {
        admin_id: uuid::Uuid::new_v4(),
        username: "viewer".into(),
        permissions: Permissions::default(),
    };
    assert!(matches!(
        Authorized::<ManageProducts>::check(identity),
        Err(AppError::Forbidden)
    ));
}
