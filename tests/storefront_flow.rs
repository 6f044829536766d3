mod common;

use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use storefront::{
    currency::Currency,
    dto::{orders::CheckoutRequest, reviews::SubmitReviewRequest},
    entity::{
        order_items::Entity as OrderItems,
        orders::Entity as Orders,
        products::{ActiveModel as ProductActive, Entity as Products},
    },
    error::AppError,
    routes::params::ProductQuery,
    services::{
        cart_service, catalog_service, favorite_service,
        order_service::{self, CheckoutOutcome},
        review_service,
    },
};

fn customer() -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Mona".into(),
        customer_email: "mona@example.com".into(),
    }
}

#[tokio::test]
async fn cart_never_holds_more_than_stock() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let product = common::create_product(&state, "Desk Lamp", 3_000, 3, None).await?;
    let session = state.sessions.open();

    cart_service::add_to_cart(&state, &session, product.id, 2).await?;

    let err = cart_service::add_to_cart(&state, &session, product.id, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(session.snapshot().cart.quantity(product.id), 2);

    let resp = cart_service::add_to_cart(&state, &session, product.id, 1).await?;
    assert_eq!(resp.data.unwrap().quantity, 3);

    let err = cart_service::add_to_cart(&state, &session, product.id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(session.snapshot().cart.quantity(product.id), 3);
    Ok(())
}

#[tokio::test]
async fn adding_unknown_product_is_not_found() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let session = state.sessions.open();

    let err = cart_service::add_to_cart(&state, &session, uuid::Uuid::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert!(session.snapshot().cart.is_empty());
    Ok(())
}

#[tokio::test]
async fn cart_summary_uses_live_prices_and_skips_deleted_products() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let kept = common::create_product(&state, "Mug", 1_250, 10, None).await?;
    let dropped = common::create_product(&state, "Plate", 900, 10, None).await?;
    let session = state.sessions.open();

    cart_service::add_to_cart(&state, &session, kept.id, 2).await?;
    cart_service::add_to_cart(&state, &session, dropped.id, 1).await?;

    let mut active: ProductActive = kept.clone().into();
    active.price = Set(1_500);
    active.update(&state.orm).await?;
    Products::delete_by_id(dropped.id).exec(&state.orm).await?;

    let summary = cart_service::cart_summary(&state.orm, &session.snapshot()).await?;
    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.items[0].line_total, 3_000);
    assert_eq!(summary.total, 3_000);
    assert_eq!(summary.display_total, "$30.00");

    session.update(|data| data.currency = Currency::Eur);
    let summary = cart_service::cart_summary(&state.orm, &session.snapshot()).await?;
    assert_eq!(summary.total, 3_000);
    assert_eq!(summary.display_total, "€27.60");
    Ok(())
}

#[tokio::test]
async fn checkout_with_empty_cart_creates_no_order() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let session = state.sessions.open();

    let outcome = order_service::checkout(&state, &session, customer()).await?;
    assert!(matches!(outcome, CheckoutOutcome::EmptyCart));
    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn checkout_places_one_order_with_one_item_per_line() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let laptop = common::create_product(&state, "Laptop Pro", 120_000, 10, None).await?;
    let mouse = common::create_product(&state, "Wireless Mouse", 2_500, 50, None).await?;
    let session = state.sessions.open();

    cart_service::add_to_cart(&state, &session, laptop.id, 1).await?;
    cart_service::add_to_cart(&state, &session, mouse.id, 2).await?;
    cart_service::add_to_cart(&state, &session, mouse.id, 1).await?;
    let expected_total = cart_service::cart_summary(&state.orm, &session.snapshot())
        .await?
        .total;
    assert_eq!(expected_total, 127_500);

    let CheckoutOutcome::Placed(placed) =
        order_service::checkout(&state, &session, customer()).await?
    else {
        panic!("expected an order to be placed");
    };

    assert_eq!(placed.order.total_price, expected_total);
    assert_eq!(placed.order.status, "New");
    assert_eq!(placed.items.len(), 2);
    assert_eq!(Orders::find().count(&state.orm).await?, 1);
    assert_eq!(OrderItems::find().count(&state.orm).await?, 2);

    let laptop = Products::find_by_id(laptop.id).one(&state.orm).await?.unwrap();
    let mouse = Products::find_by_id(mouse.id).one(&state.orm).await?.unwrap();
    assert_eq!(laptop.stock, 9);
    assert_eq!(mouse.stock, 47);

    assert!(session.snapshot().cart.is_empty());

    let success = order_service::order_success(&state, &session, placed.order.id).await?;
    assert_eq!(success.data.unwrap().items.len(), 2);

    let stranger = state.sessions.open();
    let err = order_service::order_success(&state, &stranger, placed.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn checkout_writes_nothing_when_stock_ran_out() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let plenty = common::create_product(&state, "Pen", 150, 100, None).await?;
    let scarce = common::create_product(&state, "Notebook", 800, 3, None).await?;
    let session = state.sessions.open();

    cart_service::add_to_cart(&state, &session, plenty.id, 5).await?;
    cart_service::add_to_cart(&state, &session, scarce.id, 3).await?;

    // someone else bought most of the notebooks meanwhile
    let mut active: ProductActive = scarce.clone().into();
    active.stock = Set(1);
    active.update(&state.orm).await?;

    let err = order_service::checkout(&state, &session, customer())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    assert_eq!(OrderItems::find().count(&state.orm).await?, 0);
    let plenty = Products::find_by_id(plenty.id).one(&state.orm).await?.unwrap();
    assert_eq!(plenty.stock, 100);
    assert_eq!(session.snapshot().cart.count(), 8);
    Ok(())
}

#[tokio::test]
async fn checkout_validates_customer_details() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let product = common::create_product(&state, "Pen", 150, 100, None).await?;
    let session = state.sessions.open();
    cart_service::add_to_cart(&state, &session, product.id, 1).await?;

    let err = order_service::checkout(
        &state,
        &session,
        CheckoutRequest {
            customer_name: "Mona".into(),
            customer_email: "not-an-email".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn favorites_toggle_and_list() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let product = common::create_product(&state, "Scarf", 2_000, 4, None).await?;
    let session = state.sessions.open();

    let on = favorite_service::toggle_favorite(&state, &session, product.id).await?;
    let on = on.data.unwrap();
    assert!(on.is_favorite);
    assert_eq!(on.count, 1);

    let list = favorite_service::list_favorites(&state, &session).await?;
    let list = list.data.unwrap();
    assert_eq!(list.count, 1);
    assert!(list.items[0].is_favorite);

    let off = favorite_service::toggle_favorite(&state, &session, product.id).await?;
    assert!(!off.data.unwrap().is_favorite);

    let err = favorite_service::toggle_favorite(&state, &session, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn rating_summary_averages_reviews() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let product = common::create_product(&state, "Headphones", 9_900, 7, None).await?;
    let session = state.sessions.open();

    let detail = catalog_service::get_product(&state, &session.snapshot(), product.id).await?;
    let rating = detail.data.unwrap().product.rating;
    assert_eq!(rating.average, 0.0);
    assert_eq!(rating.count, 0);

    for rating in [5, 3] {
        review_service::submit_review(
            &state,
            product.id,
            SubmitReviewRequest {
                rating,
                comment: Some("ok".into()),
                reviewer_name: "Sam".into(),
            },
        )
        .await?;
    }

    let detail = catalog_service::get_product(&state, &session.snapshot(), product.id).await?;
    let detail = detail.data.unwrap();
    assert_eq!(detail.product.rating.average, 4.0);
    assert_eq!(detail.product.rating.count, 2);
    assert_eq!(detail.reviews.len(), 2);
    Ok(())
}

#[tokio::test]
async fn reviews_are_validated() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let product = common::create_product(&state, "Headphones", 9_900, 7, None).await?;

    let err = review_service::submit_review(
        &state,
        product.id,
        SubmitReviewRequest {
            rating: 6,
            comment: None,
            reviewer_name: "Sam".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

    let err = review_service::submit_review(
        &state,
        uuid::Uuid::new_v4(),
        SubmitReviewRequest {
            rating: 4,
            comment: None,
            reviewer_name: "Sam".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn product_search_matches_name_and_category() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let electronics = common::create_category(&state, "Electronics").await?;
    common::create_product(&state, "Laptop Pro", 120_000, 10, Some(electronics.id)).await?;
    common::create_product(&state, "Wireless Mouse", 2_500, 50, None).await?;
    let session = state.sessions.open().snapshot();

    let found = catalog_service::list_products(
        &state,
        &session,
        ProductQuery {
            query: Some("LAPTOP".into()),
            ..ProductQuery::default()
        },
    )
    .await?;
    let items = found.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product.name, "Laptop Pro");
    assert_eq!(items[0].display_price, "$1200.00");

    let by_category = catalog_service::list_products(
        &state,
        &session,
        ProductQuery {
            category_id: Some(electronics.id),
            ..ProductQuery::default()
        },
    )
    .await?;
    assert_eq!(by_category.meta.unwrap().total, Some(1));

    let categories = catalog_service::list_categories(&state).await?;
    let categories = categories.data.unwrap().items;
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].product_count, 1);
    Ok(())
}

#[tokio::test]
async fn oversized_cart_total_is_rejected() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    let product = common::create_product(&state, "Yacht", 9_000_000_000_000_000_000, 2, None).await?;
    let session = state.sessions.open();
    cart_service::add_to_cart(&state, &session, product.id, 2).await?;

    let err = cart_service::view_cart(&state, &session).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::checkout(&state, &session, customer())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(Orders::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn search_treats_wildcards_literally() -> anyhow::Result<()> {
    let state = common::test_state().await?;
    common::create_product(&state, "Mug 50% off", 900, 5, None).await?;
    common::create_product(&state, "Mug 500ml", 900, 5, None).await?;
    common::create_product(&state, "Tea_Pot", 2_400, 5, None).await?;
    common::create_product(&state, "Tea pot", 2_400, 5, None).await?;
    let session = state.sessions.open().snapshot();

    let search = |term: &str| ProductQuery {
        query: Some(term.into()),
        ..ProductQuery::default()
    };

    let found = catalog_service::list_products(&state, &session, search("50%")).await?;
    let items = found.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product.name, "Mug 50% off");

    let found = catalog_service::list_products(&state, &session, search("a_p")).await?;
    let items = found.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product.name, "Tea_Pot");
    Ok(())
}
