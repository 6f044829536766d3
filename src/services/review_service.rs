use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::record_activity,
    dto::{
        reviews::{ReviewList, SubmitReviewRequest},
        storefront::Deleted,
    },
    entity::{
        products::Entity as Products,
        reviews::{ActiveModel as ReviewActive, Column as ReviewCol, Entity as Reviews},
    },
    error::{AppError, AppResult},
    middleware::auth::{Authorized, ManageReviews},
    models::Review,
    response::{ApiResponse, Meta},
    routes::params::ReviewListQuery,
    state::AppState,
};

pub async fn submit_review(
    state: &AppState,
    product_id: Uuid,
    payload: SubmitReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    payload.validate()?;

    let product = Products::find_by_id(product_id).one(&state.orm).await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let reviewer_name = payload.reviewer_name.trim().to_owned();
    if reviewer_name.is_empty() {
        return Err(AppError::BadRequest("reviewer_name is required".into()));
    }

    let review = ReviewActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        rating: Set(payload.rating),
        comment: Set(payload
            .comment
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())),
        reviewer_name: Set(reviewer_name),
        date_posted: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(%product_id, rating = review.rating, "review submitted");
    Ok(ApiResponse::success(
        "Review submitted",
        Review::from(review),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(
    state: &AppState,
    _admin: &Authorized<ManageReviews>,
    query: ReviewListQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(product_id) = query.product_id {
        condition = condition.add(ReviewCol::ProductId.eq(product_id));
    }

    let finder = Reviews::find()
        .filter(condition)
        .order_by_desc(ReviewCol::DatePosted);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

pub async fn delete_review(
    state: &AppState,
    admin: &Authorized<ManageReviews>,
    id: Uuid,
) -> AppResult<ApiResponse<Deleted>> {
    let review = Reviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Reviews::delete_by_id(review.id).exec(&state.orm).await?;

    record_activity(
        &state.orm,
        admin.admin_id(),
        format!(
            "Deleted review {} by '{}' on product {}",
            review.id, review.reviewer_name, review.product_id
        ),
    )
    .await;

    Ok(ApiResponse::success(
        "Review deleted",
        Deleted { id },
        Some(Meta::empty()),
    ))
}
