use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::favorites::{FavoriteProductList, FavoriteToggle},
    entity::products::{Column as ProdCol, Entity as Products},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::catalog_service::summarize,
    session::Session,
    state::AppState,
};

pub async fn list_favorites(
    state: &AppState,
    session: &Session,
) -> AppResult<ApiResponse<FavoriteProductList>> {
    let data = session.snapshot();
    let ids = data.favorites.ids();

    let products = if ids.is_empty() {
        Vec::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(ids))
            .order_by_asc(ProdCol::Name)
            .all(&state.orm)
            .await?
    };
    let items = summarize(&state.orm, products, &data).await?;
    let count = items.len();

    Ok(ApiResponse::success(
        "Favorites",
        FavoriteProductList { items, count },
        Some(Meta::empty()),
    ))
}

pub async fn toggle_favorite(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
) -> AppResult<ApiResponse<FavoriteToggle>> {
    let exists = Products::find_by_id(product_id).one(&state.orm).await?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }

    let (is_favorite, count) = session.update(|data| {
        let now_favorite = data.favorites.toggle(product_id);
        (now_favorite, data.favorites.len())
    });

    let message = if is_favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(ApiResponse::success(
        message,
        FavoriteToggle {
            product_id,
            is_favorite,
            count,
        },
        Some(Meta::empty()),
    ))
}
