use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    dto::cart::{CartLine, CartSummary, CartUpdate},
    entity::products::{Column as ProdCol, Entity as Products},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    session::{CartError, Session, SessionData},
    state::AppState,
};

/// Prices the session cart from live product rows. Lines whose product has
/// been deleted are skipped.
pub async fn cart_summary<C>(conn: &C, session: &SessionData) -> AppResult<CartSummary>
where
    C: ConnectionTrait,
{
    let currency = session.currency;
    let products = Products::find()
        .filter(ProdCol::Id.is_in(session.cart.product_ids()))
        .all(conn)
        .await?;

    let mut items = Vec::with_capacity(products.len());
    let mut total: i64 = 0;
    let mut count: u32 = 0;
    for (product_id, quantity) in session.cart.lines() {
        let Some(product) = products.iter().find(|p| p.id == product_id) else {
            continue;
        };
        let line_total = product
            .price
            .checked_mul(i64::from(quantity))
            .ok_or_else(out_of_range)?;
        total = total.checked_add(line_total).ok_or_else(out_of_range)?;
        count += quantity;
        items.push(CartLine {
            product_id,
            name: product.name.clone(),
            price: product.price,
            quantity: i32::try_from(quantity).unwrap_or(i32::MAX),
            line_total,
            display_price: currency.format(product.price),
            display_line_total: currency.format(line_total),
        });
    }

    Ok(CartSummary {
        items,
        total,
        display_total: currency.format(total),
        count,
        currency,
    })
}

fn out_of_range() -> AppError {
    AppError::BadRequest("cart total is out of range".into())
}

pub async fn view_cart(state: &AppState, session: &Session) -> AppResult<ApiResponse<CartSummary>> {
    let summary = cart_summary(&state.orm, &session.snapshot()).await?;
    Ok(ApiResponse::success("Cart", summary, Some(Meta::empty())))
}

pub async fn add_to_cart(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
    quantity: u32,
) -> AppResult<ApiResponse<CartUpdate>> {
    let product = Products::find_by_id(product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let (quantity, cart_count) = session
        .update(|data| {
            let quantity = data.cart.add(product.id, quantity, product.stock)?;
            Ok::<_, CartError>((quantity, data.cart.count()))
        })
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    tracing::debug!(%product_id, quantity, "cart updated");
    Ok(ApiResponse::success(
        "Added to cart",
        CartUpdate {
            product_id,
            quantity,
            cart_count,
        },
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    session: &Session,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartSummary>> {
    session.update(|data| data.cart.remove(product_id));
    let summary = cart_summary(&state.orm, &session.snapshot()).await?;
    Ok(ApiResponse::success("Removed from cart", summary, Some(Meta::empty())))
}

pub async fn clear_cart(state: &AppState, session: &Session) -> AppResult<ApiResponse<CartSummary>> {
    session.update(|data| data.cart.clear());
    let summary = cart_summary(&state.orm, &session.snapshot()).await?;
    Ok(ApiResponse::success("Cart cleared", summary, Some(Meta::empty())))
}
