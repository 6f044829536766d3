use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    currency::Currency,
    dto::storefront::{CurrencySettings, Home},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::catalog_service,
    session::Session,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/currency", get(currency_settings))
        .route("/currency/{code}", get(set_currency))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Storefront home", body = ApiResponse<Home>)
    ),
    tag = "Storefront"
)]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ApiResponse<Home>>> {
    let resp = catalog_service::home(&state, &session.snapshot()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/currency",
    responses(
        (status = 200, description = "Available currencies and the session's choice", body = ApiResponse<CurrencySettings>)
    ),
    tag = "Storefront"
)]
pub async fn currency_settings(session: Session) -> Json<ApiResponse<CurrencySettings>> {
    let data = catalog_service::currency_settings(session.snapshot().currency);
    Json(ApiResponse::success("Currencies", data, Some(Meta::empty())))
}

#[utoipa::path(
    get,
    path = "/currency/{code}",
    params(
        ("code" = String, Path, description = "Currency code: USD, EUR, GBP, SAR or EGP")
    ),
    responses(
        (status = 200, description = "Session currency changed", body = ApiResponse<CurrencySettings>),
        (status = 400, description = "Unknown currency code"),
    ),
    tag = "Storefront"
)]
pub async fn set_currency(
    session: Session,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<CurrencySettings>>> {
    let currency: Currency = code.parse().map_err(AppError::BadRequest)?;
    session.update(|data| data.currency = currency);

    let data = catalog_service::currency_settings(currency);
    Ok(Json(ApiResponse::success(
        format!("Currency set to {currency}"),
        data,
        Some(Meta::empty()),
    )))
}
