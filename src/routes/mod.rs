use axum::{Json, Router, http::StatusCode, http::Uri, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::{
    response::{ApiResponse, Meta},
    session::session_layer,
    state::AppState,
};

pub mod admin;
pub mod admins;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod storefront;

/// Full application router with state applied. Transport layers (tracing,
/// request ids, limits) are added by the binary.
pub fn create_router(state: AppState) -> Router {
    // Cart, favorites and currency live in the session, so only storefront
    // routes carry the session cookie.
    let storefront = Router::new()
        .merge(storefront::router())
        .merge(products::router())
        .nest("/cart", cart::router())
        .nest("/favorites", favorites::router())
        .merge(orders::router())
        .layer(middleware::from_fn_with_state(state.clone(), session_layer));

    let back_office = Router::new()
        .merge(auth::router())
        .merge(admin::router())
        .nest("/manage_admins", admins::router());

    Router::new()
        .route("/health", get(health::health_check))
        .merge(storefront)
        .merge(back_office)
        .merge(doc::scalar_docs())
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
