pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /chinese-names/generate      generate names (POST, optional auth)
///
/// /checkout                    create hosted checkout (POST, requires auth)
/// /checkout/tiers              product catalog (GET)
///
/// /webhooks/creem              payment provider webhook (POST, signed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/chinese-names/generate",
            post(handlers::names::generate_names),
        )
        .route("/checkout", post(handlers::checkout::create_checkout))
        .route("/checkout/tiers", get(handlers::checkout::list_tiers))
        .route("/webhooks/creem", post(handlers::webhooks::creem_webhook))
}
